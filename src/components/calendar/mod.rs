pub mod models;

pub use models::{AccessLevel, AccountType, CalendarDescriptor, CalendarSource};

use crate::components::store::CalendarAttributes;
use crate::error::{missing_field, GateResult};

/// Check a calendar description and build the attribute set for insertion
///
/// Every required field is checked before anything is built, so a failure
/// never reaches the store.
pub fn calendar_attributes(descriptor: &CalendarDescriptor) -> GateResult<CalendarAttributes> {
    let source = descriptor
        .source
        .as_ref()
        .ok_or_else(|| missing_field("new calendars require `source` object"))?;
    let name = required(&descriptor.name, "new calendars require `name`")?;
    let title = required(&descriptor.title, "new calendars require `title`")?;
    let color = descriptor
        .color
        .ok_or_else(|| missing_field("new calendars require `color`"))?;
    let access_level = required(&descriptor.access_level, "new calendars require `accessLevel`")?;
    let owner_account = required(&descriptor.owner_account, "new calendars require `ownerAccount`")?;

    let account_name = required(
        &source.name,
        "new calendars require a `source` object with a `name`",
    )?;

    let account_type = if source.is_local_account {
        AccountType::Local
    } else {
        let source_type = required(
            &source.source_type,
            "new calendars require a `source` object with a `type`, or `isLocalAccount`: true",
        )?;
        AccountType::from(source_type.to_string())
    };

    Ok(CalendarAttributes {
        account_name: account_name.to_string(),
        account_type,
        name: name.to_string(),
        display_name: title.to_string(),
        color,
        access_level: AccessLevel::from_label(access_level),
        owner_account: owner_account.to_string(),
    })
}

fn required<'a>(value: &'a Option<String>, message: &str) -> GateResult<&'a str> {
    value.as_deref().ok_or_else(|| missing_field(message))
}
