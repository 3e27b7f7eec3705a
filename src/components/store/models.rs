use crate::components::calendar::models::{AccessLevel, AccountType};
use serde::{Deserialize, Serialize};

/// Attribute set of a new calendar row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarAttributes {
    pub account_name: String,
    pub account_type: AccountType,
    pub name: String,
    pub display_name: String,
    pub color: i64,
    pub access_level: AccessLevel,
    pub owner_account: String,
}

/// Attribute set of an event row, as produced by the field mapper
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_location: Option<String>,
    /// Start as epoch millis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtstart: Option<i64>,
    /// End as epoch millis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtend: Option<i64>,
    /// 0 or 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_day: Option<u8>,
    pub event_timezone: String,
    pub event_end_timezone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_alarm: Option<bool>,
    /// Store availability constant
    pub availability: i64,
    pub calendar_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rrule: Option<String>,
    /// ISO-8601 duration, present whenever `rrule` is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// Equality filter over non-deleted events; set fields are AND-combined
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventFilter {
    pub title: Option<String>,
    pub location: Option<String>,
    pub calendar_id: Option<i64>,
}

impl EventFilter {
    /// True when no field is set, i.e. the filter would match everything
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.location.is_none() && self.calendar_id.is_none()
    }

    /// Whether an event row satisfies every set field
    pub fn matches(&self, event: &EventAttributes) -> bool {
        let title_ok = self
            .title
            .as_ref()
            .map_or(true, |t| event.title.as_ref() == Some(t));
        let location_ok = self
            .location
            .as_ref()
            .map_or(true, |l| event.event_location.as_ref() == Some(l));
        let calendar_ok = self.calendar_id.map_or(true, |id| event.calendar_id == id);

        title_ok && location_ok && calendar_ok
    }
}

/// Rows an update or delete applies to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventSelector {
    /// Exactly one row by id
    Id(i64),
    /// Every non-deleted row matching the filter
    Filter(EventFilter),
}
