use crate::error::{Error, GateResult};
use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Fixed wire format of event dates, e.g. `2024-01-01T00:00:00.000Z`
pub const EVENT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.%3fZ";

/// Format of the RRULE `UNTIL` clause, always rendered in UTC
pub const UNTIL_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// A date as supplied by the application: a formatted string or epoch millis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateInput {
    Millis(f64),
    Text(String),
}

impl DateInput {
    /// Resolve to epoch milliseconds
    ///
    /// Strings are read in UTC unless `local` is given, in which case the
    /// wall-clock value is interpreted in that zone.
    pub fn to_millis(&self, local: Option<&LocalZone>) -> GateResult<i64> {
        match self {
            // Fractional millis are truncated
            DateInput::Millis(millis) => Ok(*millis as i64),
            DateInput::Text(text) => parse_event_date(text, local).map(|dt| dt.timestamp_millis()),
        }
    }
}

impl From<i64> for DateInput {
    fn from(millis: i64) -> Self {
        DateInput::Millis(millis as f64)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

/// The zone an event is created in when the caller names none
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LocalZone {
    /// Whatever the host reports at the moment of the call
    #[default]
    System,
    /// A pinned zone
    Fixed(Tz),
}

impl LocalZone {
    /// IANA id of the zone, looked up on every call for `System`
    pub fn id(&self) -> String {
        match self {
            LocalZone::System => system_zone_id(),
            LocalZone::Fixed(tz) => tz.name().to_string(),
        }
    }

    /// Interpret a wall-clock time in this zone
    pub fn localize(&self, naive: &NaiveDateTime) -> GateResult<DateTime<Utc>> {
        match self {
            LocalZone::System => {
                single_instant(chrono::Local.from_local_datetime(naive), naive)
            }
            LocalZone::Fixed(tz) => single_instant(tz.from_local_datetime(naive), naive),
        }
    }
}

fn single_instant<Z: TimeZone>(
    result: LocalResult<DateTime<Z>>,
    naive: &NaiveDateTime,
) -> GateResult<DateTime<Utc>> {
    // Ambiguous times (DST fall-back) take the earlier instant
    result
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| Error::InvalidDateFormat(format!("{} does not exist in the local zone", naive)))
}

/// Current system zone id, falling back to UTC when the host cannot tell
pub fn system_zone_id() -> String {
    match iana_time_zone::get_timezone() {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Could not determine system time zone, using UTC: {}", e);
            "UTC".to_string()
        }
    }
}

/// Parse an event date string in the fixed wire format
pub fn parse_event_date(text: &str, local: Option<&LocalZone>) -> GateResult<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(text, EVENT_DATE_FORMAT)
        .map_err(|e| Error::InvalidDateFormat(format!("'{}': {}", text, e)))?;

    match local {
        Some(zone) => zone.localize(&naive),
        None => Ok(naive.and_utc()),
    }
}

/// Render epoch millis as an RRULE `UNTIL` value
pub fn format_until(millis: i64) -> GateResult<String> {
    let instant = Utc
        .timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| Error::InvalidDateFormat(format!("{} is out of range", millis)))?;
    Ok(instant.format(UNTIL_FORMAT).to_string())
}
