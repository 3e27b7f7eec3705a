use crate::components::recurrence::RecurrenceRule;
use crate::components::store::{EventFilter, EventSelector};
use crate::error::{Error, GateResult};
use crate::utils::time::DateInput;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event as described by the application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDescriptor {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<DateInput>,
    pub end_date: Option<DateInput>,
    pub all_day: Option<bool>,
    /// IANA zone id
    pub time_zone: Option<String>,
    pub end_time_zone: Option<String>,
    /// Only its presence matters
    pub alarms: Option<Value>,
    pub availability: Option<String>,
    /// Integer id, as a number or a numeric string
    pub calendar_id: Option<Value>,
    /// Simple frequency such as `weekly`
    pub recurrence: Option<String>,
    pub recurrence_rule: Option<RecurrenceRule>,
    /// Read date strings in the local zone instead of UTC
    #[serde(default, alias = "skipAndroidTimezone")]
    pub skip_timezone: bool,
}

impl EventDescriptor {
    /// Build a descriptor from an untyped JSON object
    pub fn from_value(value: Value) -> GateResult<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Which events an update or removal applies to
///
/// A positive `event_id` selects that row alone. Otherwise the non-empty
/// filter fields are AND-combined; with none set nothing is selected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTarget {
    pub event_id: Option<i64>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub calendar_id: Option<Value>,
}

impl EventTarget {
    pub fn by_id(event_id: i64) -> Self {
        Self {
            event_id: Some(event_id),
            ..Default::default()
        }
    }

    pub fn matching(
        title: Option<&str>,
        location: Option<&str>,
        calendar_id: Option<i64>,
    ) -> Self {
        Self {
            event_id: None,
            title: title.map(str::to_string),
            location: location.map(str::to_string),
            calendar_id: calendar_id.map(Value::from),
        }
    }

    /// Resolve to a store selector, `None` when the target selects nothing
    pub fn selector(&self) -> GateResult<Option<EventSelector>> {
        if let Some(id) = self.event_id.filter(|id| *id > 0) {
            return Ok(Some(EventSelector::Id(id)));
        }

        let calendar_id = match &self.calendar_id {
            Some(Value::String(s)) if s.is_empty() => None,
            Some(value) => Some(parse_calendar_id(value)?),
            None => None,
        };

        let filter = EventFilter {
            title: non_empty(&self.title),
            location: non_empty(&self.location),
            calendar_id,
        };

        if filter.is_empty() {
            return Ok(None);
        }
        Ok(Some(EventSelector::Filter(filter)))
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

/// Parse a calendar id given as a number or a numeric string
pub fn parse_calendar_id(value: &Value) -> GateResult<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| Error::InvalidCalendarId(n.to_string())),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| Error::InvalidCalendarId(format!("'{}'", s))),
        other => Err(Error::InvalidCalendarId(other.to_string())),
    }
}
