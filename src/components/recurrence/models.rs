use crate::utils::time::DateInput;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Duration attached to recurring events when the caller gives none
pub const DEFAULT_DURATION: &str = "PT1H";

/// Repetition frequency understood by the rule builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Parse an application token; `None` for anything else
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "daily" => Some(Frequency::Daily),
            "weekly" => Some(Frequency::Weekly),
            "monthly" => Some(Frequency::Monthly),
            "yearly" => Some(Frequency::Yearly),
            _ => None,
        }
    }

    /// RRULE `FREQ` value
    pub fn rule_token(self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rule_token())
    }
}

/// Structured recurrence as supplied with an event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    pub frequency: Option<String>,
    pub interval: Option<i64>,
    /// ISO-8601 duration of each occurrence
    pub duration: Option<String>,
    /// Number of occurrences
    pub occurrence: Option<i64>,
    pub end_date: Option<DateInput>,
    /// Weekday tokens such as `MO`, `TU`
    pub days_of_week: Option<Vec<String>>,
    pub days_of_month: Option<Vec<i64>>,
    pub week_start: Option<String>,
    /// Signed position, -1 is the last week
    pub week_position_in_month: Option<i64>,
}

/// Everything the builder needs besides the frequency
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleOptions {
    pub interval: Option<i64>,
    /// `UNTIL` as epoch millis
    pub until: Option<i64>,
    pub occurrence: Option<i64>,
    pub days_of_week: Option<Vec<String>>,
    pub week_start: Option<String>,
    pub week_position_in_month: Option<i64>,
    pub days_of_month: Option<Vec<i64>>,
}

/// Rule string plus the duration it must travel with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltRule {
    pub rrule: String,
    pub duration: String,
}
