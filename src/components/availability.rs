//! Mapping between availability labels and the store's enumerated constants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How an event blocks time on the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    #[default]
    Busy,
    Free,
    Tentative,
}

impl Availability {
    /// Store constant for busy
    pub const BUSY_CODE: i64 = 0;
    /// Store constant for free
    pub const FREE_CODE: i64 = 1;
    /// Store constant for tentative
    pub const TENTATIVE_CODE: i64 = 2;

    /// Resolve an application label; anything unrecognized is busy
    pub fn from_label(label: &str) -> Self {
        match label {
            "free" => Availability::Free,
            "tentative" => Availability::Tentative,
            "busy" => Availability::Busy,
            _ => Availability::Busy,
        }
    }

    /// Resolve a store constant; unknown codes are busy
    pub fn from_code(code: i64) -> Self {
        match code {
            Self::FREE_CODE => Availability::Free,
            Self::TENTATIVE_CODE => Availability::Tentative,
            Self::BUSY_CODE => Availability::Busy,
            _ => Availability::Busy,
        }
    }

    /// Resolve a single store token, either numeric or symbolic
    pub fn from_store_token(token: &str) -> Option<Self> {
        let token = token.trim();
        if let Ok(code) = token.parse::<i64>() {
            return match code {
                Self::BUSY_CODE => Some(Availability::Busy),
                Self::FREE_CODE => Some(Availability::Free),
                Self::TENTATIVE_CODE => Some(Availability::Tentative),
                _ => None,
            };
        }

        // Some devices store the constant names instead of their values
        match token {
            "AVAILABILITY_BUSY" => Some(Availability::Busy),
            "AVAILABILITY_FREE" => Some(Availability::Free),
            "AVAILABILITY_TENTATIVE" => Some(Availability::Tentative),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Availability::Busy => Self::BUSY_CODE,
            Availability::Free => Self::FREE_CODE,
            Availability::Tentative => Self::TENTATIVE_CODE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Availability::Busy => "busy",
            Availability::Free => "free",
            Availability::Tentative => "tentative",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label for a store constant
pub fn to_label(code: i64) -> &'static str {
    Availability::from_code(code).label()
}

/// Parse a comma-separated list of allowed availabilities as stored by the calendar
///
/// Unrecognized tokens are dropped.
pub fn parse_store_string(raw: &str) -> Vec<Availability> {
    raw.split(',')
        .filter_map(Availability::from_store_token)
        .collect()
}
