use serde::{Deserialize, Serialize};
use std::fmt;

/// Account type the store uses for calendars that live only on the device
pub const LOCAL_ACCOUNT_TYPE: &str = "LOCAL";

/// Calendar as described by the application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDescriptor {
    pub source: Option<CalendarSource>,
    /// Internal calendar name
    pub name: Option<String>,
    /// Display name
    pub title: Option<String>,
    pub color: Option<i64>,
    pub access_level: Option<String>,
    pub owner_account: Option<String>,
}

/// Account a calendar belongs to
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSource {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub source_type: Option<String>,
    #[serde(default)]
    pub is_local_account: bool,
}

/// Resolved account type of a calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccountType {
    Local,
    Named(String),
}

impl AccountType {
    pub fn as_str(&self) -> &str {
        match self {
            AccountType::Local => LOCAL_ACCOUNT_TYPE,
            AccountType::Named(name) => name,
        }
    }
}

impl From<String> for AccountType {
    fn from(value: String) -> Self {
        if value == LOCAL_ACCOUNT_TYPE {
            AccountType::Local
        } else {
            AccountType::Named(value)
        }
    }
}

impl From<AccountType> for String {
    fn from(value: AccountType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access granted to the calendar owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Contributor,
    Editor,
    #[serde(rename = "freebusy")]
    FreeBusy,
    Override,
    Owner,
    Read,
    Respond,
    Root,
    #[default]
    None,
}

impl AccessLevel {
    /// Resolve an application label; unrecognized labels grant no access
    pub fn from_label(label: &str) -> Self {
        match label {
            "contributor" => AccessLevel::Contributor,
            "editor" => AccessLevel::Editor,
            "freebusy" => AccessLevel::FreeBusy,
            "override" => AccessLevel::Override,
            "owner" => AccessLevel::Owner,
            "read" => AccessLevel::Read,
            "respond" => AccessLevel::Respond,
            "root" => AccessLevel::Root,
            "none" => AccessLevel::None,
            _ => AccessLevel::None,
        }
    }

    /// Store constant for this level
    pub fn code(self) -> i64 {
        match self {
            AccessLevel::None => 0,
            AccessLevel::FreeBusy => 100,
            AccessLevel::Read => 200,
            AccessLevel::Respond => 300,
            AccessLevel::Override => 400,
            AccessLevel::Contributor => 500,
            AccessLevel::Editor => 600,
            AccessLevel::Owner => 700,
            AccessLevel::Root => 800,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AccessLevel::Contributor => "contributor",
            AccessLevel::Editor => "editor",
            AccessLevel::FreeBusy => "freebusy",
            AccessLevel::Override => "override",
            AccessLevel::Owner => "owner",
            AccessLevel::Read => "read",
            AccessLevel::Respond => "respond",
            AccessLevel::Root => "root",
            AccessLevel::None => "none",
        }
    }
}
