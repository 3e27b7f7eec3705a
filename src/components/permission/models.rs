use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Platform permission for reading calendars
pub const READ_CALENDAR: &str = "android.permission.READ_CALENDAR";
/// Platform permission for writing calendars
pub const WRITE_CALENDAR: &str = "android.permission.WRITE_CALENDAR";

/// Calendar access being checked or requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    ReadOnly,
    ReadWrite,
}

impl Scope {
    pub fn from_read_only(read_only: bool) -> Self {
        if read_only {
            Scope::ReadOnly
        } else {
            Scope::ReadWrite
        }
    }

    /// Platform permissions that make up this scope
    pub fn permissions(self) -> &'static [&'static str] {
        match self {
            Scope::ReadOnly => &[READ_CALENDAR],
            Scope::ReadWrite => &[WRITE_CALENDAR, READ_CALENDAR],
        }
    }

    /// Permission whose rationale decides between denied and restricted
    pub fn rationale_permission(self) -> &'static str {
        match self {
            Scope::ReadOnly => READ_CALENDAR,
            Scope::ReadWrite => WRITE_CALENDAR,
        }
    }

    /// Key of the persisted "already requested" flag
    pub fn history_key(self) -> &'static str {
        match self {
            // Read-write uses the unsuffixed key
            Scope::ReadWrite => "permissionRequested",
            Scope::ReadOnly => "permissionRequestedRead",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::ReadOnly => f.write_str("read-only"),
            Scope::ReadWrite => f.write_str("read-write"),
        }
    }
}

/// Observable permission status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Authorized,
    Denied,
    Undetermined,
    Restricted,
}

impl PermissionState {
    pub fn as_str(self) -> &'static str {
        match self {
            PermissionState::Authorized => "authorized",
            PermissionState::Denied => "denied",
            PermissionState::Undetermined => "undetermined",
            PermissionState::Restricted => "restricted",
        }
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer of the permission authority for one permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grant {
    Granted,
    Denied,
}

/// Correlates a permission request with its eventual answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestToken(Uuid);

impl RequestToken {
    /// Fresh random token
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Token chosen by the caller
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
