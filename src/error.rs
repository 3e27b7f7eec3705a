use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for calendar operations
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Calendar permission not granted: {0}")]
    #[diagnostic(code(calendar_gate::denied))]
    PermissionDenied(String),

    #[error("Missing required field: {0}")]
    #[diagnostic(code(calendar_gate::missing_required_field))]
    MissingRequiredField(String),

    #[error("Invalid date format: {0}")]
    #[diagnostic(
        code(calendar_gate::invalid_date_format),
        help("Dates must look like 2024-01-01T00:00:00.000Z or be epoch milliseconds")
    )]
    InvalidDateFormat(String),

    #[error("Invalid calendar id: {0}")]
    #[diagnostic(code(calendar_gate::invalid_calendar_id))]
    InvalidCalendarId(String),

    #[error("Empty sequence for {0}")]
    #[diagnostic(code(calendar_gate::empty_sequence))]
    EmptySequence(String),

    #[error("Calendar store error: {0}")]
    #[diagnostic(code(calendar_gate::store_error))]
    Store(String),

    #[error("Permission request error: {0}")]
    #[diagnostic(code(calendar_gate::permission_request_error))]
    PermissionRequest(String),

    #[error("Permission authority unavailable: {0}")]
    #[diagnostic(code(calendar_gate::authority_unavailable))]
    AuthorityUnavailable(String),

    #[error("Dispatcher error: {0}")]
    #[diagnostic(code(calendar_gate::dispatcher))]
    Dispatcher(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(calendar_gate::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(calendar_gate::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(calendar_gate::serialization))]
    Serialization(String),
}

impl Error {
    /// Stable code reported to callers alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            Error::PermissionDenied(_) => "denied",
            Error::MissingRequiredField(_) => "missing_required_field",
            Error::InvalidDateFormat(_) => "invalid_date_format",
            Error::InvalidCalendarId(_) => "invalid_calendar_id",
            Error::EmptySequence(_) => "empty_sequence",
            Error::Store(_) => "store_error",
            Error::PermissionRequest(_) => "permission_request_error",
            Error::AuthorityUnavailable(_) => "authority_unavailable",
            Error::Dispatcher(_) => "dispatcher_error",
            Error::Config(_) => "config_error",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
        }
    }
}

// Implement From for TOML serialization errors
impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type GateResult<T> = Result<T, Error>;

/// Helper to create missing field errors
pub fn missing_field(field: &str) -> Error {
    Error::MissingRequiredField(field.to_string())
}

/// Helper to create calendar store errors
pub fn store_error(message: &str) -> Error {
    Error::Store(message.to_string())
}

/// Helper to create dispatcher errors
pub fn dispatcher_error(message: &str) -> Error {
    Error::Dispatcher(message.to_string())
}

/// Helper to create permission request errors
pub fn permission_request_error(message: &str) -> Error {
    Error::PermissionRequest(message.to_string())
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}
