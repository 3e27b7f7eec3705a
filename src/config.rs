use crate::error::{config_error, GateResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Calendar id used when an event names no calendar
pub const DEFAULT_CALENDAR_ID: i64 = 1;

/// Default location of the optional configuration file
pub const CONFIG_FILE: &str = "config/calendar.toml";

/// Default log filter used when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Main configuration structure for the calendar service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sentinel calendar id for events without a `calendarId`
    pub default_calendar_id: i64,
    /// Capacity of the dispatcher mailbox
    pub mailbox_capacity: usize,
    /// Seconds to wait for a permission answer, 0 waits forever
    pub permission_timeout_secs: u64,
    /// Where the permission request history is persisted
    pub history_path: PathBuf,
    /// Fallback tracing filter, see [`crate::logging::init_logging_from_config`]
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_calendar_id: DEFAULT_CALENDAR_ID,
            mailbox_capacity: 32,
            permission_timeout_secs: 0,
            history_path: PathBuf::from("config/permission_history.toml"),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> GateResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let mut config = if Path::new(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };

        // Environment wins over the file
        if let Ok(value) = env::var("CALENDAR_DEFAULT_ID") {
            config.default_calendar_id = value
                .parse::<i64>()
                .map_err(|_| config_error("Invalid CALENDAR_DEFAULT_ID format"))?;
        }

        if let Ok(value) = env::var("CALENDAR_MAILBOX_CAPACITY") {
            config.mailbox_capacity = value
                .parse::<usize>()
                .map_err(|_| config_error("Invalid CALENDAR_MAILBOX_CAPACITY format"))?;
        }

        if let Ok(value) = env::var("CALENDAR_PERMISSION_TIMEOUT_SECS") {
            config.permission_timeout_secs = value
                .parse::<u64>()
                .map_err(|_| config_error("Invalid CALENDAR_PERMISSION_TIMEOUT_SECS format"))?;
        }

        if let Ok(value) = env::var("CALENDAR_HISTORY_PATH") {
            config.history_path = PathBuf::from(value);
        }

        if let Ok(value) = env::var("CALENDAR_LOG_FILTER") {
            config.log_filter = value;
        }

        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a TOML file, missing keys take defaults
    pub fn from_file(path: impl AsRef<Path>) -> GateResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Permission request timeout, `None` when disabled
    pub fn permission_timeout(&self) -> Option<std::time::Duration> {
        (self.permission_timeout_secs > 0)
            .then(|| std::time::Duration::from_secs(self.permission_timeout_secs))
    }

    fn validate(&self) -> GateResult<()> {
        if self.mailbox_capacity == 0 {
            return Err(config_error("mailbox_capacity must be greater than zero"));
        }
        Ok(())
    }
}
