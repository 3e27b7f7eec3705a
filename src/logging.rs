use crate::config::Config;
use crate::error::Error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
///
/// `RUST_LOG` takes precedence; `default_filter` is used when it is unset
/// or unparseable.
pub fn init_logging(default_filter: &str) -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Config(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Initialize logging with the configured fallback filter
pub fn init_logging_from_config(config: &Config) -> miette::Result<()> {
    init_logging(&config.log_filter)
}
