//! # Logging
//!
//! Installs the global `tracing` subscriber. `RUST_LOG` takes precedence;
//! otherwise `LOG_LEVEL` applies to every target.

use crate::config::ControllerConfig;
use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, falling back to the configured level
///
/// # Errors
///
/// Returns an error if the configured level is not a valid filter directive.
pub fn env_filter(log_level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(log_level.to_lowercase())
            .with_context(|| format!("Invalid LOG_LEVEL '{log_level}'")),
    }
}

/// Install the global subscriber (json or text output)
///
/// # Errors
///
/// Returns an error on an invalid level or if a subscriber is already installed.
pub fn init_logging(config: &ControllerConfig) -> Result<()> {
    let filter = env_filter(&config.log_level)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = if config.log_format.eq_ignore_ascii_case("text") {
        builder.with_ansi(config.log_enable_color).try_init()
    } else {
        builder.json().try_init()
    };
    result.map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {e}"))
}
