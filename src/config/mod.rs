//! # Configuration
//!
//! Controller configuration loaded from environment variables.
//!
//! - `controller`: process-level settings (image, ports, logging, backoff)
//! - `sources`: the external Secrets/ConfigMaps the backend Secret is built from

mod controller;
mod sources;

pub use controller::ControllerConfig;
pub use sources::{BackendConfigSources, BackendTarget, ConfigSource, SourceKind};

use thiserror::Error;

/// Invalid controller configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingEnv(&'static str),
    #[error("environment variable {key} has invalid value '{value}'")]
    InvalidEnv { key: &'static str, value: String },
    #[error("failed to parse backend config sources: {0}")]
    SourcesParse(#[from] serde_yaml::Error),
    #[error("backend config target {0} is configured more than once")]
    DuplicateTarget(BackendTarget),
    #[error("backend config target {0} has no source")]
    MissingTarget(BackendTarget),
    #[error("backend config source {index} has an empty {field}")]
    EmptySourceField { index: usize, field: &'static str },
}
