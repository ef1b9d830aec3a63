//! # Controller Configuration
//!
//! Controller-level settings loaded from environment variables.

use super::{BackendConfigSources, ConfigError};
use crate::constants::{
    DEFAULT_BACKOFF_MAX_SECS, DEFAULT_BACKOFF_START_SECS, DEFAULT_FIELD_MANAGER,
    DEFAULT_KUBE_API_TIMEOUT_SECS, DEFAULT_MAX_CONCURRENT_RECONCILIATIONS, DEFAULT_METRICS_PORT,
};
use std::time::Duration;

pub const ENV_BACKEND_IMAGE: &str = "KYMA_COMPANION_BACKEND_IMAGE";
pub const ENV_BACKEND_CONFIG_SOURCES: &str = "BACKEND_CONFIG_SOURCES";

/// Controller-level configuration
///
/// Everything except the backend image has a default and can be overridden
/// via environment variables. Environment variables are populated from the
/// manager Deployment.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Container image of the companion backend
    pub backend_image: String,
    /// External sources the backend Secret is built from
    pub backend_config_sources: BackendConfigSources,
    /// Port of the metrics / probe HTTP server
    pub metrics_port: u16,
    /// Global log level (ERROR, WARN, INFO, DEBUG, TRACE), used when `RUST_LOG` is unset
    pub log_level: String,
    /// Log format (json, text)
    pub log_format: String,
    /// Enable color in text format logs
    pub log_enable_color: bool,
    /// Maximum concurrent reconciliations
    pub max_concurrent_reconciliations: u16,
    /// Deadline for a single Kubernetes API call (seconds)
    pub kube_api_timeout_secs: u64,
    /// Fibonacci backoff starting value (seconds)
    pub backoff_start_secs: u64,
    /// Fibonacci backoff maximum value (seconds)
    pub backoff_max_secs: u64,
    /// Server-side apply field manager
    pub field_manager: String,
}

impl ControllerConfig {
    /// Configuration with every optional setting at its default
    pub fn with_image(backend_image: impl Into<String>) -> Self {
        Self {
            backend_image: backend_image.into(),
            backend_config_sources: BackendConfigSources::default(),
            metrics_port: DEFAULT_METRICS_PORT,
            log_level: "INFO".to_string(),
            log_format: "json".to_string(),
            log_enable_color: false,
            max_concurrent_reconciliations: DEFAULT_MAX_CONCURRENT_RECONCILIATIONS,
            kube_api_timeout_secs: DEFAULT_KUBE_API_TIMEOUT_SECS,
            backoff_start_secs: DEFAULT_BACKOFF_START_SECS,
            backoff_max_secs: DEFAULT_BACKOFF_MAX_SECS,
            field_manager: DEFAULT_FIELD_MANAGER.to_string(),
        }
    }

    /// Load configuration from environment variables with defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the backend image is not set, a numeric variable
    /// does not parse, or the backend config source list is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// See [`ControllerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_image = lookup(ENV_BACKEND_IMAGE)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingEnv(ENV_BACKEND_IMAGE))?;

        let backend_config_sources = match lookup(ENV_BACKEND_CONFIG_SOURCES) {
            Some(document) if !document.trim().is_empty() => {
                BackendConfigSources::from_yaml(&document)?
            }
            _ => BackendConfigSources::default(),
        };

        let backoff_start_secs =
            env_var_or_default(&lookup, "BACKOFF_START_SECS", DEFAULT_BACKOFF_START_SECS)?;
        let backoff_max_secs =
            env_var_or_default(&lookup, "BACKOFF_MAX_SECS", DEFAULT_BACKOFF_MAX_SECS)?;
        if backoff_max_secs < backoff_start_secs {
            return Err(ConfigError::InvalidEnv {
                key: "BACKOFF_MAX_SECS",
                value: backoff_max_secs.to_string(),
            });
        }

        let max_concurrent_reconciliations = env_var_or_default(
            &lookup,
            "MAX_CONCURRENT_RECONCILIATIONS",
            DEFAULT_MAX_CONCURRENT_RECONCILIATIONS,
        )?;
        if max_concurrent_reconciliations == 0 {
            return Err(ConfigError::InvalidEnv {
                key: "MAX_CONCURRENT_RECONCILIATIONS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            backend_image,
            backend_config_sources,
            metrics_port: env_var_or_default(&lookup, "METRICS_PORT", DEFAULT_METRICS_PORT)?,
            log_level: env_var_or_default_str(&lookup, "LOG_LEVEL", "INFO"),
            log_format: env_var_or_default_str(&lookup, "LOG_FORMAT", "json"),
            log_enable_color: env_var_or_default_bool(&lookup, "LOG_ENABLE_COLOR", false),
            max_concurrent_reconciliations,
            kube_api_timeout_secs: env_var_or_default(
                &lookup,
                "KUBE_API_TIMEOUT_SECS",
                DEFAULT_KUBE_API_TIMEOUT_SECS,
            )?,
            backoff_start_secs,
            backoff_max_secs,
            field_manager: env_var_or_default_str(&lookup, "FIELD_MANAGER", DEFAULT_FIELD_MANAGER),
        })
    }

    /// Get Kubernetes API call deadline
    pub fn kube_api_timeout(&self) -> Duration {
        Duration::from_secs(self.kube_api_timeout_secs)
    }

    /// Get backoff start duration
    pub fn backoff_start_duration(&self) -> Duration {
        Duration::from_secs(self.backoff_start_secs)
    }

    /// Get backoff max duration
    pub fn backoff_max_duration(&self) -> Duration {
        Duration::from_secs(self.backoff_max_secs)
    }
}

/// Read a variable and parse it, or return the default when unset
fn env_var_or_default<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnv { key, value }),
        None => Ok(default),
    }
}

/// Read a variable as boolean or return default
fn env_var_or_default_bool<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| {
            let v_lower = v.to_lowercase();
            v_lower == "true" || v_lower == "1" || v_lower == "yes" || v_lower == "on"
        })
        .unwrap_or(default)
}

/// Read a variable as string or return default
fn env_var_or_default_str<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}
