//! # Backend Config Sources
//!
//! The external Secrets and ConfigMaps whose data is bundled into the backend
//! Secret. Sources are data: the default list can be replaced through the
//! `BACKEND_CONFIG_SOURCES` environment variable (YAML or JSON).
//!
//! ```yaml
//! - kind: Secret
//!   name: companion-hana-db
//!   namespace: kyma-system
//!   target: hanaDb
//! - kind: ConfigMap
//!   name: companion-ai-core
//!   namespace: kyma-system
//!   target: aiCoreConfig
//! ```

use super::ConfigError;
use crate::constants::{
    DEFAULT_AI_CORE_CONFIG_MAP, DEFAULT_AI_CORE_SECRET, DEFAULT_HANA_DB_SECRET,
    DEFAULT_REDIS_SECRET, DEFAULT_SOURCE_NAMESPACE,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of object a source is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum SourceKind {
    Secret,
    ConfigMap,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Secret => f.write_str("Secret"),
            SourceKind::ConfigMap => f.write_str("ConfigMap"),
        }
    }
}

/// BackendConfig field a source populates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BackendTarget {
    HanaDb,
    Redis,
    AiCoreSecret,
    AiCoreConfig,
}

impl BackendTarget {
    pub const ALL: [BackendTarget; 4] = [
        BackendTarget::HanaDb,
        BackendTarget::Redis,
        BackendTarget::AiCoreSecret,
        BackendTarget::AiCoreConfig,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendTarget::HanaDb => "hanaDb",
            BackendTarget::Redis => "redis",
            BackendTarget::AiCoreSecret => "aiCoreSecret",
            BackendTarget::AiCoreConfig => "aiCoreConfig",
        }
    }
}

impl fmt::Display for BackendTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coordinates of one external source
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConfigSource {
    pub kind: SourceKind,
    pub name: String,
    pub namespace: String,
    pub target: BackendTarget,
}

impl ConfigSource {
    pub fn secret(name: &str, namespace: &str, target: BackendTarget) -> Self {
        Self {
            kind: SourceKind::Secret,
            name: name.to_string(),
            namespace: namespace.to_string(),
            target,
        }
    }

    pub fn config_map(name: &str, namespace: &str, target: BackendTarget) -> Self {
        Self {
            kind: SourceKind::ConfigMap,
            name: name.to_string(),
            namespace: namespace.to_string(),
            target,
        }
    }
}

/// Validated list of sources: every [`BackendTarget`] appears exactly once.
///
/// Sources are fetched in list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfigSources {
    sources: Vec<ConfigSource>,
}

impl BackendConfigSources {
    /// Validate and wrap a list of sources
    ///
    /// # Errors
    ///
    /// Returns an error if a target is missing or duplicated, or a source has
    /// an empty name or namespace.
    pub fn new(sources: Vec<ConfigSource>) -> Result<Self, ConfigError> {
        for (index, source) in sources.iter().enumerate() {
            if source.name.is_empty() {
                return Err(ConfigError::EmptySourceField {
                    index,
                    field: "name",
                });
            }
            if source.namespace.is_empty() {
                return Err(ConfigError::EmptySourceField {
                    index,
                    field: "namespace",
                });
            }
        }
        for target in BackendTarget::ALL {
            match sources.iter().filter(|s| s.target == target).count() {
                0 => return Err(ConfigError::MissingTarget(target)),
                1 => {}
                _ => return Err(ConfigError::DuplicateTarget(target)),
            }
        }
        Ok(Self { sources })
    }

    /// Parse a YAML (or JSON) list of sources
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not parse or fails validation.
    pub fn from_yaml(document: &str) -> Result<Self, ConfigError> {
        let sources: Vec<ConfigSource> = serde_yaml::from_str(document)?;
        Self::new(sources)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigSource> {
        self.sources.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for BackendConfigSources {
    fn default() -> Self {
        Self {
            sources: vec![
                ConfigSource::secret(
                    DEFAULT_HANA_DB_SECRET,
                    DEFAULT_SOURCE_NAMESPACE,
                    BackendTarget::HanaDb,
                ),
                ConfigSource::secret(
                    DEFAULT_REDIS_SECRET,
                    DEFAULT_SOURCE_NAMESPACE,
                    BackendTarget::Redis,
                ),
                ConfigSource::secret(
                    DEFAULT_AI_CORE_SECRET,
                    DEFAULT_SOURCE_NAMESPACE,
                    BackendTarget::AiCoreSecret,
                ),
                ConfigSource::config_map(
                    DEFAULT_AI_CORE_CONFIG_MAP,
                    DEFAULT_SOURCE_NAMESPACE,
                    BackendTarget::AiCoreConfig,
                ),
            ],
        }
    }
}
