//! # Companion Backend
//!
//! Everything specific to the `kyma-companion-backend` workload:
//!
//! - `labels`: common label set for generated objects
//! - `generator`: desired Deployment and Secret for a Companion
//! - `aggregator`: collects external credentials into a [`BackendConfig`]

pub mod aggregator;
pub mod generator;
pub mod labels;

pub use aggregator::{AggregationError, ConfigAggregator};
pub use generator::{build_deployment, build_secret, owner_reference};
pub use labels::common_labels;

use crate::config::BackendTarget;

/// Serialized credential bundle the backend Secret is built from
///
/// Each field is the JSON serialization of one external source's data. Never
/// persisted on its own.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BackendConfig {
    pub hana_db: Vec<u8>,
    pub redis: Vec<u8>,
    pub ai_core_secret: Vec<u8>,
    pub ai_core_config: Vec<u8>,
}

impl BackendConfig {
    pub fn set(&mut self, target: BackendTarget, value: Vec<u8>) {
        match target {
            BackendTarget::HanaDb => self.hana_db = value,
            BackendTarget::Redis => self.redis = value,
            BackendTarget::AiCoreSecret => self.ai_core_secret = value,
            BackendTarget::AiCoreConfig => self.ai_core_config = value,
        }
    }
}

// Credentials stay out of logs
impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("hana_db", &format_args!("<{} bytes>", self.hana_db.len()))
            .field("redis", &format_args!("<{} bytes>", self.redis.len()))
            .field(
                "ai_core_secret",
                &format_args!("<{} bytes>", self.ai_core_secret.len()),
            )
            .field(
                "ai_core_config",
                &format_args!("<{} bytes>", self.ai_core_config.len()),
            )
            .finish()
    }
}
