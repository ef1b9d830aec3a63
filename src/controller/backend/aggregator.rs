//! # Config Aggregator
//!
//! Fetches the configured credential sources and serializes each one into its
//! [`BackendConfig`] slot. Sources are read in order and the first failure
//! aborts the whole aggregation, so a partially filled config never reaches
//! the Secret generator.
//!
//! Serialization is the JSON object of the source's `data` with sorted keys.
//! Secret values are base64 encoded, as on the wire. A source without data
//! serializes to `null`.

use super::BackendConfig;
use crate::config::{BackendConfigSources, ConfigSource, SourceKind};
use crate::controller::client::{ClusterClient, ClusterError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Aggregation stopped at one source
#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("{kind} {namespace}/{name} not found")]
    SourceNotFound {
        kind: SourceKind,
        name: String,
        namespace: String,
    },
    #[error("failed to fetch {kind} {namespace}/{name}: {source}")]
    Fetch {
        kind: SourceKind,
        name: String,
        namespace: String,
        #[source]
        source: ClusterError,
    },
    #[error("failed to serialize {kind} {namespace}/{name}: {source}")]
    Serialize {
        kind: SourceKind,
        name: String,
        namespace: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Builds a [`BackendConfig`] from a validated source list
#[derive(Debug, Clone, Default)]
pub struct ConfigAggregator {
    sources: BackendConfigSources,
}

impl ConfigAggregator {
    pub fn new(sources: BackendConfigSources) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &BackendConfigSources {
        &self.sources
    }

    /// Fetch every source and assemble the config
    ///
    /// # Errors
    ///
    /// Returns the first fetch, not-found or serialization error; later
    /// sources are not read.
    pub async fn get_backend_config(
        &self,
        client: &dyn ClusterClient,
    ) -> Result<BackendConfig, AggregationError> {
        let mut config = BackendConfig::default();
        for source in self.sources.iter() {
            let value = fetch_serialized(client, source).await?;
            debug!(
                "Fetched {} {}/{} for {}",
                source.kind, source.namespace, source.name, source.target
            );
            config.set(source.target, value);
        }
        Ok(config)
    }
}

async fn fetch_serialized(
    client: &dyn ClusterClient,
    source: &ConfigSource,
) -> Result<Vec<u8>, AggregationError> {
    let fetch_err = |e: ClusterError| AggregationError::Fetch {
        kind: source.kind,
        name: source.name.clone(),
        namespace: source.namespace.clone(),
        source: e,
    };
    let not_found = || AggregationError::SourceNotFound {
        kind: source.kind,
        name: source.name.clone(),
        namespace: source.namespace.clone(),
    };

    let serialized = match source.kind {
        SourceKind::Secret => {
            let secret = client
                .get_secret(&source.name, &source.namespace)
                .await
                .map_err(fetch_err)?
                .ok_or_else(not_found)?;
            let data: Option<BTreeMap<String, String>> = secret.data.map(|data| {
                data.into_iter()
                    .map(|(k, v)| (k, STANDARD.encode(v.0)))
                    .collect()
            });
            serde_json::to_vec(&data)
        }
        SourceKind::ConfigMap => {
            let config_map = client
                .get_config_map(&source.name, &source.namespace)
                .await
                .map_err(fetch_err)?
                .ok_or_else(not_found)?;
            serde_json::to_vec(&config_map.data)
        }
    };

    serialized.map_err(|e| AggregationError::Serialize {
        kind: source.kind,
        name: source.name.clone(),
        namespace: source.namespace.clone(),
        source: e,
    })
}
