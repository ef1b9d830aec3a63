//! # Initialization
//!
//! Controller initialization logic including rustls setup, tracing, metrics,
//! server startup, and Kubernetes client setup.

use crate::config::ControllerConfig;
use crate::controller::client::KubeClusterClient;
use crate::controller::reconciler::Reconciler;
use crate::controller::server::{start_server, ServerState};
use crate::crd::Companion;
use crate::observability;
use anyhow::{Context, Result};
use kube::api::{Api, ListParams};
use kube::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};

const SERVER_STARTUP_TIMEOUT: Duration = Duration::from_secs(10);
const SERVER_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Initialization result containing all necessary components for the controller
pub struct InitializationResult {
    /// Kubernetes client
    pub client: Client,
    /// API for the Companion CRD, all namespaces
    pub companions: Api<Companion>,
    /// Reconciler context
    pub reconciler: Arc<Reconciler>,
    /// Server state for health checks
    pub server_state: Arc<ServerState>,
    pub config: ControllerConfig,
}

impl std::fmt::Debug for InitializationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitializationResult")
            .field("server_ready", &self.server_state.is_ready())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Initialize the controller runtime
///
/// This function handles:
/// - rustls crypto provider setup
/// - Tracing subscriber setup
/// - Metrics registration
/// - HTTP server startup
/// - Kubernetes client creation
/// - Reconciler setup
///
/// `/readyz` only reports ready once every step has succeeded.
///
/// # Errors
///
/// Fails if any of the steps above fails or the Companion CRD is not served.
pub async fn initialize(config: ControllerConfig) -> Result<InitializationResult> {
    // Must happen before any rustls use
    install_crypto_provider()?;

    observability::init_logging(&config)?;

    info!("Starting Kyma Companion Manager");
    info!(
        "Build info: timestamp={}, datetime={}, git_hash={}",
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_DATETIME"),
        env!("BUILD_GIT_HASH")
    );
    info!(
        "Backend image: {}, {} config sources",
        config.backend_image,
        config.backend_config_sources.len()
    );

    observability::metrics::register_metrics()?;

    let server_state = Arc::new(ServerState::new());

    // Start HTTP server for metrics and probes
    let server_state_clone = Arc::clone(&server_state);
    let server_port = config.metrics_port;
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(server_port, server_state_clone).await {
            error!("HTTP server error: {}", e);
        }
    });
    wait_for_server_ready(&server_state, &server_handle).await?;

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;

    let companions: Api<Companion> = Api::all(client.clone());
    check_crd_queryable(&companions).await?;

    let cluster = KubeClusterClient::new(
        client.clone(),
        config.field_manager.clone(),
        config.kube_api_timeout(),
    );
    let reconciler = Arc::new(Reconciler::new(Arc::new(cluster), &config));

    server_state.set_ready(true);
    info!("Controller initialized, starting watch loop...");

    Ok(InitializationResult {
        client,
        companions,
        reconciler,
        server_state,
        config,
    })
}

fn install_crypto_provider() -> Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|provider| {
            anyhow::anyhow!("Failed to install rustls crypto provider: {provider:?}")
        })
}

/// Wait for the HTTP server to bind its listener
async fn wait_for_server_ready(
    server_state: &Arc<ServerState>,
    server_handle: &tokio::task::JoinHandle<()>,
) -> Result<()> {
    let start_time = Instant::now();

    loop {
        if server_handle.is_finished() {
            return Err(anyhow::anyhow!("HTTP server failed to start"));
        }

        if server_state.is_listening() {
            info!("HTTP server is accepting connections");
            return Ok(());
        }

        if start_time.elapsed() > SERVER_STARTUP_TIMEOUT {
            return Err(anyhow::anyhow!(
                "HTTP server failed to become ready within {} seconds",
                SERVER_STARTUP_TIMEOUT.as_secs()
            ));
        }

        tokio::time::sleep(SERVER_POLL_INTERVAL).await;
    }
}

/// Fail early when the Companion CRD is missing or RBAC forbids listing it
async fn check_crd_queryable(companions: &Api<Companion>) -> Result<()> {
    let list = companions
        .list(&ListParams::default().limit(1))
        .await
        .context("Companion CRD is not queryable (is it installed, and may the controller list it?)")?;
    info!(
        "CRD is queryable, {} existing Companion resources will be picked up by the watch",
        if list.items.is_empty() { "no" } else { "some" }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_provider_install_reports_existing_provider() {
        // The first install may race with other tests, the second never succeeds
        let _ = install_crypto_provider();
        let err = install_crypto_provider().unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Failed to install rustls crypto provider: "));
        assert!(message.len() > "Failed to install rustls crypto provider: ".len());
    }
}
