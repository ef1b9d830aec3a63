//! # Watch Loop
//!
//! Controller watch loop that monitors Companion resources, plus the
//! Deployments and Secrets they own, and triggers reconciliation when changes
//! are detected.

use crate::controller::backend::labels::managed_by_selector;
use crate::controller::reconciler::{reconcile, Reconciler, ReconcilerError};
use crate::crd::Companion;
use crate::runtime::error_policy::{handle_controller_stream_error, handle_reconciliation_error};
use crate::runtime::InitializationResult;
use futures::StreamExt;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Secret;
use kube::api::Api;
use kube::ResourceExt;
use kube_runtime::controller::{self, Action, Controller};
use kube_runtime::watcher;
use std::sync::Arc;
use tracing::{debug, info, Instrument};

/// Run the controller watch loop
///
/// Returns once a shutdown signal has been received and in-flight
/// reconciliations have finished.
///
/// # Errors
///
/// Currently infallible; kept fallible for the binary's `?` chain.
pub async fn run_watch_loop(init: InitializationResult) -> Result<(), anyhow::Error> {
    let InitializationResult {
        client,
        companions,
        reconciler,
        server_state,
        config,
    } = init;

    // Mark not ready on SIGINT/SIGTERM so traffic drains while we finish
    let shutdown_server_state = Arc::clone(&server_state);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received shutdown signal (SIGINT/SIGTERM), initiating graceful shutdown...");
            shutdown_server_state.set_ready(false);
            info!("Marked server as not ready, waiting for in-flight reconciliations to complete...");
        }
    });

    let watch_span = tracing::span!(
        tracing::Level::INFO,
        "controller.watch",
        operation = "watch_loop"
    );

    info!(
        "Starting controller watch loop (max concurrent reconciliations: {})",
        config.max_concurrent_reconciliations
    );
    // Owned watches only see objects carrying our managed-by label
    let selector = managed_by_selector();
    Controller::new(companions, watcher::Config::default().any_semantic())
        .owns(
            Api::<Deployment>::all(client.clone()),
            watcher::Config::default().labels(&selector),
        )
        .owns(
            Api::<Secret>::all(client),
            watcher::Config::default().labels(&selector),
        )
        .with_config(controller::Config::default().concurrency(config.max_concurrent_reconciliations))
        .shutdown_on_signal()
        .run(create_reconcile_fn, handle_reconciliation_error, reconciler)
        .for_each(|result| {
            match result {
                Ok((obj_ref, _action)) => debug!("Reconciled {}", obj_ref),
                Err(e) => handle_controller_stream_error(&e),
            }
            futures::future::ready(())
        })
        .instrument(watch_span)
        .await;

    info!("Controller stopped gracefully");
    Ok(())
}

/// Wrap a reconciliation in its span
fn create_reconcile_fn(
    obj: Arc<Companion>,
    ctx: Arc<Reconciler>,
) -> impl std::future::Future<Output = Result<Action, ReconcilerError>> + Send {
    let reconcile_span = tracing::span!(
        tracing::Level::INFO,
        "controller.watch.reconcile",
        resource.name = obj.name_any().as_str(),
        resource.namespace = obj.namespace().unwrap_or_default().as_str(),
        resource.version = obj.resource_version().unwrap_or_default().as_str(),
        event.r#type = "watch_triggered"
    );
    reconcile(obj, ctx).instrument(reconcile_span)
}
