//! # Error Policy
//!
//! Error handling and backoff logic for the controller watch loop.
//! This module handles reconciliation errors and watch stream errors.

use crate::controller::reconciler::{Reconciler, ReconcilerError};
use crate::crd::Companion;
use crate::observability;
use kube::ResourceExt;
use kube_runtime::controller::{self, Action};
use kube_runtime::watcher;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Handle reconciliation errors with Fibonacci backoff
///
/// Backoff state is tracked per resource so one failing Companion does not
/// slow down the others. The state is reset by the next successful pass.
pub fn handle_reconciliation_error(
    obj: Arc<Companion>,
    error: &ReconcilerError,
    ctx: Arc<Reconciler>,
) -> Action {
    let name = obj.name_any();
    let namespace = obj.namespace().unwrap_or_default();

    let error_span = tracing::span!(
        tracing::Level::ERROR,
        "controller.watch.reconciliation_error",
        resource.name = name.as_str(),
        resource.namespace = namespace.as_str(),
        error = %error
    );
    let _error_guard = error_span.enter();

    error!("Reconciliation error for {}/{}: {}", namespace, name, error);
    observability::metrics::increment_reconciliation_errors(error.kind());

    let resource_key = format!("{namespace}/{name}");
    let (backoff_seconds, error_count) = match ctx.backoff_states.lock() {
        Ok(mut states) => {
            let state = states
                .entry(resource_key)
                .or_insert_with(|| ctx.new_backoff_state());
            state.increment_error();
            (state.backoff.next_backoff_seconds(), state.error_count)
        }
        Err(e) => {
            warn!(
                "Failed to lock backoff_states: {}, using maximum backoff",
                e
            );
            (ctx.backoff_max_secs, 0)
        }
    };

    let delay = Duration::from_secs(backoff_seconds);
    let next_trigger_time =
        chrono::Utc::now() + chrono::Duration::from_std(delay).unwrap_or_else(|_| chrono::Duration::zero());

    info!(
        "🔄 Retrying with Fibonacci backoff: {}s (error count: {}, trigger source: error-backoff)",
        backoff_seconds, error_count
    );
    info!(
        "📅 Next retry scheduled: {} (in {}s, trigger source: error-backoff)",
        next_trigger_time.to_rfc3339(),
        backoff_seconds
    );

    observability::metrics::increment_requeues_total("error-backoff");
    Action::requeue(delay)
}

/// Log a non-success item from the controller stream
///
/// Reconciler failures were already handled by [`handle_reconciliation_error`].
pub fn handle_controller_stream_error(
    error: &controller::Error<ReconcilerError, watcher::Error>,
) {
    match error {
        controller::Error::ReconcilerFailed(err, obj) => {
            debug!("Reconciliation of {} failed: {}", obj, err);
        }
        controller::Error::ObjectNotFound(obj) => {
            debug!("{} no longer exists, skipping", obj);
        }
        controller::Error::QueueError(err) => {
            warn!("Watch stream error: {}", err);
        }
        other => {
            error!("Controller stream error: {:?}", other);
        }
    }
}
