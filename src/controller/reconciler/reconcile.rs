//! # Reconcile
//!
//! One pass of the Companion state machine. The Companion is always re-read
//! from the cluster so nothing is carried over between invocations, then the
//! pass branches on its [`LifecyclePhase`]:
//!
//! 1. `AwaitingFinalizer`: add the finalizer and stop. Owned objects are only
//!    written on the next pass.
//! 2. `Converging`: converge the Secret, then the Deployment.
//! 3. `Finalizing`: drop the finalizer. Owned objects are garbage collected
//!    through their owner references.
//! 4. `Finalized`: nothing to do.
//!
//! Errors are returned unmodified; retries belong to the error policy.

use super::lifecycle::{with_finalizer, without_finalizer, LifecyclePhase};
use super::types::{ReconcileOutcome, Reconciler, ReconcilerError};
use crate::crd::Companion;
use crate::observability::metrics;
use kube::ResourceExt;
use kube_runtime::controller::Action;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

impl Reconciler {
    /// Run the state machine for the Companion at `namespace/name`
    ///
    /// # Errors
    ///
    /// Any cluster, aggregation or generation failure, unchanged.
    pub async fn reconcile_companion(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<ReconcileOutcome, ReconcilerError> {
        let Some(companion) = self.client.get_companion(name, namespace).await? else {
            debug!("Companion {}/{} not found, nothing to do", namespace, name);
            return Ok(ReconcileOutcome::CompanionNotFound);
        };

        let phase = LifecyclePhase::classify(&companion);
        debug!("Companion {}/{} is {}", namespace, name, phase.as_str());

        match phase {
            LifecyclePhase::AwaitingFinalizer => {
                self.client
                    .update_finalizers(&companion, with_finalizer(&companion))
                    .await?;
                metrics::increment_finalizer_updates("add");
                info!("Added finalizer to Companion {}/{}", namespace, name);
                Ok(ReconcileOutcome::FinalizerAdded)
            }
            LifecyclePhase::Converging => {
                let (secret_applied, deployment_applied) = self.converge(&companion).await?;
                Ok(ReconcileOutcome::Converged {
                    secret_applied,
                    deployment_applied,
                })
            }
            LifecyclePhase::Finalizing => {
                self.client
                    .update_finalizers(&companion, without_finalizer(&companion))
                    .await?;
                metrics::increment_finalizer_updates("remove");
                info!("Removed finalizer from Companion {}/{}", namespace, name);
                Ok(ReconcileOutcome::FinalizerRemoved)
            }
            LifecyclePhase::Finalized => Ok(ReconcileOutcome::AlreadyFinalized),
        }
    }
}

/// Controller entry point for a Companion event
///
/// Records metrics around [`Reconciler::reconcile_companion`] and clears the
/// per-object backoff on success. Backoff entries of Companions that are gone
/// are dropped. Successful passes wait for the next change.
pub async fn reconcile(
    companion: Arc<Companion>,
    ctx: Arc<Reconciler>,
) -> Result<Action, ReconcilerError> {
    let start = Instant::now();
    let name = companion.name_any();
    let namespace = companion.namespace().unwrap_or_default();

    metrics::increment_reconciliations();
    let result = ctx.reconcile_companion(&name, &namespace).await;
    metrics::observe_reconciliation_duration(start.elapsed().as_secs_f64());
    let outcome = result?;

    let resource_key = format!("{namespace}/{name}");
    if outcome.is_terminal() {
        if ctx.forget_backoff(&resource_key) {
            debug!("Dropped backoff state for {}", resource_key);
        }
    } else if ctx.reset_backoff(&resource_key) {
        info!("🔄 Backoff reset for {}", resource_key);
    }

    info!(
        "✅ Reconciliation complete for {} ({}, duration: {:.2}s)",
        resource_key,
        outcome.as_str(),
        start.elapsed().as_secs_f64()
    );
    Ok(Action::await_change())
}
