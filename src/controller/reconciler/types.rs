//! # Types
//!
//! Core types for the reconciler.

use crate::config::ControllerConfig;
use crate::controller::backend::{AggregationError, ConfigAggregator};
use crate::controller::backoff::FibonacciBackoff;
use crate::controller::builders::GenerationError;
use crate::controller::client::{ClusterClient, ClusterError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcilerError {
    #[error("Cluster call failed: {0}")]
    Cluster(#[from] ClusterError),
    #[error("Backend config aggregation failed: {0}")]
    Aggregation(#[from] AggregationError),
    #[error("Desired state generation failed: {0}")]
    Generation(#[from] GenerationError),
}

impl ReconcilerError {
    /// Short label used for the errors metric
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ReconcilerError::Cluster(e) if e.is_conflict() => "conflict",
            ReconcilerError::Cluster(_) => "cluster",
            ReconcilerError::Aggregation(_) => "aggregation",
            ReconcilerError::Generation(_) => "generation",
        }
    }
}

/// What a single reconciliation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The Companion no longer exists
    CompanionNotFound,
    FinalizerAdded,
    FinalizerRemoved,
    /// Deleting and our finalizer is already gone
    AlreadyFinalized,
    Converged {
        secret_applied: bool,
        deployment_applied: bool,
    },
}

impl ReconcileOutcome {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileOutcome::CompanionNotFound => "companion-not-found",
            ReconcileOutcome::FinalizerAdded => "finalizer-added",
            ReconcileOutcome::FinalizerRemoved => "finalizer-removed",
            ReconcileOutcome::AlreadyFinalized => "already-finalized",
            ReconcileOutcome::Converged { .. } => "converged",
        }
    }

    /// The Companion is gone or no longer ours to retry
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReconcileOutcome::CompanionNotFound
                | ReconcileOutcome::FinalizerRemoved
                | ReconcileOutcome::AlreadyFinalized
        )
    }
}

/// Backoff state for a specific resource
/// Tracks error count and backoff calculator for progressive retries
#[derive(Debug, Clone)]
pub struct BackoffState {
    pub backoff: FibonacciBackoff,
    pub error_count: u32,
}

impl BackoffState {
    pub fn new(start_secs: u64, max_secs: u64) -> Self {
        Self {
            backoff: FibonacciBackoff::new(start_secs, max_secs),
            error_count: 0,
        }
    }

    pub fn increment_error(&mut self) {
        self.error_count += 1;
    }

    pub fn reset(&mut self) {
        self.error_count = 0;
        self.backoff.reset();
    }
}

/// Shared reconciliation context handed to every reconcile and error-policy call
#[derive(Clone)]
pub struct Reconciler {
    pub client: Arc<dyn ClusterClient>,
    pub aggregator: ConfigAggregator,
    pub backend_image: String,
    pub backoff_start_secs: u64,
    pub backoff_max_secs: u64,
    // Keyed by namespace/name
    pub backoff_states: Arc<Mutex<HashMap<String, BackoffState>>>,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("backend_image", &self.backend_image)
            .field("sources", &self.aggregator.sources().len())
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    pub fn new(client: Arc<dyn ClusterClient>, config: &ControllerConfig) -> Self {
        Self {
            client,
            aggregator: ConfigAggregator::new(config.backend_config_sources.clone()),
            backend_image: config.backend_image.clone(),
            backoff_start_secs: config.backoff_start_secs,
            backoff_max_secs: config.backoff_max_secs,
            backoff_states: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Fresh backoff state using the configured bounds
    #[must_use]
    pub fn new_backoff_state(&self) -> BackoffState {
        BackoffState::new(self.backoff_start_secs, self.backoff_max_secs)
    }

    /// Forget accumulated errors for `namespace/name` after a success
    ///
    /// Returns whether the resource had been backing off.
    pub fn reset_backoff(&self, resource_key: &str) -> bool {
        let Ok(mut states) = self.backoff_states.lock() else {
            return false;
        };
        match states.get_mut(resource_key) {
            Some(state) => {
                let had_errors = state.error_count > 0;
                state.reset();
                had_errors
            }
            None => false,
        }
    }

    /// Drop the backoff entry for `namespace/name` entirely
    pub fn forget_backoff(&self, resource_key: &str) -> bool {
        self.backoff_states
            .lock()
            .is_ok_and(|mut states| states.remove(resource_key).is_some())
    }
}
