//! # Reconciler
//!
//! Core reconciliation logic for `Companion` resources.
//!
//! The reconciler:
//! - Adds its finalizer before writing anything on behalf of a Companion
//! - Aggregates the backend credentials into the backend Secret
//! - Deploys the backend Deployment with the configured image
//! - Writes only when the cluster state semantically differs
//! - Removes its finalizer once the Companion is being deleted
//!
//! ## Module Structure
//!
//! - `types.rs` - Context, errors, outcomes and backoff state
//! - `lifecycle.rs` - Finalizer-gated lifecycle phases
//! - `converge.rs` - Compare-then-apply for the Secret and Deployment
//! - `reconcile.rs` - State machine and controller entry point

pub mod converge;
pub mod lifecycle;
pub mod reconcile;
pub mod types;

pub use lifecycle::LifecyclePhase;
pub use reconcile::reconcile;
pub use types::{BackoffState, ReconcileOutcome, Reconciler, ReconcilerError};
