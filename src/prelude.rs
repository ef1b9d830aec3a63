//! # Prelude
//!
//! Re-exports commonly used types and traits.
//!
//! ```rust
//! use companion_manager::prelude::*;
//! ```

pub use crate::crd::*;

pub use crate::controller::reconciler::{
    reconcile, BackoffState, LifecyclePhase, ReconcileOutcome, Reconciler, ReconcilerError,
};

pub use crate::controller::backend::{
    build_deployment, build_secret, AggregationError, BackendConfig, ConfigAggregator,
};
pub use crate::controller::client::{ClusterClient, ClusterError, KubeClusterClient};
pub use crate::controller::equality::{semantic_equal, ManagedKind, ManagedObject, SemanticEq};

pub use crate::config::{BackendConfigSources, ConfigError, ControllerConfig};
