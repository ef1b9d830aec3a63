//! # Custom Resource Definitions
//!
//! CRD types for the Companion Manager.
//!
//! ## Module Structure
//!
//! - `spec.rs` - `Companion` resource, its spec and default values
//! - `status.rs` - Status types and the `CompanionState` enum

mod spec;
mod status;

// Re-export all public types
pub use spec::{
    default_ai_core, default_hana_cloud, default_redis, AiCoreConfig, Companion, CompanionConfig,
    CompanionSpec, HanaConfig, NamespacedName, RedisConfig, ReplicasConfig, ResourcesConfig,
};
pub use status::{CompanionState, CompanionStatus};
