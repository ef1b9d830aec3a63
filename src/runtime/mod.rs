//! # Runtime
//!
//! Process runtime around the reconciler.
//!
//! - `initialization`: rustls, logging, metrics, HTTP server and client setup
//! - `watch_loop`: the `kube` controller driving reconciliation
//! - `error_policy`: per-object Fibonacci backoff after failed reconciliations

pub mod error_policy;
pub mod initialization;
pub mod watch_loop;

pub use initialization::{initialize, InitializationResult};
pub use watch_loop::run_watch_loop;
