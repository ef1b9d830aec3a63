//! # Controller
//!
//! Core controller modules for the Companion Manager.
//!
//! - `backend`: desired state and credential aggregation for the companion backend
//! - `backoff`: Fibonacci backoff mechanism for retries
//! - `builders`: Deployment and Secret builders
//! - `client`: cluster client facade
//! - `equality`: semantic equality of managed objects
//! - `reconciler`: Core reconciliation logic
//! - `server`: HTTP server for metrics and health checks

pub mod backend;
pub mod backoff;
pub mod builders;
pub mod client;
pub mod equality;
pub mod reconciler;
pub mod server;
