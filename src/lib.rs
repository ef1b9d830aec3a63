//! Kyma Companion Manager Library
//!
//! Core functionality of the Companion Manager: the `Companion` CRD, the
//! reconciliation engine that keeps the companion backend Deployment and
//! Secret converged, and the runtime that drives it.
//!
//! ## Quick Start
//!
//! ```rust
//! use companion_manager::prelude::*;
//! ```

pub mod config;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod observability;
pub mod prelude;
pub mod runtime;
