//! # Kyma Companion Manager
//!
//! A Kubernetes controller that deploys the Kyma Companion backend for every
//! `Companion` resource.
//!
//! ## Overview
//!
//! For each Companion the controller:
//!
//! 1. **Adds a finalizer** before touching anything else
//! 2. **Aggregates credentials** from the configured HANA, Redis and AI Core sources
//! 3. **Converges the backend Secret** holding those credentials
//! 4. **Converges the backend Deployment** running the configured image
//! 5. **Releases the finalizer** on deletion; owned objects are garbage collected
//!
//! ## Configuration
//!
//! `KYMA_COMPANION_BACKEND_IMAGE` is required. Everything else has defaults,
//! see [`companion_manager::config::ControllerConfig`].

use anyhow::{Context, Result};
use companion_manager::config::ControllerConfig;
use companion_manager::runtime::{initialize, run_watch_loop};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ControllerConfig::from_env().context("Failed to load controller configuration")?;
    let init = initialize(config).await?;
    run_watch_loop(init).await
}
