//! # Converge
//!
//! Brings the backend Secret and Deployment in line with their desired state.
//! Each kind is built, compared against what the cluster holds, and applied
//! only when missing or semantically different.

use super::types::{Reconciler, ReconcilerError};
use crate::controller::backend::{build_deployment, build_secret};
use crate::controller::builders::GenerationError;
use crate::controller::equality::{ManagedObject, SemanticEq};
use crate::crd::Companion;
use crate::observability::metrics;
use tracing::{debug, info};

impl Reconciler {
    /// Secret first, then Deployment; the first failure aborts
    pub(super) async fn converge(
        &self,
        companion: &Companion,
    ) -> Result<(bool, bool), ReconcilerError> {
        let secret_applied = self.converge_secret(companion).await?;
        let deployment_applied = self.converge_deployment(companion).await?;
        Ok((secret_applied, deployment_applied))
    }

    async fn converge_secret(&self, companion: &Companion) -> Result<bool, ReconcilerError> {
        let config = self
            .aggregator
            .get_backend_config(self.client.as_ref())
            .await?;
        let desired = build_secret(companion, &config)?;
        self.apply_if_changed(desired.into()).await
    }

    async fn converge_deployment(&self, companion: &Companion) -> Result<bool, ReconcilerError> {
        let desired = build_deployment(companion, &self.backend_image)?;
        self.apply_if_changed(desired.into()).await
    }

    /// Returns whether a patch-apply was issued
    async fn apply_if_changed(&self, desired: ManagedObject) -> Result<bool, ReconcilerError> {
        let kind = desired.kind();
        let name = desired.name().ok_or(GenerationError::MissingField {
            kind: kind.as_str(),
            field: "metadata.name",
        })?;
        let namespace = desired.namespace().ok_or(GenerationError::MissingField {
            kind: kind.as_str(),
            field: "metadata.namespace",
        })?;

        let existing = self.client.get(kind, name, namespace).await?;
        match existing {
            Some(existing) if existing.semantic_eq(&desired) => {
                debug!("{} {}/{} is up to date", kind, namespace, name);
                Ok(false)
            }
            existing => {
                let verb = if existing.is_some() { "Updating" } else { "Creating" };
                info!("{} {} {}/{}", verb, kind, namespace, name);
                self.client.patch_apply(&desired).await?;
                metrics::increment_patch_applies(kind.as_str());
                Ok(true)
            }
        }
    }
}
