//! # Cluster Client
//!
//! Narrow facade over the Kubernetes API used by the reconciler and the
//! config aggregator. The trait is mocked in unit tests; [`KubeClusterClient`]
//! is the `kube`-backed implementation.
//!
//! Reads map NotFound to `None`. Writes are server-side apply with `force`
//! under a single field manager. Every call is bounded by a deadline.

use crate::controller::equality::{ManagedKind, ManagedObject};
use crate::crd::Companion;
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, Secret, Service};
use kube::api::{Api, Patch, PatchParams, PostParams};
use kube::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

/// A call to the cluster failed
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),
    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },
    #[error("{kind} has no metadata.{field}")]
    MissingMetadata {
        kind: &'static str,
        field: &'static str,
    },
}

impl ClusterError {
    /// HTTP status of the underlying API error, if any
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClusterError::Kube(kube::Error::Api(e)) => Some(e.code),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.status_code() == Some(409)
    }
}

/// Cluster operations the reconciliation engine depends on
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Read a Companion; `None` when it does not exist
    async fn get_companion(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<Option<Companion>, ClusterError>;

    /// Replace the finalizer list of a Companion
    ///
    /// The write is conditional on the Companion's observed `resourceVersion`,
    /// so a concurrent edit surfaces as a conflict.
    async fn update_finalizers(
        &self,
        companion: &Companion,
        finalizers: Vec<String>,
    ) -> Result<(), ClusterError>;

    /// Read a managed object; `None` when it does not exist
    async fn get(
        &self,
        kind: ManagedKind,
        name: &str,
        namespace: &str,
    ) -> Result<Option<ManagedObject>, ClusterError>;

    /// Server-side apply an object, taking ownership of every field it sets
    async fn patch_apply(&self, object: &ManagedObject) -> Result<(), ClusterError>;

    async fn get_secret(&self, name: &str, namespace: &str)
        -> Result<Option<Secret>, ClusterError>;

    async fn get_config_map(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<Option<ConfigMap>, ClusterError>;
}

/// `kube`-backed [`ClusterClient`]
#[derive(Clone)]
pub struct KubeClusterClient {
    client: Client,
    field_manager: String,
    timeout: Duration,
}

impl std::fmt::Debug for KubeClusterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeClusterClient")
            .field("field_manager", &self.field_manager)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl KubeClusterClient {
    pub fn new(client: Client, field_manager: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            field_manager: field_manager.into(),
            timeout,
        }
    }

    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> Result<T, ClusterError>
    where
        F: Future<Output = Result<T, kube::Error>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.map_err(ClusterError::from),
            Err(_) => Err(ClusterError::Timeout {
                operation,
                timeout: self.timeout,
            }),
        }
    }

    async fn get_opt<K>(
        &self,
        operation: &'static str,
        name: &str,
        namespace: &str,
    ) -> Result<Option<K>, ClusterError>
    where
        K: kube::Resource<Scope = k8s_openapi::NamespaceResourceScope>
            + Clone
            + DeserializeOwned
            + Debug,
        <K as kube::Resource>::DynamicType: Default,
    {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        self.bounded(operation, api.get_opt(name)).await
    }

    async fn apply<K>(&self, kind: &'static str, object: &K) -> Result<(), ClusterError>
    where
        K: kube::Resource<Scope = k8s_openapi::NamespaceResourceScope>
            + Clone
            + DeserializeOwned
            + Serialize
            + Debug,
        <K as kube::Resource>::DynamicType: Default,
    {
        let meta = object.meta();
        let name = meta
            .name
            .as_deref()
            .ok_or(ClusterError::MissingMetadata { kind, field: "name" })?;
        let namespace = meta
            .namespace
            .as_deref()
            .ok_or(ClusterError::MissingMetadata {
                kind,
                field: "namespace",
            })?;

        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        let params = PatchParams::apply(&self.field_manager).force();
        debug!("Applying {} {}/{}", kind, namespace, name);
        self.bounded("patch_apply", api.patch(name, &params, &Patch::Apply(object)))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ClusterClient for KubeClusterClient {
    async fn get_companion(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<Option<Companion>, ClusterError> {
        self.get_opt("get_companion", name, namespace).await
    }

    async fn update_finalizers(
        &self,
        companion: &Companion,
        finalizers: Vec<String>,
    ) -> Result<(), ClusterError> {
        let name = companion
            .metadata
            .name
            .as_deref()
            .ok_or(ClusterError::MissingMetadata {
                kind: "Companion",
                field: "name",
            })?;
        let namespace =
            companion
                .metadata
                .namespace
                .as_deref()
                .ok_or(ClusterError::MissingMetadata {
                    kind: "Companion",
                    field: "namespace",
                })?;

        let api: Api<Companion> = Api::namespaced(self.client.clone(), namespace);
        // replace carries the observed resourceVersion, a concurrent edit is a 409
        let mut updated = companion.clone();
        updated.metadata.finalizers = if finalizers.is_empty() {
            None
        } else {
            Some(finalizers)
        };
        self.bounded(
            "update_finalizers",
            api.replace(name, &PostParams::default(), &updated),
        )
        .await?;
        Ok(())
    }

    async fn get(
        &self,
        kind: ManagedKind,
        name: &str,
        namespace: &str,
    ) -> Result<Option<ManagedObject>, ClusterError> {
        Ok(match kind {
            ManagedKind::Deployment => self
                .get_opt::<Deployment>("get_deployment", name, namespace)
                .await?
                .map(ManagedObject::Deployment),
            ManagedKind::Secret => self
                .get_opt::<Secret>("get_secret", name, namespace)
                .await?
                .map(ManagedObject::Secret),
            ManagedKind::Service => self
                .get_opt::<Service>("get_service", name, namespace)
                .await?
                .map(ManagedObject::Service),
        })
    }

    async fn patch_apply(&self, object: &ManagedObject) -> Result<(), ClusterError> {
        match object {
            ManagedObject::Deployment(d) => self.apply("Deployment", d).await,
            ManagedObject::Secret(s) => self.apply("Secret", s).await,
            ManagedObject::Service(s) => self.apply("Service", s).await,
        }
    }

    async fn get_secret(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<Option<Secret>, ClusterError> {
        self.get_opt("get_secret", name, namespace).await
    }

    async fn get_config_map(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<Option<ConfigMap>, ClusterError> {
        self.get_opt("get_config_map", name, namespace).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(code: u16) -> ClusterError {
        ClusterError::Kube(kube::Error::Api(kube::error::ErrorResponse {
            status: "Failure".to_string(),
            message: "boom".to_string(),
            reason: "Conflict".to_string(),
            code,
        }))
    }

    #[test]
    fn test_conflict_detection() {
        assert!(api_error(409).is_conflict());
        assert!(!api_error(500).is_conflict());
        let timeout = ClusterError::Timeout {
            operation: "get_companion",
            timeout: Duration::from_secs(1),
        };
        assert!(!timeout.is_conflict());
        assert_eq!(timeout.status_code(), None);
    }

    #[test]
    fn test_timeout_message() {
        let err = ClusterError::Timeout {
            operation: "patch_apply",
            timeout: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "patch_apply timed out after 30s");
    }
}
