//! # Deployment Builder

use super::{require, GenerationError};
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{Container, PodSpec, PodTemplateSpec, SecretVolumeSource, Volume};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta, OwnerReference};
use std::collections::BTreeMap;

const KIND: &str = "Deployment";

/// Builder for a single-template Deployment
///
/// # Example
///
/// ```
/// use companion_manager::controller::builders::DeploymentBuilder;
/// use k8s_openapi::api::core::v1::Container;
///
/// let deployment = DeploymentBuilder::new("backend", "ns1")
///     .replicas(1)
///     .container(Container {
///         name: "backend".to_string(),
///         ..Default::default()
///     })
///     .build()
///     .unwrap();
/// assert_eq!(deployment.metadata.name.as_deref(), Some("backend"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DeploymentBuilder {
    name: Option<String>,
    namespace: Option<String>,
    labels: Option<BTreeMap<String, String>>,
    selector_labels: Option<BTreeMap<String, String>>,
    replicas: Option<i32>,
    containers: Vec<Container>,
    volumes: Vec<Volume>,
    owner_references: Vec<OwnerReference>,
    priority_class_name: Option<String>,
    restart_policy: Option<String>,
    termination_grace_period_seconds: Option<i64>,
}

impl DeploymentBuilder {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            namespace: Some(namespace.into()),
            ..Default::default()
        }
    }

    /// Labels for both the Deployment and its pod template
    #[must_use]
    pub fn labels(mut self, labels: BTreeMap<String, String>) -> Self {
        self.labels = Some(labels);
        self
    }

    #[must_use]
    pub fn selector_labels(mut self, labels: BTreeMap<String, String>) -> Self {
        self.selector_labels = Some(labels);
        self
    }

    #[must_use]
    pub fn replicas(mut self, replicas: i32) -> Self {
        self.replicas = Some(replicas);
        self
    }

    #[must_use]
    pub fn container(mut self, container: Container) -> Self {
        self.containers.push(container);
        self
    }

    #[must_use]
    pub fn owner_reference(mut self, owner: OwnerReference) -> Self {
        self.owner_references.push(owner);
        self
    }

    #[must_use]
    pub fn priority_class_name(mut self, name: impl Into<String>) -> Self {
        self.priority_class_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn restart_policy_always(mut self) -> Self {
        self.restart_policy = Some("Always".to_string());
        self
    }

    #[must_use]
    pub fn termination_grace_period_seconds(mut self, seconds: i64) -> Self {
        self.termination_grace_period_seconds = Some(seconds);
        self
    }

    /// Add a pod volume named after the Secret it mounts
    #[must_use]
    pub fn volume_mounted_secret(mut self, secret_name: impl Into<String>, default_mode: i32) -> Self {
        let secret_name = secret_name.into();
        self.volumes.push(Volume {
            name: secret_name.clone(),
            secret: Some(SecretVolumeSource {
                secret_name: Some(secret_name),
                default_mode: Some(default_mode),
                ..Default::default()
            }),
            ..Default::default()
        });
        self
    }

    /// Build the Deployment
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::MissingField`] when name or namespace is
    /// empty or no container was added.
    pub fn build(self) -> Result<Deployment, GenerationError> {
        let name = require(KIND, "metadata.name", self.name)?;
        let namespace = require(KIND, "metadata.namespace", self.namespace)?;
        if self.containers.is_empty() {
            return Err(GenerationError::MissingField {
                kind: KIND,
                field: "spec.template.spec.containers",
            });
        }

        let selector_labels = self.selector_labels.or_else(|| self.labels.clone());

        Ok(Deployment {
            metadata: ObjectMeta {
                name: Some(name.clone()),
                namespace: Some(namespace),
                labels: self.labels.clone(),
                owner_references: if self.owner_references.is_empty() {
                    None
                } else {
                    Some(self.owner_references)
                },
                ..Default::default()
            },
            spec: Some(DeploymentSpec {
                replicas: self.replicas,
                selector: LabelSelector {
                    match_labels: selector_labels,
                    ..Default::default()
                },
                template: PodTemplateSpec {
                    metadata: Some(ObjectMeta {
                        name: Some(name),
                        labels: self.labels,
                        ..Default::default()
                    }),
                    spec: Some(PodSpec {
                        containers: self.containers,
                        volumes: if self.volumes.is_empty() {
                            None
                        } else {
                            Some(self.volumes)
                        },
                        priority_class_name: self.priority_class_name,
                        restart_policy: self.restart_policy,
                        termination_grace_period_seconds: self.termination_grace_period_seconds,
                        ..Default::default()
                    }),
                },
                ..Default::default()
            }),
            status: None,
        })
    }
}
