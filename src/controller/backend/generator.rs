//! # Desired-State Generator
//!
//! Pure functions from a Companion (plus the backend image or the aggregated
//! [`BackendConfig`]) to the objects the controller applies. Identical inputs
//! always produce identical objects, which is what makes the
//! compare-then-apply loop converge.

use super::{common_labels, BackendConfig};
use crate::constants::{
    BACKEND_METRICS_PORT, BACKEND_METRICS_PORT_NAME, BACKEND_PORT, BACKEND_PORT_NAME,
    BACKEND_PRIORITY_CLASS_NAME, BACKEND_REPLICAS, BACKEND_RESOURCE_NAME, LIMITS_CPU,
    LIMITS_MEMORY, LIVENESS_FAILURE_THRESHOLD, LIVENESS_INITIAL_DELAY_SECS, LIVENESS_PATH,
    LIVENESS_PERIOD_SECS, LIVENESS_SUCCESS_THRESHOLD, LIVENESS_TIMEOUT_SECS,
    READINESS_FAILURE_THRESHOLD, READINESS_PATH, REQUESTS_CPU, REQUESTS_MEMORY,
    SECRET_KEY_AI_CORE_CONFIG, SECRET_KEY_AI_CORE_SECRET, SECRET_KEY_HANA_DB, SECRET_KEY_REDIS,
    SECRET_MOUNT_PATH, SECRET_VOLUME_DEFAULT_MODE, TERMINATION_GRACE_PERIOD_SECS,
};
use crate::controller::builders::{DeploymentBuilder, GenerationError, SecretBuilder};
use crate::crd::Companion;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, HTTPGetAction, Probe, ResourceRequirements, Secret, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::Resource;
use std::collections::BTreeMap;

/// Controller owner reference pointing at the Companion
///
/// # Errors
///
/// Returns [`GenerationError::MissingIdentity`] if the Companion has no name or uid.
pub fn owner_reference(companion: &Companion) -> Result<OwnerReference, GenerationError> {
    let name = identity(companion.metadata.name.as_ref(), "name")?;
    let uid = identity(companion.metadata.uid.as_ref(), "uid")?;
    Ok(OwnerReference {
        api_version: Companion::api_version(&()).to_string(),
        kind: Companion::kind(&()).to_string(),
        name: name.clone(),
        uid: uid.clone(),
        controller: Some(true),
        block_owner_deletion: Some(true),
    })
}

/// Desired backend Deployment for a Companion
///
/// # Errors
///
/// Returns [`GenerationError::MissingIdentity`] if the Companion has no name,
/// namespace or uid.
pub fn build_deployment(companion: &Companion, image: &str) -> Result<Deployment, GenerationError> {
    let owner = owner_reference(companion)?;
    let namespace = identity(companion.metadata.namespace.as_ref(), "namespace")?;
    let labels = common_labels(BACKEND_RESOURCE_NAME);

    DeploymentBuilder::new(BACKEND_RESOURCE_NAME, namespace.as_str())
        .labels(labels.clone())
        .selector_labels(labels)
        .restart_policy_always()
        .replicas(BACKEND_REPLICAS)
        .termination_grace_period_seconds(TERMINATION_GRACE_PERIOD_SECS)
        .priority_class_name(BACKEND_PRIORITY_CLASS_NAME)
        .container(backend_container(image))
        .owner_reference(owner)
        .volume_mounted_secret(BACKEND_RESOURCE_NAME, SECRET_VOLUME_DEFAULT_MODE)
        .build()
}

/// Desired backend Secret for a Companion
///
/// # Errors
///
/// Returns [`GenerationError::MissingIdentity`] if the Companion has no name,
/// namespace or uid.
pub fn build_secret(companion: &Companion, config: &BackendConfig) -> Result<Secret, GenerationError> {
    let owner = owner_reference(companion)?;
    let namespace = identity(companion.metadata.namespace.as_ref(), "namespace")?;

    SecretBuilder::new(BACKEND_RESOURCE_NAME, namespace.as_str())
        .labels(common_labels(BACKEND_RESOURCE_NAME))
        .owner_reference(owner)
        .data(SECRET_KEY_HANA_DB, config.hana_db.clone())
        .data(SECRET_KEY_REDIS, config.redis.clone())
        .data(SECRET_KEY_AI_CORE_CONFIG, config.ai_core_config.clone())
        .data(SECRET_KEY_AI_CORE_SECRET, config.ai_core_secret.clone())
        .build()
}

fn identity<'a>(
    value: Option<&'a String>,
    field: &'static str,
) -> Result<&'a String, GenerationError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(GenerationError::MissingIdentity { field })
}

fn backend_container(image: &str) -> Container {
    Container {
        name: BACKEND_RESOURCE_NAME.to_string(),
        image: Some(image.to_string()),
        image_pull_policy: Some("Always".to_string()),
        ports: Some(vec![
            ContainerPort {
                name: Some(BACKEND_PORT_NAME.to_string()),
                container_port: BACKEND_PORT,
                ..Default::default()
            },
            ContainerPort {
                name: Some(BACKEND_METRICS_PORT_NAME.to_string()),
                container_port: BACKEND_METRICS_PORT,
                ..Default::default()
            },
        ]),
        liveness_probe: Some(Probe {
            http_get: Some(http_get(LIVENESS_PATH)),
            initial_delay_seconds: Some(LIVENESS_INITIAL_DELAY_SECS),
            timeout_seconds: Some(LIVENESS_TIMEOUT_SECS),
            period_seconds: Some(LIVENESS_PERIOD_SECS),
            success_threshold: Some(LIVENESS_SUCCESS_THRESHOLD),
            failure_threshold: Some(LIVENESS_FAILURE_THRESHOLD),
            ..Default::default()
        }),
        readiness_probe: Some(Probe {
            http_get: Some(http_get(READINESS_PATH)),
            failure_threshold: Some(READINESS_FAILURE_THRESHOLD),
            ..Default::default()
        }),
        resources: Some(resources()),
        volume_mounts: Some(vec![VolumeMount {
            name: BACKEND_RESOURCE_NAME.to_string(),
            read_only: Some(true),
            mount_path: SECRET_MOUNT_PATH.to_string(),
            ..Default::default()
        }]),
        ..Default::default()
    }
}

fn http_get(path: &str) -> HTTPGetAction {
    HTTPGetAction {
        path: Some(path.to_string()),
        port: IntOrString::Int(BACKEND_PORT),
        scheme: Some("HTTP".to_string()),
        ..Default::default()
    }
}

fn resources() -> ResourceRequirements {
    let mut requests = BTreeMap::new();
    requests.insert("cpu".to_string(), Quantity(REQUESTS_CPU.to_string()));
    requests.insert("memory".to_string(), Quantity(REQUESTS_MEMORY.to_string()));

    let mut limits = BTreeMap::new();
    limits.insert("cpu".to_string(), Quantity(LIMITS_CPU.to_string()));
    limits.insert("memory".to_string(), Quantity(LIMITS_MEMORY.to_string()));

    ResourceRequirements {
        requests: Some(requests),
        limits: Some(limits),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::CompanionSpec;

    fn companion() -> Companion {
        let mut companion = Companion::new("c1", CompanionSpec::default());
        companion.metadata.namespace = Some("ns1".to_string());
        companion.metadata.uid = Some("uid-1".to_string());
        companion
    }

    #[test]
    fn test_owner_reference() {
        let owner = owner_reference(&companion()).unwrap();
        assert_eq!(owner.api_version, "operator.kyma-project.io/v1alpha1");
        assert_eq!(owner.kind, "Companion");
        assert_eq!(owner.name, "c1");
        assert_eq!(owner.uid, "uid-1");
        assert_eq!(owner.controller, Some(true));
        assert_eq!(owner.block_owner_deletion, Some(true));
    }

    #[test]
    fn test_missing_uid_is_rejected() {
        let mut c = companion();
        c.metadata.uid = None;
        assert_eq!(
            build_deployment(&c, "img").unwrap_err(),
            GenerationError::MissingIdentity { field: "uid" }
        );
        assert_eq!(
            build_secret(&c, &BackendConfig::default()).unwrap_err(),
            GenerationError::MissingIdentity { field: "uid" }
        );
    }

    #[test]
    fn test_missing_namespace_is_rejected() {
        let mut c = companion();
        c.metadata.namespace = None;
        assert_eq!(
            build_deployment(&c, "img").unwrap_err(),
            GenerationError::MissingIdentity { field: "namespace" }
        );
    }

    #[test]
    fn test_deployment_pod_template() {
        let deployment = build_deployment(&companion(), "registry/backend:v1").unwrap();
        let spec = deployment.spec.unwrap();
        assert_eq!(spec.replicas, Some(1));
        let pod = spec.template.spec.unwrap();
        assert_eq!(pod.restart_policy.as_deref(), Some("Always"));
        assert_eq!(pod.termination_grace_period_seconds, Some(30));
        assert_eq!(
            pod.priority_class_name.as_deref(),
            Some("kyma-companion-manager-priority-class")
        );
        assert_eq!(pod.containers.len(), 1);

        let container = &pod.containers[0];
        assert_eq!(container.name, "kyma-companion-backend");
        assert_eq!(container.image.as_deref(), Some("registry/backend:v1"));
        assert_eq!(container.image_pull_policy.as_deref(), Some("Always"));

        let liveness = container.liveness_probe.as_ref().unwrap();
        assert_eq!(liveness.initial_delay_seconds, Some(5));
        assert_eq!(
            liveness.http_get.as_ref().unwrap().path.as_deref(),
            Some("/healthz")
        );
        let readiness = container.readiness_probe.as_ref().unwrap();
        assert_eq!(readiness.failure_threshold, Some(3));
        assert_eq!(readiness.initial_delay_seconds, None);

        let limits = container.resources.as_ref().unwrap().limits.as_ref().unwrap();
        assert_eq!(limits.get("memory"), Some(&Quantity("1Gi".to_string())));
    }

    #[test]
    fn test_secret_keys() {
        let config = BackendConfig {
            hana_db: b"hana".to_vec(),
            redis: b"redis".to_vec(),
            ai_core_secret: b"secret".to_vec(),
            ai_core_config: b"config".to_vec(),
        };
        let secret = build_secret(&companion(), &config).unwrap();
        let data = secret.data.unwrap();
        let keys: Vec<&str> = data.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "ai-core-config",
                "ai-core-secret",
                "hana-db-secret",
                "redis-secret"
            ]
        );
        assert_eq!(data["ai-core-config"].0, b"config".to_vec());
        assert_eq!(data["ai-core-secret"].0, b"secret".to_vec());
    }
}
