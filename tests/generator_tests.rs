//! # Generator Tests
//!
//! Desired-state output for a Companion: determinism and the exact shape of
//! the backend Deployment and Secret.

use companion_manager::controller::backend::{build_deployment, build_secret, BackendConfig};
use companion_manager::crd::{Companion, CompanionSpec};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

fn companion() -> Companion {
    let mut companion = Companion::new("c1", CompanionSpec::default());
    companion.metadata.namespace = Some("ns1".to_string());
    companion.metadata.uid = Some("5f1c0b8e-uid".to_string());
    companion
}

fn backend_config() -> BackendConfig {
    BackendConfig {
        hana_db: br#"{"url":"aGFuYQ=="}"#.to_vec(),
        redis: br#"{"host":"cmVkaXM="}"#.to_vec(),
        ai_core_secret: br#"{"clientid":"aWQ="}"#.to_vec(),
        ai_core_config: br#"{"region":"eu10"}"#.to_vec(),
    }
}

#[test]
fn test_generation_is_deterministic() {
    let c = companion();
    let a = serde_json::to_vec(&build_deployment(&c, "registry/backend:v1").unwrap()).unwrap();
    let b = serde_json::to_vec(&build_deployment(&c, "registry/backend:v1").unwrap()).unwrap();
    assert_eq!(a, b);

    let a = serde_json::to_vec(&build_secret(&c, &backend_config()).unwrap()).unwrap();
    let b = serde_json::to_vec(&build_secret(&c, &backend_config()).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_deployment_identity_and_ownership() {
    let deployment = build_deployment(&companion(), "registry/backend:v1").unwrap();
    assert_eq!(
        deployment.metadata.name.as_deref(),
        Some("kyma-companion-backend")
    );
    assert_eq!(deployment.metadata.namespace.as_deref(), Some("ns1"));

    let owners = deployment.metadata.owner_references.unwrap();
    assert_eq!(owners.len(), 1);
    assert_eq!(owners[0].kind, "Companion");
    assert_eq!(owners[0].name, "c1");
    assert_eq!(owners[0].uid, "5f1c0b8e-uid");
    assert_eq!(owners[0].controller, Some(true));
    assert_eq!(owners[0].block_owner_deletion, Some(true));

    let labels = deployment.metadata.labels.unwrap();
    let spec = deployment.spec.unwrap();
    assert_eq!(spec.selector.match_labels.as_ref(), Some(&labels));
    assert_eq!(
        spec.template.metadata.and_then(|m| m.labels).as_ref(),
        Some(&labels)
    );
}

#[test]
fn test_deployment_container_contract() {
    let deployment = build_deployment(&companion(), "registry/backend:v1").unwrap();
    let pod = deployment.spec.unwrap().template.spec.unwrap();
    let container = &pod.containers[0];

    let ports: Vec<(Option<&str>, i32)> = container
        .ports
        .as_ref()
        .unwrap()
        .iter()
        .map(|p| (p.name.as_deref(), p.container_port))
        .collect();
    assert_eq!(
        ports,
        vec![(Some("http"), 8000), (Some("http-metrics"), 9090)]
    );

    let liveness = container.liveness_probe.as_ref().unwrap();
    let get = liveness.http_get.as_ref().unwrap();
    assert_eq!(get.path.as_deref(), Some("/healthz"));
    assert_eq!(get.port, IntOrString::Int(8000));
    assert_eq!(
        (
            liveness.initial_delay_seconds,
            liveness.timeout_seconds,
            liveness.period_seconds,
            liveness.success_threshold,
            liveness.failure_threshold
        ),
        (Some(5), Some(1), Some(2), Some(1), Some(3))
    );

    let readiness = container.readiness_probe.as_ref().unwrap();
    assert_eq!(
        readiness.http_get.as_ref().unwrap().path.as_deref(),
        Some("/readyz")
    );
    assert_eq!(readiness.failure_threshold, Some(3));

    let resources = container.resources.as_ref().unwrap();
    let requests = resources.requests.as_ref().unwrap();
    let limits = resources.limits.as_ref().unwrap();
    assert_eq!(requests["cpu"], Quantity("200m".to_string()));
    assert_eq!(requests["memory"], Quantity("512Mi".to_string()));
    assert_eq!(limits["cpu"], Quantity("500m".to_string()));
    assert_eq!(limits["memory"], Quantity("1Gi".to_string()));

    let mounts = container.volume_mounts.as_ref().unwrap();
    assert_eq!(mounts.len(), 1);
    assert_eq!(mounts[0].mount_path, "/mnt/secrets");
    assert_eq!(mounts[0].read_only, Some(true));

    let volumes = pod.volumes.unwrap();
    assert_eq!(volumes.len(), 1);
    assert_eq!(
        volumes[0]
            .secret
            .as_ref()
            .and_then(|s| s.secret_name.as_deref()),
        Some("kyma-companion-backend")
    );
}

#[test]
fn test_secret_contract() {
    let secret = build_secret(&companion(), &backend_config()).unwrap();
    assert_eq!(secret.metadata.name.as_deref(), Some("kyma-companion-backend"));
    assert_eq!(secret.metadata.namespace.as_deref(), Some("ns1"));
    assert_eq!(secret.type_.as_deref(), Some("Opaque"));

    let data = secret.data.unwrap();
    assert_eq!(data.len(), 4);
    assert_eq!(data["hana-db-secret"].0, backend_config().hana_db);
    assert_eq!(data["redis-secret"].0, backend_config().redis);
    assert_eq!(data["ai-core-secret"].0, backend_config().ai_core_secret);
    assert_eq!(data["ai-core-config"].0, backend_config().ai_core_config);
}

#[test]
fn test_deployment_and_secret_share_labels() {
    let c = companion();
    let deployment = build_deployment(&c, "registry/backend:v1").unwrap();
    let secret = build_secret(&c, &backend_config()).unwrap();
    assert_eq!(deployment.metadata.labels, secret.metadata.labels);
}
