//! # Equality Tests
//!
//! Write-avoidance behavior of the semantic equality engine against
//! generator output.

use companion_manager::controller::backend::{build_deployment, build_secret, BackendConfig};
use companion_manager::controller::equality::{semantic_equal, ManagedObject, SemanticEq};
use companion_manager::crd::{Companion, CompanionSpec};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{
    ContainerPort, EnvVar, Secret, Service, ServicePort, ServiceSpec, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use k8s_openapi::ByteString;
use std::collections::BTreeMap;

fn companion() -> Companion {
    let mut companion = Companion::new("c1", CompanionSpec::default());
    companion.metadata.namespace = Some("ns1".to_string());
    companion.metadata.uid = Some("uid-1".to_string());
    companion
}

fn deployment() -> Deployment {
    build_deployment(&companion(), "registry/backend:v1").unwrap()
}

fn secret() -> Secret {
    let config = BackendConfig {
        hana_db: b"hana".to_vec(),
        redis: b"redis".to_vec(),
        ai_core_secret: b"secret".to_vec(),
        ai_core_config: b"config".to_vec(),
    };
    build_secret(&companion(), &config).unwrap()
}

fn mutate_deployment(f: impl FnOnce(&mut Deployment)) -> Deployment {
    let mut d = deployment();
    f(&mut d);
    d
}

fn first_container(d: &mut Deployment) -> &mut k8s_openapi::api::core::v1::Container {
    &mut d
        .spec
        .as_mut()
        .unwrap()
        .template
        .spec
        .as_mut()
        .unwrap()
        .containers[0]
}

#[test]
fn test_reflexive_for_every_kind() {
    let d = deployment();
    let s = secret();
    let svc = Service {
        spec: Some(ServiceSpec {
            ports: Some(vec![ServicePort {
                port: 80,
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    };
    assert!(d.semantic_eq(&d));
    assert!(s.semantic_eq(&s));
    assert!(svc.semantic_eq(&svc));
    assert!(semantic_equal(
        &ManagedObject::from(d.clone()),
        &ManagedObject::from(d)
    ));
}

#[test]
fn test_generator_controlled_fields_are_detected() {
    let base = deployment();
    let mutations: Vec<(&str, Deployment)> = vec![
        (
            "image",
            mutate_deployment(|d| {
                first_container(d).image = Some("registry/backend:v2".to_string());
            }),
        ),
        (
            "replicas",
            mutate_deployment(|d| d.spec.as_mut().unwrap().replicas = Some(2)),
        ),
        (
            "limits",
            mutate_deployment(|d| {
                first_container(d)
                    .resources
                    .as_mut()
                    .unwrap()
                    .limits
                    .as_mut()
                    .unwrap()
                    .insert("memory".to_string(), Quantity("2Gi".to_string()));
            }),
        ),
        (
            "ports",
            mutate_deployment(|d| {
                first_container(d).ports.as_mut().unwrap().push(ContainerPort {
                    container_port: 8443,
                    ..Default::default()
                });
            }),
        ),
        (
            "env",
            mutate_deployment(|d| {
                first_container(d).env = Some(vec![EnvVar {
                    name: "LOG_LEVEL".to_string(),
                    value: Some("debug".to_string()),
                    ..Default::default()
                }]);
            }),
        ),
        (
            "volume mounts",
            mutate_deployment(|d| {
                first_container(d)
                    .volume_mounts
                    .as_mut()
                    .unwrap()
                    .push(VolumeMount {
                        name: "tmp".to_string(),
                        mount_path: "/tmp".to_string(),
                        ..Default::default()
                    });
            }),
        ),
        (
            "labels",
            mutate_deployment(|d| {
                d.metadata
                    .labels
                    .as_mut()
                    .unwrap()
                    .insert("extra".to_string(), "x".to_string());
            }),
        ),
        (
            "owner references",
            mutate_deployment(|d| {
                d.metadata.owner_references = Some(vec![OwnerReference {
                    name: "someone-else".to_string(),
                    uid: "uid-2".to_string(),
                    ..Default::default()
                }]);
            }),
        ),
    ];

    for (field, mutated) in mutations {
        assert!(
            !base.semantic_eq(&mutated),
            "changing {field} must be detected"
        );
    }
}

#[test]
fn test_secret_metadata_changes_are_detected() {
    let base = secret();
    let mut labeled = secret();
    labeled
        .metadata
        .labels
        .get_or_insert_with(BTreeMap::new)
        .insert("extra".to_string(), "x".to_string());
    let mut retyped = secret();
    retyped.type_ = Some("kubernetes.io/tls".to_string());
    let mut reowned = secret();
    reowned.metadata.owner_references = Some(vec![OwnerReference {
        name: "someone-else".to_string(),
        uid: "uid-2".to_string(),
        ..Default::default()
    }]);

    for (field, mutated) in [
        ("labels", labeled),
        ("type", retyped),
        ("owner references", reowned),
    ] {
        assert!(
            !base.semantic_eq(&mutated),
            "changing secret {field} must be detected"
        );
    }
}

fn service(selector: &str, port: i32) -> Service {
    let (key, value) = selector.split_once('=').unwrap();
    Service {
        spec: Some(ServiceSpec {
            selector: Some(BTreeMap::from([(key.to_string(), value.to_string())])),
            ports: Some(vec![ServicePort {
                port,
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[test]
fn test_service_selector_and_ports_are_detected() {
    let base = service("a=b", 80);
    assert!(base.semantic_eq(&service("a=b", 80)));
    assert!(
        !base.semantic_eq(&service("a=c", 80)),
        "changing the selector must be detected"
    );
    assert!(
        !base.semantic_eq(&service("a=b", 8080)),
        "changing a port must be detected"
    );

    let mut extra_port = service("a=b", 80);
    extra_port
        .spec
        .as_mut()
        .unwrap()
        .ports
        .as_mut()
        .unwrap()
        .push(ServicePort {
            port: 443,
            ..Default::default()
        });
    assert!(!base.semantic_eq(&extra_port));
}

#[test]
fn test_absent_and_empty_maps_are_equal() {
    let mut a = deployment();
    let mut b = deployment();
    a.spec.as_mut().unwrap().template.metadata.as_mut().unwrap().annotations = None;
    b.spec.as_mut().unwrap().template.metadata.as_mut().unwrap().annotations =
        Some(BTreeMap::new());
    assert!(a.semantic_eq(&b));

    let mut s1 = secret();
    let mut s2 = secret();
    s1.metadata.labels = None;
    s2.metadata.labels = Some(BTreeMap::new());
    assert!(s1.semantic_eq(&s2));
}

#[test]
fn test_fields_outside_the_contract_are_ignored() {
    let mut observed = deployment();
    observed.metadata.resource_version = Some("12345".to_string());
    observed.metadata.uid = Some("server-assigned".to_string());
    observed.status = Some(Default::default());
    first_container(&mut observed).termination_message_path =
        Some("/dev/termination-log".to_string());
    assert!(deployment().semantic_eq(&observed));
}

#[test]
fn test_secret_data_is_compared_byte_for_byte() {
    let mut changed = secret();
    changed
        .data
        .as_mut()
        .unwrap()
        .insert("redis-secret".to_string(), ByteString(b"redis2".to_vec()));
    assert!(!secret().semantic_eq(&changed));
}

#[test]
fn test_kinds_do_not_mix() {
    assert!(!semantic_equal(
        &ManagedObject::from(deployment()),
        &ManagedObject::from(secret())
    ));
}
