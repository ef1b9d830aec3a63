//! Deployment comparison.

use super::{map_equal, name_and_namespace_equal, owner_references_equal, slice, SemanticEq};
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{Container, ContainerPort, EnvVar, PodSpec, Probe};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

impl SemanticEq for Deployment {
    fn semantic_eq(&self, other: &Self) -> bool {
        if !name_and_namespace_equal(&self.metadata, &other.metadata)
            || !owner_references_equal(&self.metadata, &other.metadata)
            || !map_equal(self.metadata.labels.as_ref(), other.metadata.labels.as_ref())
        {
            return false;
        }

        let default_spec = DeploymentSpec::default();
        let a = self.spec.as_ref().unwrap_or(&default_spec);
        let b = other.spec.as_ref().unwrap_or(&default_spec);

        if a.replicas != b.replicas
            || !map_equal(a.selector.match_labels.as_ref(), b.selector.match_labels.as_ref())
            || a.min_ready_seconds.unwrap_or(0) != b.min_ready_seconds.unwrap_or(0)
        {
            return false;
        }

        let default_meta = ObjectMeta::default();
        let ta = a.template.metadata.as_ref().unwrap_or(&default_meta);
        let tb = b.template.metadata.as_ref().unwrap_or(&default_meta);
        if !map_equal(ta.annotations.as_ref(), tb.annotations.as_ref())
            || !map_equal(ta.labels.as_ref(), tb.labels.as_ref())
        {
            return false;
        }

        let default_pod = PodSpec::default();
        pod_spec_equal(
            a.template.spec.as_ref().unwrap_or(&default_pod),
            b.template.spec.as_ref().unwrap_or(&default_pod),
        )
    }
}

fn pod_spec_equal(a: &PodSpec, b: &PodSpec) -> bool {
    a.containers.len() == b.containers.len()
        && a
            .containers
            .iter()
            .zip(&b.containers)
            .all(|(ca, cb)| container_equal(ca, cb))
        && slice(&a.volumes) == slice(&b.volumes)
        && a.service_account_name.as_deref().unwrap_or_default()
            == b.service_account_name.as_deref().unwrap_or_default()
}

fn container_equal(a: &Container, b: &Container) -> bool {
    a.image == b.image
        && ports_equal(slice(&a.ports), slice(&b.ports))
        && env_equal(slice(&a.env), slice(&b.env))
        && a.resources == b.resources
        && slice(&a.volume_mounts) == slice(&b.volume_mounts)
        && probe_equal(a.readiness_probe.as_ref(), b.readiness_probe.as_ref())
}

/// Ports as a set keyed by name, number and protocol
fn ports_equal(a: &[ContainerPort], b: &[ContainerPort]) -> bool {
    a.len() == b.len()
        && a.iter().all(|pa| {
            b.iter().any(|pb| {
                pa.name == pb.name
                    && pa.container_port == pb.container_port
                    && protocol(pa) == protocol(pb)
            })
        })
}

/// Empty protocol means TCP
fn protocol(port: &ContainerPort) -> &str {
    match port.protocol.as_deref() {
        None | Some("") => "TCP",
        Some(p) => p,
    }
}

fn env_equal(a: &[EnvVar], b: &[EnvVar]) -> bool {
    a.len() == b.len() && a.iter().all(|ea| b.contains(ea))
}

/// Probes compared loosely: a zero (or unset) timeout, period or threshold on
/// either side matches anything. The HTTP handler is compared by path.
pub(super) fn probe_equal(a: Option<&Probe>, b: Option<&Probe>) -> bool {
    let (a, b) = match (a, b) {
        (None, None) => return true,
        (Some(a), Some(b)) => (a, b),
        _ => return false,
    };

    if a.initial_delay_seconds.unwrap_or(0) != b.initial_delay_seconds.unwrap_or(0) {
        return false;
    }

    let relaxed_differs = |x: Option<i32>, y: Option<i32>| {
        let (x, y) = (x.unwrap_or(0), y.unwrap_or(0));
        x != 0 && y != 0 && x != y
    };
    if relaxed_differs(a.timeout_seconds, b.timeout_seconds)
        || relaxed_differs(a.period_seconds, b.period_seconds)
        || relaxed_differs(a.success_threshold, b.success_threshold)
        || relaxed_differs(a.failure_threshold, b.failure_threshold)
    {
        return false;
    }

    match (&a.http_get, &b.http_get) {
        (None, None) => true,
        (Some(ha), Some(hb)) => ha.path == hb.path,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::HTTPGetAction;
    use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

    fn probe(path: &str) -> Probe {
        Probe {
            http_get: Some(HTTPGetAction {
                path: Some(path.to_string()),
                port: IntOrString::Int(8000),
                scheme: Some("HTTP".to_string()),
                ..Default::default()
            }),
            initial_delay_seconds: Some(5),
            timeout_seconds: Some(1),
            period_seconds: Some(2),
            success_threshold: Some(1),
            failure_threshold: Some(3),
            ..Default::default()
        }
    }

    #[test]
    fn test_probe_absent() {
        assert!(probe_equal(None, None));
        assert!(!probe_equal(Some(&probe("/readyz")), None));
        assert!(!probe_equal(None, Some(&probe("/readyz"))));
    }

    #[test]
    fn test_probe_zero_threshold_is_relaxed() {
        let a = probe("/readyz");
        let mut b = probe("/readyz");
        b.failure_threshold = Some(0);
        b.timeout_seconds = None;
        assert!(probe_equal(Some(&a), Some(&b)));
    }

    #[test]
    fn test_probe_non_zero_thresholds_differ() {
        let a = probe("/readyz");
        let mut b = probe("/readyz");
        b.failure_threshold = Some(5);
        assert!(!probe_equal(Some(&a), Some(&b)));

        let mut c = probe("/readyz");
        c.period_seconds = Some(10);
        assert!(!probe_equal(Some(&a), Some(&c)));
    }

    #[test]
    fn test_probe_initial_delay_is_strict() {
        let a = probe("/readyz");
        let mut b = probe("/readyz");
        b.initial_delay_seconds = None;
        assert!(!probe_equal(Some(&a), Some(&b)));
    }

    #[test]
    fn test_probe_handler_by_path() {
        let a = probe("/readyz");
        let mut b = probe("/readyz");
        if let Some(http_get) = b.http_get.as_mut() {
            http_get.port = IntOrString::Int(9999);
        }
        assert!(probe_equal(Some(&a), Some(&b)));

        let c = probe("/healthz");
        assert!(!probe_equal(Some(&a), Some(&c)));

        let mut d = probe("/readyz");
        d.http_get = None;
        assert!(!probe_equal(Some(&a), Some(&d)));
    }

    #[test]
    fn test_ports_empty_protocol_is_tcp() {
        let a = vec![ContainerPort {
            name: Some("http".to_string()),
            container_port: 8000,
            protocol: None,
            ..Default::default()
        }];
        let b = vec![ContainerPort {
            name: Some("http".to_string()),
            container_port: 8000,
            protocol: Some("TCP".to_string()),
            ..Default::default()
        }];
        assert!(ports_equal(&a, &b));

        let c = vec![ContainerPort {
            name: Some("http".to_string()),
            container_port: 8000,
            protocol: Some("UDP".to_string()),
            ..Default::default()
        }];
        assert!(!ports_equal(&a, &c));
    }

    #[test]
    fn test_env_is_unordered() {
        let x = EnvVar {
            name: "X".to_string(),
            value: Some("1".to_string()),
            ..Default::default()
        };
        let y = EnvVar {
            name: "Y".to_string(),
            value: Some("2".to_string()),
            ..Default::default()
        };
        assert!(env_equal(&[x.clone(), y.clone()], &[y.clone(), x.clone()]));
        assert!(!env_equal(&[x.clone()], &[x.clone(), y]));
        let x2 = EnvVar {
            value: Some("changed".to_string()),
            ..x.clone()
        };
        assert!(!env_equal(&[x], &[x2]));
    }
}
