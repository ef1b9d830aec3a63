//! # Companion Spec
//!
//! Main CRD types and default values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Companion Custom Resource Definition
///
/// Declares a Kyma Companion backend instance. The controller deploys the
/// backend Deployment and its Secret into the Companion's namespace.
///
/// # Example
///
/// ```yaml
/// apiVersion: operator.kyma-project.io/v1alpha1
/// kind: Companion
/// metadata:
///   name: default
///   namespace: kyma-system
/// spec:
///   companion:
///     secret:
///       name: companion
///       namespace: ai-core
///     replicas:
///       min: 1
///       max: 3
/// ```
#[derive(kube::CustomResource, Debug, Clone, Deserialize, Serialize, PartialEq, schemars::JsonSchema)]
#[kube(
    kind = "Companion",
    group = "operator.kyma-project.io",
    version = "v1alpha1",
    namespaced,
    status = "crate::crd::CompanionStatus",
    derive = "PartialEq",
    printcolumn = r#"{"name":"State", "type":"string", "jsonPath":".status.state"}, {"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct CompanionSpec {
    /// AI Core configuration
    #[serde(default = "default_ai_core")]
    pub aicore: AiCoreConfig,
    /// HANA Cloud configuration
    #[serde(default = "default_hana_cloud")]
    pub hana_cloud: HanaConfig,
    /// Redis configuration
    #[serde(default = "default_redis")]
    pub redis: RedisConfig,
    /// Configuration of the companion backend itself
    #[serde(default)]
    pub companion: CompanionConfig,
}

impl Default for CompanionSpec {
    fn default() -> Self {
        Self {
            aicore: default_ai_core(),
            hana_cloud: default_hana_cloud(),
            redis: default_redis(),
            companion: CompanionConfig::default(),
        }
    }
}

/// Reference to a namespaced object
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq, schemars::JsonSchema)]
pub struct NamespacedName {
    pub name: String,
    pub namespace: String,
}

impl NamespacedName {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

impl std::fmt::Display for NamespacedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// AI Core configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, schemars::JsonSchema)]
pub struct AiCoreConfig {
    /// Secret holding the AI Core credentials
    pub secret: NamespacedName,
}

/// HANA Cloud configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, schemars::JsonSchema)]
pub struct HanaConfig {
    /// Secret holding the HANA Cloud credentials
    pub secret: NamespacedName,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, schemars::JsonSchema)]
pub struct RedisConfig {
    /// Secret holding the Redis credentials
    pub secret: NamespacedName,
}

/// Companion backend configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanionConfig {
    /// Secret name and namespace for the companion backend
    pub secret: NamespacedName,
    /// Replica bounds for the companion backend
    pub replicas: ReplicasConfig,
    /// Resource requests and limits for the companion backend
    #[serde(default)]
    pub resources: ResourcesConfig,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        let mut limits = BTreeMap::new();
        limits.insert("cpu".to_string(), "4".to_string());
        limits.insert("memory".to_string(), "4Gi".to_string());
        let mut requests = BTreeMap::new();
        requests.insert("cpu".to_string(), "500m".to_string());
        requests.insert("memory".to_string(), "256Mi".to_string());
        Self {
            secret: NamespacedName::new("companion", "ai-core"),
            replicas: ReplicasConfig { min: 1, max: 3 },
            resources: ResourcesConfig { limits, requests },
        }
    }
}

/// Minimum and maximum replicas
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, schemars::JsonSchema)]
pub struct ReplicasConfig {
    pub min: i32,
    pub max: i32,
}

/// Resource requests and limits as Kubernetes quantity strings
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq, schemars::JsonSchema)]
pub struct ResourcesConfig {
    #[serde(default)]
    pub limits: BTreeMap<String, String>,
    #[serde(default)]
    pub requests: BTreeMap<String, String>,
}

/// Default value for the AI Core secret reference
pub fn default_ai_core() -> AiCoreConfig {
    AiCoreConfig {
        secret: NamespacedName::new("aicore", "ai-core"),
    }
}

/// Default value for the HANA Cloud secret reference
pub fn default_hana_cloud() -> HanaConfig {
    HanaConfig {
        secret: NamespacedName::new("companion", "hana-cloud"),
    }
}

/// Default value for the Redis secret reference
pub fn default_redis() -> RedisConfig {
    RedisConfig {
        secret: NamespacedName::new("companion", "redis"),
    }
}
