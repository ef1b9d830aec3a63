//! # Constants
//!
//! Shared constants used throughout the controller.
//!
//! Values under "Defaults" can be overridden via environment variables
//! (see [`crate::config::ControllerConfig`]). Values under "Backend contract"
//! are fixed: they describe the objects the controller produces.

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Finalizer placed on every Companion before any owned object is created
pub const FINALIZER_NAME: &str = "companion.operator.kyma-project.io/finalizer";

/// Controller name, also the value of the `created-by` / `managed-by` labels
pub const CONTROLLER_NAME: &str = "kyma-companion-manager";

/// Default server-side apply field manager
pub const DEFAULT_FIELD_MANAGER: &str = "kyma-companion-manager";

// ---------------------------------------------------------------------------
// Backend contract
// ---------------------------------------------------------------------------

/// Name shared by the backend Deployment, its container, the Secret and the secret volume
pub const BACKEND_RESOURCE_NAME: &str = "kyma-companion-backend";

pub const BACKEND_PRIORITY_CLASS_NAME: &str = "kyma-companion-manager-priority-class";

pub const BACKEND_PORT_NAME: &str = "http";
pub const BACKEND_PORT: i32 = 8000;
pub const BACKEND_METRICS_PORT_NAME: &str = "http-metrics";
pub const BACKEND_METRICS_PORT: i32 = 9090;

pub const LIVENESS_PATH: &str = "/healthz";
pub const LIVENESS_INITIAL_DELAY_SECS: i32 = 5;
pub const LIVENESS_TIMEOUT_SECS: i32 = 1;
pub const LIVENESS_PERIOD_SECS: i32 = 2;
pub const LIVENESS_SUCCESS_THRESHOLD: i32 = 1;
pub const LIVENESS_FAILURE_THRESHOLD: i32 = 3;

pub const READINESS_PATH: &str = "/readyz";
pub const READINESS_FAILURE_THRESHOLD: i32 = 3;

pub const REQUESTS_CPU: &str = "200m";
pub const REQUESTS_MEMORY: &str = "512Mi";
pub const LIMITS_CPU: &str = "500m";
pub const LIMITS_MEMORY: &str = "1Gi";

pub const BACKEND_REPLICAS: i32 = 1;
pub const TERMINATION_GRACE_PERIOD_SECS: i64 = 30;

/// Mount path of the backend Secret inside the container
pub const SECRET_MOUNT_PATH: &str = "/mnt/secrets";

/// `0644`, the API server default for secret volumes
pub const SECRET_VOLUME_DEFAULT_MODE: i32 = 420;

/// Keys of the backend Secret
pub const SECRET_KEY_HANA_DB: &str = "hana-db-secret";
pub const SECRET_KEY_REDIS: &str = "redis-secret";
pub const SECRET_KEY_AI_CORE_CONFIG: &str = "ai-core-config";
pub const SECRET_KEY_AI_CORE_SECRET: &str = "ai-core-secret";

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

pub const LABEL_KEY_COMPONENT: &str = "app.kubernetes.io/component";
pub const LABEL_KEY_CREATED_BY: &str = "app.kubernetes.io/created-by";
pub const LABEL_KEY_INSTANCE: &str = "app.kubernetes.io/instance";
pub const LABEL_KEY_MANAGED_BY: &str = "app.kubernetes.io/managed-by";
pub const LABEL_KEY_NAME: &str = "app.kubernetes.io/name";
pub const LABEL_KEY_PART_OF: &str = "app.kubernetes.io/part-of";
pub const LABEL_KEY_DASHBOARD: &str = "kyma-project.io/dashboard";

pub const LABEL_VALUE_COMPANION: &str = "companion";

// ---------------------------------------------------------------------------
// External config sources
// ---------------------------------------------------------------------------

/// Namespace holding the credential sources the backend Secret is built from
pub const DEFAULT_SOURCE_NAMESPACE: &str = "kyma-system";
pub const DEFAULT_HANA_DB_SECRET: &str = "companion-hana-db";
pub const DEFAULT_REDIS_SECRET: &str = "companion-redis";
pub const DEFAULT_AI_CORE_SECRET: &str = "companion-ai-core";
pub const DEFAULT_AI_CORE_CONFIG_MAP: &str = "companion-ai-core";

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default HTTP server port for metrics and health probes
pub const DEFAULT_METRICS_PORT: u16 = 8080;

/// Default per-call deadline for Kubernetes API calls (seconds)
pub const DEFAULT_KUBE_API_TIMEOUT_SECS: u64 = 30;

/// Default Fibonacci backoff starting value (seconds)
pub const DEFAULT_BACKOFF_START_SECS: u64 = 5;

/// Default Fibonacci backoff maximum value (seconds)
pub const DEFAULT_BACKOFF_MAX_SECS: u64 = 300;

/// Default maximum number of reconciliations running at the same time
pub const DEFAULT_MAX_CONCURRENT_RECONCILIATIONS: u16 = 10;
