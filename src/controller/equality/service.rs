use super::{name_and_namespace_equal, owner_references_equal, SemanticEq};
use k8s_openapi::api::core::v1::{Service, ServiceSpec};

/// Selector and ports are compared exactly.
impl SemanticEq for Service {
    fn semantic_eq(&self, other: &Self) -> bool {
        if !owner_references_equal(&self.metadata, &other.metadata)
            || !name_and_namespace_equal(&self.metadata, &other.metadata)
        {
            return false;
        }
        let default_spec = ServiceSpec::default();
        let a = self.spec.as_ref().unwrap_or(&default_spec);
        let b = other.spec.as_ref().unwrap_or(&default_spec);
        a.selector == b.selector && a.ports == b.ports
    }
}
