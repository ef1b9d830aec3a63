use super::{map_equal, name_and_namespace_equal, owner_references_equal, SemanticEq};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use std::collections::BTreeMap;

impl SemanticEq for Secret {
    fn semantic_eq(&self, other: &Self) -> bool {
        let empty: BTreeMap<String, ByteString> = BTreeMap::new();
        map_equal(self.metadata.labels.as_ref(), other.metadata.labels.as_ref())
            && self.type_ == other.type_
            && owner_references_equal(&self.metadata, &other.metadata)
            && name_and_namespace_equal(&self.metadata, &other.metadata)
            && self.data.as_ref().unwrap_or(&empty) == other.data.as_ref().unwrap_or(&empty)
    }
}
