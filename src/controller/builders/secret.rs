//! # Secret Builder

use super::{require, GenerationError};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, OwnerReference};
use k8s_openapi::ByteString;
use std::collections::BTreeMap;

const KIND: &str = "Secret";

/// Builder for an `Opaque` Secret
#[derive(Debug, Clone, Default)]
pub struct SecretBuilder {
    name: Option<String>,
    namespace: Option<String>,
    labels: Option<BTreeMap<String, String>>,
    owner_references: Vec<OwnerReference>,
    data: BTreeMap<String, ByteString>,
}

impl SecretBuilder {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            namespace: Some(namespace.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn labels(mut self, labels: BTreeMap<String, String>) -> Self {
        self.labels = Some(labels);
        self
    }

    #[must_use]
    pub fn owner_reference(mut self, owner: OwnerReference) -> Self {
        self.owner_references.push(owner);
        self
    }

    /// Set one data key; a later call with the same key wins
    #[must_use]
    pub fn data(mut self, key: impl Into<String>, value: Vec<u8>) -> Self {
        self.data.insert(key.into(), ByteString(value));
        self
    }

    /// Build the Secret
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::MissingField`] when name or namespace is empty.
    pub fn build(self) -> Result<Secret, GenerationError> {
        let name = require(KIND, "metadata.name", self.name)?;
        let namespace = require(KIND, "metadata.namespace", self.namespace)?;

        Ok(Secret {
            metadata: ObjectMeta {
                name: Some(name),
                namespace: Some(namespace),
                labels: self.labels,
                owner_references: if self.owner_references.is_empty() {
                    None
                } else {
                    Some(self.owner_references)
                },
                ..Default::default()
            },
            data: Some(self.data),
            type_: Some("Opaque".to_string()),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_opaque_secret() {
        let secret = SecretBuilder::new("creds", "ns1")
            .data("a", b"1".to_vec())
            .data("a", b"2".to_vec())
            .build()
            .unwrap();
        assert_eq!(secret.type_.as_deref(), Some("Opaque"));
        let data = secret.data.unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data.get("a"), Some(&ByteString(b"2".to_vec())));
    }

    #[test]
    fn test_build_requires_name() {
        let err = SecretBuilder::new("", "ns1").build().unwrap_err();
        assert_eq!(
            err,
            GenerationError::MissingField {
                kind: "Secret",
                field: "metadata.name"
            }
        );
    }
}
