//! # Semantic Equality
//!
//! Decides whether an observed object already matches the desired one, looking
//! only at the fields the reconciler sets. Server-populated fields (status,
//! resourceVersion, defaulted spec fields) never cause a write.
//!
//! - `deployment`: workload comparison, including containers and probes
//! - `secret`: labels, type, owners and data
//! - `service`: selector and ports
//!
//! Comparisons are dispatched over [`ManagedObject`]; two objects of different
//! kinds are never equal.

mod deployment;
mod secret;
mod service;

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Secret, Service};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;
use std::fmt;

/// Equality restricted to reconciliation-relevant fields
pub trait SemanticEq {
    fn semantic_eq(&self, other: &Self) -> bool;
}

/// Kind of an object the controller manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagedKind {
    Deployment,
    Secret,
    Service,
}

impl ManagedKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ManagedKind::Deployment => "Deployment",
            ManagedKind::Secret => "Secret",
            ManagedKind::Service => "Service",
        }
    }
}

impl fmt::Display for ManagedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An object the controller manages, tagged by kind
#[derive(Debug, Clone, PartialEq)]
pub enum ManagedObject {
    Deployment(Deployment),
    Secret(Secret),
    Service(Service),
}

impl ManagedObject {
    #[must_use]
    pub fn kind(&self) -> ManagedKind {
        match self {
            ManagedObject::Deployment(_) => ManagedKind::Deployment,
            ManagedObject::Secret(_) => ManagedKind::Secret,
            ManagedObject::Service(_) => ManagedKind::Service,
        }
    }

    #[must_use]
    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            ManagedObject::Deployment(d) => &d.metadata,
            ManagedObject::Secret(s) => &s.metadata,
            ManagedObject::Service(s) => &s.metadata,
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.metadata().name.as_deref()
    }

    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.metadata().namespace.as_deref()
    }
}

impl From<Deployment> for ManagedObject {
    fn from(value: Deployment) -> Self {
        ManagedObject::Deployment(value)
    }
}

impl From<Secret> for ManagedObject {
    fn from(value: Secret) -> Self {
        ManagedObject::Secret(value)
    }
}

impl From<Service> for ManagedObject {
    fn from(value: Service) -> Self {
        ManagedObject::Service(value)
    }
}

impl SemanticEq for ManagedObject {
    fn semantic_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ManagedObject::Deployment(a), ManagedObject::Deployment(b)) => a.semantic_eq(b),
            (ManagedObject::Secret(a), ManagedObject::Secret(b)) => a.semantic_eq(b),
            (ManagedObject::Service(a), ManagedObject::Service(b)) => a.semantic_eq(b),
            _ => false,
        }
    }
}

/// Compare two objects of possibly different kinds
#[must_use]
pub fn semantic_equal(a: &ManagedObject, b: &ManagedObject) -> bool {
    a.semantic_eq(b)
}

fn name_and_namespace_equal(a: &ObjectMeta, b: &ObjectMeta) -> bool {
    a.name == b.name && a.namespace == b.namespace
}

/// Owner references as a set: same length, every element of `a` present in `b`
fn owner_references_equal(a: &ObjectMeta, b: &ObjectMeta) -> bool {
    let a = slice(&a.owner_references);
    let b = slice(&b.owner_references);
    a.len() == b.len() && a.iter().all(|or| b.contains(or))
}

/// Maps where absent and empty are the same
fn map_equal(a: Option<&BTreeMap<String, String>>, b: Option<&BTreeMap<String, String>>) -> bool {
    let empty = BTreeMap::new();
    a.unwrap_or(&empty) == b.unwrap_or(&empty)
}

fn slice<T>(v: &Option<Vec<T>>) -> &[T] {
    v.as_deref().unwrap_or(&[])
}
