//! # Object Builders
//!
//! Validated builders for the objects the controller writes. Required fields
//! are checked in `build()`, so an incomplete object is an error instead of a
//! malformed apply.

mod deployment;
mod secret;

pub use deployment::DeploymentBuilder;
pub use secret::SecretBuilder;

use thiserror::Error;

/// A desired object could not be produced
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The owning Companion lacks a name, namespace or uid
    #[error("Companion is missing metadata.{field}")]
    MissingIdentity { field: &'static str },
    /// A builder was asked to build without a required field
    #[error("{kind} is missing required field {field}")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
}

fn require(
    kind: &'static str,
    field: &'static str,
    value: Option<String>,
) -> Result<String, GenerationError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(GenerationError::MissingField { kind, field })
}
