//! # Companion Status
//!
//! Status types for the Companion resource.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall state of a Companion resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub enum CompanionState {
    /// All managed resources are deployed and the backend is ready
    Ready,
    /// Managed resources are being created or updated
    Processing,
    /// User input misconfiguration
    Warning,
    /// Reconciliation failed
    Error,
    /// Managed resources are being deleted
    Deleting,
}

impl CompanionState {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanionState::Ready => "Ready",
            CompanionState::Processing => "Processing",
            CompanionState::Warning => "Warning",
            CompanionState::Error => "Error",
            CompanionState::Deleting => "Deleting",
        }
    }
}

impl fmt::Display for CompanionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of the Companion resource
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanionStatus {
    /// Overall state: Ready, Processing, Warning, Error or Deleting
    #[serde(default)]
    pub state: Option<CompanionState>,
}
