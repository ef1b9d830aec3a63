//! # Lifecycle
//!
//! The finalizer-gated phases of a Companion. The finalizer is always in
//! place before any owned object is written, so deletion cannot race past
//! cleanup.
//!
//! | phase | deletionTimestamp | finalizer |
//! |---|---|---|
//! | `AwaitingFinalizer` | unset | absent |
//! | `Converging` | unset | present |
//! | `Finalizing` | set | present |
//! | `Finalized` | set | absent |

use crate::constants::FINALIZER_NAME;
use crate::crd::Companion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    AwaitingFinalizer,
    Converging,
    Finalizing,
    Finalized,
}

impl LifecyclePhase {
    #[must_use]
    pub fn classify(companion: &Companion) -> Self {
        let deleting = companion.metadata.deletion_timestamp.is_some();
        match (deleting, has_finalizer(companion)) {
            (false, false) => LifecyclePhase::AwaitingFinalizer,
            (false, true) => LifecyclePhase::Converging,
            (true, true) => LifecyclePhase::Finalizing,
            (true, false) => LifecyclePhase::Finalized,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecyclePhase::AwaitingFinalizer => "awaiting-finalizer",
            LifecyclePhase::Converging => "converging",
            LifecyclePhase::Finalizing => "finalizing",
            LifecyclePhase::Finalized => "finalized",
        }
    }
}

#[must_use]
pub fn has_finalizer(companion: &Companion) -> bool {
    companion
        .metadata
        .finalizers
        .as_ref()
        .is_some_and(|f| f.iter().any(|name| name == FINALIZER_NAME))
}

/// Current finalizers plus ours
#[must_use]
pub fn with_finalizer(companion: &Companion) -> Vec<String> {
    let mut finalizers = companion.metadata.finalizers.clone().unwrap_or_default();
    if !finalizers.iter().any(|name| name == FINALIZER_NAME) {
        finalizers.push(FINALIZER_NAME.to_string());
    }
    finalizers
}

/// Current finalizers minus ours, other controllers' entries untouched
#[must_use]
pub fn without_finalizer(companion: &Companion) -> Vec<String> {
    companion
        .metadata
        .finalizers
        .iter()
        .flatten()
        .filter(|name| name.as_str() != FINALIZER_NAME)
        .cloned()
        .collect()
}
