//! Post-transition status reconciliation
//!
//! The update collaborator always returns the authoritative resulting
//! record. Some object types let the server override the requested target
//! from computed business rules, so the caller must compare the returned
//! status against the requested one and surface an override distinctly
//! from a transition that succeeded as asked.

use crate::definition::StatusCode;
use serde::{Deserialize, Serialize};

/// The caller-visible outcome of a submitted transition
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TransitionOutcome {
    /// The server applied the requested target status
    AsRequested { status: StatusCode },
    /// The server computed a different resulting status
    Overridden {
        requested: StatusCode,
        actual: StatusCode,
    },
}

impl TransitionOutcome {
    /// Compare the requested target against the authoritative status
    /// returned by the update collaborator
    pub fn reconcile(requested: &StatusCode, actual: &StatusCode) -> Self {
        if requested == actual {
            Self::AsRequested {
                status: actual.clone(),
            }
        } else {
            tracing::warn!(
                requested = %requested,
                actual = %actual,
                "transition overridden by server-side rules"
            );
            Self::Overridden {
                requested: requested.clone(),
                actual: actual.clone(),
            }
        }
    }

    /// The authoritative resulting status
    pub fn status(&self) -> &StatusCode {
        match self {
            Self::AsRequested { status } => status,
            Self::Overridden { actual, .. } => actual,
        }
    }

    pub fn was_overridden(&self) -> bool {
        matches!(self, Self::Overridden { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconcile_as_requested() {
        let outcome = TransitionOutcome::reconcile(
            &StatusCode::new("VALIDATED"),
            &StatusCode::new("VALIDATED"),
        );
        assert!(!outcome.was_overridden());
        assert_eq!(outcome.status(), &StatusCode::new("VALIDATED"));
    }

    #[test]
    fn test_reconcile_override_detected() {
        let outcome = TransitionOutcome::reconcile(
            &StatusCode::new("VALIDATED"),
            &StatusCode::new("DISCREPANCY"),
        );
        assert!(outcome.was_overridden());
        assert_eq!(outcome.status(), &StatusCode::new("DISCREPANCY"));
    }

    #[test]
    fn test_override_distinguishable_from_direct_request() {
        // Both end in DISCREPANCY, but only one was overridden
        let overridden = TransitionOutcome::reconcile(
            &StatusCode::new("VALIDATED"),
            &StatusCode::new("DISCREPANCY"),
        );
        let direct = TransitionOutcome::reconcile(
            &StatusCode::new("DISCREPANCY"),
            &StatusCode::new("DISCREPANCY"),
        );

        assert_eq!(overridden.status(), direct.status());
        assert_ne!(overridden, direct);
        assert!(overridden.was_overridden());
        assert!(!direct.was_overridden());
    }
}
