//! Lifecycle engine error types
//!
//! Shared across all domain crates that instantiate the engine.

use crate::definition::StatusCode;
use thiserror::Error;

/// Errors that can occur during lifecycle evaluation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LifecycleError {
    /// The caller asked to evaluate a target the current status does not
    /// declare. This is a programming error in the calling layer: the UI
    /// must only offer targets drawn from the declared transition list.
    #[error("Invalid transition: cannot transition from {origin} to {target}")]
    InvalidTransition {
        origin: StatusCode,
        target: StatusCode,
    },

    #[error("Unknown status: {status} is not declared in the {object_type} lifecycle")]
    UnknownStatus {
        object_type: String,
        status: StatusCode,
    },

    #[error("Unknown object type: no lifecycle registered for {0}")]
    UnknownObjectType(String),

    #[error("Duplicate status: {0} is already declared")]
    DuplicateStatus(StatusCode),

    #[error("Invalid lifecycle definition: {0}")]
    Definition(String),
}
