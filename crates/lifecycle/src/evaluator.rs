//! Transition evaluation: which transitions are offered, which fields are
//! required, and whether a transition is currently allowed
//!
//! Missing requirements are a normal evaluation result surfaced as a
//! checklist, not an error. Evaluating a target the origin status does not
//! declare is a caller bug and fails loudly.

use crate::definition::{FieldName, LifecycleDefinition, StatusCode, Transition};
use crate::error::LifecycleError;
use crate::presence::is_present;
use crate::record::Record;
use serde::{Deserialize, Serialize};

/// Result of evaluating one transition against a record snapshot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub allowed: bool,
    /// Required fields that failed the presence check, in declared order
    pub missing: Vec<FieldName>,
}

/// One line of the requirement checklist shown in a confirmation dialog
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequirementStatus {
    pub field: FieldName,
    pub label: String,
    pub satisfied: bool,
}

/// Ephemeral state for one transition confirmation
///
/// Created when the confirmation opens, discarded when it closes or the
/// submission resolves. The origin is the frozen status the attempt
/// started from, not whatever the record holds now.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionAttempt {
    pub origin: StatusCode,
    pub target: StatusCode,
    pub requirements: Vec<RequirementStatus>,
}

impl TransitionAttempt {
    /// True when every requirement is satisfied and the confirm button
    /// may be enabled
    pub fn satisfied(&self) -> bool {
        self.requirements.iter().all(|r| r.satisfied)
    }

    /// The unmet requirement fields, in checklist order
    pub fn missing(&self) -> Vec<&FieldName> {
        self.requirements
            .iter()
            .filter(|r| !r.satisfied)
            .map(|r| &r.field)
            .collect()
    }
}

impl LifecycleDefinition {
    /// The declared outbound transitions of a status, in declared order
    pub fn transitions_for(&self, status: &str) -> Result<&[Transition], LifecycleError> {
        Ok(&self.status_or_err(status)?.transitions)
    }

    /// The requirement set for one specific transition
    ///
    /// A per-target override wins outright over the status-level default,
    /// even when the override is empty. With neither declared the set is
    /// empty and the transition is unconditional.
    pub fn requirements_for(
        &self,
        origin: &str,
        target: &str,
    ) -> Result<&[FieldName], LifecycleError> {
        let config = self.status_or_err(origin)?;
        if let Some(specific) = config.transition_requirements.get(target) {
            return Ok(specific);
        }
        Ok(&config.requirements)
    }

    /// Fail loudly when the origin status does not declare the target
    pub fn ensure_declared(&self, origin: &str, target: &str) -> Result<(), LifecycleError> {
        let declared = self
            .transitions_for(origin)?
            .iter()
            .any(|t| t.target.as_str() == target);
        if !declared {
            return Err(LifecycleError::InvalidTransition {
                origin: StatusCode::new(origin),
                target: StatusCode::new(target),
            });
        }
        Ok(())
    }

    /// Whether a record field counts as provided under this definition's
    /// presence rule
    pub fn field_present(&self, record: &Record, field: &FieldName) -> bool {
        is_present(
            record.get(field.as_str()),
            self.treat_empty_string_as_absent,
        )
    }

    /// Evaluate one transition against a record snapshot
    ///
    /// The origin is the frozen attempt origin, never a racily-refreshed
    /// current status.
    pub fn evaluate(
        &self,
        record: &Record,
        origin: &str,
        target: &str,
    ) -> Result<Evaluation, LifecycleError> {
        self.ensure_declared(origin, target)?;

        let missing: Vec<FieldName> = self
            .requirements_for(origin, target)?
            .iter()
            .filter(|field| !self.field_present(record, field))
            .cloned()
            .collect();

        Ok(Evaluation {
            allowed: missing.is_empty(),
            missing,
        })
    }

    /// Build the requirement checklist for a confirmation dialog
    pub fn requirement_checklist(
        &self,
        record: &Record,
        origin: &str,
        target: &str,
    ) -> Result<Vec<RequirementStatus>, LifecycleError> {
        self.ensure_declared(origin, target)?;

        Ok(self
            .requirements_for(origin, target)?
            .iter()
            .map(|field| RequirementStatus {
                field: field.clone(),
                label: self.field_label(field).to_string(),
                satisfied: self.field_present(record, field),
            })
            .collect())
    }
}

// ============================================================================
// Tests
// ============================================================================
