//! Lifecycle registry: the engine facade the edit screens talk to
//!
//! Holds one validated definition per business-object type and exposes
//! the operations the surrounding screens need: the action-button list,
//! the requirement checklist, the confirm gate, and per-field
//! editability.

use crate::definition::{LifecycleDefinition, StatusCode, Transition};
use crate::error::LifecycleError;
use crate::evaluator::{RequirementStatus, TransitionAttempt};
use crate::record::Record;
use std::collections::HashMap;

/// Process-wide, read-only lifecycle configuration
///
/// Built once at startup; safe to share across concurrent evaluations.
#[derive(Clone, Debug, Default)]
pub struct LifecycleRegistry {
    definitions: HashMap<String, LifecycleDefinition>,
}

impl LifecycleRegistry {
    pub fn new() -> Self {
        Self {
            definitions: HashMap::new(),
        }
    }

    /// Register a definition, validating it first
    pub fn register(&mut self, definition: LifecycleDefinition) -> Result<(), LifecycleError> {
        definition.validate()?;
        if self.definitions.contains_key(&definition.object_type) {
            return Err(LifecycleError::Definition(format!(
                "a lifecycle for {} is already registered",
                definition.object_type
            )));
        }
        tracing::debug!(object_type = %definition.object_type, "registering lifecycle");
        self.definitions
            .insert(definition.object_type.clone(), definition);
        Ok(())
    }

    /// Look up the definition for an object type, failing fast on
    /// unregistered types
    pub fn definition(&self, object_type: &str) -> Result<&LifecycleDefinition, LifecycleError> {
        self.definitions
            .get(object_type)
            .ok_or_else(|| LifecycleError::UnknownObjectType(object_type.to_string()))
    }

    /// The action buttons to offer for a record in the given status
    pub fn list_transitions(
        &self,
        object_type: &str,
        status: &str,
    ) -> Result<&[Transition], LifecycleError> {
        self.definition(object_type)?.transitions_for(status)
    }

    /// The requirement checklist for one transition attempt
    pub fn requirement_status(
        &self,
        object_type: &str,
        origin: &str,
        target: &str,
        record: &Record,
    ) -> Result<Vec<RequirementStatus>, LifecycleError> {
        self.definition(object_type)?
            .requirement_checklist(record, origin, target)
    }

    /// Whether the confirm button may be enabled
    pub fn can_confirm(
        &self,
        object_type: &str,
        origin: &str,
        target: &str,
        record: &Record,
    ) -> Result<bool, LifecycleError> {
        Ok(self
            .definition(object_type)?
            .evaluate(record, origin, target)?
            .allowed)
    }

    /// Whether a field may be edited while the record sits in a status
    pub fn is_field_editable(
        &self,
        object_type: &str,
        status: &str,
        field: &str,
    ) -> Result<bool, LifecycleError> {
        self.definition(object_type)?.is_editable(status, field)
    }

    /// Start a transition attempt from a frozen origin
    pub fn begin_attempt(
        &self,
        object_type: &str,
        origin: &str,
        target: &str,
        record: &Record,
    ) -> Result<TransitionAttempt, LifecycleError> {
        let requirements = self.requirement_status(object_type, origin, target, record)?;
        Ok(TransitionAttempt {
            origin: StatusCode::new(origin),
            target: StatusCode::new(target),
            requirements,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
