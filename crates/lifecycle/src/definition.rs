//! Lifecycle definitions: the per-object-type configuration the engine runs on
//!
//! A `LifecycleDefinition` is a directed graph of statuses and declared
//! transitions, plus per-status editability and field requirements.
//! Definitions are immutable once validated and safe to share across
//! arbitrarily many concurrent evaluations. They are serializable so a
//! single definition can be shared across process boundaries instead of
//! being hand-mirrored.

use crate::error::LifecycleError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};

// ── Identifiers ──────────────────────────────────────────────────────

/// A status code such as `SUBMITTED` or `UNDER_REVIEW`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusCode(pub String);

impl StatusCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for StatusCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StatusCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

/// A record field name, keyed consistently with the record snapshots
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldName(pub String);

impl FieldName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for FieldName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

// ── Transitions ──────────────────────────────────────────────────────

/// Visual treatment of a transition action button
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiVariant {
    Primary,
    Secondary,
    Success,
    Danger,
    Warning,
}

/// A declared, directed edge from one status to another
///
/// Carries descriptive metadata only; whether the transition is currently
/// allowed is decided by requirement evaluation, not by the edge itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub target: StatusCode,
    pub label: String,
    pub ui_variant: UiVariant,
    pub icon: String,
}

impl Transition {
    pub fn new(target: impl Into<StatusCode>, label: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            label: label.into(),
            ui_variant: UiVariant::Secondary,
            icon: String::new(),
        }
    }

    pub fn with_variant(mut self, variant: UiVariant) -> Self {
        self.ui_variant = variant;
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}

impl From<&str> for Transition {
    fn from(target: &str) -> Self {
        Transition::new(target, target)
    }
}

// ── Field access ─────────────────────────────────────────────────────

/// Which fields may be edited while a record sits in a given status
///
/// `Locked` is the sentinel for "all fields locked"; an empty `Fields`
/// list is equivalent. Terminal statuses must be fully locked.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldAccess {
    Locked,
    Fields(Vec<FieldName>),
}

impl FieldAccess {
    /// Build an editable field list from string names
    pub fn fields(names: &[&str]) -> Self {
        Self::Fields(names.iter().map(|n| FieldName::new(*n)).collect())
    }

    /// True when no field at all may be edited
    pub fn is_locked(&self) -> bool {
        match self {
            Self::Locked => true,
            Self::Fields(fields) => fields.is_empty(),
        }
    }

    /// Whether a single field may be edited
    ///
    /// The locked sentinel short-circuits before any membership test.
    pub fn allows(&self, field: &str) -> bool {
        if self.is_locked() {
            return false;
        }
        match self {
            Self::Locked => false,
            Self::Fields(fields) => fields.iter().any(|f| f.as_str() == field),
        }
    }
}

// ── Status configuration ─────────────────────────────────────────────

/// Per-status configuration: label, editability, outbound transitions,
/// and field requirements
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusConfig {
    pub code: StatusCode,
    pub label: String,
    pub editable: FieldAccess,
    /// Declared order is significant: it drives button layout and is
    /// never re-sorted.
    pub transitions: Vec<Transition>,
    /// Status-level requirement default, in declared order
    pub requirements: Vec<FieldName>,
    /// Per-target requirement override; an entry here wins outright over
    /// the status-level default, even when empty
    pub transition_requirements: HashMap<StatusCode, Vec<FieldName>>,
}

impl StatusConfig {
    pub fn new(code: impl Into<StatusCode>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            editable: FieldAccess::Locked,
            transitions: Vec::new(),
            requirements: Vec::new(),
            transition_requirements: HashMap::new(),
        }
    }

    pub fn editable(mut self, names: &[&str]) -> Self {
        self.editable = FieldAccess::fields(names);
        self
    }

    pub fn locked(mut self) -> Self {
        self.editable = FieldAccess::Locked;
        self
    }

    pub fn transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    pub fn requires(mut self, names: &[&str]) -> Self {
        self.requirements = names.iter().map(|n| FieldName::new(*n)).collect();
        self
    }

    pub fn requires_for(mut self, target: impl Into<StatusCode>, names: &[&str]) -> Self {
        self.transition_requirements.insert(
            target.into(),
            names.iter().map(|n| FieldName::new(*n)).collect(),
        );
        self
    }

    /// A status with no outbound transitions is terminal
    pub fn is_terminal(&self) -> bool {
        self.transitions.is_empty()
    }
}

// ── Lifecycle definition ─────────────────────────────────────────────

/// The full lifecycle configuration for one business-object type
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LifecycleDefinition {
    /// Registry key ("claim", "policy", "invoice")
    pub object_type: String,
    /// Presence-rule flag: when set, the empty string fails the presence
    /// check in addition to null/missing
    pub treat_empty_string_as_absent: bool,
    pub statuses: Vec<StatusConfig>,
    /// Display labels for requirement checklists; falls back to the
    /// field name when absent
    pub field_labels: HashMap<FieldName, String>,
}

impl LifecycleDefinition {
    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            treat_empty_string_as_absent: false,
            statuses: Vec::new(),
            field_labels: HashMap::new(),
        }
    }

    pub fn with_strict_empty_strings(mut self) -> Self {
        self.treat_empty_string_as_absent = true;
        self
    }

    pub fn label_field(mut self, field: impl Into<FieldName>, label: impl Into<String>) -> Self {
        self.field_labels.insert(field.into(), label.into());
        self
    }

    /// Add a status to the lifecycle graph
    ///
    /// Duplicate codes are caught by [`LifecycleDefinition::validate`],
    /// which runs on registration.
    pub fn with_status(mut self, status: StatusConfig) -> Self {
        self.statuses.push(status);
        self
    }

    /// Get a status configuration by code
    pub fn status(&self, code: &str) -> Option<&StatusConfig> {
        self.statuses.iter().find(|s| s.code.as_str() == code)
    }

    /// Get a status configuration by code, failing fast on undeclared codes
    pub fn status_or_err(&self, code: &str) -> Result<&StatusConfig, LifecycleError> {
        self.status(code).ok_or_else(|| LifecycleError::UnknownStatus {
            object_type: self.object_type.clone(),
            status: StatusCode::new(code),
        })
    }

    /// Display label for a requirement field, falling back to the raw name
    pub fn field_label<'a>(&'a self, field: &'a FieldName) -> &'a str {
        self.field_labels
            .get(field)
            .map(String::as_str)
            .unwrap_or_else(|| field.as_str())
    }

    /// Whether a status is terminal (no outbound transitions)
    pub fn is_terminal(&self, code: &str) -> Result<bool, LifecycleError> {
        Ok(self.status_or_err(code)?.is_terminal())
    }

    /// Whether a field may be edited while the record sits in a status
    ///
    /// Pure capability query; enforcement belongs to the update
    /// collaborator, not to this engine.
    pub fn is_editable(&self, status: &str, field: &str) -> Result<bool, LifecycleError> {
        Ok(self.status_or_err(status)?.editable.allows(field))
    }

    /// Validate the definition for structural correctness
    ///
    /// Checks: at least one status, unique codes, every transition target
    /// and every transition-requirement key declared, and terminal
    /// statuses fully locked. Cycles and branches are legal; the graph is
    /// not assumed to be a DAG.
    pub fn validate(&self) -> Result<(), LifecycleError> {
        if self.statuses.is_empty() {
            return Err(LifecycleError::Definition(format!(
                "{} lifecycle must declare at least one status",
                self.object_type
            )));
        }

        let mut seen = HashSet::new();
        for status in &self.statuses {
            if !seen.insert(&status.code) {
                return Err(LifecycleError::DuplicateStatus(status.code.clone()));
            }
        }

        let declared: HashSet<&str> = self.statuses.iter().map(|s| s.code.as_str()).collect();
        for status in &self.statuses {
            for transition in &status.transitions {
                if !declared.contains(transition.target.as_str()) {
                    return Err(LifecycleError::Definition(format!(
                        "{}: transition {} -> {} targets an undeclared status",
                        self.object_type, status.code, transition.target
                    )));
                }
            }
            for target in status.transition_requirements.keys() {
                if !declared.contains(target.as_str()) {
                    return Err(LifecycleError::Definition(format!(
                        "{}: transition requirements for {} -> {} reference an undeclared status",
                        self.object_type, status.code, target
                    )));
                }
            }
            if status.is_terminal() && !status.editable.is_locked() {
                return Err(LifecycleError::Definition(format!(
                    "{}: terminal status {} must lock all fields",
                    self.object_type, status.code
                )));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
