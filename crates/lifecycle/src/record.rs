//! Record snapshots: the runtime view of a business object
//!
//! A `Record` is a flat map of field values plus a status. It is decoupled
//! from the lifecycle definition; the engine looks the definition up by
//! object type. Each evaluation takes an immutable snapshot; the engine
//! never mutates records in place.

use crate::definition::{FieldName, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single field value as the edit surface sees it
///
/// A missing map key means "field not loaded in this view"; `Null` means
/// "explicitly cleared". Both fail the presence check; everything else,
/// including `0`, `false`, and the empty string, was actively set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// An immutable snapshot of one business object instance
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub status: StatusCode,
    pub fields: HashMap<FieldName, FieldValue>,
}

impl Record {
    pub fn new(status: impl Into<StatusCode>) -> Self {
        Self {
            status: status.into(),
            fields: HashMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<FieldName>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<FieldName>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Insert the value, or an explicit `Null` when absent
    ///
    /// Entity snapshots have every field loaded, so a `None` maps to
    /// "explicitly cleared" rather than "not loaded".
    pub fn set_opt<V: Into<FieldValue>>(&mut self, name: impl Into<FieldName>, value: Option<V>) {
        let value = value.map(Into::into).unwrap_or(FieldValue::Null);
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}
