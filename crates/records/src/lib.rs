//! Brokerdesk record collaborator boundary
//!
//! The lifecycle engine never talks to the network. Fetching a record and
//! submitting a confirmed transition are the responsibility of an update
//! collaborator behind the [`RecordService`] trait. The collaborator
//! always returns the authoritative resulting record, including its
//! actual status, independent of what was requested; callers reconcile
//! the returned status against the requested target.
//!
//! The in-memory [`mock::MockRecordService`] backs tests and local
//! development.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use brokerdesk_lifecycle::{FieldName, FieldValue, Record, StatusCode};

pub mod mock;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Record not found: {0}")]
    NotFound(Uuid),

    #[error("Update rejected: {0}")]
    Rejected(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// The authoritative server-side view of one business object instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSnapshot {
    pub id: Uuid,
    /// Lifecycle registry key ("claim", "policy", "invoice")
    pub object_type: String,
    pub status: StatusCode,
    pub fields: HashMap<FieldName, FieldValue>,
    pub updated_at: DateTime<Utc>,
}

impl RecordSnapshot {
    pub fn new(id: Uuid, object_type: impl Into<String>, status: impl Into<StatusCode>) -> Self {
        Self {
            id,
            object_type: object_type.into(),
            status: status.into(),
            fields: HashMap::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn with_field(mut self, name: impl Into<FieldName>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// The evaluation view of this snapshot
    pub fn record(&self) -> Record {
        Record {
            status: self.status.clone(),
            fields: self.fields.clone(),
        }
    }
}

/// A confirmed transition submission: the target status plus any dirty
/// fields from the edit form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub status: StatusCode,
    pub fields: HashMap<FieldName, FieldValue>,
}

impl TransitionRequest {
    pub fn to(status: impl Into<StatusCode>) -> Self {
        Self {
            status: status.into(),
            fields: HashMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<FieldName>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

/// Record fetch/update collaborator
///
/// One transition request per record per dialog may be in flight at a
/// time; the calling layer disables the dialog's close action until the
/// response resolves.
#[async_trait::async_trait]
pub trait RecordService: Send + Sync {
    /// Fetch the current snapshot of a record
    async fn fetch(&self, id: Uuid) -> Result<RecordSnapshot, RecordError>;

    /// Submit a confirmed transition and return the authoritative
    /// resulting snapshot
    ///
    /// The returned status may differ from the requested one when
    /// server-side rules override the target; callers must read it back
    /// rather than assume the request succeeded as asked.
    async fn submit_transition(
        &self,
        id: Uuid,
        request: TransitionRequest,
    ) -> Result<RecordSnapshot, RecordError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_record_view() {
        let snapshot = RecordSnapshot::new(Uuid::new_v4(), "claim", "SUBMITTED")
            .with_field("description", "hail damage")
            .with_field("amount", 940.0);

        let record = snapshot.record();
        assert_eq!(record.status, StatusCode::new("SUBMITTED"));
        assert_eq!(record.get("description"), Some(&FieldValue::from("hail damage")));
        assert_eq!(record.get("amount"), Some(&FieldValue::Number(940.0)));
    }

    #[test]
    fn test_transition_request_builder() {
        let request = TransitionRequest::to("UNDER_REVIEW").with_field("reviewerNotes", "ok");
        assert_eq!(request.status, StatusCode::new("UNDER_REVIEW"));
        assert_eq!(request.fields.len(), 1);
    }
}
