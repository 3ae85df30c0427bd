//! Mock record service implementation
//!
//! In-memory store for testing and local development without external
//! dependencies. Captures every submitted transition and supports
//! per-object-type status-override hooks so server-side rules (such as
//! invoice settlement) can be exercised end to end.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use brokerdesk_lifecycle::StatusCode;

use crate::{RecordError, RecordService, RecordSnapshot, TransitionRequest};

/// Server-side rule deciding the actually-resulting status for a
/// requested transition
pub type StatusOverride =
    dyn Fn(&RecordSnapshot, &StatusCode) -> StatusCode + Send + Sync + 'static;

/// A submission captured by the mock service
#[derive(Debug, Clone)]
pub struct CapturedSubmission {
    pub record_id: Uuid,
    pub request: TransitionRequest,
    pub resulting_status: StatusCode,
}

/// Mock record service for testing
#[derive(Clone, Default)]
pub struct MockRecordService {
    records: Arc<Mutex<HashMap<Uuid, RecordSnapshot>>>,
    submissions: Arc<Mutex<Vec<CapturedSubmission>>>,
    overrides: Arc<Mutex<HashMap<String, Arc<StatusOverride>>>>,
}

impl MockRecordService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a record snapshot
    pub fn insert(&self, snapshot: RecordSnapshot) {
        self.records.lock().unwrap().insert(snapshot.id, snapshot);
    }

    /// Install a server-side status override for an object type
    pub fn set_status_override<F>(&self, object_type: impl Into<String>, rule: F)
    where
        F: Fn(&RecordSnapshot, &StatusCode) -> StatusCode + Send + Sync + 'static,
    {
        self.overrides
            .lock()
            .unwrap()
            .insert(object_type.into(), Arc::new(rule));
    }

    /// All captured submissions, in submission order
    pub fn submissions(&self) -> Vec<CapturedSubmission> {
        self.submissions.lock().unwrap().clone()
    }

    /// Captured submissions for one record
    pub fn submissions_for(&self, record_id: Uuid) -> Vec<CapturedSubmission> {
        self.submissions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.record_id == record_id)
            .cloned()
            .collect()
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    /// Clear all records and captured submissions
    pub fn clear(&self) {
        self.records.lock().unwrap().clear();
        self.submissions.lock().unwrap().clear();
    }
}

#[async_trait::async_trait]
impl RecordService for MockRecordService {
    async fn fetch(&self, id: Uuid) -> Result<RecordSnapshot, RecordError> {
        self.records
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(RecordError::NotFound(id))
    }

    async fn submit_transition(
        &self,
        id: Uuid,
        request: TransitionRequest,
    ) -> Result<RecordSnapshot, RecordError> {
        let mut records = self.records.lock().unwrap();
        let snapshot = records.get_mut(&id).ok_or(RecordError::NotFound(id))?;

        // Merge dirty fields before the override rule runs, so the rule
        // sees the values being submitted
        for (name, value) in &request.fields {
            snapshot.fields.insert(name.clone(), value.clone());
        }

        let resulting_status = {
            let overrides = self.overrides.lock().unwrap();
            match overrides.get(&snapshot.object_type) {
                Some(rule) => rule(snapshot, &request.status),
                None => request.status.clone(),
            }
        };

        if resulting_status != request.status {
            tracing::info!(
                record_id = %id,
                requested = %request.status,
                actual = %resulting_status,
                "mock service overriding requested status"
            );
        }

        snapshot.status = resulting_status.clone();
        snapshot.updated_at = Utc::now();

        let result = snapshot.clone();
        drop(records);

        self.submissions.lock().unwrap().push(CapturedSubmission {
            record_id: id,
            request,
            resulting_status,
        });

        Ok(result)
    }
}
