//! Origin-freezing session for transition confirmations
//!
//! A confirmation dialog shows a requirements checklist computed from the
//! record's status at the moment the dialog opened. If a background
//! refetch changes the status while the dialog is open, re-evaluating
//! against the new status would swap the checklist mid-flow. The session
//! captures the origin once, on the closed-to-open edge, and serves the
//! frozen value until the dialog closes.

use crate::definition::StatusCode;

#[derive(Clone, Debug, PartialEq)]
enum SessionState {
    Idle,
    Frozen(StatusCode),
}

/// Two-state, edge-triggered origin capture
///
/// Explicit state rather than a first-render heuristic, so a remount
/// while the dialog is open cannot re-capture a stale status.
#[derive(Clone, Debug, PartialEq)]
pub struct OriginSession {
    state: SessionState,
}

impl OriginSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    /// Feed the current dialog visibility and record status into the
    /// session
    ///
    /// Capture happens only on the closed-to-open edge. While open,
    /// subsequent status changes are ignored and the frozen origin is
    /// returned. Closing releases the freeze; the next open re-captures.
    pub fn observe(&mut self, dialog_open: bool, current_status: &StatusCode) -> Option<&StatusCode> {
        if dialog_open {
            if self.state == SessionState::Idle {
                self.state = SessionState::Frozen(current_status.clone());
            }
        } else {
            self.state = SessionState::Idle;
        }

        match &self.state {
            SessionState::Frozen(origin) => Some(origin),
            SessionState::Idle => None,
        }
    }

    /// The frozen origin, if a confirmation is open
    pub fn origin(&self) -> Option<&StatusCode> {
        match &self.state {
            SessionState::Frozen(origin) => Some(origin),
            SessionState::Idle => None,
        }
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self.state, SessionState::Frozen(_))
    }

    /// Discard the frozen origin without waiting for a close observation
    pub fn release(&mut self) {
        self.state = SessionState::Idle;
    }
}

impl Default for OriginSession {
    fn default() -> Self {
        Self::new()
    }
}
