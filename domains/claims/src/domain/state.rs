//! Claim status lifecycle
//!
//! The claim flow is a reprocessing loop: a submitted claim can bounce
//! between SUBMITTED and PENDING_INFO any number of times before review
//! settles it. Requirements are status-level: every transition out of a
//! status checks the same field set.

use brokerdesk_lifecycle::{
    LifecycleDefinition, StatusCode, StatusConfig, Transition, UiVariant,
};
use serde::{Deserialize, Serialize};

/// Lifecycle registry key for claims
pub const OBJECT_TYPE: &str = "claim";

/// Record field keys, shared with the edit screens
pub mod fields {
    pub const DESCRIPTION: &str = "description";
    pub const AMOUNT: &str = "amount";
    pub const APPROVED_AMOUNT: &str = "approvedAmount";
    pub const POLICY_ID: &str = "policyId";
    pub const INCIDENT_DATE: &str = "incidentDate";
    pub const CLAIM_TYPE: &str = "type";
    pub const SUBMITTED_DATE: &str = "submittedDate";
    pub const REVIEWER_NOTES: &str = "reviewerNotes";
}

/// Fields a claim must carry before it can leave intake
const CORE_REQUIREMENTS: &[&str] = &[
    fields::DESCRIPTION,
    fields::AMOUNT,
    fields::POLICY_ID,
    fields::INCIDENT_DATE,
    fields::CLAIM_TYPE,
    fields::SUBMITTED_DATE,
];

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    #[default]
    Submitted,
    PendingInfo,
    UnderReview,
    Approved,
    Rejected,
}

impl ClaimStatus {
    /// Check if this is a terminal status (claim has been settled)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// The engine-facing status code
    pub fn as_code(&self) -> StatusCode {
        StatusCode::new(match self {
            Self::Submitted => "SUBMITTED",
            Self::PendingInfo => "PENDING_INFO",
            Self::UnderReview => "UNDER_REVIEW",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        })
    }

    /// Parse an engine status code back into the typed status
    pub fn from_code(code: &StatusCode) -> Option<Self> {
        match code.as_str() {
            "SUBMITTED" => Some(Self::Submitted),
            "PENDING_INFO" => Some(Self::PendingInfo),
            "UNDER_REVIEW" => Some(Self::UnderReview),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

/// The claim lifecycle definition
pub fn lifecycle() -> LifecycleDefinition {
    LifecycleDefinition::new(OBJECT_TYPE)
        .label_field(fields::DESCRIPTION, "Description")
        .label_field(fields::AMOUNT, "Claimed amount")
        .label_field(fields::APPROVED_AMOUNT, "Approved amount")
        .label_field(fields::POLICY_ID, "Policy")
        .label_field(fields::INCIDENT_DATE, "Incident date")
        .label_field(fields::CLAIM_TYPE, "Claim type")
        .label_field(fields::SUBMITTED_DATE, "Submission date")
        .label_field(fields::REVIEWER_NOTES, "Reviewer notes")
        .with_status(
            StatusConfig::new("SUBMITTED", "Submitted")
                .editable(&[
                    fields::DESCRIPTION,
                    fields::AMOUNT,
                    fields::CLAIM_TYPE,
                    fields::INCIDENT_DATE,
                    fields::POLICY_ID,
                    fields::SUBMITTED_DATE,
                ])
                .transition(
                    Transition::new("UNDER_REVIEW", "Send to review")
                        .with_variant(UiVariant::Primary)
                        .with_icon("clipboard-check"),
                )
                .transition(
                    Transition::new("PENDING_INFO", "Request information")
                        .with_variant(UiVariant::Warning)
                        .with_icon("question-circle"),
                )
                .requires(CORE_REQUIREMENTS),
        )
        .with_status(
            StatusConfig::new("PENDING_INFO", "Pending information")
                .editable(&[
                    fields::DESCRIPTION,
                    fields::AMOUNT,
                    fields::CLAIM_TYPE,
                    fields::INCIDENT_DATE,
                ])
                .transition(
                    Transition::new("SUBMITTED", "Resubmit")
                        .with_variant(UiVariant::Primary)
                        .with_icon("arrow-repeat"),
                )
                .requires(CORE_REQUIREMENTS),
        )
        .with_status(
            StatusConfig::new("UNDER_REVIEW", "Under review")
                .editable(&[fields::APPROVED_AMOUNT, fields::REVIEWER_NOTES])
                .transition(
                    Transition::new("APPROVED", "Approve")
                        .with_variant(UiVariant::Success)
                        .with_icon("check-circle"),
                )
                .transition(
                    Transition::new("REJECTED", "Reject")
                        .with_variant(UiVariant::Danger)
                        .with_icon("x-circle"),
                )
                .transition(
                    Transition::new("PENDING_INFO", "Request information")
                        .with_variant(UiVariant::Warning)
                        .with_icon("question-circle"),
                )
                .requires(&[fields::REVIEWER_NOTES]),
        )
        .with_status(StatusConfig::new("APPROVED", "Approved").locked())
        .with_status(StatusConfig::new("REJECTED", "Rejected").locked())
}

// ============================================================================
// Tests
// ============================================================================
