//! Policy status lifecycle
//!
//! The policy flow branches at the end of life: an active policy either
//! runs out (EXPIRED) or is terminated early (CANCELLED). Both are
//! terminal. Leaving ACTIVE is unconditional; the requirements all sit on
//! the DRAFT activation step.

use brokerdesk_lifecycle::{
    LifecycleDefinition, StatusCode, StatusConfig, Transition, UiVariant,
};
use serde::{Deserialize, Serialize};

/// Lifecycle registry key for policies
pub const OBJECT_TYPE: &str = "policy";

/// Record field keys, shared with the edit screens
pub mod fields {
    pub const POLICY_NUMBER: &str = "policyNumber";
    pub const CLIENT_ID: &str = "clientId";
    pub const COVERAGE_TYPE: &str = "coverageType";
    pub const START_DATE: &str = "startDate";
    pub const END_DATE: &str = "endDate";
    pub const PREMIUM: &str = "premium";
}

/// Policy status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyStatus {
    #[default]
    Draft,
    Active,
    Expired,
    Cancelled,
}

impl PolicyStatus {
    /// Check if this is a terminal status (policy has ended)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Expired | Self::Cancelled)
    }

    /// The engine-facing status code
    pub fn as_code(&self) -> StatusCode {
        StatusCode::new(match self {
            Self::Draft => "DRAFT",
            Self::Active => "ACTIVE",
            Self::Expired => "EXPIRED",
            Self::Cancelled => "CANCELLED",
        })
    }

    /// Parse an engine status code back into the typed status
    pub fn from_code(code: &StatusCode) -> Option<Self> {
        match code.as_str() {
            "DRAFT" => Some(Self::Draft),
            "ACTIVE" => Some(Self::Active),
            "EXPIRED" => Some(Self::Expired),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

/// The policy lifecycle definition
pub fn lifecycle() -> LifecycleDefinition {
    LifecycleDefinition::new(OBJECT_TYPE)
        .label_field(fields::POLICY_NUMBER, "Policy number")
        .label_field(fields::CLIENT_ID, "Client")
        .label_field(fields::COVERAGE_TYPE, "Coverage type")
        .label_field(fields::START_DATE, "Start date")
        .label_field(fields::END_DATE, "End date")
        .label_field(fields::PREMIUM, "Premium")
        .with_status(
            StatusConfig::new("DRAFT", "Draft")
                .editable(&[
                    fields::POLICY_NUMBER,
                    fields::CLIENT_ID,
                    fields::COVERAGE_TYPE,
                    fields::START_DATE,
                    fields::END_DATE,
                    fields::PREMIUM,
                ])
                .transition(
                    Transition::new("ACTIVE", "Activate")
                        .with_variant(UiVariant::Success)
                        .with_icon("play-circle"),
                )
                .requires(&[
                    fields::POLICY_NUMBER,
                    fields::CLIENT_ID,
                    fields::START_DATE,
                    fields::END_DATE,
                    fields::PREMIUM,
                ]),
        )
        .with_status(
            StatusConfig::new("ACTIVE", "Active")
                .editable(&[fields::END_DATE])
                .transition(
                    Transition::new("EXPIRED", "Mark expired")
                        .with_variant(UiVariant::Secondary)
                        .with_icon("clock"),
                )
                .transition(
                    Transition::new("CANCELLED", "Cancel policy")
                        .with_variant(UiVariant::Danger)
                        .with_icon("x-circle"),
                ),
        )
        .with_status(StatusConfig::new("EXPIRED", "Expired").locked())
        .with_status(StatusConfig::new("CANCELLED", "Cancelled").locked())
}

// ============================================================================
// Tests
// ============================================================================
