//! Invoice status lifecycle
//!
//! Invoices differ from the other objects in two ways. Requirements are
//! declared per transition rather than per status, so validating and
//! cancelling the same pending invoice check different field sets. And
//! the server may override a requested VALIDATED with DISCREPANCY when
//! the amounts do not reconcile; DISCREPANCY is declared here so the
//! correction loop back to PENDING exists, but it is never offered as a
//! user action.
//!
//! Invoice edit forms default text fields to the empty string, so this
//! definition uses the strict presence rule: an unedited "" does not
//! satisfy a requirement.

use brokerdesk_lifecycle::{
    LifecycleDefinition, StatusCode, StatusConfig, Transition, UiVariant,
};
use serde::{Deserialize, Serialize};

/// Lifecycle registry key for invoices
pub const OBJECT_TYPE: &str = "invoice";

/// Record field keys, shared with the edit screens
pub mod fields {
    pub const BILLING_PERIOD: &str = "billingPeriod";
    pub const SUBTOTAL: &str = "subtotal";
    pub const TAX_AMOUNT: &str = "taxAmount";
    pub const EXPECTED_AMOUNT: &str = "expectedAmount";
    pub const ACTUAL_AFFILIATE_COUNT: &str = "actualAffiliateCount";
    pub const DUE_DATE: &str = "dueDate";
}

/// Invoice status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    #[default]
    Pending,
    Validated,
    Discrepancy,
    Paid,
    Cancelled,
}

impl InvoiceStatus {
    /// Check if this is a terminal status (invoice is closed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::Cancelled)
    }

    /// The engine-facing status code
    pub fn as_code(&self) -> StatusCode {
        StatusCode::new(match self {
            Self::Pending => "PENDING",
            Self::Validated => "VALIDATED",
            Self::Discrepancy => "DISCREPANCY",
            Self::Paid => "PAID",
            Self::Cancelled => "CANCELLED",
        })
    }

    /// Parse an engine status code back into the typed status
    pub fn from_code(code: &StatusCode) -> Option<Self> {
        match code.as_str() {
            "PENDING" => Some(Self::Pending),
            "VALIDATED" => Some(Self::Validated),
            "DISCREPANCY" => Some(Self::Discrepancy),
            "PAID" => Some(Self::Paid),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

/// The invoice lifecycle definition
pub fn lifecycle() -> LifecycleDefinition {
    LifecycleDefinition::new(OBJECT_TYPE)
        .with_strict_empty_strings()
        .label_field(fields::BILLING_PERIOD, "Billing period")
        .label_field(fields::SUBTOTAL, "Subtotal")
        .label_field(fields::TAX_AMOUNT, "Tax amount")
        .label_field(fields::EXPECTED_AMOUNT, "Expected amount")
        .label_field(fields::ACTUAL_AFFILIATE_COUNT, "Affiliate count")
        .label_field(fields::DUE_DATE, "Due date")
        .with_status(
            StatusConfig::new("PENDING", "Pending")
                .editable(&[
                    fields::BILLING_PERIOD,
                    fields::SUBTOTAL,
                    fields::TAX_AMOUNT,
                    fields::EXPECTED_AMOUNT,
                    fields::ACTUAL_AFFILIATE_COUNT,
                    fields::DUE_DATE,
                ])
                .transition(
                    Transition::new("VALIDATED", "Validate")
                        .with_variant(UiVariant::Success)
                        .with_icon("check-circle"),
                )
                .transition(
                    Transition::new("CANCELLED", "Cancel invoice")
                        .with_variant(UiVariant::Danger)
                        .with_icon("x-circle"),
                )
                .requires(&[fields::BILLING_PERIOD])
                .requires_for(
                    "VALIDATED",
                    &[
                        fields::BILLING_PERIOD,
                        fields::TAX_AMOUNT,
                        fields::ACTUAL_AFFILIATE_COUNT,
                        fields::DUE_DATE,
                    ],
                )
                .requires_for("CANCELLED", &[]),
        )
        .with_status(
            StatusConfig::new("VALIDATED", "Validated")
                .locked()
                .transition(
                    Transition::new("PAID", "Mark as paid")
                        .with_variant(UiVariant::Success)
                        .with_icon("cash"),
                ),
        )
        .with_status(
            StatusConfig::new("DISCREPANCY", "Discrepancy")
                .editable(&[
                    fields::SUBTOTAL,
                    fields::TAX_AMOUNT,
                    fields::EXPECTED_AMOUNT,
                    fields::ACTUAL_AFFILIATE_COUNT,
                ])
                .transition(
                    Transition::new("PENDING", "Reprocess")
                        .with_variant(UiVariant::Primary)
                        .with_icon("arrow-repeat"),
                ),
        )
        .with_status(StatusConfig::new("PAID", "Paid").locked())
        .with_status(StatusConfig::new("CANCELLED", "Cancelled").locked())
}

// ============================================================================
// Tests
// ============================================================================
