//! Invoice settlement rule
//!
//! The server, not the edit screen, decides whether a validated invoice
//! actually reconciles: when the expected amount does not match subtotal
//! plus tax, a requested VALIDATED becomes DISCREPANCY. The rule lives
//! here as the single authoritative copy; the mock record service
//! installs it as its status override, and callers detect the override by
//! reconciling the returned status.

use std::collections::HashMap;

use brokerdesk_lifecycle::{FieldName, FieldValue, StatusCode};

use crate::domain::state::{fields, InvoiceStatus};

/// Tolerance when comparing amounts, half a cent
const AMOUNT_EPSILON: f64 = 0.005;

/// Whether the expected amount matches subtotal plus tax
///
/// Missing amounts never reconcile; an invoice without figures cannot be
/// settled as validated.
pub fn amounts_reconcile(record_fields: &HashMap<FieldName, FieldValue>) -> bool {
    let expected = number(record_fields, fields::EXPECTED_AMOUNT);
    let subtotal = number(record_fields, fields::SUBTOTAL);
    let tax = number(record_fields, fields::TAX_AMOUNT);

    match (expected, subtotal, tax) {
        (Some(expected), Some(subtotal), Some(tax)) => {
            (expected - (subtotal + tax)).abs() < AMOUNT_EPSILON
        }
        _ => false,
    }
}

/// The actually-resulting status for a requested invoice transition
pub fn resulting_status(
    record_fields: &HashMap<FieldName, FieldValue>,
    requested: &StatusCode,
) -> StatusCode {
    if requested == &InvoiceStatus::Validated.as_code() && !amounts_reconcile(record_fields) {
        tracing::debug!("amounts do not reconcile, settling as discrepancy");
        return InvoiceStatus::Discrepancy.as_code();
    }
    requested.clone()
}

fn number(record_fields: &HashMap<FieldName, FieldValue>, key: &str) -> Option<f64> {
    record_fields.get(key).and_then(FieldValue::as_number)
}
