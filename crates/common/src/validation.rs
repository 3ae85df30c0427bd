//! Validation helpers and constants shared by the domain crates

use regex::Regex;

lazy_static::lazy_static! {
    /// Reference number validation regex (claim numbers, policy numbers)
    /// Uppercase alphanumeric with hyphens, no leading/trailing hyphens
    pub static ref REFERENCE_REGEX: Regex =
        Regex::new(r"^[A-Z0-9]([A-Z0-9-]*[A-Z0-9])?$").unwrap();

    /// Billing period validation regex (YYYY-MM)
    pub static ref BILLING_PERIOD_REGEX: Regex =
        Regex::new(r"^\d{4}-(0[1-9]|1[0-2])$").unwrap();
}

/// Validate a reference number (claim number, policy number, invoice number)
pub fn validate_reference(reference: &str) -> bool {
    if !REFERENCE_REGEX.is_match(reference) {
        return false;
    }

    // Check for double hyphens
    if reference.contains("--") {
        return false;
    }

    true
}

/// Validate a billing period in YYYY-MM format
pub fn validate_billing_period(period: &str) -> bool {
    period.len() == 7 && BILLING_PERIOD_REGEX.is_match(period)
}
