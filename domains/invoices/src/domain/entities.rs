//! Invoice domain entities for Brokerdesk

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

use brokerdesk_common::{validate_billing_period, validate_reference, Error, Result};
use brokerdesk_lifecycle::{FieldName, FieldValue, LifecycleDefinition, Record};

use crate::domain::state::{fields, InvoiceStatus};

/// Invoice entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub invoice_number: String,
    pub client_id: Uuid,
    pub billing_period: Option<String>,
    pub subtotal: Option<Decimal>,
    pub tax_amount: Option<Decimal>,
    pub expected_amount: Option<Decimal>,
    pub actual_affiliate_count: Option<i32>,
    pub due_date: Option<NaiveDate>,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating an invoice
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInvoice {
    #[validate(length(min = 1, max = 64))]
    pub invoice_number: String,
    pub client_id: Uuid,
    pub billing_period: Option<String>,
    pub subtotal: Option<Decimal>,
    pub tax_amount: Option<Decimal>,
    pub expected_amount: Option<Decimal>,
    #[validate(range(min = 0))]
    pub actual_affiliate_count: Option<i32>,
    pub due_date: Option<NaiveDate>,
}

impl Invoice {
    /// Create a new pending invoice with validation
    pub fn new(input: CreateInvoice) -> Result<Self> {
        input
            .validate()
            .map_err(|e| Error::Validation(format!("Validation failed: {}", e)))?;

        if !validate_reference(&input.invoice_number) {
            return Err(Error::Validation(
                "Invoice number must be uppercase alphanumeric with hyphens".to_string(),
            ));
        }

        if let Some(period) = &input.billing_period {
            if !validate_billing_period(period) {
                return Err(Error::Validation(
                    "Billing period must be YYYY-MM format".to_string(),
                ));
            }
        }

        for (label, amount) in [
            ("Subtotal", input.subtotal),
            ("Tax amount", input.tax_amount),
            ("Expected amount", input.expected_amount),
        ] {
            if let Some(amount) = amount {
                if amount < Decimal::ZERO {
                    return Err(Error::Validation(format!("{} cannot be negative", label)));
                }
            }
        }

        let now = Utc::now();
        Ok(Invoice {
            id: Uuid::new_v4(),
            invoice_number: input.invoice_number,
            client_id: input.client_id,
            billing_period: input.billing_period,
            subtotal: input.subtotal,
            tax_amount: input.tax_amount,
            expected_amount: input.expected_amount,
            actual_affiliate_count: input.actual_affiliate_count,
            due_date: input.due_date,
            status: InvoiceStatus::default(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Check if the invoice is closed
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Subtotal plus tax, when both figures are present
    pub fn computed_total(&self) -> Option<Decimal> {
        match (self.subtotal, self.tax_amount) {
            (Some(subtotal), Some(tax)) => Some(subtotal + tax),
            _ => None,
        }
    }

    /// Flat field snapshot for requirement evaluation
    ///
    /// Text fields mirror the edit form defaults: a cleared value is an
    /// empty string rather than a null, which is why this lifecycle runs
    /// the strict presence rule.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new(self.status.as_code());
        record.set(
            fields::BILLING_PERIOD,
            self.billing_period.clone().unwrap_or_default(),
        );
        record.set_opt(fields::SUBTOTAL, self.subtotal.map(money));
        record.set_opt(fields::TAX_AMOUNT, self.tax_amount.map(money));
        record.set_opt(fields::EXPECTED_AMOUNT, self.expected_amount.map(money));
        record.set_opt(
            fields::ACTUAL_AFFILIATE_COUNT,
            self.actual_affiliate_count,
        );
        record.set_opt(fields::DUE_DATE, self.due_date.map(|d| d.to_string()));
        record
    }

    /// Apply field edits, rejecting fields the current status locks
    pub fn apply_update(
        &mut self,
        definition: &LifecycleDefinition,
        changes: &HashMap<FieldName, FieldValue>,
    ) -> Result<()> {
        let status = self.status.as_code();
        for (name, value) in changes {
            let editable = definition
                .is_editable(status.as_str(), name.as_str())
                .map_err(|e| Error::Internal(e.to_string()))?;
            if !editable {
                return Err(Error::Validation(format!(
                    "Field {} is not editable while the invoice is {}",
                    name, self.status
                )));
            }
            self.set_field(name.as_str(), value)?;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Adopt the authoritative status returned by the update collaborator
    ///
    /// The server decides whether a requested validation settles as
    /// VALIDATED or DISCREPANCY; the entity never second-guesses it.
    pub fn adopt_status(&mut self, status: InvoiceStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Send a corrected invoice back for reprocessing
    pub fn reprocess(&mut self, definition: &LifecycleDefinition) -> Result<()> {
        self.apply_transition(definition, InvoiceStatus::Pending)
    }

    /// Record payment of a validated invoice
    pub fn mark_paid(&mut self, definition: &LifecycleDefinition) -> Result<()> {
        self.apply_transition(definition, InvoiceStatus::Paid)
    }

    /// Cancel a pending invoice
    pub fn cancel(&mut self, definition: &LifecycleDefinition) -> Result<()> {
        self.apply_transition(definition, InvoiceStatus::Cancelled)
    }

    fn apply_transition(
        &mut self,
        definition: &LifecycleDefinition,
        target: InvoiceStatus,
    ) -> Result<()> {
        let origin = self.status.as_code();
        let target_code = target.as_code();
        let evaluation = definition
            .evaluate(&self.to_record(), origin.as_str(), target_code.as_str())
            .map_err(|e| Error::Validation(e.to_string()))?;

        if !evaluation.allowed {
            let missing: Vec<&str> = evaluation.missing.iter().map(|f| f.as_str()).collect();
            return Err(Error::Validation(format!(
                "Cannot move invoice from {} to {}: missing {}",
                self.status,
                target,
                missing.join(", ")
            )));
        }

        self.status = target;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn set_field(&mut self, name: &str, value: &FieldValue) -> Result<()> {
        match name {
            fields::BILLING_PERIOD => {
                let period = opt_text(value, name)?;
                if let Some(period) = &period {
                    if !period.is_empty() && !validate_billing_period(period) {
                        return Err(Error::Validation(
                            "Billing period must be YYYY-MM format".to_string(),
                        ));
                    }
                }
                self.billing_period = period.filter(|p| !p.is_empty());
            }
            fields::SUBTOTAL => self.subtotal = opt_money(value, name)?,
            fields::TAX_AMOUNT => self.tax_amount = opt_money(value, name)?,
            fields::EXPECTED_AMOUNT => self.expected_amount = opt_money(value, name)?,
            fields::ACTUAL_AFFILIATE_COUNT => {
                self.actual_affiliate_count = opt_count(value, name)?;
            }
            fields::DUE_DATE => self.due_date = opt_date(value, name)?,
            other => {
                return Err(Error::Validation(format!(
                    "Unknown invoice field: {}",
                    other
                )));
            }
        }
        Ok(())
    }

    /// Validate entity invariants
    pub fn validate(&self) -> Result<()> {
        if let Some(period) = &self.billing_period {
            if !validate_billing_period(period) {
                return Err(Error::Validation(
                    "Billing period must be YYYY-MM format".to_string(),
                ));
            }
        }

        for (label, amount) in [
            ("Subtotal", self.subtotal),
            ("Tax amount", self.tax_amount),
            ("Expected amount", self.expected_amount),
        ] {
            if let Some(amount) = amount {
                if amount < Decimal::ZERO {
                    return Err(Error::Validation(format!("{} cannot be negative", label)));
                }
            }
        }

        if let Some(count) = self.actual_affiliate_count {
            if count < 0 {
                return Err(Error::Validation(
                    "Affiliate count cannot be negative".to_string(),
                ));
            }
        }

        Ok(())
    }
}

fn money(value: Decimal) -> FieldValue {
    FieldValue::Number(value.to_f64().unwrap_or(0.0))
}

fn opt_text(value: &FieldValue, field: &str) -> Result<Option<String>> {
    match value {
        FieldValue::Null => Ok(None),
        FieldValue::Text(s) => Ok(Some(s.clone())),
        _ => Err(Error::Validation(format!("{} must be text", field))),
    }
}

fn opt_money(value: &FieldValue, field: &str) -> Result<Option<Decimal>> {
    match value {
        FieldValue::Null => Ok(None),
        FieldValue::Number(n) => Decimal::from_f64(*n)
            .map(Some)
            .ok_or_else(|| Error::Validation(format!("{} is not a valid amount", field))),
        _ => Err(Error::Validation(format!("{} must be a number", field))),
    }
}

fn opt_count(value: &FieldValue, field: &str) -> Result<Option<i32>> {
    match value {
        FieldValue::Null => Ok(None),
        FieldValue::Number(n) if n.fract() == 0.0 && *n >= 0.0 => Ok(Some(*n as i32)),
        _ => Err(Error::Validation(format!(
            "{} must be a non-negative whole number",
            field
        ))),
    }
}

fn opt_date(value: &FieldValue, field: &str) -> Result<Option<NaiveDate>> {
    match value {
        FieldValue::Null => Ok(None),
        FieldValue::Text(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| Error::Validation(format!("{} must be a YYYY-MM-DD date", field))),
        _ => Err(Error::Validation(format!("{} must be a date", field))),
    }
}

// ============================================================================
// Tests
// ============================================================================
