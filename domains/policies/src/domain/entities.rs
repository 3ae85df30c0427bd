//! Policy domain entities for Brokerdesk

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

use brokerdesk_common::{validate_reference, Error, Result};
use brokerdesk_lifecycle::{FieldName, FieldValue, LifecycleDefinition, Record};

use crate::domain::state::{fields, PolicyStatus};

/// Policy entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: Uuid,
    pub policy_number: String,
    pub client_id: Uuid,
    pub coverage_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub premium: Option<Decimal>,
    pub status: PolicyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a policy
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePolicy {
    #[validate(length(min = 1, max = 64))]
    pub policy_number: String,
    pub client_id: Uuid,
    #[validate(length(min = 1, max = 64))]
    pub coverage_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub premium: Option<Decimal>,
}

impl Policy {
    /// Create a new draft policy with validation
    pub fn new(input: CreatePolicy) -> Result<Self> {
        input
            .validate()
            .map_err(|e| Error::Validation(format!("Validation failed: {}", e)))?;

        if !validate_reference(&input.policy_number) {
            return Err(Error::Validation(
                "Policy number must be uppercase alphanumeric with hyphens".to_string(),
            ));
        }

        if let Some(premium) = input.premium {
            if premium < Decimal::ZERO {
                return Err(Error::Validation("Premium cannot be negative".to_string()));
            }
        }

        if let (Some(start), Some(end)) = (input.start_date, input.end_date) {
            if end <= start {
                return Err(Error::Validation(
                    "End date must be after start date".to_string(),
                ));
            }
        }

        let now = Utc::now();
        Ok(Policy {
            id: Uuid::new_v4(),
            policy_number: input.policy_number,
            client_id: input.client_id,
            coverage_type: input.coverage_type,
            start_date: input.start_date,
            end_date: input.end_date,
            premium: input.premium,
            status: PolicyStatus::default(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Check if the policy has ended
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Flat field snapshot for requirement evaluation
    pub fn to_record(&self) -> Record {
        let mut record = Record::new(self.status.as_code());
        record.set(fields::POLICY_NUMBER, self.policy_number.clone());
        record.set(fields::CLIENT_ID, self.client_id.to_string());
        record.set_opt(fields::COVERAGE_TYPE, self.coverage_type.clone());
        record.set_opt(fields::START_DATE, self.start_date.map(|d| d.to_string()));
        record.set_opt(fields::END_DATE, self.end_date.map(|d| d.to_string()));
        record.set_opt(
            fields::PREMIUM,
            self.premium.map(|p| p.to_f64().unwrap_or(0.0)),
        );
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
                    "Field {} is not editable while the policy is {}",
                    name, self.status
                )));
            }
            self.set_field(name.as_str(), value)?;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Put the policy in force
    pub fn activate(&mut self, definition: &LifecycleDefinition) -> Result<()> {
        self.apply_transition(definition, PolicyStatus::Active)
    }

    /// Mark the policy as run out
    pub fn expire(&mut self, definition: &LifecycleDefinition) -> Result<()> {
        self.apply_transition(definition, PolicyStatus::Expired)
    }

    /// Terminate the policy early
    pub fn cancel(&mut self, definition: &LifecycleDefinition) -> Result<()> {
        self.apply_transition(definition, PolicyStatus::Cancelled)
    }

    fn apply_transition(
        &mut self,
        definition: &LifecycleDefinition,
        target: PolicyStatus,
    ) -> Result<()> {
        let origin = self.status.as_code();
        let target_code = target.as_code();
        let evaluation = definition
            .evaluate(&self.to_record(), origin.as_str(), target_code.as_str())
            .map_err(|e| Error::Validation(e.to_string()))?;

        if !evaluation.allowed {
            let missing: Vec<&str> = evaluation.missing.iter().map(|f| f.as_str()).collect();
            return Err(Error::Validation(format!(
                "Cannot move policy from {} to {}: missing {}",
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
            fields::POLICY_NUMBER => {
                let number = req_text(value, name)?;
                if !validate_reference(&number) {
                    return Err(Error::Validation(
                        "Policy number must be uppercase alphanumeric with hyphens".to_string(),
                    ));
                }
                self.policy_number = number;
            }
            fields::CLIENT_ID => {
                self.client_id = req_uuid(value, name)?;
            }
            fields::COVERAGE_TYPE => self.coverage_type = opt_text(value, name)?,
            fields::START_DATE => self.start_date = opt_date(value, name)?,
            fields::END_DATE => self.end_date = opt_date(value, name)?,
            fields::PREMIUM => self.premium = opt_money(value, name)?,
            other => {
                return Err(Error::Validation(format!(
                    "Unknown policy field: {}",
                    other
                )));
            }
        }
        Ok(())
    }

    /// Validate entity invariants
    pub fn validate(&self) -> Result<()> {
        if let Some(premium) = self.premium {
            if premium < Decimal::ZERO {
                return Err(Error::Validation("Premium cannot be negative".to_string()));
            }
        }

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end <= start {
                return Err(Error::Validation(
                    "End date must be after start date".to_string(),
                ));
            }
        }

        if self.status == PolicyStatus::Active
            && (self.start_date.is_none() || self.end_date.is_none())
        {
            return Err(Error::Validation(
                "Active policies must have a coverage period".to_string(),
            ));
        }

        Ok(())
    }
}

fn req_text(value: &FieldValue, field: &str) -> Result<String> {
    match value {
        FieldValue::Text(s) if !s.is_empty() => Ok(s.clone()),
        _ => Err(Error::Validation(format!("{} is required", field))),
    }
}

fn req_uuid(value: &FieldValue, field: &str) -> Result<Uuid> {
    match value {
        FieldValue::Text(s) => Uuid::parse_str(s)
            .map_err(|_| Error::Validation(format!("{} must be a UUID", field))),
        _ => Err(Error::Validation(format!("{} must be a UUID", field))),
    }
}

fn opt_text(value: &FieldValue, field: &str) -> Result<Option<String>> {
    match value {
        FieldValue::Null => Ok(None),
        FieldValue::Text(s) => Ok(Some(s.clone())),
        _ => Err(Error::Validation(format!("{} must be text", field))),
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

fn opt_money(value: &FieldValue, field: &str) -> Result<Option<Decimal>> {
    match value {
        FieldValue::Null => Ok(None),
        FieldValue::Number(n) => Decimal::from_f64(*n)
            .map(Some)
            .ok_or_else(|| Error::Validation(format!("{} is not a valid amount", field))),
        _ => Err(Error::Validation(format!("{} must be a number", field))),
    }
}

// ============================================================================
// Tests
// ============================================================================
