//! Claim domain entities for Brokerdesk
//!
//! The claim entity owns its typed fields and delegates every lifecycle
//! decision (editability, transition legality) to the claim lifecycle
//! definition.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

use brokerdesk_common::{validate_reference, Error, Result};
use brokerdesk_lifecycle::{FieldName, FieldValue, LifecycleDefinition, Record};

use crate::domain::state::{fields, ClaimStatus};

/// Claim entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: Uuid,
    pub claim_number: String,
    pub affiliate_id: Uuid,
    pub policy_id: Option<Uuid>,
    pub claim_type: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub approved_amount: Option<Decimal>,
    pub incident_date: Option<NaiveDate>,
    pub submitted_date: Option<NaiveDate>,
    pub reviewer_notes: Option<String>,
    pub status: ClaimStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a claim
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClaim {
    #[validate(length(min = 1, max = 64))]
    pub claim_number: String,
    pub affiliate_id: Uuid,
    pub policy_id: Option<Uuid>,
    #[validate(length(min = 1, max = 64))]
    pub claim_type: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub incident_date: Option<NaiveDate>,
}

impl Claim {
    /// Create a new claim with validation
    pub fn new(input: CreateClaim) -> Result<Self> {
        input
            .validate()
            .map_err(|e| Error::Validation(format!("Validation failed: {}", e)))?;

        if !validate_reference(&input.claim_number) {
            return Err(Error::Validation(
                "Claim number must be uppercase alphanumeric with hyphens".to_string(),
            ));
        }

        if let Some(amount) = input.amount {
            if amount < Decimal::ZERO {
                return Err(Error::Validation(
                    "Claimed amount cannot be negative".to_string(),
                ));
            }
        }

        let now = Utc::now();
        Ok(Claim {
            id: Uuid::new_v4(),
            claim_number: input.claim_number,
            affiliate_id: input.affiliate_id,
            policy_id: input.policy_id,
            claim_type: input.claim_type,
            description: input.description,
            amount: input.amount,
            approved_amount: None,
            incident_date: input.incident_date,
            submitted_date: Some(now.date_naive()),
            reviewer_notes: None,
            status: ClaimStatus::default(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Check if the claim is settled
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Flat field snapshot for requirement evaluation, keyed like the
    /// edit screens
    pub fn to_record(&self) -> Record {
        let mut record = Record::new(self.status.as_code());
        record.set_opt(fields::DESCRIPTION, self.description.clone());
        record.set_opt(fields::AMOUNT, self.amount.map(money));
        record.set_opt(fields::APPROVED_AMOUNT, self.approved_amount.map(money));
        record.set_opt(fields::POLICY_ID, self.policy_id.map(|id| id.to_string()));
        record.set_opt(
            fields::INCIDENT_DATE,
            self.incident_date.map(|d| d.to_string()),
        );
        record.set_opt(fields::CLAIM_TYPE, self.claim_type.clone());
        record.set_opt(
            fields::SUBMITTED_DATE,
            self.submitted_date.map(|d| d.to_string()),
        );
        record.set_opt(fields::REVIEWER_NOTES, self.reviewer_notes.clone());
        record
    }

    /// Apply field edits, rejecting fields the current status locks
    ///
    /// This is the server-side enforcement of the capability the
    /// editability resolver reports to the UI.
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
                    "Field {} is not editable while the claim is {}",
                    name, self.status
                )));
            }
            self.set_field(name.as_str(), value)?;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Move the claim into review
    pub fn send_to_review(&mut self, definition: &LifecycleDefinition) -> Result<()> {
        self.apply_transition(definition, ClaimStatus::UnderReview)
    }

    /// Send the claim back to the affiliate for more information
    pub fn request_info(&mut self, definition: &LifecycleDefinition) -> Result<()> {
        self.apply_transition(definition, ClaimStatus::PendingInfo)
    }

    /// Resubmit a claim that was pending information
    pub fn resubmit(&mut self, definition: &LifecycleDefinition) -> Result<()> {
        self.apply_transition(definition, ClaimStatus::Submitted)
    }

    /// Approve the claim with the settled amount
    pub fn approve(
        &mut self,
        definition: &LifecycleDefinition,
        approved_amount: Decimal,
        notes: impl Into<String>,
    ) -> Result<()> {
        if approved_amount < Decimal::ZERO {
            return Err(Error::Validation(
                "Approved amount cannot be negative".to_string(),
            ));
        }
        self.approved_amount = Some(approved_amount);
        self.reviewer_notes = Some(notes.into());
        self.apply_transition(definition, ClaimStatus::Approved)
    }

    /// Reject the claim with a reviewer note
    pub fn reject(
        &mut self,
        definition: &LifecycleDefinition,
        notes: impl Into<String>,
    ) -> Result<()> {
        self.reviewer_notes = Some(notes.into());
        self.apply_transition(definition, ClaimStatus::Rejected)
    }

    /// Apply a transition after evaluating it against the definition
    fn apply_transition(
        &mut self,
        definition: &LifecycleDefinition,
        target: ClaimStatus,
    ) -> Result<()> {
        let origin = self.status.as_code();
        let target_code = target.as_code();
        let evaluation = definition
            .evaluate(&self.to_record(), origin.as_str(), target_code.as_str())
            .map_err(|e| Error::Validation(e.to_string()))?;

        if !evaluation.allowed {
            let missing: Vec<&str> = evaluation.missing.iter().map(|f| f.as_str()).collect();
            return Err(Error::Validation(format!(
                "Cannot move claim from {} to {}: missing {}",
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
            fields::DESCRIPTION => self.description = opt_text(value, name)?,
            fields::AMOUNT => self.amount = opt_money(value, name)?,
            fields::APPROVED_AMOUNT => self.approved_amount = opt_money(value, name)?,
            fields::CLAIM_TYPE => self.claim_type = opt_text(value, name)?,
            fields::INCIDENT_DATE => self.incident_date = opt_date(value, name)?,
            fields::SUBMITTED_DATE => self.submitted_date = opt_date(value, name)?,
            fields::POLICY_ID => self.policy_id = opt_uuid(value, name)?,
            fields::REVIEWER_NOTES => self.reviewer_notes = opt_text(value, name)?,
            other => {
                return Err(Error::Validation(format!("Unknown claim field: {}", other)));
            }
        }
        Ok(())
    }

    /// Validate entity invariants
    pub fn validate(&self) -> Result<()> {
        if let Some(amount) = self.amount {
            if amount < Decimal::ZERO {
                return Err(Error::Validation(
                    "Claimed amount cannot be negative".to_string(),
                ));
            }
        }

        if self.status == ClaimStatus::Approved && self.approved_amount.is_none() {
            return Err(Error::Validation(
                "Approved claims must have an approved amount".to_string(),
            ));
        }

        if self.status.is_terminal() && self.reviewer_notes.is_none() {
            return Err(Error::Validation(
                "Settled claims must carry reviewer notes".to_string(),
            ));
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

fn opt_date(value: &FieldValue, field: &str) -> Result<Option<NaiveDate>> {
    match value {
        FieldValue::Null => Ok(None),
        FieldValue::Text(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| Error::Validation(format!("{} must be a YYYY-MM-DD date", field))),
        _ => Err(Error::Validation(format!("{} must be a date", field))),
    }
}

fn opt_uuid(value: &FieldValue, field: &str) -> Result<Option<Uuid>> {
    match value {
        FieldValue::Null => Ok(None),
        FieldValue::Text(s) => Uuid::parse_str(s)
            .map(Some)
            .map_err(|_| Error::Validation(format!("{} must be a UUID", field))),
        _ => Err(Error::Validation(format!("{} must be a UUID", field))),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::lifecycle;

    fn create_input() -> CreateClaim {
        CreateClaim {
            claim_number: "CLM-2026-000123".to_string(),
            affiliate_id: Uuid::new_v4(),
            policy_id: Some(Uuid::new_v4()),
            claim_type: Some("auto".to_string()),
            description: Some("rear-end collision on A4".to_string()),
            amount: Some(Decimal::new(125_000, 2)),
            incident_date: NaiveDate::from_ymd_opt(2026, 5, 14),
        }
    }

    #[test]
    fn test_claim_creation() {
        let claim = Claim::new(create_input()).unwrap();

        assert_eq!(claim.status, ClaimStatus::Submitted);
        assert_eq!(claim.claim_number, "CLM-2026-000123");
        assert!(claim.submitted_date.is_some());
        assert!(claim.approved_amount.is_none());
        assert!(!claim.is_terminal());
        assert!(claim.validate().is_ok());
    }

    #[test]
    fn test_claim_creation_rejects_bad_reference() {
        let mut input = create_input();
        input.claim_number = "clm 123".to_string();
        assert!(Claim::new(input).is_err());
    }

    #[test]
    fn test_claim_creation_rejects_negative_amount() {
        let mut input = create_input();
        input.amount = Some(Decimal::new(-1, 0));
        assert!(Claim::new(input).is_err());
    }

    #[test]
    fn test_to_record_distinguishes_cleared_fields() {
        let mut input = create_input();
        input.description = None;
        let claim = Claim::new(input).unwrap();

        let record = claim.to_record();
        assert_eq!(record.status, ClaimStatus::Submitted.as_code());
        // Cleared field is an explicit null, not a missing key
        assert_eq!(record.get(fields::DESCRIPTION), Some(&FieldValue::Null));
        assert!(record.get(fields::AMOUNT).is_some());
    }

    #[test]
    fn test_apply_update_honors_editability() {
        let def = lifecycle();
        let mut claim = Claim::new(create_input()).unwrap();

        let mut changes = HashMap::new();
        changes.insert(
            FieldName::new(fields::DESCRIPTION),
            FieldValue::from("updated description"),
        );
        claim.apply_update(&def, &changes).unwrap();
        assert_eq!(claim.description.as_deref(), Some("updated description"));

        // approvedAmount is not editable while SUBMITTED
        let mut locked = HashMap::new();
        locked.insert(
            FieldName::new(fields::APPROVED_AMOUNT),
            FieldValue::from(100.0),
        );
        assert!(claim.apply_update(&def, &locked).is_err());
    }

    #[test]
    fn test_full_review_flow() {
        let def = lifecycle();
        let mut claim = Claim::new(create_input()).unwrap();

        claim.send_to_review(&def).unwrap();
        assert_eq!(claim.status, ClaimStatus::UnderReview);

        claim
            .approve(&def, Decimal::new(110_000, 2), "approved at adjusted amount")
            .unwrap();
        assert_eq!(claim.status, ClaimStatus::Approved);
        assert!(claim.is_terminal());
        assert!(claim.validate().is_ok());
    }

    #[test]
    fn test_reprocessing_loop() {
        let def = lifecycle();
        let mut claim = Claim::new(create_input()).unwrap();

        claim.request_info(&def).unwrap();
        assert_eq!(claim.status, ClaimStatus::PendingInfo);

        claim.resubmit(&def).unwrap();
        assert_eq!(claim.status, ClaimStatus::Submitted);

        // The loop does not exhaust the path forward
        claim.send_to_review(&def).unwrap();
        assert_eq!(claim.status, ClaimStatus::UnderReview);
    }

    #[test]
    fn test_transition_blocked_on_missing_requirement() {
        let def = lifecycle();
        let mut input = create_input();
        input.amount = None;
        let mut claim = Claim::new(input).unwrap();

        let err = claim.send_to_review(&def).unwrap_err();
        assert!(err.to_string().contains("amount"));
        assert_eq!(claim.status, ClaimStatus::Submitted);
    }

    #[test]
    fn test_terminal_claim_cannot_transition() {
        let def = lifecycle();
        let mut claim = Claim::new(create_input()).unwrap();
        claim.send_to_review(&def).unwrap();
        claim.reject(&def, "coverage excluded").unwrap();

        assert!(claim.is_terminal());
        assert!(claim.send_to_review(&def).is_err());
    }

    #[test]
    fn test_approve_requires_review_status() {
        let def = lifecycle();
        let mut claim = Claim::new(create_input()).unwrap();

        // Approving straight from SUBMITTED is not a declared transition
        let result = claim.approve(&def, Decimal::new(100, 0), "note");
        assert!(result.is_err());
        assert_eq!(claim.status, ClaimStatus::Submitted);
    }
}
