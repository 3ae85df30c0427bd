//! Cross-domain lifecycle scenarios
//!
//! Exercises each registered lifecycle the way the edit screens drive it:
//! intake requirements on claims, branching end-of-life on policies,
//! per-transition requirements and the strict presence rule on invoices.

mod common;

use brokerdesk_claims::fields as claim_fields;
use brokerdesk_invoices::fields as invoice_fields;
use brokerdesk_lifecycle::{FieldName, Record};

#[test]
fn claim_intake_blocks_on_single_missing_field() {
    let registry = common::full_registry();

    // Everything present except the claimed amount, which was never loaded
    let record = Record::new("SUBMITTED")
        .with_field(claim_fields::DESCRIPTION, "water damage in kitchen")
        .with_field(claim_fields::POLICY_ID, "3f0c8a1e-6f0e-4a9d-9a2b-b51d9f1c2a77")
        .with_field(claim_fields::INCIDENT_DATE, "2026-02-11")
        .with_field(claim_fields::CLAIM_TYPE, "property")
        .with_field(claim_fields::SUBMITTED_DATE, "2026-02-12");

    let definition = registry.definition("claim").unwrap();
    let evaluation = definition
        .evaluate(&record, "SUBMITTED", "UNDER_REVIEW")
        .unwrap();

    assert!(!evaluation.allowed);
    assert_eq!(evaluation.missing, vec![FieldName::new(claim_fields::AMOUNT)]);

    // The checklist shows the same single unmet item
    let checklist = registry
        .requirement_status("claim", "SUBMITTED", "UNDER_REVIEW", &record)
        .unwrap();
    let unmet: Vec<&str> = checklist
        .iter()
        .filter(|r| !r.satisfied)
        .map(|r| r.field.as_str())
        .collect();
    assert_eq!(unmet, vec![claim_fields::AMOUNT]);
}

#[test]
fn invoice_zero_tax_satisfies_validation_requirements() {
    let registry = common::full_registry();

    let record = Record::new("PENDING")
        .with_field(invoice_fields::BILLING_PERIOD, "2026-03")
        .with_field(invoice_fields::TAX_AMOUNT, 0.0)
        .with_field(invoice_fields::ACTUAL_AFFILIATE_COUNT, 17)
        .with_field(invoice_fields::DUE_DATE, "2026-04-15");

    // Zero was actively entered; only the unedited empty string is absent
    assert!(registry
        .can_confirm("invoice", "PENDING", "VALIDATED", &record)
        .unwrap());

    let checklist = registry
        .requirement_status("invoice", "PENDING", "VALIDATED", &record)
        .unwrap();
    let tax_line = checklist
        .iter()
        .find(|r| r.field.as_str() == invoice_fields::TAX_AMOUNT)
        .unwrap();
    assert!(tax_line.satisfied);
}

#[test]
fn policy_cancellation_is_unconditional() {
    let registry = common::full_registry();

    let offered: Vec<&str> = registry
        .list_transitions("policy", "ACTIVE")
        .unwrap()
        .iter()
        .map(|t| t.target.as_str())
        .collect();
    assert_eq!(offered, vec!["EXPIRED", "CANCELLED"]);

    // Allowed regardless of record content
    let empty = Record::new("ACTIVE");
    assert!(registry
        .can_confirm("policy", "ACTIVE", "CANCELLED", &empty)
        .unwrap());
}

#[test]
fn claim_reprocessing_loop_keeps_a_path_forward() {
    let registry = common::full_registry();

    let from_pending: Vec<&str> = registry
        .list_transitions("claim", "PENDING_INFO")
        .unwrap()
        .iter()
        .map(|t| t.target.as_str())
        .collect();
    assert_eq!(from_pending, vec!["SUBMITTED"]);

    // After looping back, SUBMITTED again offers transitions: the graph
    // is cyclic, not a DAG
    let from_submitted = registry.list_transitions("claim", "SUBMITTED").unwrap();
    assert!(from_submitted
        .iter()
        .any(|t| t.target.as_str() == "UNDER_REVIEW"));
}

#[test]
fn every_declared_transition_targets_a_declared_status() {
    let registry = common::full_registry();

    for object_type in ["claim", "policy", "invoice"] {
        let definition = registry.definition(object_type).unwrap();
        for status in &definition.statuses {
            for transition in &status.transitions {
                assert!(
                    definition.status(transition.target.as_str()).is_some(),
                    "{}: {} -> {} dangles",
                    object_type,
                    status.code,
                    transition.target
                );
            }
        }
    }
}

#[test]
fn terminal_statuses_lock_every_field() {
    let registry = common::full_registry();

    let probes = [
        "description",
        "amount",
        "policyNumber",
        "billingPeriod",
        "subtotal",
    ];
    for object_type in ["claim", "policy", "invoice"] {
        let definition = registry.definition(object_type).unwrap();
        for status in &definition.statuses {
            if status.is_terminal() {
                for field in probes {
                    assert!(
                        !definition.is_editable(status.code.as_str(), field).unwrap(),
                        "{}: terminal {} leaves {} editable",
                        object_type,
                        status.code,
                        field
                    );
                }
            }
        }
    }
}

#[test]
fn transition_requirements_replace_the_status_default() {
    let registry = common::full_registry();
    let definition = registry.definition("invoice").unwrap();

    // The per-transition set for VALIDATED is used as declared, not
    // merged with the status-level default
    let for_validated: Vec<&str> = definition
        .requirements_for("PENDING", "VALIDATED")
        .unwrap()
        .iter()
        .map(|f| f.as_str())
        .collect();
    assert_eq!(
        for_validated,
        vec![
            invoice_fields::BILLING_PERIOD,
            invoice_fields::TAX_AMOUNT,
            invoice_fields::ACTUAL_AFFILIATE_COUNT,
            invoice_fields::DUE_DATE,
        ]
    );

    // An explicitly empty override also wins over the default
    assert!(definition
        .requirements_for("PENDING", "CANCELLED")
        .unwrap()
        .is_empty());
}

#[test]
fn evaluating_an_unoffered_target_is_a_loud_error() {
    let registry = common::full_registry();
    let record = Record::new("PENDING");

    // DISCREPANCY is reachable only by server-side override and never
    // offered from PENDING
    let result = registry.can_confirm("invoice", "PENDING", "DISCREPANCY", &record);
    assert!(result.is_err());
}
