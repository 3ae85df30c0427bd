//! End-to-end transition flows through the mock record service
//!
//! Drives the full caller sequence the edit screens implement: freeze the
//! origin when the confirmation opens, build the checklist, gate the
//! confirm button, submit, and reconcile the returned status against the
//! requested target.

mod common;

use uuid::Uuid;

use brokerdesk_claims::fields as claim_fields;
use brokerdesk_invoices::fields as invoice_fields;
use brokerdesk_lifecycle::{OriginSession, StatusCode, TransitionOutcome};
use brokerdesk_records::{RecordService, RecordSnapshot, TransitionRequest};

fn seeded_claim(service: &brokerdesk_records::mock::MockRecordService) -> Uuid {
    let id = Uuid::new_v4();
    service.insert(
        RecordSnapshot::new(id, "claim", "SUBMITTED")
            .with_field(claim_fields::DESCRIPTION, "windshield replacement")
            .with_field(claim_fields::AMOUNT, 480.0)
            .with_field(claim_fields::POLICY_ID, "3f0c8a1e-6f0e-4a9d-9a2b-b51d9f1c2a77")
            .with_field(claim_fields::INCIDENT_DATE, "2026-06-02")
            .with_field(claim_fields::CLAIM_TYPE, "auto")
            .with_field(claim_fields::SUBMITTED_DATE, "2026-06-03"),
    );
    id
}

fn seeded_invoice(
    service: &brokerdesk_records::mock::MockRecordService,
    expected_amount: f64,
) -> Uuid {
    let id = Uuid::new_v4();
    service.insert(
        RecordSnapshot::new(id, "invoice", "PENDING")
            .with_field(invoice_fields::BILLING_PERIOD, "2026-03")
            .with_field(invoice_fields::SUBTOTAL, 1000.0)
            .with_field(invoice_fields::TAX_AMOUNT, 210.0)
            .with_field(invoice_fields::EXPECTED_AMOUNT, expected_amount)
            .with_field(invoice_fields::ACTUAL_AFFILIATE_COUNT, 42)
            .with_field(invoice_fields::DUE_DATE, "2026-04-15"),
    );
    id
}

#[test_log::test(tokio::test)]
async fn claim_review_flow_succeeds_as_requested() {
    let registry = common::full_registry();
    let service = common::record_service();
    let id = seeded_claim(&service);

    let snapshot = service.fetch(id).await.unwrap();

    // The action buttons come from the declared transition list
    let offered: Vec<&str> = registry
        .list_transitions("claim", snapshot.status.as_str())
        .unwrap()
        .iter()
        .map(|t| t.target.as_str())
        .collect();
    assert_eq!(offered, vec!["UNDER_REVIEW", "PENDING_INFO"]);

    // Opening the confirmation freezes the origin
    let mut session = OriginSession::new();
    let origin = session.observe(true, &snapshot.status).unwrap().clone();

    let attempt = registry
        .begin_attempt("claim", origin.as_str(), "UNDER_REVIEW", &snapshot.record())
        .unwrap();
    assert!(attempt.satisfied());

    let response = service
        .submit_transition(id, TransitionRequest::to("UNDER_REVIEW"))
        .await
        .unwrap();

    let outcome = TransitionOutcome::reconcile(&attempt.target, &response.status);
    assert!(!outcome.was_overridden());
    assert_eq!(outcome.status(), &StatusCode::new("UNDER_REVIEW"));

    session.release();
}

#[test_log::test(tokio::test)]
async fn invoice_validation_overridden_to_discrepancy() {
    let registry = common::full_registry();
    let service = common::record_service();

    // Expected amount drifted from subtotal + tax
    let id = seeded_invoice(&service, 1200.0);
    let snapshot = service.fetch(id).await.unwrap();

    // All requirement fields are present, so the confirm button enables
    assert!(registry
        .can_confirm("invoice", "PENDING", "VALIDATED", &snapshot.record())
        .unwrap());

    let response = service
        .submit_transition(id, TransitionRequest::to("VALIDATED"))
        .await
        .unwrap();

    // The server settled the invoice as a discrepancy; the caller reads
    // the authoritative status back instead of assuming success
    let outcome = TransitionOutcome::reconcile(&StatusCode::new("VALIDATED"), &response.status);
    assert!(outcome.was_overridden());
    assert_eq!(outcome.status(), &StatusCode::new("DISCREPANCY"));

    // The stored record reflects the override as well
    let refreshed = service.fetch(id).await.unwrap();
    assert_eq!(refreshed.status, StatusCode::new("DISCREPANCY"));
}

#[test_log::test(tokio::test)]
async fn invoice_validation_honored_when_amounts_reconcile() {
    let registry = common::full_registry();
    let service = common::record_service();

    let id = seeded_invoice(&service, 1210.0);
    let snapshot = service.fetch(id).await.unwrap();

    assert!(registry
        .can_confirm("invoice", "PENDING", "VALIDATED", &snapshot.record())
        .unwrap());

    let response = service
        .submit_transition(id, TransitionRequest::to("VALIDATED"))
        .await
        .unwrap();

    let outcome = TransitionOutcome::reconcile(&StatusCode::new("VALIDATED"), &response.status);
    assert!(!outcome.was_overridden());
    assert_eq!(outcome.status(), &StatusCode::new("VALIDATED"));
}

#[test_log::test(tokio::test)]
async fn discrepancy_correction_loop_revalidates() {
    let service = common::record_service();
    let id = seeded_invoice(&service, 1200.0);

    // First attempt settles as discrepancy
    service
        .submit_transition(id, TransitionRequest::to("VALIDATED"))
        .await
        .unwrap();

    // Back to PENDING with corrected figures, then validate again
    service
        .submit_transition(
            id,
            TransitionRequest::to("PENDING").with_field(invoice_fields::EXPECTED_AMOUNT, 1210.0),
        )
        .await
        .unwrap();

    let response = service
        .submit_transition(id, TransitionRequest::to("VALIDATED"))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::new("VALIDATED"));

    // Three submissions captured, in order
    let captured = service.submissions_for(id);
    assert_eq!(captured.len(), 3);
    assert_eq!(captured[0].resulting_status, StatusCode::new("DISCREPANCY"));
    assert_eq!(captured[2].resulting_status, StatusCode::new("VALIDATED"));
}

#[test_log::test(tokio::test)]
async fn frozen_origin_survives_background_refetch() {
    let registry = common::full_registry();
    let service = common::record_service();
    let id = seeded_claim(&service);

    let snapshot = service.fetch(id).await.unwrap();

    // User opens the confirmation for SUBMITTED -> UNDER_REVIEW
    let mut session = OriginSession::new();
    session.observe(true, &snapshot.status);

    // Meanwhile another actor moves the claim along
    service
        .submit_transition(id, TransitionRequest::to("UNDER_REVIEW"))
        .await
        .unwrap();

    // A background poll refreshes the record under the open dialog
    let refreshed = service.fetch(id).await.unwrap();
    assert_eq!(refreshed.status, StatusCode::new("UNDER_REVIEW"));

    // The session keeps serving the frozen origin, so the checklist is
    // still computed for the transition the user started evaluating
    let origin = session
        .observe(true, &refreshed.status)
        .unwrap()
        .clone();
    assert_eq!(origin, StatusCode::new("SUBMITTED"));

    let attempt = registry
        .begin_attempt(
            "claim",
            origin.as_str(),
            "UNDER_REVIEW",
            &refreshed.record(),
        )
        .unwrap();
    let listed: Vec<&str> = attempt
        .requirements
        .iter()
        .map(|r| r.field.as_str())
        .collect();
    assert_eq!(
        listed,
        vec![
            claim_fields::DESCRIPTION,
            claim_fields::AMOUNT,
            claim_fields::POLICY_ID,
            claim_fields::INCIDENT_DATE,
            claim_fields::CLAIM_TYPE,
            claim_fields::SUBMITTED_DATE,
        ]
    );

    // Closing releases the freeze; reopening captures the new status
    session.observe(false, &refreshed.status);
    let recaptured = session.observe(true, &refreshed.status).unwrap();
    assert_eq!(recaptured, &StatusCode::new("UNDER_REVIEW"));
}
