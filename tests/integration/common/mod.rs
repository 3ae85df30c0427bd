//! Shared helpers for integration tests

use brokerdesk_invoices::settlement;
use brokerdesk_lifecycle::LifecycleRegistry;
use brokerdesk_records::mock::MockRecordService;

/// The registry the application builds at startup: one validated
/// definition per business-object type
pub fn full_registry() -> LifecycleRegistry {
    let mut registry = LifecycleRegistry::new();
    registry.register(brokerdesk_claims::lifecycle()).unwrap();
    registry.register(brokerdesk_policies::lifecycle()).unwrap();
    registry.register(brokerdesk_invoices::lifecycle()).unwrap();
    registry
}

/// A mock record service with the invoice settlement rule installed,
/// the way the real backend applies it
pub fn record_service() -> MockRecordService {
    let service = MockRecordService::new();
    service.set_status_override(brokerdesk_invoices::OBJECT_TYPE, |snapshot, requested| {
        settlement::resulting_status(&snapshot.fields, requested)
    });
    service
}
