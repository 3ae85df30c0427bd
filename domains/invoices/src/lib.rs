//! Invoices domain: invoice entity, invoice status lifecycle, and the
//! settlement rule that can override a requested validation

pub mod domain;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
pub use domain::settlement;
pub use domain::state::{fields, lifecycle, InvoiceStatus, OBJECT_TYPE};
