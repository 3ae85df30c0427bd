//! Policies domain: policy entity and policy status lifecycle

pub mod domain;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
pub use domain::state::{fields, lifecycle, PolicyStatus, OBJECT_TYPE};
