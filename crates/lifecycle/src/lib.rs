//! Generic status lifecycle engine for Brokerdesk business objects
//!
//! One data-parameterized engine replaces the per-object copies of the
//! same logic: which fields may be edited in a given status, which
//! statuses a record may move to, which fields must be present before a
//! transition, and how a server-side override of the requested target is
//! surfaced to the caller.
//!
//! The engine is synchronous, pure, and stateless except for
//! [`OriginSession`], which exists to keep one transition attempt pinned
//! to the status it started from while background refetches race with an
//! open confirmation dialog. Fetching records and submitting transitions
//! are external collaborators; the engine only decides what is currently
//! legal and what is missing.

pub mod definition;
pub mod error;
pub mod evaluator;
pub mod presence;
pub mod record;
pub mod reconcile;
pub mod registry;
pub mod session;

// Re-export main types
pub use definition::{
    FieldAccess, FieldName, LifecycleDefinition, StatusCode, StatusConfig, Transition, UiVariant,
};
pub use error::LifecycleError;
pub use evaluator::{Evaluation, RequirementStatus, TransitionAttempt};
pub use presence::is_present;
pub use record::{FieldValue, Record};
pub use reconcile::TransitionOutcome;
pub use registry::LifecycleRegistry;
pub use session::OriginSession;
