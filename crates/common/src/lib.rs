//! Shared utilities, configuration, and error handling for Brokerdesk
//!
//! This crate provides common functionality used across the Brokerdesk application:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - Validation helpers shared by the domain crates

pub mod config;
pub mod error;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};
pub use validation::{validate_billing_period, validate_reference};
