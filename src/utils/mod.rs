//! Shared utilities.

pub mod host_validation;

pub use host_validation::{HostValidationError, validate_echo_host};
