//! Error types for the catalog crate.
//!
//! Everything here is a *local* failure: it is detected before any request
//! leaves the client, so none of these variants carry network context.

use thiserror::Error;

/// Input rejected by client-side validation
///
/// The `#[derive(Error)]` macro from thiserror implements `std::error::Error`
/// and `Display` from the `#[error(...)]` attributes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was blank after trimming
    #[error("Please enter both name and email (missing {field})")]
    MissingField { field: &'static str },

    /// Email did not look like `local@domain.tld`
    #[error("Please enter a valid email address: {email}")]
    InvalidEmail { email: String },

    /// Minimum age exceeds maximum age
    #[error("Minimum age {min} is greater than maximum age {max}")]
    InvalidAgeRange { min: u32, max: u32 },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ValidationError>;
