//! Client-side validation.
//!
//! Login input and filter criteria are checked here before the gateway is
//! ever contacted.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, ValidationError};
use crate::types::FilterCriteria;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// A name/email pair that passed local validation.
///
/// The only way to build one is [`Credentials::parse`], so holding a
/// `Credentials` proves the input is non-blank and the email is well formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    name: String,
    email: String,
}

impl Credentials {
    /// Validate raw form input.
    ///
    /// Blank fields are checked first (name, then email), then the email shape.
    /// The name is trimmed; the email must match as typed.
    pub fn parse(name: &str, email: &str) -> Result<Self> {
        let trimmed_name = name.trim();
        if trimmed_name.is_empty() {
            return Err(ValidationError::MissingField { field: "name" });
        }
        if email.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "email" });
        }
        if !EMAIL_PATTERN.is_match(email) {
            return Err(ValidationError::InvalidEmail {
                email: email.to_string(),
            });
        }

        Ok(Self {
            name: trimmed_name.to_string(),
            email: email.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Check the invariants of a filter before it is turned into a query.
pub fn validate_criteria(criteria: &FilterCriteria) -> Result<()> {
    if let (Some(min), Some(max)) = (criteria.age_min, criteria.age_max) {
        if min > max {
            return Err(ValidationError::InvalidAgeRange { min, max });
        }
    }
    Ok(())
}
