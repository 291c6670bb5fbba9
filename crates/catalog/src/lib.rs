//! # Catalog Crate
//!
//! Domain types shared by every other crate in the workspace.
//!
//! ## Main Components
//!
//! - **types**: Wire records (Dog, SearchResult, MatchResult, Location) and FilterCriteria
//! - **validation**: Local checks on login input and filter criteria
//! - **error**: ValidationError
//!
//! ## Example Usage
//!
//! ```
//! use catalog::{Credentials, FilterCriteria, validate_criteria};
//!
//! let creds = Credentials::parse("Jane", "jane@x.com").unwrap();
//! assert_eq!(creds.name(), "Jane");
//!
//! let criteria = FilterCriteria::default().with_age_range(Some(1), Some(4));
//! assert!(validate_criteria(&criteria).is_ok());
//! ```

pub mod error;
pub mod types;
pub mod validation;

pub use error::{Result, ValidationError};
pub use types::{
    // Type aliases
    DogId,
    ZipCode,
    // Records
    Dog,
    Location,
    SearchResult,
    MatchResult,
    // Criteria
    FilterCriteria,
    SortDirection,
    MAX_SEARCH_SIZE,
};
pub use validation::{validate_criteria, Credentials};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dog_display() {
        let dog = Dog {
            id: "1".to_string(),
            img: "https://example.com/1.jpg".to_string(),
            name: "Rex".to_string(),
            age: 4,
            zip_code: "12345".to_string(),
            breed: "Boxer".to_string(),
        };

        assert_eq!(dog.to_string(), "Rex (Boxer, 4 yr, 12345)");
    }

    #[test]
    fn test_default_criteria_is_unconstrained() {
        let criteria = FilterCriteria::default();
        assert!(criteria.is_unconstrained());
        assert_eq!(criteria.sort, SortDirection::Asc);
    }
}
