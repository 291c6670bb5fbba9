//! Core domain types for the dog catalog.
//!
//! This module defines the records exchanged with the remote catalog service
//! and the filter criteria the client builds searches from.
//! Key Rust concepts demonstrated here:
//! - Type aliases for domain clarity (DogId, ZipCode)
//! - serde renames to match the wire format
//! - Enums for fixed sets of values (SortDirection)
//! - Builder-style methods that consume and return `Self`

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Type Aliases
// =============================================================================

/// Opaque identifier the catalog service assigns to a dog
pub type DogId = String;

/// Postal code as the catalog service reports it (kept as text, leading zeros matter)
pub type ZipCode = String;

/// Largest page the search endpoint hands back in one call
pub const MAX_SEARCH_SIZE: usize = 100;

// =============================================================================
// Dog Records
// =============================================================================

/// One adoptable dog as returned by the hydration endpoint.
///
/// Records are immutable once fetched; collections that need one (search
/// results, favorites, the current match) keep their own clone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dog {
    pub id: DogId,
    /// Image URL
    pub img: String,
    pub name: String,
    /// Age in years
    pub age: u32,
    pub zip_code: ZipCode,
    pub breed: String,
}

impl fmt::Display for Dog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {} yr, {})",
            self.name, self.breed, self.age, self.zip_code
        )
    }
}

/// Geographic details for a postal code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub zip_code: ZipCode,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub state: String,
    pub county: String,
}

// =============================================================================
// Search / Match Payloads
// =============================================================================

/// Response of the search endpoint: an ordered page of ids plus cursors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub result_ids: Vec<DogId>,
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

/// Response of the match endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "match")]
    pub dog_id: DogId,
}

// =============================================================================
// Filter Criteria
// =============================================================================

/// Sort direction over the breed label. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Value of the `sort` query parameter, e.g. `breed:asc`
    pub fn sort_token(self) -> String {
        format!("breed:{}", self.as_str())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction: {other}")),
        }
    }
}

/// Everything the user can constrain a search by.
///
/// Empty `breeds` / `zip_codes` mean "no constraint". Construct with
/// [`FilterCriteria::default`] and chain the `with_*` methods:
///
/// ```
/// use catalog::{FilterCriteria, SortDirection};
///
/// let criteria = FilterCriteria::default()
///     .with_breed("Beagle")
///     .with_age_range(Some(2), Some(6))
///     .with_sort(SortDirection::Desc);
/// assert_eq!(criteria.sort.sort_token(), "breed:desc");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub breeds: Vec<String>,
    pub zip_codes: Vec<ZipCode>,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
    pub sort: SortDirection,
}

impl FilterCriteria {
    /// Adds a breed to the selection. Duplicates are ignored.
    pub fn with_breed(mut self, breed: impl Into<String>) -> Self {
        let breed = breed.into();
        if !self.breeds.contains(&breed) {
            self.breeds.push(breed);
        }
        self
    }

    /// Adds a postal code to the selection. Duplicates are ignored.
    pub fn with_zip_code(mut self, zip_code: impl Into<ZipCode>) -> Self {
        let zip_code = zip_code.into();
        if !self.zip_codes.contains(&zip_code) {
            self.zip_codes.push(zip_code);
        }
        self
    }

    pub fn with_age_range(mut self, age_min: Option<u32>, age_max: Option<u32>) -> Self {
        self.age_min = age_min;
        self.age_max = age_max;
        self
    }

    pub fn with_sort(mut self, sort: SortDirection) -> Self {
        self.sort = sort;
        self
    }

    /// True when no field narrows the search (sort is not a constraint)
    pub fn is_unconstrained(&self) -> bool {
        self.breeds.is_empty()
            && self.zip_codes.is_empty()
            && self.age_min.is_none()
            && self.age_max.is_none()
    }

    /// Query pairs for the search endpoint, repeated keys for list fields.
    ///
    /// Always ends with `size=MAX_SEARCH_SIZE` so one call covers as much of
    /// the result set as the service allows.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query: Vec<(&'static str, String)> = Vec::new();
        query.extend(self.breeds.iter().map(|b| ("breeds", b.clone())));
        query.extend(self.zip_codes.iter().map(|z| ("zipCodes", z.clone())));
        if let Some(min) = self.age_min {
            query.push(("ageMin", min.to_string()));
        }
        if let Some(max) = self.age_max {
            query.push(("ageMax", max.to_string()));
        }
        query.push(("sort", self.sort.sort_token()));
        query.push(("size", MAX_SEARCH_SIZE.to_string()));
        query
    }
}
