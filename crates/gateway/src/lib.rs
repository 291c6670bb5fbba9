//! Client bindings for the remote dog catalog service.
//!
//! This crate provides:
//! - The [`CatalogGateway`] trait the rest of the workspace talks to
//! - [`HttpGateway`], the reqwest implementation against the real service
//! - [`GatewayConfig`] for the base URL and timeout
//!
//! Every call is a plain passthrough: one request, one response, no retries.
//! A non-2xx status is a hard failure and only the status is kept; the
//! service does not promise a structured error body.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use catalog::{Dog, DogId, FilterCriteria, Location, MatchResult, SearchResult, ZipCode};

pub mod config;
pub mod http;

pub use config::GatewayConfig;
pub use http::HttpGateway;

/// Which remote call an error came from (for logs and notices)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    Logout,
    Breeds,
    Search,
    Hydrate,
    Match,
    Locations,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Login => "login",
            Operation::Logout => "logout",
            Operation::Breeds => "breeds",
            Operation::Search => "search",
            Operation::Hydrate => "hydrate",
            Operation::Match => "match",
            Operation::Locations => "locations",
        };
        f.write_str(name)
    }
}

/// Errors that can occur when talking to the catalog service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Invalid catalog service URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("{operation} request could not be sent: {message}")]
    Network { operation: Operation, message: String },

    #[error("{operation} request failed with status {status}")]
    Status { operation: Operation, status: u16 },

    #[error("Invalid {operation} response: {message}")]
    Decode { operation: Operation, message: String },

    /// Hydration came back without a record for an id we asked about
    #[error("No record returned for dog {dog_id}")]
    MissingRecord { dog_id: DogId },
}

impl GatewayError {
    pub fn operation(&self) -> Option<Operation> {
        match self {
            GatewayError::Network { operation, .. }
            | GatewayError::Status { operation, .. }
            | GatewayError::Decode { operation, .. } => Some(*operation),
            GatewayError::MissingRecord { .. } => Some(Operation::Hydrate),
            GatewayError::InvalidBaseUrl { .. } => None,
        }
    }

    /// True for a 401/403 from the service (session missing or expired)
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, GatewayError::Status { status: 401 | 403, .. })
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, GatewayError>;

/// The remote catalog contract.
///
/// The session travels as a cookie, so implementations must reuse whatever
/// state `login` established for every later call.
///
/// ## Design Note
/// - `Send + Sync` so one gateway can be shared behind an `Arc` by the
///   session and the controller
/// - `fetch_dogs` preserves no particular order; callers that care look
///   records up by id
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// `POST /auth/login`
    async fn login(&self, name: &str, email: &str) -> Result<()>;

    /// `POST /auth/logout`
    async fn logout(&self) -> Result<()>;

    /// `GET /dogs/breeds`
    async fn breeds(&self) -> Result<Vec<String>>;

    /// `GET /dogs/search`
    async fn search(&self, criteria: &FilterCriteria) -> Result<SearchResult>;

    /// `POST /dogs`: turn ids into full records
    async fn fetch_dogs(&self, ids: &[DogId]) -> Result<Vec<Dog>>;

    /// `POST /dogs/match`: the service picks one id out of `ids`
    async fn match_dog(&self, ids: &[DogId]) -> Result<MatchResult>;

    /// `POST /locations`
    async fn locations(&self, zip_codes: &[ZipCode]) -> Result<Vec<Location>>;
}
