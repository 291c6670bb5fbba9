//! Error types for the state crate.

use catalog::ValidationError;
use gateway::GatewayError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// An operation that needs a session ran without one
    #[error("Not logged in")]
    NotAuthenticated,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The catalog service rejected a login or logout
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, StateError>;
