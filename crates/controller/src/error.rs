//! Error types for the controller crate.

use catalog::{DogId, ValidationError};
use gateway::GatewayError;
use state::StateError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// Search and match only run inside a session
    #[error("Not logged in")]
    NotAuthenticated,

    /// A match was requested with an empty favorites set
    #[error("Please add at least one dog to your favorites")]
    NoFavorites,

    /// The id is neither in the current results nor in the favorites
    #[error("Dog {dog_id} is not in the current results")]
    UnknownDog { dog_id: DogId },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A newer request of the same kind started before this one finished;
    /// its response was discarded
    #[error("Superseded by a newer request")]
    Superseded,
}

impl From<StateError> for ControllerError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::NotAuthenticated => ControllerError::NotAuthenticated,
            StateError::Validation(e) => ControllerError::Validation(e),
            StateError::Gateway(e) => ControllerError::Gateway(e),
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ControllerError>;
