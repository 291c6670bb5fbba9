//! Controller crate for the PawMatch catalog browser.
//!
//! This crate contains the search controller that drives filtering,
//! hydration, pagination and matching, plus the [`AppContext`] that wires
//! it to the session and favorites.

pub mod app;
pub mod error;
pub mod search;

pub use app::AppContext;
pub use error::{ControllerError, Result};
pub use search::{PageView, SearchController, SearchPhase};
