//! Client-held state for the catalog browser.
//!
//! This crate provides:
//! - Session: authenticated flag and display identity
//! - Favorites: the user's curated dogs, kept in lock-step id set + record list
//! - Pager: client-side pagination arithmetic
//! - BreedPicker: breed narrowing and selection for the filter panel
//! - Notifier: broadcast of state-change events for whatever renders the state
//!
//! ## Ownership
//! Each piece of state has exactly one owner. Nothing here is global; the
//! application builds these at start-up and hands them to whoever needs
//! them, and drops or clears them when the session ends.
//!
//! ## Example Usage
//! ```
//! use catalog::Dog;
//! use state::{Favorites, Notifier, Pager, PAGE_SIZE};
//!
//! let notifier = Notifier::new();
//! let mut favorites = Favorites::with_notifier(notifier.clone());
//! favorites.add(Dog {
//!     id: "a".into(),
//!     img: String::new(),
//!     name: "Ace".into(),
//!     age: 1,
//!     zip_code: "10001".into(),
//!     breed: "Pug".into(),
//! });
//! assert!(favorites.is_favorite("a"));
//!
//! let pager = Pager::new(PAGE_SIZE, 45);
//! assert_eq!(pager.total_pages(), 3);
//! ```

pub mod breed_picker;
pub mod error;
pub mod favorites;
pub mod notify;
pub mod pagination;
pub mod session;

// Re-export main types
pub use breed_picker::{BreedPicker, COLLAPSED_BREED_COUNT};
pub use error::{Result, StateError};
pub use favorites::Favorites;
pub use notify::{EventReceiver, Notice, Notifier, Severity, StateEvent, drain};
pub use pagination::{PAGE_SIZE, Pager};
pub use session::{Identity, Session};
