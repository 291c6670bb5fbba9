//! The client-side favorites set.
//!
//! Favorites never leave the client except as the id list sent to the match
//! endpoint, and they are dropped when the session ends.

use std::collections::HashSet;

use catalog::{Dog, DogId};
use tracing::debug;

use crate::notify::{Notifier, StateEvent};

/// Favorited dogs in the order they were added.
///
/// ## Invariant
/// An id is in `ids` if and only if its record is in `dogs`, and `dogs`
/// holds no two records with the same id. Every `&mut self` method restores
/// this before it returns.
#[derive(Debug, Default)]
pub struct Favorites {
    ids: HashSet<DogId>,
    dogs: Vec<Dog>,
    notifier: Option<Notifier>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Favorites that publish [`StateEvent::FavoritesChanged`] on every change
    pub fn with_notifier(notifier: Notifier) -> Self {
        Self {
            notifier: Some(notifier),
            ..Self::default()
        }
    }

    /// Add a dog. Returns false (and changes nothing) if it is already present.
    pub fn add(&mut self, dog: Dog) -> bool {
        if self.ids.contains(&dog.id) {
            return false;
        }
        debug!("Adding favorite {}", dog.id);
        self.ids.insert(dog.id.clone());
        self.dogs.push(dog);
        self.changed();
        true
    }

    /// Remove a dog by id. Returns false if it was not a favorite.
    pub fn remove(&mut self, dog_id: &str) -> bool {
        if !self.ids.remove(dog_id) {
            return false;
        }
        debug!("Removing favorite {}", dog_id);
        self.dogs.retain(|dog| dog.id != dog_id);
        self.changed();
        true
    }

    /// Remove if present, add otherwise. Returns whether the dog is now a favorite.
    pub fn toggle(&mut self, dog: &Dog) -> bool {
        if self.remove(&dog.id) {
            false
        } else {
            self.add(dog.clone())
        }
    }

    pub fn clear(&mut self) {
        if self.dogs.is_empty() {
            return;
        }
        self.ids.clear();
        self.dogs.clear();
        self.changed();
    }

    /// O(1) membership check
    pub fn is_favorite(&self, dog_id: &str) -> bool {
        self.ids.contains(dog_id)
    }

    /// Favorited records, oldest first
    pub fn dogs(&self) -> &[Dog] {
        &self.dogs
    }

    /// Favorited ids, oldest first
    pub fn ids(&self) -> Vec<DogId> {
        self.dogs.iter().map(|dog| dog.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.dogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dogs.is_empty()
    }

    fn changed(&self) {
        if let Some(notifier) = &self.notifier {
            notifier.emit(StateEvent::FavoritesChanged {
                count: self.dogs.len(),
            });
        }
    }

    #[cfg(test)]
    fn is_consistent(&self) -> bool {
        self.ids.len() == self.dogs.len()
            && self.dogs.iter().all(|dog| self.ids.contains(&dog.id))
    }
}
