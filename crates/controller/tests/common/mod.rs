//! Shared fixtures for controller integration tests.
//!
//! `MockGateway` serves a fixed in-memory catalog, records every call, can
//! be told to fail specific operations, and can hold a search or a match open
//! until the test releases it.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use catalog::{
    Dog, DogId, FilterCriteria, Location, MatchResult, SearchResult, SortDirection, ZipCode,
};
use gateway::{CatalogGateway, GatewayError, Operation};
use state::{Notice, Severity, StateEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Login { name: String, email: String },
    Logout,
    Breeds,
    Search(FilterCriteria),
    Hydrate(Vec<DogId>),
    Match(Vec<DogId>),
    Locations(Vec<ZipCode>),
}

#[derive(Default)]
pub struct MockGateway {
    dogs: Vec<Dog>,
    calls: Mutex<Vec<Call>>,
    failing: Mutex<HashSet<Operation>>,
    held_breeds: Mutex<HashMap<String, Arc<Notify>>>,
    held_match: Mutex<Option<Arc<Notify>>>,
    match_pick: Mutex<Option<DogId>>,
    unhydrated: Mutex<HashSet<DogId>>,
}

impl MockGateway {
    pub fn with_dogs(dogs: Vec<Dog>) -> Arc<Self> {
        Arc::new(Self {
            dogs,
            ..Self::default()
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| pred(c)).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn fail(&self, operation: Operation) {
        self.failing.lock().insert(operation);
    }

    pub fn recover(&self, operation: Operation) {
        self.failing.lock().remove(&operation);
    }

    /// Make `match_dog` answer with this id instead of the first favorite
    pub fn pick(&self, dog_id: &str) {
        *self.match_pick.lock() = Some(dog_id.to_string());
    }

    /// Searches that include `breed` wait until the returned handle is notified
    pub fn hold_searches_for(&self, breed: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.held_breeds
            .lock()
            .insert(breed.to_string(), gate.clone());
        gate
    }

    /// The next `match_dog` call waits until the returned handle is notified.
    /// Its answer is picked before it waits.
    pub fn hold_next_match(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.held_match.lock() = Some(gate.clone());
        gate
    }

    /// Hydration silently leaves this dog out
    pub fn omit_from_hydration(&self, dog_id: &str) {
        self.unhydrated.lock().insert(dog_id.to_string());
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    fn check(&self, operation: Operation) -> gateway::Result<()> {
        if self.failing.lock().contains(&operation) {
            Err(GatewayError::Status {
                operation,
                status: 500,
            })
        } else {
            Ok(())
        }
    }

    fn gate_for(&self, criteria: &FilterCriteria) -> Option<Arc<Notify>> {
        let held = self.held_breeds.lock();
        criteria.breeds.iter().find_map(|b| held.get(b).cloned())
    }
}

#[async_trait]
impl CatalogGateway for MockGateway {
    async fn login(&self, name: &str, email: &str) -> gateway::Result<()> {
        self.record(Call::Login {
            name: name.to_string(),
            email: email.to_string(),
        });
        self.check(Operation::Login)
    }

    async fn logout(&self) -> gateway::Result<()> {
        self.record(Call::Logout);
        self.check(Operation::Logout)
    }

    async fn breeds(&self) -> gateway::Result<Vec<String>> {
        self.record(Call::Breeds);
        self.check(Operation::Breeds)?;
        let mut breeds: Vec<String> = self.dogs.iter().map(|d| d.breed.clone()).collect();
        breeds.sort();
        breeds.dedup();
        Ok(breeds)
    }

    async fn search(&self, criteria: &FilterCriteria) -> gateway::Result<SearchResult> {
        self.record(Call::Search(criteria.clone()));
        if let Some(gate) = self.gate_for(criteria) {
            gate.notified().await;
        }
        self.check(Operation::Search)?;

        let mut matching: Vec<&Dog> = self
            .dogs
            .iter()
            .filter(|d| criteria.breeds.is_empty() || criteria.breeds.contains(&d.breed))
            .filter(|d| criteria.zip_codes.is_empty() || criteria.zip_codes.contains(&d.zip_code))
            .filter(|d| criteria.age_min.is_none_or(|min| d.age >= min))
            .filter(|d| criteria.age_max.is_none_or(|max| d.age <= max))
            .collect();
        matching.sort_by(|a, b| a.breed.cmp(&b.breed).then_with(|| a.id.cmp(&b.id)));
        if criteria.sort == SortDirection::Desc {
            matching.reverse();
        }

        let total = matching.len() as u64;
        Ok(SearchResult {
            result_ids: matching
                .into_iter()
                .take(catalog::MAX_SEARCH_SIZE)
                .map(|d| d.id.clone())
                .collect(),
            total,
            next: None,
            prev: None,
        })
    }

    async fn fetch_dogs(&self, ids: &[DogId]) -> gateway::Result<Vec<Dog>> {
        self.record(Call::Hydrate(ids.to_vec()));
        self.check(Operation::Hydrate)?;
        let unhydrated = self.unhydrated.lock().clone();
        // Reverse to prove the controller restores search order itself
        Ok(self
            .dogs
            .iter()
            .rev()
            .filter(|d| ids.contains(&d.id) && !unhydrated.contains(&d.id))
            .cloned()
            .collect())
    }

    async fn match_dog(&self, ids: &[DogId]) -> gateway::Result<MatchResult> {
        self.record(Call::Match(ids.to_vec()));
        let dog_id = self
            .match_pick
            .lock()
            .clone()
            .unwrap_or_else(|| ids[0].clone());
        let gate = self.held_match.lock().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.check(Operation::Match)?;
        Ok(MatchResult { dog_id })
    }

    async fn locations(&self, zip_codes: &[ZipCode]) -> gateway::Result<Vec<Location>> {
        self.record(Call::Locations(zip_codes.to_vec()));
        self.check(Operation::Locations)?;
        Ok(zip_codes
            .iter()
            .map(|zip| Location {
                zip_code: zip.clone(),
                latitude: 0.0,
                longitude: 0.0,
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                county: "Sangamon".to_string(),
            })
            .collect())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn dog(id: &str, breed: &str, age: u32) -> Dog {
    Dog {
        id: id.to_string(),
        img: format!("https://example.com/{id}.jpg"),
        name: format!("Dog {id}"),
        age,
        zip_code: "10001".to_string(),
        breed: breed.to_string(),
    }
}

/// `count` dogs with ids "1".."count", cycling through three breeds
pub fn catalog_of(count: usize) -> Vec<Dog> {
    let breeds = ["Beagle", "Pug", "Collie"];
    (1..=count)
        .map(|i| dog(&i.to_string(), breeds[i % breeds.len()], (i % 12) as u32))
        .collect()
}

pub fn error_notices(events: &[StateEvent]) -> Vec<&Notice> {
    events
        .iter()
        .filter_map(|e| match e {
            StateEvent::Notice(n) if n.severity == Severity::Error => Some(n),
            _ => None,
        })
        .collect()
}

pub fn ids_of(dogs: &[Dog]) -> Vec<&str> {
    dogs.iter().map(|d| d.id.as_str()).collect()
}
