//! # Search Controller
//!
//! This module owns everything between "the user picked some filters" and
//! "here is page N of matching dogs":
//! 1. Validate and store the filter criteria
//! 2. Ask the gateway for matching ids (one call, `size=100`)
//! 3. Hydrate the ids into full records (skipped when there are none)
//! 4. Slice the hydrated set into pages of 20 on the client
//!
//! It also runs the match flow: favorite ids go to the gateway, one id comes
//! back, and that id is hydrated into the current match.
//!
//! ## Phases
//! `Idle -> Searching -> Ready | Error`, and any of `Idle`, `Ready` or
//! `Error` may start a new search. Starting a search throws the previous
//! results away; a failed search leaves the result set empty.
//!
//! ## Overlapping requests
//! Every search and every match takes a generation number when it starts.
//! When a response arrives and its generation is no longer the newest, it is
//! dropped without touching state or emitting anything (last write wins).
//! The state lock is never held across an `.await`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use catalog::{Dog, DogId, FilterCriteria, Location, ZipCode, validate_criteria};
use gateway::{CatalogGateway, GatewayError};
use state::{Favorites, Notice, Notifier, PAGE_SIZE, Pager, Session, Severity, StateEvent};

use crate::error::{ControllerError, Result};

/// Where the controller is in its search cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Searching,
    Ready,
    Error,
}

/// Read-only copy of what a view needs to draw the results area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub phase: SearchPhase,
    pub dogs: Vec<Dog>,
    pub page: usize,
    pub total_pages: usize,
    /// Dogs hydrated for this search
    pub total_results: usize,
    /// Total the service reported, which may exceed one search call
    pub service_total: u64,
}

#[derive(Debug)]
struct ControllerState {
    phase: SearchPhase,
    criteria: FilterCriteria,
    results: Vec<Dog>,
    service_total: u64,
    pager: Pager,
    search_generation: u64,
    breeds: Vec<String>,
    current_match: Option<Dog>,
    match_generation: u64,
    matching: bool,
    last_error: Option<String>,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            phase: SearchPhase::Idle,
            criteria: FilterCriteria::default(),
            results: Vec::new(),
            service_total: 0,
            pager: Pager::new(PAGE_SIZE, 0),
            search_generation: 0,
            breeds: Vec::new(),
            current_match: None,
            match_generation: 0,
            matching: false,
            last_error: None,
        }
    }
}

/// Search/filter/pagination/match controller.
///
/// Cheap to clone; clones share state, so a view can hold one while a
/// spawned task drives a search on another.
#[derive(Clone)]
pub struct SearchController {
    gateway: Arc<dyn CatalogGateway>,
    notifier: Notifier,
    state: Arc<Mutex<ControllerState>>,
}

impl SearchController {
    pub fn new(gateway: Arc<dyn CatalogGateway>, notifier: Notifier) -> Self {
        Self {
            gateway,
            notifier,
            state: Arc::new(Mutex::new(ControllerState::default())),
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn phase(&self) -> SearchPhase {
        self.state.lock().phase
    }

    pub fn criteria(&self) -> FilterCriteria {
        self.state.lock().criteria.clone()
    }

    /// The whole hydrated result set, in search order
    pub fn results(&self) -> Vec<Dog> {
        self.state.lock().results.clone()
    }

    pub fn find_result(&self, dog_id: &str) -> Option<Dog> {
        self.state
            .lock()
            .results
            .iter()
            .find(|dog| dog.id == dog_id)
            .cloned()
    }

    /// Slice `[(p-1)*20, p*20)` of the results for the current page `p`
    pub fn current_page_dogs(&self) -> Vec<Dog> {
        let state = self.state.lock();
        state.pager.slice(&state.results).to_vec()
    }

    pub fn page(&self) -> usize {
        self.state.lock().pager.page()
    }

    pub fn total_pages(&self) -> usize {
        self.state.lock().pager.total_pages()
    }

    pub fn page_view(&self) -> PageView {
        let state = self.state.lock();
        PageView {
            phase: state.phase,
            dogs: state.pager.slice(&state.results).to_vec(),
            page: state.pager.page(),
            total_pages: state.pager.total_pages(),
            total_results: state.results.len(),
            service_total: state.service_total,
        }
    }

    /// Breed list fetched by [`load_breeds`](Self::load_breeds)
    pub fn breeds(&self) -> Vec<String> {
        self.state.lock().breeds.clone()
    }

    pub fn current_match(&self) -> Option<Dog> {
        self.state.lock().current_match.clone()
    }

    /// True while a match request is outstanding
    pub fn is_matching(&self) -> bool {
        self.state.lock().matching
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }

    // ------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------

    /// Validate and store new criteria; the page goes back to 1.
    ///
    /// Invalid criteria are rejected before anything changes.
    pub fn set_criteria(&self, criteria: FilterCriteria) -> Result<()> {
        validate_criteria(&criteria).inspect_err(|e| {
            self.notifier.notice(Notice::error(e.to_string()));
        })?;
        let mut state = self.state.lock();
        state.criteria = criteria;
        state.pager.go_to(1);
        Ok(())
    }

    /// Store new criteria and search with them
    pub async fn apply_filters(&self, session: &Session, criteria: FilterCriteria) -> Result<usize> {
        session.require_active()?;
        self.set_criteria(criteria)?;
        self.search(session).await
    }

    /// Back to the default criteria (no constraints, ascending). Does not search.
    pub fn clear_filters(&self) {
        let mut state = self.state.lock();
        state.criteria = FilterCriteria::default();
        state.pager.go_to(1);
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Run a search with the stored criteria.
    ///
    /// Returns the number of hydrated results. A response overtaken by a
    /// newer search returns [`ControllerError::Superseded`] and changes nothing.
    pub async fn search(&self, session: &Session) -> Result<usize> {
        session.require_active()?;
        let start_time = Instant::now();

        let (generation, criteria) = {
            let mut state = self.state.lock();
            state.search_generation += 1;
            state.phase = SearchPhase::Searching;
            state.results.clear();
            state.service_total = 0;
            state.pager.reset(0);
            state.last_error = None;
            (state.search_generation, state.criteria.clone())
        };
        self.notifier.emit(StateEvent::SearchStarted);
        info!("Search #{} started", generation);

        let outcome = self.fetch_results(&criteria).await;

        let mut state = self.state.lock();
        if state.search_generation != generation {
            debug!(
                "Search #{} finished after #{} started, discarding",
                generation, state.search_generation
            );
            return Err(ControllerError::Superseded);
        }

        match outcome {
            Ok((dogs, service_total)) => {
                let total = dogs.len();
                state.results = dogs;
                state.service_total = service_total;
                state.pager.reset(total);
                state.phase = SearchPhase::Ready;
                let total_pages = state.pager.total_pages();
                drop(state);

                info!(
                    "Search #{} ready: {} dogs, {} pages in {:.2?}",
                    generation,
                    total,
                    total_pages,
                    start_time.elapsed()
                );
                self.notifier.emit(StateEvent::ResultsReady { total, total_pages });
                Ok(total)
            }
            Err(e) => {
                state.phase = SearchPhase::Error;
                state.last_error = Some(e.to_string());
                drop(state);

                warn!("Search #{} failed: {}", generation, e);
                self.notifier
                    .notice(Notice::error("Failed to search dogs. Please try again."));
                Err(e.into())
            }
        }
    }

    /// Search then hydrate. No partial results: any failure fails the lot.
    async fn fetch_results(&self, criteria: &FilterCriteria) -> gateway::Result<(Vec<Dog>, u64)> {
        let result = self.gateway.search(criteria).await?;
        debug!(
            "Search returned {} ids (service total {})",
            result.result_ids.len(),
            result.total
        );
        if result.result_ids.is_empty() {
            return Ok((Vec::new(), result.total));
        }

        let dogs = self.gateway.fetch_dogs(&result.result_ids).await?;
        Ok((order_by_ids(&result.result_ids, dogs), result.total))
    }

    // ------------------------------------------------------------------
    // Pagination
    // ------------------------------------------------------------------

    /// Next page; a no-op on the last page. Returns the current page.
    pub fn next_page(&self) -> usize {
        self.move_page(|pager| {
            pager.next();
        })
    }

    /// Previous page; a no-op on page 1. Returns the current page.
    pub fn prev_page(&self) -> usize {
        self.move_page(|pager| {
            pager.prev();
        })
    }

    /// Jump to a page. Out-of-range pages are clamped to `[1, max(total_pages, 1)]`.
    pub fn go_to_page(&self, page: usize) -> usize {
        self.move_page(|pager| {
            pager.go_to(page);
        })
    }

    fn move_page(&self, step: impl FnOnce(&mut Pager)) -> usize {
        let mut state = self.state.lock();
        let before = state.pager.page();
        step(&mut state.pager);
        let page = state.pager.page();
        let total_pages = state.pager.total_pages();
        drop(state);

        if page != before {
            self.notifier.emit(StateEvent::PageChanged { page, total_pages });
        }
        page
    }

    // ------------------------------------------------------------------
    // Match
    // ------------------------------------------------------------------

    /// Ask the service to pick one dog out of the favorites.
    ///
    /// With no favorites this reports "no favorites" and never contacts the
    /// gateway. Otherwise the previous match is dropped, the favorite ids go
    /// out in insertion order, and the returned id is hydrated.
    pub async fn request_match(&self, session: &Session, favorites: &Favorites) -> Result<Dog> {
        session.require_active()?;
        if favorites.is_empty() {
            self.notifier.notice(Notice::new(
                Severity::Warning,
                "No favorites",
                "Please add at least one dog to your favorites",
            ));
            return Err(ControllerError::NoFavorites);
        }

        let generation = {
            let mut state = self.state.lock();
            state.match_generation += 1;
            state.current_match = None;
            state.matching = true;
            state.match_generation
        };
        let ids = favorites.ids();
        info!("Match #{} requested from {} favorites", generation, ids.len());

        let outcome = self.fetch_match(&ids).await;

        let mut state = self.state.lock();
        if state.match_generation != generation {
            debug!("Match #{} overtaken, discarding", generation);
            return Err(ControllerError::Superseded);
        }
        state.matching = false;

        match outcome {
            Ok(dog) => {
                state.current_match = Some(dog.clone());
                drop(state);

                info!("Matched with {} ({})", dog.name, dog.id);
                self.notifier.emit(StateEvent::MatchReady {
                    dog_id: dog.id.clone(),
                });
                Ok(dog)
            }
            Err(e) => {
                state.last_error = Some(e.to_string());
                drop(state);

                warn!("Match #{} failed: {}", generation, e);
                self.notifier
                    .notice(Notice::error("Failed to generate a match"));
                Err(e.into())
            }
        }
    }

    async fn fetch_match(&self, ids: &[DogId]) -> gateway::Result<Dog> {
        let dog_id = self.gateway.match_dog(ids).await?.dog_id;
        let dogs = self.gateway.fetch_dogs(std::slice::from_ref(&dog_id)).await?;
        match dogs.into_iter().find(|dog| dog.id == dog_id) {
            Some(dog) => Ok(dog),
            None => Err(GatewayError::MissingRecord { dog_id }),
        }
    }

    /// Drop the current match (the view closed it)
    pub fn dismiss_match(&self) {
        self.state.lock().current_match = None;
    }

    // ------------------------------------------------------------------
    // Reference data
    // ------------------------------------------------------------------

    /// Fetch the breed list for the filter panel
    pub async fn load_breeds(&self, session: &Session) -> Result<Vec<String>> {
        session.require_active()?;
        match self.gateway.breeds().await {
            Ok(breeds) => {
                debug!("Loaded {} breeds", breeds.len());
                self.state.lock().breeds = breeds.clone();
                self.notifier.emit(StateEvent::BreedsLoaded {
                    count: breeds.len(),
                });
                Ok(breeds)
            }
            Err(e) => {
                warn!("Breed list failed: {}", e);
                self.notifier
                    .notice(Notice::error("Failed to fetch dog breeds"));
                Err(e.into())
            }
        }
    }

    /// Look up postal codes
    pub async fn locations(&self, session: &Session, zip_codes: &[ZipCode]) -> Result<Vec<Location>> {
        session.require_active()?;
        self.gateway.locations(zip_codes).await.map_err(|e| {
            warn!("Location lookup failed: {}", e);
            self.notifier
                .notice(Notice::error("Failed to fetch locations"));
            e.into()
        })
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Forget everything (session ended). In-flight requests become stale.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        let search_generation = state.search_generation + 1;
        let match_generation = state.match_generation + 1;
        *state = ControllerState {
            search_generation,
            match_generation,
            ..ControllerState::default()
        };
        debug!("Controller reset");
    }
}

/// Put hydrated records back into search order.
///
/// Records for ids the search did not return are dropped; ids with no
/// record are logged and skipped.
fn order_by_ids(ids: &[DogId], dogs: Vec<Dog>) -> Vec<Dog> {
    let mut by_id: HashMap<DogId, Dog> = dogs.into_iter().map(|dog| (dog.id.clone(), dog)).collect();
    let ordered: Vec<Dog> = ids.iter().filter_map(|id| by_id.remove(id)).collect();

    if ordered.len() != ids.len() {
        warn!(
            "Hydration mismatch: ids={}, records={}",
            ids.len(),
            ordered.len()
        );
    }
    ordered
}
