//! Application wiring.
//!
//! [`AppContext`] is built once at start-up and owns every piece of client
//! state: the session, the favorites, the breed picker and the search
//! controller, all sharing one gateway and one notifier. Views borrow what
//! they need from it instead of reaching for globals.

use std::sync::Arc;

use tracing::{info, warn};

use catalog::{Credentials, Dog, FilterCriteria, Location, ZipCode};
use gateway::CatalogGateway;
use state::{BreedPicker, EventReceiver, Favorites, Notice, Notifier, Session};

use crate::error::{ControllerError, Result};
use crate::search::SearchController;

pub struct AppContext {
    gateway: Arc<dyn CatalogGateway>,
    notifier: Notifier,
    session: Session,
    favorites: Favorites,
    picker: BreedPicker,
    controller: SearchController,
}

impl AppContext {
    pub fn new(gateway: Arc<dyn CatalogGateway>) -> Self {
        let notifier = Notifier::new();
        Self {
            controller: SearchController::new(gateway.clone(), notifier.clone()),
            session: Session::with_notifier(notifier.clone()),
            favorites: Favorites::with_notifier(notifier.clone()),
            picker: BreedPicker::default(),
            gateway,
            notifier,
        }
    }

    pub fn subscribe(&self) -> EventReceiver {
        self.notifier.subscribe()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn picker(&self) -> &BreedPicker {
        &self.picker
    }

    pub fn picker_mut(&mut self) -> &mut BreedPicker {
        &mut self.picker
    }

    pub fn controller(&self) -> &SearchController {
        &self.controller
    }

    // ------------------------------------------------------------------
    // Session lifecycle
    // ------------------------------------------------------------------

    /// Validate, log in, then load breeds and run the first search.
    ///
    /// Only validation and the login itself can fail this call. A failing
    /// breed list or first search has already been reported as a notice and
    /// leaves the user logged in.
    pub async fn login(&mut self, name: &str, email: &str) -> Result<()> {
        let credentials = Credentials::parse(name, email).inspect_err(|e| {
            self.notifier.notice(Notice::error(e.to_string()));
        })?;
        self.session
            .login(self.gateway.as_ref(), &credentials)
            .await?;

        match self.controller.load_breeds(&self.session).await {
            Ok(breeds) => self.picker.set_breeds(breeds),
            Err(e) => warn!("Continuing without breed list: {}", e),
        }
        if let Err(e) = self.controller.search(&self.session).await {
            warn!("Initial search failed: {}", e);
        }
        Ok(())
    }

    /// End the session: remote logout, then drop favorites, filters and results.
    ///
    /// Local teardown happens even when the remote logout fails; that
    /// failure is still returned.
    pub async fn logout(&mut self) -> Result<()> {
        let remote = self.session.logout(self.gateway.as_ref()).await;
        self.favorites.clear();
        self.picker = BreedPicker::default();
        self.controller.reset();
        info!("Session state torn down");
        remote.map_err(ControllerError::from)
    }

    // ------------------------------------------------------------------
    // Filters and search
    // ------------------------------------------------------------------

    /// Criteria from the picker's breed selection plus the given fields
    pub fn criteria_with_selected_breeds(&self, base: FilterCriteria) -> FilterCriteria {
        FilterCriteria {
            breeds: self.picker.selected().to_vec(),
            ..base
        }
    }

    pub async fn apply_filters(&self, criteria: FilterCriteria) -> Result<usize> {
        self.controller.apply_filters(&self.session, criteria).await
    }

    /// Reset picker and criteria to defaults (the next search is unconstrained)
    pub fn clear_filters(&mut self) {
        self.picker.clear();
        self.controller.clear_filters();
    }

    pub async fn search(&self) -> Result<usize> {
        self.controller.search(&self.session).await
    }

    pub async fn locations(&self, zip_codes: &[ZipCode]) -> Result<Vec<Location>> {
        self.controller.locations(&self.session, zip_codes).await
    }

    // ------------------------------------------------------------------
    // Favorites and match
    // ------------------------------------------------------------------

    /// Toggle a dog from the current results (or an existing favorite).
    /// Returns whether it is now a favorite.
    pub fn toggle_favorite(&mut self, dog_id: &str) -> Result<bool> {
        if self.favorites.remove(dog_id) {
            return Ok(false);
        }
        let dog = self.lookup(dog_id)?;
        Ok(self.favorites.add(dog))
    }

    pub fn add_favorite(&mut self, dog_id: &str) -> Result<bool> {
        if self.favorites.is_favorite(dog_id) {
            return Ok(false);
        }
        let dog = self.lookup(dog_id)?;
        Ok(self.favorites.add(dog))
    }

    pub fn remove_favorite(&mut self, dog_id: &str) -> bool {
        self.favorites.remove(dog_id)
    }

    pub fn clear_favorites(&mut self) {
        self.favorites.clear();
    }

    pub async fn request_match(&self) -> Result<Dog> {
        self.controller
            .request_match(&self.session, &self.favorites)
            .await
    }

    fn lookup(&self, dog_id: &str) -> Result<Dog> {
        self.controller
            .find_result(dog_id)
            .ok_or_else(|| ControllerError::UnknownDog {
                dog_id: dog_id.to_string(),
            })
    }
}
