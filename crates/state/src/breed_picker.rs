//! Breed selection for the filter panel.
//!
//! The breed list from the service is long, so the panel narrows it with a
//! case-insensitive substring query and only shows the first few matches
//! until the user asks for all of them.

/// Matches shown while the list is collapsed
pub const COLLAPSED_BREED_COUNT: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreedPicker {
    breeds: Vec<String>,
    query: String,
    show_all: bool,
    selected: Vec<String>,
}

impl BreedPicker {
    pub fn new(breeds: Vec<String>) -> Self {
        Self {
            breeds,
            ..Self::default()
        }
    }

    /// Replace the known breed list. The selection is kept as is.
    pub fn set_breeds(&mut self, breeds: Vec<String>) {
        self.breeds = breeds;
    }

    pub fn breeds(&self) -> &[String] {
        &self.breeds
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_show_all(&mut self, show_all: bool) {
        self.show_all = show_all;
    }

    /// Every breed containing the query, ignoring case, in list order
    pub fn matching(&self) -> Vec<&str> {
        let needle = self.query.to_lowercase();
        self.breeds
            .iter()
            .filter(|breed| breed.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    /// What the panel shows right now
    pub fn displayed(&self) -> Vec<&str> {
        let mut matching = self.matching();
        if !self.show_all {
            matching.truncate(COLLAPSED_BREED_COUNT);
        }
        matching
    }

    /// How many matches the collapsed list is hiding
    pub fn hidden_count(&self) -> usize {
        self.matching().len() - self.displayed().len()
    }

    /// Select or deselect a breed. Returns whether it is now selected.
    pub fn toggle(&mut self, breed: &str) -> bool {
        if let Some(pos) = self.selected.iter().position(|b| b == breed) {
            self.selected.remove(pos);
            false
        } else {
            self.selected.push(breed.to_string());
            true
        }
    }

    pub fn is_selected(&self, breed: &str) -> bool {
        self.selected.iter().any(|b| b == breed)
    }

    /// Selected breeds in the order they were picked
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// Drop the selection and the query (the known list stays)
    pub fn clear(&mut self) {
        self.selected.clear();
        self.query.clear();
        self.show_all = false;
    }
}
