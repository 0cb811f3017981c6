//! Named saved searches with a hard cap and no automatic eviction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::storage::PersistentStore;
use crate::models::vehicle::{VehicleFilters, VehicleSort};

pub const MAX_SAVED_SEARCHES: usize = 20;

/// Searches left before the cap when the near-limit warning starts.
const NEAR_LIMIT_MARGIN: usize = 2;

const MAX_NAME_LENGTH: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SavedSearchError {
    #[error("You can save up to {max} searches. Remove one to save another.")]
    LimitReached { max: usize },

    #[error("Search name is required")]
    EmptyName,

    #[error("Search name must be at most {max} characters")]
    NameTooLong { max: usize },

    #[error("A saved search named \"{0}\" already exists")]
    DuplicateName(String),

    #[error("Saved search not found")]
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearch {
    pub id: Uuid,
    pub name: String,
    pub filters: VehicleFilters,
    #[serde(default)]
    pub sort: VehicleSort,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub id: Uuid,
    /// Set when the store was already close to the cap before this save.
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearchStore {
    searches: Vec<SavedSearch>,
}

impl SavedSearchStore {
    pub fn searches(&self) -> &[SavedSearch] {
        &self.searches
    }

    pub fn len(&self) -> usize {
        self.searches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.searches.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.searches.len() >= MAX_SAVED_SEARCHES
    }

    pub fn get(&self, id: Uuid) -> Option<&SavedSearch> {
        self.searches.iter().find(|s| s.id == id)
    }

    pub fn add(
        &mut self,
        name: &str,
        filters: VehicleFilters,
        sort: VehicleSort,
    ) -> Result<SaveOutcome, SavedSearchError> {
        let name = self.check_name(name, None)?;
        let count = self.searches.len();
        if count >= MAX_SAVED_SEARCHES {
            return Err(SavedSearchError::LimitReached {
                max: MAX_SAVED_SEARCHES,
            });
        }

        let search = SavedSearch {
            id: Uuid::new_v4(),
            name,
            filters,
            sort,
            created_at: Utc::now(),
            last_used_at: None,
        };
        let id = search.id;
        self.searches.push(search);

        let warning = (count >= MAX_SAVED_SEARCHES - NEAR_LIMIT_MARGIN).then(|| {
            format!(
                "You have {} of {} saved searches. Remove old searches to make room.",
                self.searches.len(),
                MAX_SAVED_SEARCHES
            )
        });
        Ok(SaveOutcome { id, warning })
    }

    pub fn rename(&mut self, id: Uuid, name: &str) -> Result<(), SavedSearchError> {
        let name = self.check_name(name, Some(id))?;
        let search = self
            .searches
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SavedSearchError::NotFound)?;
        search.name = name;
        Ok(())
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.searches.len();
        self.searches.retain(|s| s.id != id);
        self.searches.len() != before
    }

    /// Marks a search as used and returns its filters.
    pub fn touch(&mut self, id: Uuid) -> Result<&SavedSearch, SavedSearchError> {
        let search = self
            .searches
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SavedSearchError::NotFound)?;
        search.last_used_at = Some(Utc::now());
        Ok(search)
    }

    pub fn clear(&mut self) {
        self.searches.clear();
    }

    fn check_name(&self, name: &str, except: Option<Uuid>) -> Result<String, SavedSearchError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SavedSearchError::EmptyName);
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(SavedSearchError::NameTooLong {
                max: MAX_NAME_LENGTH,
            });
        }
        let taken = self
            .searches
            .iter()
            .any(|s| Some(s.id) != except && s.name.eq_ignore_ascii_case(name));
        if taken {
            return Err(SavedSearchError::DuplicateName(name.to_string()));
        }
        Ok(name.to_string())
    }
}

impl PersistentStore for SavedSearchStore {
    const STORAGE_KEY: &'static str = "saved-search-store";
}
