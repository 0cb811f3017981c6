//! Bounded client-side list stores.
//!
//! These mirror what the browser keeps for UX (compare tray, recently viewed,
//! saved searches, search history, local alert list). They are conveniences,
//! never the source of truth.

pub mod alerts;
pub mod compare;
pub mod recently_viewed;
pub mod saved_search;
pub mod search;
pub mod storage;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::vehicle::Vehicle;

pub use alerts::{AlertStore, LocalAlert};
pub use compare::{CompareOutcome, CompareStore, MAX_COMPARE};
pub use recently_viewed::{RecentlyViewedEntry, RecentlyViewedStore, DEFAULT_RECENTLY_VIEWED};
pub use saved_search::{SavedSearch, SavedSearchError, SavedSearchStore, SaveOutcome, MAX_SAVED_SEARCHES};
pub use search::{SearchStore, MAX_RECENT_QUERIES};
pub use storage::{JsonFileStorage, MemoryStorage, PersistentStore, StoreError, StoreStorage};

/// The slice of a vehicle the client keeps in its lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSnapshot {
    pub id: Uuid,
    pub title: String,
    pub price: i64,
    pub year: i32,
    pub mileage: i32,
    pub image: Option<String>,
}

impl From<&Vehicle> for VehicleSnapshot {
    fn from(v: &Vehicle) -> Self {
        Self {
            id: v.id,
            title: v.title(),
            price: v.price,
            year: v.year,
            mileage: v.mileage,
            image: v.primary_image().map(str::to_string),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::VehicleSnapshot;
    use uuid::Uuid;

    pub fn snapshot(title: &str) -> VehicleSnapshot {
        VehicleSnapshot {
            id: Uuid::new_v4(),
            title: title.to_string(),
            price: 20_000,
            year: 2020,
            mileage: 30_000,
            image: None,
        }
    }
}
