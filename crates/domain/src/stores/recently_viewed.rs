//! Recently viewed vehicles, most recent first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::storage::PersistentStore;
use super::VehicleSnapshot;

pub const DEFAULT_RECENTLY_VIEWED: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentlyViewedEntry {
    pub vehicle: VehicleSnapshot,
    pub viewed_at: DateTime<Utc>,
    pub view_count: u32,
}

/// Bounded FIFO that promotes re-viewed vehicles to the front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RecentlyViewedState")]
pub struct RecentlyViewedStore {
    max_items: usize,
    entries: Vec<RecentlyViewedEntry>,
}

/// Persisted shape, normalized on load.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecentlyViewedState {
    #[serde(default = "default_max")]
    max_items: usize,
    #[serde(default)]
    entries: Vec<RecentlyViewedEntry>,
}

impl From<RecentlyViewedState> for RecentlyViewedStore {
    fn from(state: RecentlyViewedState) -> Self {
        let mut store = Self::with_max(state.max_items);
        for entry in state.entries {
            if store.entries.len() == store.max_items {
                break;
            }
            if !store.entries.iter().any(|e| e.vehicle.id == entry.vehicle.id) {
                store.entries.push(entry);
            }
        }
        store
    }
}

fn default_max() -> usize {
    DEFAULT_RECENTLY_VIEWED
}

impl Default for RecentlyViewedStore {
    fn default() -> Self {
        Self::with_max(DEFAULT_RECENTLY_VIEWED)
    }
}

impl RecentlyViewedStore {
    /// A store holding at most `max_items` (at least one).
    pub fn with_max(max_items: usize) -> Self {
        Self {
            max_items: max_items.max(1),
            entries: Vec::new(),
        }
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn entries(&self) -> &[RecentlyViewedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn record_view(&mut self, vehicle: VehicleSnapshot) {
        self.record_view_at(vehicle, Utc::now());
    }

    /// Records a view. A repeat view bumps `view_count`, refreshes the
    /// snapshot and moves the entry to the front.
    pub fn record_view_at(&mut self, vehicle: VehicleSnapshot, at: DateTime<Utc>) {
        let entry = match self.entries.iter().position(|e| e.vehicle.id == vehicle.id) {
            Some(idx) => {
                let mut existing = self.entries.remove(idx);
                existing.vehicle = vehicle;
                existing.viewed_at = at;
                existing.view_count = existing.view_count.saturating_add(1);
                existing
            }
            None => RecentlyViewedEntry {
                vehicle,
                viewed_at: at,
                view_count: 1,
            },
        };
        self.entries.insert(0, entry);
        self.entries.truncate(self.max_items);
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.vehicle.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl PersistentStore for RecentlyViewedStore {
    const STORAGE_KEY: &'static str = "recently-viewed-store";
}
