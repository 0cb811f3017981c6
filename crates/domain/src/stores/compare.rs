//! Side-by-side comparison tray.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::storage::PersistentStore;
use super::VehicleSnapshot;

/// Number of comparison slots.
pub const MAX_COMPARE: usize = 4;

/// What `CompareStore::add` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareOutcome {
    Added,
    /// The list was full; the oldest entry (this id) was dropped.
    Replaced(Uuid),
    AlreadyPresent,
}

/// Up to four vehicles, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CompareState")]
pub struct CompareStore {
    items: Vec<VehicleSnapshot>,
}

/// Persisted shape. Loading drops duplicates and keeps the newest
/// [`MAX_COMPARE`] items.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompareState {
    #[serde(default)]
    items: Vec<VehicleSnapshot>,
}

impl From<CompareState> for CompareStore {
    fn from(state: CompareState) -> Self {
        let mut store = Self::default();
        for item in state.items {
            store.add(item);
        }
        store
    }
}

impl CompareStore {
    pub fn items(&self) -> &[VehicleSnapshot] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= MAX_COMPARE
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.items.iter().any(|v| v.id == id)
    }

    pub fn add(&mut self, vehicle: VehicleSnapshot) -> CompareOutcome {
        if self.contains(vehicle.id) {
            return CompareOutcome::AlreadyPresent;
        }
        if self.is_full() {
            let evicted = self.items.remove(0);
            self.items.push(vehicle);
            return CompareOutcome::Replaced(evicted.id);
        }
        self.items.push(vehicle);
        CompareOutcome::Added
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|v| v.id != id);
        self.items.len() != before
    }

    /// Adds or removes; returns whether the vehicle is in the tray afterwards.
    pub fn toggle(&mut self, vehicle: VehicleSnapshot) -> bool {
        if self.remove(vehicle.id) {
            false
        } else {
            self.add(vehicle);
            true
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl PersistentStore for CompareStore {
    const STORAGE_KEY: &'static str = "compare-store";
}
