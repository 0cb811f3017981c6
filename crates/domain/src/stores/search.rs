//! Current catalog filters plus recent free-text queries.

use serde::{Deserialize, Serialize};

use super::storage::PersistentStore;
use crate::models::vehicle::{VehicleFilters, VehicleSort};

pub const MAX_RECENT_QUERIES: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStore {
    #[serde(default)]
    filters: VehicleFilters,
    #[serde(default)]
    sort: VehicleSort,
    #[serde(default)]
    recent_queries: Vec<String>,
}

impl SearchStore {
    pub fn filters(&self) -> &VehicleFilters {
        &self.filters
    }

    pub fn sort(&self) -> VehicleSort {
        self.sort
    }

    pub fn recent_queries(&self) -> &[String] {
        &self.recent_queries
    }

    pub fn set_filters(&mut self, filters: VehicleFilters) {
        self.filters = filters;
    }

    pub fn set_sort(&mut self, sort: VehicleSort) {
        self.sort = sort;
    }

    /// Clears filters and sort; history is kept.
    pub fn reset_filters(&mut self) {
        self.filters = VehicleFilters::default();
        self.sort = VehicleSort::default();
    }

    /// Records a query at the front. Case-insensitive duplicates are moved,
    /// not repeated; blank queries are ignored.
    pub fn push_query(&mut self, query: &str) {
        let query = query.split_whitespace().collect::<Vec<_>>().join(" ");
        if query.is_empty() {
            return;
        }
        let lowered = query.to_lowercase();
        self.recent_queries.retain(|q| q.to_lowercase() != lowered);
        self.recent_queries.insert(0, query);
        self.recent_queries.truncate(MAX_RECENT_QUERIES);
    }

    pub fn clear_history(&mut self) {
        self.recent_queries.clear();
    }
}

impl PersistentStore for SearchStore {
    const STORAGE_KEY: &'static str = "search-store";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::storage::MemoryStorage;

    #[test]
    fn test_queries_deduplicated_most_recent_first() {
        let mut store = SearchStore::default();
        store.push_query("rav4");
        store.push_query("Civic");
        store.push_query("  RAV4 ");
        store.push_query("   ");
        assert_eq!(store.recent_queries(), &["RAV4".to_string(), "Civic".to_string()]);
    }

    #[test]
    fn test_history_bounded() {
        let mut store = SearchStore::default();
        for i in 0..15 {
            store.push_query(&format!("query {}", i));
        }
        assert_eq!(store.recent_queries().len(), MAX_RECENT_QUERIES);
        assert_eq!(store.recent_queries()[0], "query 14");
    }

    #[test]
    fn test_reset_keeps_history() {
        let storage = MemoryStorage::new();
        let mut store = SearchStore::default();
        store.set_filters(VehicleFilters {
            make: Some("Honda".to_string()),
            ..Default::default()
        });
        store.set_sort(VehicleSort::PriceAsc);
        store.push_query("accord");
        store.save(&storage).unwrap();

        let mut loaded = SearchStore::load(&storage);
        assert_eq!(loaded.filters().make.as_deref(), Some("Honda"));
        loaded.reset_filters();
        assert!(loaded.filters().is_empty());
        assert_eq!(loaded.sort(), VehicleSort::Newest);
        assert_eq!(loaded.recent_queries().len(), 1);

        loaded.clear_history();
        assert!(loaded.recent_queries().is_empty());
    }
}
