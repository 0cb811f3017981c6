//! In-process cache tier.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: String,
    expires_at: Instant,
    /// Monotonic insertion sequence used for trimming.
    seq: u64,
}

#[derive(Debug, Default)]
struct MemoryState {
    entries: HashMap<String, MemoryEntry>,
    next_seq: u64,
}

/// Expiring string map behind a `RwLock`.
///
/// Expired entries are invisible to `get` but only removed by `cleanup`.
#[derive(Debug)]
pub struct MemoryTier {
    state: RwLock<MemoryState>,
    max_items: usize,
}

impl MemoryTier {
    pub fn new(max_items: usize) -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
            max_items,
        }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        let state = self.state.read().await;
        state
            .entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone())
    }

    /// Inserts or replaces `key`. A replaced key counts as newly inserted.
    pub async fn set(&self, key: &str, value: String, ttl: Duration) {
        let mut state = self.state.write().await;
        let seq = state.next_seq;
        state.next_seq += 1;
        state.entries.insert(
            key.to_string(),
            MemoryEntry {
                value,
                expires_at: Instant::now() + ttl,
                seq,
            },
        );
    }

    pub async fn delete(&self, key: &str) -> bool {
        self.state.write().await.entries.remove(key).is_some()
    }

    /// Removes every key starting with `prefix`. Returns the number removed.
    pub async fn delete_prefix(&self, prefix: &str) -> usize {
        let mut state = self.state.write().await;
        let before = state.entries.len();
        state.entries.retain(|key, _| !key.starts_with(prefix));
        before - state.entries.len()
    }

    /// Drops expired entries, then the oldest inserted ones until at most
    /// `max_items` remain. Returns `(expired, trimmed)`.
    pub async fn cleanup(&self) -> (usize, usize) {
        let mut state = self.state.write().await;
        let now = Instant::now();

        let before = state.entries.len();
        state.entries.retain(|_, entry| entry.expires_at > now);
        let expired = before - state.entries.len();

        let overflow = state.entries.len().saturating_sub(self.max_items);
        if overflow > 0 {
            let mut by_age: Vec<(u64, String)> = state
                .entries
                .iter()
                .map(|(key, entry)| (entry.seq, key.clone()))
                .collect();
            by_age.sort_unstable();
            for (_, key) in by_age.into_iter().take(overflow) {
                state.entries.remove(&key);
            }
        }

        (expired, overflow)
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn clear(&self) {
        self.state.write().await.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_expired_entry_is_hidden() {
        let tier = MemoryTier::new(10);
        tier.set("a", "1".to_string(), Duration::from_millis(20)).await;
        assert_eq!(tier.get("a").await.as_deref(), Some("1"));

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(tier.get("a").await, None);
        assert_eq!(tier.len().await, 1);

        assert_eq!(tier.cleanup().await, (1, 0));
        assert_eq!(tier.len().await, 0);
    }

    #[tokio::test]
    async fn test_cleanup_trims_by_insertion_order() {
        let tier = MemoryTier::new(2);
        let ttl = Duration::from_secs(60);
        tier.set("first", "1".to_string(), ttl).await;
        tier.set("second", "2".to_string(), ttl).await;
        tier.set("third", "3".to_string(), ttl).await;

        // Reading does not protect an entry.
        assert!(tier.get("first").await.is_some());

        assert_eq!(tier.cleanup().await, (0, 1));
        assert_eq!(tier.get("first").await, None);
        assert!(tier.get("second").await.is_some());
        assert!(tier.get("third").await.is_some());
    }

    #[tokio::test]
    async fn test_delete_prefix() {
        let tier = MemoryTier::new(10);
        let ttl = Duration::from_secs(60);
        tier.set("vehicles:list:a", "1".to_string(), ttl).await;
        tier.set("vehicles:detail:b", "2".to_string(), ttl).await;
        tier.set("testimonials:public", "3".to_string(), ttl).await;

        assert_eq!(tier.delete_prefix("vehicles:").await, 2);
        assert_eq!(tier.len().await, 1);
        assert!(tier.delete("testimonials:public").await);
        assert!(!tier.delete("testimonials:public").await);
    }
}
