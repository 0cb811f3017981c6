//! Storage backends for the client list stores.
//!
//! Stores are serialized as `{ "version": N, "state": ... }` under a fixed
//! key. A missing, corrupt or version-mismatched payload loads as an empty
//! store.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage-level failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Key/value persistence for serialized stores.
pub trait StoreStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoreStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a directory.
///
/// Writes go to a temporary file that is synced and renamed over the target.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    root: PathBuf,
}

impl JsonFileStorage {
    /// Creates the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl StoreStorage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        {
            let mut file = File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    state: T,
}

/// A store that can be saved to and loaded from a [`StoreStorage`].
pub trait PersistentStore: Serialize + DeserializeOwned + Default {
    /// Storage key, e.g. `"compare-store"`.
    const STORAGE_KEY: &'static str;
    /// Bumped when the serialized shape changes; older payloads are dropped.
    const VERSION: u32 = 1;

    /// Loads the store, falling back to an empty one on any problem.
    fn load(storage: &dyn StoreStorage) -> Self {
        let raw = match storage.get(Self::STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::default(),
            Err(e) => {
                tracing::warn!(key = Self::STORAGE_KEY, error = %e, "Store read failed, starting empty");
                return Self::default();
            }
        };

        match serde_json::from_str::<Envelope<Self>>(&raw) {
            Ok(envelope) if envelope.version == Self::VERSION => envelope.state,
            Ok(envelope) => {
                tracing::info!(
                    key = Self::STORAGE_KEY,
                    found = envelope.version,
                    expected = Self::VERSION,
                    "Store version changed, starting empty"
                );
                Self::default()
            }
            Err(e) => {
                tracing::warn!(key = Self::STORAGE_KEY, error = %e, "Corrupt store payload, starting empty");
                Self::default()
            }
        }
    }

    fn save(&self, storage: &dyn StoreStorage) -> Result<(), StoreError> {
        let payload = serde_json::to_string(&Envelope {
            version: Self::VERSION,
            state: self,
        })?;
        storage.set(Self::STORAGE_KEY, &payload)
    }

    /// Removes the persisted payload.
    fn forget(storage: &dyn StoreStorage) -> Result<(), StoreError> {
        storage.remove(Self::STORAGE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        value: u32,
    }

    impl PersistentStore for Counter {
        const STORAGE_KEY: &'static str = "counter";
    }

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct CounterV2 {
        value: u32,
    }

    impl PersistentStore for CounterV2 {
        const STORAGE_KEY: &'static str = "counter";
        const VERSION: u32 = 2;
    }

    #[test]
    fn test_memory_round_trip() {
        let storage = MemoryStorage::new();
        Counter { value: 7 }.save(&storage).unwrap();
        assert_eq!(Counter::load(&storage), Counter { value: 7 });

        Counter::forget(&storage).unwrap();
        assert_eq!(Counter::load(&storage), Counter::default());
    }

    #[test]
    fn test_corrupt_payload_loads_empty() {
        let storage = MemoryStorage::new();
        storage.set("counter", "{not json").unwrap();
        assert_eq!(Counter::load(&storage), Counter::default());
    }

    #[test]
    fn test_version_mismatch_loads_empty() {
        let storage = MemoryStorage::new();
        Counter { value: 3 }.save(&storage).unwrap();
        assert_eq!(CounterV2::load(&storage), CounterV2::default());
    }

    #[test]
    fn test_json_file_storage() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("stores")).unwrap();

        assert!(storage.get("counter").unwrap().is_none());
        Counter { value: 11 }.save(&storage).unwrap();
        assert!(storage.root().join("counter.json").exists());
        assert!(!storage.root().join("counter.json.tmp").exists());
        assert_eq!(Counter::load(&storage).value, 11);

        storage.remove("counter").unwrap();
        storage.remove("counter").unwrap();
        assert!(storage.get("counter").unwrap().is_none());
    }

    #[test]
    fn test_json_file_storage_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path()).unwrap();
        assert!(matches!(
            storage.set("../escape", "{}"),
            Err(StoreError::InvalidKey(_))
        ));
    }
}
