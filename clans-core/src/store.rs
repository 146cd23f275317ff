//! Persistent key -> record stores.
//!
//! Clans and members each live in their own store. The engine only
//! depends on the [`RecordStore`] trait; hosts pick between the
//! in-memory reference implementation and the durable JSON file store.

use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A keyed record store.
///
/// Map operations act on in-memory state; [`save`](RecordStore::save)
/// flushes that state to durable storage. Iteration order is the key
/// order, so batch passes over a store are deterministic.
pub trait RecordStore<R> {
    fn exists(&self, key: &str) -> bool;

    fn get(&self, key: &str) -> Option<&R>;

    fn set(&mut self, key: &str, record: R);

    fn remove(&mut self, key: &str) -> Option<R>;

    /// All records, keyed by name.
    fn all(&self) -> &BTreeMap<String, R>;

    /// Flush current state to durable storage.
    fn save(&self) -> Result<(), StoreError>;

    fn len(&self) -> usize {
        self.all().len()
    }

    fn is_empty(&self) -> bool {
        self.all().is_empty()
    }
}

/// In-memory reference store. `save` is a no-op; state is lost when
/// the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore<R> {
    records: BTreeMap<String, R>,
}

impl<R> MemoryStore<R> {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }
}

impl<R> RecordStore<R> for MemoryStore<R> {
    fn exists(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<&R> {
        self.records.get(key)
    }

    fn set(&mut self, key: &str, record: R) {
        self.records.insert(key.to_string(), record);
    }

    fn remove(&mut self, key: &str) -> Option<R> {
        self.records.remove(key)
    }

    fn all(&self) -> &BTreeMap<String, R> {
        &self.records
    }

    fn save(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Durable store backed by a single pretty-printed JSON file holding
/// the full key -> record map.
#[derive(Debug)]
pub struct JsonFileStore<R> {
    path: PathBuf,
    records: BTreeMap<String, R>,
}

impl<R> JsonFileStore<R>
where
    R: Serialize + DeserializeOwned,
{
    /// Load a store from `path`. A missing file yields an empty store;
    /// a malformed file is an error rather than silently defaulting.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let records = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, records })
    }

    /// Path this store flushes to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R> RecordStore<R> for JsonFileStore<R>
where
    R: Serialize + DeserializeOwned,
{
    fn exists(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<&R> {
        self.records.get(key)
    }

    fn set(&mut self, key: &str, record: R) {
        self.records.insert(key.to_string(), record);
    }

    fn remove(&mut self, key: &str) -> Option<R> {
        self.records.remove(key)
    }

    fn all(&self) -> &BTreeMap<String, R> {
        &self.records
    }

    fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.records)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clan::{Clan, Member};
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_basic_ops() {
        let mut store: MemoryStore<Member> = MemoryStore::new();
        assert!(store.is_empty());
        assert!(!store.exists("Avia"));

        store.set("Avia", Member::founder("Embers", 0));
        assert!(store.exists("Avia"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("Avia").unwrap().clan, "Embers");

        let removed = store.remove("Avia");
        assert!(removed.is_some());
        assert!(!store.exists("Avia"));
        assert!(store.remove("Avia").is_none());
    }

    #[test]
    fn test_memory_store_iterates_in_key_order() {
        let mut store: MemoryStore<Member> = MemoryStore::new();
        store.set("Cato", Member::recruit("Embers", 0));
        store.set("Avia", Member::founder("Embers", 0));
        store.set("Bren", Member::recruit("Embers", 0));

        let keys: Vec<_> = store.all().keys().cloned().collect();
        assert_eq!(keys, vec!["Avia", "Bren", "Cato"]);
    }

    #[test]
    fn test_json_store_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store: JsonFileStore<Clan> = JsonFileStore::load(dir.path().join("clans.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_json_store_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clans.json");

        let mut store: JsonFileStore<Clan> = JsonFileStore::load(&path).unwrap();
        store.set("Embers", Clan::found("Embers", "Avia", 42));
        store.save().unwrap();

        let reloaded: JsonFileStore<Clan> = JsonFileStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get("Embers").unwrap().leader, "Avia");
    }

    #[test]
    fn test_json_store_creates_parent_dirs_on_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("clans.json");

        let mut store: JsonFileStore<Clan> = JsonFileStore::load(&path).unwrap();
        store.set("Embers", Clan::found("Embers", "Avia", 42));
        store.save().unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_json_store_rejects_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clans.json");
        std::fs::write(&path, "not json at all").unwrap();

        let result: Result<JsonFileStore<Clan>, _> = JsonFileStore::load(&path);
        assert!(matches!(result, Err(StoreError::Json(_))));
    }

    #[test]
    fn test_json_store_rejects_wrong_record_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clans.json");
        // Valid JSON, but records are missing required fields.
        std::fs::write(&path, r#"{"Embers": {"tag": "Embe"}}"#).unwrap();

        let result: Result<JsonFileStore<Clan>, _> = JsonFileStore::load(&path);
        assert!(matches!(result, Err(StoreError::Json(_))));
    }
}
