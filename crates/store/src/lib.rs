//! keyed in-memory store for values produced by the history pipeline
//!
//! the store has no opinion on what it holds, eviction is performed by callers
//! through [`MemoryStore::remove`] or [`MemoryStore::clear`]
use {
    anyhow::{Context, Result},
    parking_lot::RwLock,
    serde::{de::DeserializeOwned, Serialize},
    std::{collections::HashMap, path::Path},
};


pub struct MemoryStore<V> {
    entries: RwLock<HashMap<String, V>>,
}

impl<V> Default for MemoryStore<V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V: Clone> MemoryStore<V> {
    pub fn new() -> Self {
        Self::default()
    }
    /// inserts the value, replacing and returning any previous value stored under `key`
    pub fn insert(&self, key: impl Into<String>, value: V) -> Option<V> {
        self.entries.write().insert(key.into(), value)
    }
    pub fn get(&self, key: &str) -> Option<V> {
        self.entries.read().get(key).cloned()
    }
    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }
    pub fn remove(&self, key: &str) -> Option<V> {
        self.entries.write().remove(key)
    }
    pub fn clear(&self) {
        self.entries.write().clear();
    }
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
    pub fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }
}

impl<V: Clone + Serialize + DeserializeOwned> MemoryStore<V> {
    /// writes every entry to `path` as a json object keyed by id
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = {
            let entries = self.entries.read();
            serde_json::to_vec(&*entries).with_context(|| "failed to serialize store")?
        };
        std::fs::write(path, data).with_context(|| format!("failed to write store to {path:?}"))
    }
    /// loads a store previously written by [`MemoryStore::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data =
            std::fs::read(path).with_context(|| format!("failed to read store from {path:?}"))?;
        let entries: HashMap<String, V> =
            serde_json::from_slice(&data).with_context(|| "failed to deserialize store")?;
        log::debug!("loaded {} entries from {path:?}", entries.len());
        Ok(Self {
            entries: RwLock::new(entries),
        })
    }
}
