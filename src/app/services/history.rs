//! Recent-queries history cache
//!
//! A bounded, newest-first list of recently submitted coordinate pairs,
//! persisted as JSON under a single named key through an injected
//! key-value storage port. The cache is process-wide: it starts empty when
//! the store has nothing under the key and has no explicit teardown.

use std::collections::BTreeMap;
use std::path::PathBuf;
#[cfg(test)]
use std::sync::Mutex;

use tracing::debug;

use crate::app::models::HistoryEntry;
use crate::{Error, Result};

/// Abstract key-value persistence port the cache depends on
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
}

/// Key-value store backed by a single JSON object file.
///
/// Assumes at most one writer at a time from a single execution context;
/// it is not safe for concurrent writers.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::io(format!("Failed to read store {}", self.path.display()), e)
        })?;

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&content)?)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_map()?.remove(key))
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::io(format!("Failed to create {}", parent.display()), e)
            })?;
        }

        let content = serde_json::to_string_pretty(&map)?;
        std::fs::write(&self.path, content).map_err(|e| {
            Error::io(format!("Failed to write store {}", self.path.display()), e)
        })?;

        Ok(())
    }
}

/// In-memory key-value store backing the cache tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<BTreeMap<String, String>>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.inner.lock().expect("store lock poisoned").get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.inner
            .lock()
            .expect("store lock poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Bounded recent-queries cache over a persistence port
pub struct HistoryCache<S> {
    store: S,
    key: String,
    capacity: usize,
}

impl<S: KeyValueStore> HistoryCache<S> {
    pub fn new(store: S, key: impl Into<String>, capacity: usize) -> Self {
        Self {
            store,
            key: key.into(),
            capacity,
        }
    }

    /// Current ordered list, newest first; empty when nothing is persisted
    pub fn load(&self) -> Result<Vec<HistoryEntry>> {
        match self.store.get(&self.key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Insert or move `entry` to the front, then truncate to capacity.
    ///
    /// A prior entry with the same exact coordinates is removed first, so a
    /// resubmission moves to the front instead of duplicating. Returns the
    /// updated list.
    pub fn record(&self, entry: HistoryEntry) -> Result<Vec<HistoryEntry>> {
        let mut entries = self.load()?;

        entries.retain(|existing| !existing.same_location(&entry));
        entries.insert(0, entry);
        entries.truncate(self.capacity);

        self.store.put(&self.key, &serde_json::to_string(&entries)?)?;
        debug!("History now holds {} entries", entries.len());

        Ok(entries)
    }
}
