//! Test stores — in-memory and failing `PersistenceStore` implementations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use hangman_core::error::GameError;
use hangman_core::store::PersistenceStore;

/// An in-memory store that records every write.
///
/// Clones share the same map, so a test can inspect what the engine saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: Arc<Mutex<HashMap<String, serde_json::Value>>>,
    writes: Arc<Mutex<Vec<String>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with one blob.
    #[must_use]
    pub fn with_blob(key: &str, value: serde_json::Value) -> Self {
        let store = Self::new();
        store.blobs.lock().unwrap().insert(key.to_owned(), value);
        store
    }

    /// Returns the blob currently stored under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn blob(&self, key: &str) -> Option<serde_json::Value> {
        self.blobs.lock().unwrap().get(key).cloned()
    }

    /// Returns the keys written so far, in write order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn written_keys(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }
}

impl PersistenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, GameError> {
        Ok(self.blobs.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: serde_json::Value) -> Result<(), GameError> {
        self.writes.lock().unwrap().push(key.to_owned());
        self.blobs.lock().unwrap().insert(key.to_owned(), value);
        Ok(())
    }
}

/// A store that always returns a storage error. Useful for testing that the
/// engine degrades to in-memory play.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStore;

impl PersistenceStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<serde_json::Value>, GameError> {
        Err(GameError::Storage("storage disabled".into()))
    }

    fn set(&self, _key: &str, _value: serde_json::Value) -> Result<(), GameError> {
        Err(GameError::Storage("quota exceeded".into()))
    }
}
