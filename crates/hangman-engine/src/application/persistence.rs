//! Best-effort typed access to the persistence store.
//!
//! Reads fall back to defaults and writes are dropped on failure; either
//! way a warning is logged and play continues from memory.

use std::sync::Arc;

use hangman_core::error::GameError;
use hangman_core::store::PersistenceStore;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Wraps a [`PersistenceStore`] with serde and failure handling.
#[derive(Clone)]
pub struct PersistenceGateway {
    store: Arc<dyn PersistenceStore>,
}

impl std::fmt::Debug for PersistenceGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceGateway").finish_non_exhaustive()
    }
}

impl PersistenceGateway {
    /// Wraps `store`.
    #[must_use]
    pub fn new(store: Arc<dyn PersistenceStore>) -> Self {
        Self { store }
    }

    /// Loads and decodes `key`, or returns `T::default()` if the blob is
    /// missing, unreadable or malformed.
    #[must_use]
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.try_load(key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!(key, "no stored blob; using defaults");
                T::default()
            }
            Err(e) => {
                warn!(key, error = %e, "failed to load stored blob; using defaults");
                T::default()
            }
        }
    }

    /// Encodes and stores `value` under `key`. Returns whether it was saved.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> bool {
        let result = serde_json::to_value(value)
            .map_err(|e| GameError::Storage(format!("encoding {key} failed: {e}")))
            .and_then(|blob| self.store.set(key, blob));
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "failed to save; continuing in memory");
                false
            }
        }
    }

    fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, GameError> {
        let Some(blob) = self.store.get(key)? else {
            return Ok(None);
        };
        serde_json::from_value(blob)
            .map(Some)
            .map_err(|e| GameError::Storage(format!("decoding {key} failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::statistics::BestTimes;
    use hangman_core::store::BEST_TIMES_KEY;
    use hangman_test_support::{FailingStore, MemoryStore};
    use hangman_words::domain::catalog::Difficulty;

    #[test]
    fn test_round_trips_through_store() {
        let store = MemoryStore::new();
        let gateway = PersistenceGateway::new(Arc::new(store.clone()));
        let mut best = BestTimes::default();
        best.record(Difficulty::Medium, 11_000);

        assert!(gateway.save(BEST_TIMES_KEY, &best));

        assert_eq!(store.blob(BEST_TIMES_KEY), Some(serde_json::json!({"medium": 11_000})));
        assert_eq!(gateway.load_or_default::<BestTimes>(BEST_TIMES_KEY), best);
    }

    #[test]
    fn test_missing_blob_loads_default() {
        let gateway = PersistenceGateway::new(Arc::new(MemoryStore::new()));
        assert_eq!(gateway.load_or_default::<BestTimes>(BEST_TIMES_KEY), BestTimes::default());
    }

    #[test]
    fn test_malformed_blob_loads_default() {
        let store = MemoryStore::with_blob(BEST_TIMES_KEY, serde_json::json!("not a map"));
        let gateway = PersistenceGateway::new(Arc::new(store));
        assert_eq!(gateway.load_or_default::<BestTimes>(BEST_TIMES_KEY), BestTimes::default());
    }

    #[test]
    fn test_failing_store_degrades_quietly() {
        let gateway = PersistenceGateway::new(Arc::new(FailingStore));
        assert_eq!(gateway.load_or_default::<BestTimes>(BEST_TIMES_KEY), BestTimes::default());
        assert!(!gateway.save(BEST_TIMES_KEY, &BestTimes::default()));
    }
}
