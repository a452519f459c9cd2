//! Key/value persistence abstraction.

use crate::error::GameError;

/// Key under which unlocked achievements are stored.
pub const ACHIEVEMENTS_KEY: &str = "achievements";

/// Key under which lifetime statistics are stored.
pub const STATISTICS_KEY: &str = "statistics";

/// Key under which per-difficulty best times are stored.
pub const BEST_TIMES_KEY: &str = "best_times";

/// Key under which practice progress (seen words, hint counts) is stored.
pub const PRACTICE_PROGRESS_KEY: &str = "practice_progress";

/// Key under which the last successfully fetched word catalog is cached.
pub const WORD_CACHE_KEY: &str = "word_cache";

/// Synchronous key/value store over JSON blobs.
///
/// Both operations may fail (quota exceeded, storage disabled). Callers in
/// the engine treat failures as no-ops and keep playing from memory.
pub trait PersistenceStore: Send + Sync {
    /// Loads the blob stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Storage` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, GameError>;

    /// Stores `value` under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Storage` if the backend cannot be written.
    fn set(&self, key: &str, value: serde_json::Value) -> Result<(), GameError>;
}
