//! Word providers and the tiered fallback chain.
//!
//! A [`TieredWordProvider`] tries its primary source with retry and
//! exponential backoff, then the catalog cached from the last primary
//! success, then the catalog bundled into the binary. Each tier failure is
//! logged; only the exhaustion of every tier is reported to the caller.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use hangman_core::error::GameError;
use hangman_core::store::{PersistenceStore, WORD_CACHE_KEY};
use tracing::{debug, info, warn};

use crate::domain::catalog::{Difficulty, WordCatalog};

/// Catalog compiled into the binary as the last-resort tier.
static BUNDLED_WORDS: &str = include_str!("../../data/words.json");

/// Supplies word catalogs.
pub trait WordProvider: Send + Sync {
    /// Loads a catalog, restricted to one difficulty when `difficulty` is set.
    ///
    /// # Errors
    ///
    /// Returns `GameError` if the source is unavailable or its data is
    /// unusable.
    fn load_words(&self, difficulty: Option<Difficulty>) -> Result<WordCatalog, GameError>;
}

fn restrict(catalog: WordCatalog, difficulty: Option<Difficulty>) -> WordCatalog {
    match difficulty {
        Some(d) => catalog.restricted_to(d),
        None => catalog,
    }
}

fn non_empty(catalog: WordCatalog, source: &str) -> Result<WordCatalog, GameError> {
    if catalog.is_empty() {
        return Err(GameError::InvalidCatalog(format!("{source} catalog has no words")));
    }
    Ok(catalog)
}

/// Provider that serves the catalog embedded at build time.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledWordProvider;

impl WordProvider for BundledWordProvider {
    fn load_words(&self, difficulty: Option<Difficulty>) -> Result<WordCatalog, GameError> {
        let catalog = WordCatalog::from_json(BUNDLED_WORDS)?;
        non_empty(restrict(catalog, difficulty), "bundled")
    }
}

/// Provider that reads a JSON catalog file.
///
/// This is the primary tier in the terminal build; read failures are
/// reported as network errors because they play the role of a failed fetch.
#[derive(Debug, Clone)]
pub struct JsonFileWordProvider {
    path: PathBuf,
}

impl JsonFileWordProvider {
    /// Creates a provider reading `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl WordProvider for JsonFileWordProvider {
    fn load_words(&self, difficulty: Option<Difficulty>) -> Result<WordCatalog, GameError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            GameError::Network(format!("failed to read {}: {e}", self.path.display()))
        })?;
        let catalog = WordCatalog::from_json(&text)?;
        non_empty(restrict(catalog, difficulty), "file")
    }
}

/// Provider backed by the catalog last written to the persistence store.
#[derive(Clone)]
pub struct CachedWordProvider {
    store: Arc<dyn PersistenceStore>,
}

impl std::fmt::Debug for CachedWordProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedWordProvider").finish_non_exhaustive()
    }
}

impl CachedWordProvider {
    /// Creates a cache over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn PersistenceStore>) -> Self {
        Self { store }
    }

    /// Writes `catalog` to the cache.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Storage` if the write fails.
    pub fn save(&self, catalog: &WordCatalog) -> Result<(), GameError> {
        let value = serde_json::to_value(catalog)
            .map_err(|e| GameError::Storage(format!("catalog serialization failed: {e}")))?;
        self.store.set(WORD_CACHE_KEY, value)
    }
}

impl WordProvider for CachedWordProvider {
    fn load_words(&self, difficulty: Option<Difficulty>) -> Result<WordCatalog, GameError> {
        let value = self
            .store
            .get(WORD_CACHE_KEY)?
            .ok_or_else(|| GameError::InvalidCatalog("no cached catalog".to_owned()))?;
        let catalog = WordCatalog::from_value(value)?;
        non_empty(restrict(catalog, difficulty), "cached")
    }
}

/// Retry schedule for the primary tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after failed attempt number `attempt` (1-based):
    /// the base delay doubled per earlier failure, capped at `max_delay`.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Blocking wait between retries.
pub trait Sleeper: Send + Sync {
    /// Waits for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Sleeper that blocks the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Which tier produced a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    /// The primary source.
    Primary,
    /// The catalog cached from an earlier primary success.
    Cache,
    /// The catalog compiled into the binary.
    Bundled,
}

/// Primary → cache → bundled provider chain.
pub struct TieredWordProvider {
    primary: Box<dyn WordProvider>,
    cache: CachedWordProvider,
    bundled: BundledWordProvider,
    retry: RetryPolicy,
    sleeper: Box<dyn Sleeper>,
}

impl std::fmt::Debug for TieredWordProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TieredWordProvider")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl TieredWordProvider {
    /// Creates a chain over `primary`, caching into `store`.
    #[must_use]
    pub fn new(primary: Box<dyn WordProvider>, store: Arc<dyn PersistenceStore>) -> Self {
        Self {
            primary,
            cache: CachedWordProvider::new(store),
            bundled: BundledWordProvider,
            retry: RetryPolicy::default(),
            sleeper: Box::new(ThreadSleeper),
        }
    }

    /// Replaces the retry schedule.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replaces the sleeper used between retries.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Box<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Loads a catalog and reports which tier served it.
    ///
    /// # Errors
    ///
    /// Returns the bundled tier's error if every tier fails.
    pub fn load_with_source(
        &self,
        difficulty: Option<Difficulty>,
    ) -> Result<(WordCatalog, CatalogSource), GameError> {
        let primary = self.load_primary().and_then(|catalog| {
            if let Err(e) = self.cache.save(&catalog) {
                warn!(error = %e, "failed to cache word catalog");
            }
            non_empty(restrict(catalog, difficulty), "primary word source")
        });
        match primary {
            Ok(catalog) => return Ok((catalog, CatalogSource::Primary)),
            Err(e) => warn!(error = %e, "primary word source unavailable; trying cache"),
        }

        match self.cache.load_words(difficulty) {
            Ok(catalog) => {
                info!(words = catalog.word_count(), "serving cached word catalog");
                return Ok((catalog, CatalogSource::Cache));
            }
            Err(e) => warn!(error = %e, "cached word catalog unavailable; using bundled words"),
        }

        let catalog = self.bundled.load_words(difficulty)?;
        info!(words = catalog.word_count(), "serving bundled word catalog");
        Ok((catalog, CatalogSource::Bundled))
    }

    /// Loads every tier from the primary source, retrying with backoff.
    fn load_primary(&self) -> Result<WordCatalog, GameError> {
        let attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.primary.load_words(None) {
                Ok(catalog) => {
                    debug!(attempt, words = catalog.word_count(), "primary word source loaded");
                    return Ok(catalog);
                }
                Err(e) if attempt < attempts => {
                    let delay = self.retry.delay_after(attempt);
                    warn!(
                        attempt,
                        error = %e,
                        delay_ms = %delay.as_millis(),
                        "retrying primary word source"
                    );
                    self.sleeper.sleep(delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl WordProvider for TieredWordProvider {
    fn load_words(&self, difficulty: Option<Difficulty>) -> Result<WordCatalog, GameError> {
        self.load_with_source(difficulty).map(|(catalog, _)| catalog)
    }
}
