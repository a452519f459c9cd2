//! Assembles the engine and its collaborators from a [`Config`].

use std::sync::Arc;

use hangman_core::clock::SystemClock;
use hangman_core::event::EventSink;
use hangman_core::rng::{DeterministicRng, StdRandom};
use hangman_core::store::PersistenceStore;
use hangman_engine::{EngineContext, GameEvent, GameStateMachine};
use hangman_store::file_store::FileStore;
use hangman_words::application::provider::{
    BundledWordProvider, CatalogSource, JsonFileWordProvider, TieredWordProvider, WordProvider,
};
use hangman_words::domain::catalog::WordCatalog;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppError;

/// Builds the word provider chain for `config`.
///
/// With no words file the primary tier is the bundled list itself, so the
/// cache only ever holds what a real source served.
#[must_use]
pub fn word_provider(config: &Config, store: Arc<dyn PersistenceStore>) -> TieredWordProvider {
    let primary: Box<dyn WordProvider> = match &config.words_file {
        Some(path) => Box::new(JsonFileWordProvider::new(path.clone())),
        None => Box::new(BundledWordProvider),
    };
    TieredWordProvider::new(primary, store)
}

/// Loads the catalog, logging which tier served it.
///
/// # Errors
///
/// Returns `AppError::Game` if every tier failed.
pub fn load_catalog(provider: &TieredWordProvider) -> Result<WordCatalog, AppError> {
    let (catalog, source) = provider.load_with_source(None)?;
    match source {
        CatalogSource::Primary => info!(words = catalog.word_count(), "word list loaded"),
        CatalogSource::Cache | CatalogSource::Bundled => {
            warn!(?source, words = catalog.word_count(), "using fallback word list");
        }
    }
    Ok(catalog)
}

/// Starts the engine, restoring saved progress from `store` and applying the
/// configured countdown.
///
/// # Errors
///
/// Returns `AppError::Game` if no first word can be selected.
pub fn build_engine(
    config: &Config,
    catalog: WordCatalog,
    store: Arc<dyn PersistenceStore>,
    rng: Box<dyn DeterministicRng>,
    sink: Arc<dyn EventSink<GameEvent>>,
) -> Result<GameStateMachine, AppError> {
    let ctx = EngineContext {
        clock: Arc::new(SystemClock),
        rng,
        store,
        sink,
    };
    let mut game = GameStateMachine::new(ctx, config.engine_config(), catalog)?;
    if let Some(limit_ms) = config.time_limit_ms {
        game.enable_timed_mode(limit_ms)?;
    }
    Ok(game)
}

/// Everything `main` needs, built from `config`.
///
/// # Errors
///
/// As [`load_catalog`] and [`build_engine`].
pub fn bootstrap(
    config: &Config,
    sink: Arc<dyn EventSink<GameEvent>>,
) -> Result<GameStateMachine, AppError> {
    let store: Arc<dyn PersistenceStore> = Arc::new(FileStore::new(config.data_dir.clone()));
    let catalog = load_catalog(&word_provider(config, Arc::clone(&store)))?;
    build_engine(config, catalog, store, Box::new(StdRandom::from_os()), sink)
}
