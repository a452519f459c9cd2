//! End-to-end word loading and selection against the bundled catalog.

use std::sync::Arc;

use hangman_core::error::GameError;
use hangman_core::store::WORD_CACHE_KEY;
use hangman_test_support::{MemoryStore, MockRng, SequenceRng};
use hangman_words::application::provider::{
    BundledWordProvider, CatalogSource, JsonFileWordProvider, RetryPolicy, Sleeper,
    TieredWordProvider, WordProvider,
};
use hangman_words::domain::catalog::{Difficulty, WordCatalog};
use hangman_words::domain::filters::{LengthFilter, SeenWords};
use hangman_words::domain::selector::{MASK, PracticeSelection, WordSelector};

struct NoSleep;

impl Sleeper for NoSleep {
    fn sleep(&self, _duration: std::time::Duration) {}
}

fn no_retry_delay() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 2,
        base_delay: std::time::Duration::ZERO,
        max_delay: std::time::Duration::ZERO,
    }
}

#[test]
fn test_bundled_phrases_mask_letters_but_keep_spaces() {
    let catalog = BundledWordProvider.load_words(None).unwrap();

    let selection = WordSelector::new()
        .select(&catalog, Difficulty::Hard, "space", None, &mut SequenceRng::new(vec![2]))
        .unwrap();

    assert_eq!(selection.word, "black hole");
    let rendered: String = selection.hidden.iter().collect();
    assert_eq!(rendered, format!("{0}{0}{0}{0}{0} {0}{0}{0}{0}", MASK));
}

#[test]
fn test_practice_session_cycles_through_whole_category_before_repeating() {
    let catalog = BundledWordProvider.load_words(Some(Difficulty::Easy)).unwrap();
    let pool_size = catalog.words(Difficulty::Easy, "space").unwrap().len();
    let mut seen = SeenWords::new();
    let mut served = Vec::new();

    for _ in 0..pool_size {
        let practice = PracticeSelection {
            length: LengthFilter::default(),
            allow_repeats: false,
            seen: &mut seen,
        };
        let selection = WordSelector::new()
            .select(&catalog, Difficulty::Easy, "space", Some(practice), &mut MockRng)
            .unwrap();
        assert!(!served.contains(&selection.word), "{} served twice", selection.word);
        served.push(selection.word);
    }
    assert_eq!(seen.count(Difficulty::Easy, "space"), pool_size);

    let practice = PracticeSelection {
        length: LengthFilter::default(),
        allow_repeats: false,
        seen: &mut seen,
    };
    WordSelector::new()
        .select(&catalog, Difficulty::Easy, "space", Some(practice), &mut MockRng)
        .unwrap();
    assert_eq!(seen.count(Difficulty::Easy, "space"), 1);
}

#[test]
fn test_corrupt_primary_file_falls_through_to_cache() {
    let dir = std::env::temp_dir().join(format!("hangman-words-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("corrupt-words.json");
    std::fs::write(&path, "{ not json").unwrap();

    let mut cached = WordCatalog::new();
    cached.insert(Difficulty::Easy, "cached", ["kiwi"]);
    let store = MemoryStore::with_blob(WORD_CACHE_KEY, serde_json::to_value(&cached).unwrap());

    let provider =
        TieredWordProvider::new(Box::new(JsonFileWordProvider::new(&path)), Arc::new(store))
            .with_retry(no_retry_delay())
            .with_sleeper(Box::new(NoSleep));
    let (catalog, source) = provider.load_with_source(None).unwrap();

    assert_eq!(source, CatalogSource::Cache);
    assert_eq!(catalog.words(Difficulty::Easy, "cached").unwrap(), ["kiwi"]);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_valid_primary_file_is_served_and_cached() {
    let dir = std::env::temp_dir().join(format!("hangman-words-ok-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("words.json");
    std::fs::write(&path, r#"{"medium": {"birds": ["pelican", "Toucan", "??"]}}"#).unwrap();
    let store = MemoryStore::new();

    let provider = TieredWordProvider::new(
        Box::new(JsonFileWordProvider::new(&path)),
        Arc::new(store.clone()),
    )
    .with_retry(no_retry_delay())
    .with_sleeper(Box::new(NoSleep));
    let catalog = provider.load_words(None).unwrap();

    assert_eq!(catalog.words(Difficulty::Medium, "birds").unwrap(), ["pelican", "toucan"]);
    let cached = WordCatalog::from_value(store.blob(WORD_CACHE_KEY).unwrap()).unwrap();
    assert_eq!(cached, catalog);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_empty_primary_catalog_is_rejected() {
    let dir = std::env::temp_dir().join(format!("hangman-words-empty-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("words.json");
    std::fs::write(&path, r#"{"easy": {"junk": ["1", "!"]}}"#).unwrap();

    let err = JsonFileWordProvider::new(&path).load_words(None).unwrap_err();

    assert!(matches!(err, GameError::InvalidCatalog(_)));
    std::fs::remove_file(&path).unwrap();
}
