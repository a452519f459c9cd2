//! Integration tests for `FileStore`.

use std::path::PathBuf;

use hangman_core::error::GameError;
use hangman_core::store::{PersistenceStore, STATISTICS_KEY};
use hangman_store::file_store::FileStore;
use hangman_store::layout::staging_path;
use serde_json::json;
use uuid::Uuid;

/// A fresh directory under the system temp dir; removed on drop.
struct TempDir(PathBuf);

impl TempDir {
    fn new() -> Self {
        Self(std::env::temp_dir().join(format!("hangman-store-{}", Uuid::new_v4())))
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

// --- get ---

#[test]
fn test_get_missing_key_returns_none() {
    let dir = TempDir::new();
    let store = FileStore::new(&dir.0);

    assert_eq!(store.get(STATISTICS_KEY).unwrap(), None);
    assert!(!dir.0.exists());
}

#[test]
fn test_get_corrupt_file_is_a_storage_error() {
    let dir = TempDir::new();
    std::fs::create_dir_all(&dir.0).unwrap();
    std::fs::write(dir.0.join("statistics.json"), "{ not json").unwrap();
    let store = FileStore::new(&dir.0);

    match store.get(STATISTICS_KEY).unwrap_err() {
        GameError::Storage(msg) => assert!(msg.contains("statistics")),
        other => panic!("expected Storage, got {other:?}"),
    }
}

// --- set + get ---

#[test]
fn test_set_then_get_returns_blob() {
    let dir = TempDir::new();
    let store = FileStore::new(&dir.0);
    let blob = json!({"gamesWon": 3, "history": []});

    store.set(STATISTICS_KEY, blob.clone()).unwrap();

    assert_eq!(store.get(STATISTICS_KEY).unwrap(), Some(blob));
    assert!(dir.0.join("statistics.json").is_file());
    assert!(!staging_path(&dir.0, STATISTICS_KEY).exists());
}

#[test]
fn test_set_replaces_previous_blob() {
    let dir = TempDir::new();
    let store = FileStore::new(&dir.0);

    store.set("best_times", json!({"easy": 9000})).unwrap();
    store.set("best_times", json!({"easy": 4000})).unwrap();

    assert_eq!(
        store.get("best_times").unwrap(),
        Some(json!({"easy": 4000}))
    );
}

#[test]
fn test_blobs_survive_a_new_store_instance() {
    let dir = TempDir::new();
    FileStore::new(&dir.0)
        .set("achievements", json!({"firstWin": {"unlocked": true}}))
        .unwrap();

    let reopened = FileStore::new(&dir.0);

    assert_eq!(
        reopened.get("achievements").unwrap(),
        Some(json!({"firstWin": {"unlocked": true}}))
    );
}

#[test]
fn test_set_rejects_path_like_key() {
    let dir = TempDir::new();
    let store = FileStore::new(&dir.0);

    let err = store.set("../escape", json!(1)).unwrap_err();

    assert!(matches!(err, GameError::Storage(_)));
    assert!(!err.is_fatal());
}

#[test]
fn test_set_fails_when_root_is_a_file() {
    let dir = TempDir::new();
    std::fs::create_dir_all(&dir.0).unwrap();
    let file = dir.0.join("occupied");
    std::fs::write(&file, "x").unwrap();
    let store = FileStore::new(&file);

    match store.set(STATISTICS_KEY, json!({})).unwrap_err() {
        GameError::Storage(msg) => assert!(msg.contains(STATISTICS_KEY)),
        other => panic!("expected Storage, got {other:?}"),
    }
}

// --- remove ---

#[test]
fn test_remove_deletes_blob_and_tolerates_missing() {
    let dir = TempDir::new();
    let store = FileStore::new(&dir.0);
    store.set("word_cache", json!({"easy": {}})).unwrap();

    store.remove("word_cache").unwrap();
    store.remove("word_cache").unwrap();

    assert_eq!(store.get("word_cache").unwrap(), None);
}
