//! [`PersistenceStore`] over a directory of JSON files.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use hangman_core::error::GameError;
use hangman_core::store::PersistenceStore;
use tracing::{debug, instrument};

use crate::layout::{blob_path, staging_path, validate_key};

/// Stores each key as a pretty-printed JSON file under one directory.
///
/// The directory is created on first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory blobs are kept in.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deletes the blob under `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Storage` for an invalid key or an I/O failure.
    pub fn remove(&self, key: &str) -> Result<(), GameError> {
        validate_key(key)?;
        match fs::remove_file(blob_path(&self.root, key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error("removing", key, &e)),
        }
    }
}

impl PersistenceStore for FileStore {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, GameError> {
        validate_key(key)?;
        let path = blob_path(&self.root, key);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no blob on disk");
                return Ok(None);
            }
            Err(e) => return Err(storage_error("reading", key, &e)),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| GameError::Storage(format!("parsing {key} failed: {e}")))
    }

    #[instrument(skip(self, value), fields(root = %self.root.display()))]
    fn set(&self, key: &str, value: serde_json::Value) -> Result<(), GameError> {
        validate_key(key)?;
        fs::create_dir_all(&self.root).map_err(|e| storage_error("creating dir for", key, &e))?;

        let text = serde_json::to_string_pretty(&value)
            .map_err(|e| GameError::Storage(format!("encoding {key} failed: {e}")))?;
        let staging = staging_path(&self.root, key);
        fs::write(&staging, text).map_err(|e| storage_error("writing", key, &e))?;
        fs::rename(&staging, blob_path(&self.root, key))
            .map_err(|e| storage_error("committing", key, &e))?;

        debug!("blob written");
        Ok(())
    }
}

fn storage_error(action: &str, key: &str, err: &std::io::Error) -> GameError {
    GameError::Storage(format!("{action} {key} failed: {err}"))
}
