//! On-disk layout of the blob directory.
//!
//! Each key lives in its own `<key>.json` file. Writes go to a sibling
//! `<key>.json.tmp` first and are renamed into place.

use std::path::{Path, PathBuf};

use hangman_core::error::GameError;

/// Extension of committed blobs.
pub const BLOB_EXTENSION: &str = "json";

/// Extension of in-flight writes.
pub const STAGING_EXTENSION: &str = "json.tmp";

/// Checks that `key` can be used as a file stem.
///
/// # Errors
///
/// Returns `GameError::Storage` unless `key` is non-empty and made of ASCII
/// letters, digits, `_` or `-`.
pub fn validate_key(key: &str) -> Result<(), GameError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(GameError::Storage(format!("invalid storage key {key:?}")))
    }
}

/// Path of the committed blob for `key`.
#[must_use]
pub fn blob_path(root: &Path, key: &str) -> PathBuf {
    root.join(format!("{key}.{BLOB_EXTENSION}"))
}

/// Path a write for `key` is staged at.
#[must_use]
pub fn staging_path(root: &Path, key: &str) -> PathBuf {
    root.join(format!("{key}.{STAGING_EXTENSION}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_engine_keys() {
        for key in ["statistics", "best_times", "practice-progress", "v2"] {
            assert!(validate_key(key).is_ok(), "{key}");
        }
    }

    #[test]
    fn test_rejects_keys_that_escape_the_directory() {
        for key in ["", "../secrets", "a/b", "stats.json", "with space"] {
            match validate_key(key).unwrap_err() {
                GameError::Storage(msg) => assert!(msg.contains("invalid storage key")),
                other => panic!("expected Storage, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_paths_share_directory() {
        let root = Path::new("/tmp/hangman");
        assert_eq!(blob_path(root, "statistics"), root.join("statistics.json"));
        assert_eq!(
            staging_path(root, "statistics"),
            root.join("statistics.json.tmp")
        );
    }
}
