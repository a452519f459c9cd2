//! Game error types and recovery policy.

use thiserror::Error;

/// Top-level error type shared by every hangman crate.
#[derive(Debug, Error)]
pub enum GameError {
    /// The word catalog is malformed or contains no usable words.
    #[error("invalid word catalog: {0}")]
    InvalidCatalog(String),

    /// Word selection ran out of substitution attempts.
    #[error("cannot select a word after {attempts} attempts")]
    SelectionExhausted {
        /// Number of attempts made before giving up.
        attempts: u32,
    },

    /// A category name that the catalog does not contain.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// Input rejected by a domain rule.
    #[error("validation error: {0}")]
    Validation(String),

    /// The persistence backend refused a read or write.
    #[error("storage error: {0}")]
    Storage(String),

    /// A remote word source failed or timed out.
    #[error("network error: {0}")]
    Network(String),
}

/// Coarse classification of a [`GameError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing word data, or invalid selection input.
    Data,
    /// Persistence unavailable or over quota.
    Storage,
    /// Word fetch failure.
    Network,
}

/// What the caller should do about an error of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Substitute the nearest valid difficulty/category and retry, bounded.
    SubstituteAndRetry,
    /// Move on to the next word provider tier.
    FallBackToNextTier,
    /// Drop the write and keep playing from memory.
    ContinueInMemory,
}

impl GameError {
    /// Returns the kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCatalog(_)
            | Self::SelectionExhausted { .. }
            | Self::UnknownCategory(_)
            | Self::Validation(_) => ErrorKind::Data,
            Self::Storage(_) => ErrorKind::Storage,
            Self::Network(_) => ErrorKind::Network,
        }
    }

    /// Returns the recovery strategy for this error.
    #[must_use]
    pub fn recovery(&self) -> Recovery {
        self.kind().recovery()
    }

    /// Whether the session can carry on after this error.
    ///
    /// Only an exhausted word selection is fatal: the engine cannot start a
    /// round without a word.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::SelectionExhausted { .. })
    }
}

impl ErrorKind {
    /// Returns the recovery strategy for this kind.
    #[must_use]
    pub fn recovery(self) -> Recovery {
        match self {
            Self::Data => Recovery::SubstituteAndRetry,
            Self::Network => Recovery::FallBackToNextTier,
            Self::Storage => Recovery::ContinueInMemory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_errors_substitute_and_retry() {
        for err in [
            GameError::InvalidCatalog("empty".into()),
            GameError::SelectionExhausted { attempts: 5 },
            GameError::UnknownCategory("dinosaurs".into()),
            GameError::Validation("bad".into()),
        ] {
            assert_eq!(err.kind(), ErrorKind::Data);
            assert_eq!(err.recovery(), Recovery::SubstituteAndRetry);
        }
    }

    #[test]
    fn test_storage_errors_continue_in_memory() {
        let err = GameError::Storage("quota exceeded".into());
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert_eq!(err.recovery(), Recovery::ContinueInMemory);
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_network_errors_fall_back() {
        let err = GameError::Network("timeout".into());
        assert_eq!(err.recovery(), Recovery::FallBackToNextTier);
    }

    #[test]
    fn test_only_exhausted_selection_is_fatal() {
        assert!(GameError::SelectionExhausted { attempts: 5 }.is_fatal());
        assert!(!GameError::InvalidCatalog("x".into()).is_fatal());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            GameError::SelectionExhausted { attempts: 5 }.to_string(),
            "cannot select a word after 5 attempts"
        );
        assert_eq!(
            GameError::Storage("disabled".into()).to_string(),
            "storage error: disabled"
        );
    }
}
