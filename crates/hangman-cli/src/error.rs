//! Hangman CLI — error types.

use std::process::ExitCode;

use hangman_core::error::GameError;
use thiserror::Error;

/// Startup and runtime errors for the terminal front end.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable is missing a usable value.
    #[error("configuration error: {0}")]
    Config(String),

    /// Terminal or filesystem I/O failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The engine refused to start or continue.
    #[error("game error: {0}")]
    Game(#[from] GameError),
}

impl AppError {
    /// Process exit status for this error, following `sysexits.h`.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        let code = match self {
            Self::Config(_) => 78,
            Self::Io(_) => 74,
            Self::Game(_) => 65,
        };
        ExitCode::from(code)
    }
}
