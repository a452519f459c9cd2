//! Runtime configuration read from `HANGMAN_*` environment variables.

use std::path::PathBuf;
use std::str::FromStr;

use hangman_engine::EngineConfig;
use hangman_engine::domain::timed::DEFAULT_TICK_MS;
use hangman_words::domain::catalog::Difficulty;

use crate::error::AppError;

/// Directory used for saved progress when `HANGMAN_DATA_DIR` is unset.
pub const DEFAULT_DATA_DIR: &str = ".hangman";

/// How log lines are formatted on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable single lines.
    Compact,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "compact" | "text" => Ok(Self::Compact),
            other => Err(AppError::Config(format!(
                "HANGMAN_LOG_FORMAT must be json or compact, got {other:?}"
            ))),
        }
    }
}

/// Settings for one run of the terminal game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Where statistics, achievements and the word cache are written.
    pub data_dir: PathBuf,
    /// Word list tried before the cache and the bundled words.
    pub words_file: Option<PathBuf>,
    /// Difficulty of the first round.
    pub difficulty: Difficulty,
    /// Category of the first round.
    pub category: String,
    /// Countdown per round; untimed when `None`.
    pub time_limit_ms: Option<u64>,
    /// Interval between countdown ticks.
    pub tick_ms: u64,
    /// Log line format.
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            words_file: None,
            difficulty: engine.difficulty,
            category: engine.category,
            time_limit_ms: None,
            tick_ms: DEFAULT_TICK_MS,
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from `lookup`, which maps a variable name to its
    /// value. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an unusable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(dir) = get("HANGMAN_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        config.words_file = get("HANGMAN_WORDS_FILE").map(PathBuf::from);
        if let Some(value) = get("HANGMAN_DIFFICULTY") {
            config.difficulty = value
                .parse()
                .map_err(|e| AppError::Config(format!("HANGMAN_DIFFICULTY: {e}")))?;
        }
        if let Some(value) = get("HANGMAN_CATEGORY") {
            config.category = value.trim().to_lowercase();
        }
        if let Some(value) = get("HANGMAN_TIME_LIMIT_MS") {
            config.time_limit_ms = Some(positive("HANGMAN_TIME_LIMIT_MS", &value)?);
        }
        if let Some(value) = get("HANGMAN_TICK_MS") {
            config.tick_ms = positive("HANGMAN_TICK_MS", &value)?;
        }
        if let Some(value) = get("HANGMAN_LOG_FORMAT") {
            config.log_format = value.parse()?;
        }
        Ok(config)
    }

    /// Engine tunables derived from this config.
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            difficulty: self.difficulty,
            category: self.category.clone(),
            tick_interval_ms: self.tick_ms,
            ..EngineConfig::default()
        }
    }
}

fn positive(name: &str, value: &str) -> Result<u64, AppError> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(AppError::Config(format!("{name} must be positive"))),
        Ok(n) => Ok(n),
        Err(e) => Err(AppError::Config(format!(
            "{name} must be a whole number of milliseconds: {e}"
        ))),
    }
}
