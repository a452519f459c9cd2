//! Practice mode: relaxed rules, word filters and the hint penalty.

use hangman_core::error::GameError;
use hangman_words::domain::catalog::Difficulty;
use hangman_words::domain::filters::{LengthFilter, SeenWords};
use hangman_words::domain::selector::PracticeSelection;
use serde::{Deserialize, Serialize};

/// Each hint multiplies the round's score penalty by this.
pub const HINT_PENALTY_FACTOR: f64 = 0.9;

/// The penalty never shrinks a score below this share.
pub const MIN_PENALTY_MULTIPLIER: f64 = 0.5;

/// Most mistakes a practice override may allow; there are only 26 letters.
pub const MAX_MISTAKES_OVERRIDE: u32 = 26;

/// Options chosen when practice mode is switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeSettings {
    /// Serve words already seen without waiting for the pool to run out.
    pub allow_repeats: bool,
    /// Start the next round automatically when one ends.
    pub endless: bool,
    /// Hold difficulty in place regardless of win streaks.
    pub locked_difficulty: Option<Difficulty>,
    /// Mistakes allowed per round instead of the default.
    pub max_mistakes_override: Option<u32>,
    /// Bounds on word length.
    pub word_length_filter: LengthFilter,
}

impl Default for PracticeSettings {
    fn default() -> Self {
        let defaults = PracticeMode::default();
        Self {
            allow_repeats: defaults.allow_repeats,
            endless: defaults.endless,
            locked_difficulty: defaults.locked_difficulty,
            max_mistakes_override: defaults.max_mistakes_override,
            word_length_filter: defaults.word_length_filter,
        }
    }
}

impl PracticeSettings {
    /// Checks the settings for contradictions.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Validation` if the mistake override falls outside
    /// `1..=`[`MAX_MISTAKES_OVERRIDE`] or the length filter's minimum exceeds
    /// its maximum.
    pub fn validate(&self) -> Result<(), GameError> {
        if let Some(limit) = self.max_mistakes_override {
            if !(1..=MAX_MISTAKES_OVERRIDE).contains(&limit) {
                return Err(GameError::Validation(format!(
                    "practice mistake limit must be between 1 and {MAX_MISTAKES_OVERRIDE}"
                )));
            }
        }
        if let LengthFilter {
            min: Some(min),
            max: Some(max),
        } = self.word_length_filter
        {
            if min > max {
                return Err(GameError::Validation(format!(
                    "word length filter min {min} exceeds max {max}"
                )));
            }
        }
        Ok(())
    }
}

/// Practice-mode state carried inside the game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeMode {
    /// Whether practice mode is on.
    pub enabled: bool,
    /// See [`PracticeSettings::allow_repeats`].
    pub allow_repeats: bool,
    /// See [`PracticeSettings::endless`].
    pub endless: bool,
    /// See [`PracticeSettings::locked_difficulty`].
    pub locked_difficulty: Option<Difficulty>,
    /// See [`PracticeSettings::max_mistakes_override`].
    pub max_mistakes_override: Option<u32>,
    /// See [`PracticeSettings::word_length_filter`].
    pub word_length_filter: LengthFilter,
    /// Hints taken since practice mode was switched on.
    pub hints_used: u32,
    /// Multiplier applied to the current round's score.
    pub score_penalty_multiplier: f64,
    /// Words served so far, per difficulty/category.
    pub seen_words_by_key: SeenWords,
}

impl Default for PracticeMode {
    fn default() -> Self {
        Self {
            enabled: false,
            allow_repeats: false,
            endless: true,
            locked_difficulty: None,
            max_mistakes_override: None,
            word_length_filter: LengthFilter::default(),
            hints_used: 0,
            score_penalty_multiplier: 1.0,
            seen_words_by_key: SeenWords::new(),
        }
    }
}

impl PracticeMode {
    /// An enabled practice mode with `settings`, resuming from `seen`.
    #[must_use]
    pub fn enabled_with(settings: PracticeSettings, seen: SeenWords) -> Self {
        Self {
            enabled: true,
            allow_repeats: settings.allow_repeats,
            endless: settings.endless,
            locked_difficulty: settings.locked_difficulty,
            max_mistakes_override: settings.max_mistakes_override,
            word_length_filter: settings.word_length_filter,
            seen_words_by_key: seen,
            ..Self::default()
        }
    }

    /// Records a hint and shrinks the round's penalty multiplier.
    pub fn record_hint(&mut self) {
        self.hints_used += 1;
        self.score_penalty_multiplier =
            (self.score_penalty_multiplier * HINT_PENALTY_FACTOR).max(MIN_PENALTY_MULTIPLIER);
    }

    /// Restores the full score for a fresh round.
    pub fn start_round(&mut self) {
        self.score_penalty_multiplier = 1.0;
    }

    /// Multiplier the scorer should apply.
    #[must_use]
    pub fn penalty_multiplier(&self) -> f64 {
        if self.enabled {
            self.score_penalty_multiplier
        } else {
            1.0
        }
    }

    /// Mistakes allowed per round, given the non-practice default.
    #[must_use]
    pub fn max_incorrect_guesses(&self, default: u32) -> u32 {
        match self.max_mistakes_override {
            Some(limit) if self.enabled => limit,
            _ => default,
        }
    }

    /// Whether progression must leave the difficulty alone.
    #[must_use]
    pub fn holds_difficulty(&self) -> bool {
        self.enabled && self.locked_difficulty.is_some()
    }

    /// Word-selection filters, or `None` outside practice mode.
    pub fn selection(&mut self) -> Option<PracticeSelection<'_>> {
        if !self.enabled {
            return None;
        }
        Some(PracticeSelection {
            length: self.word_length_filter,
            allow_repeats: self.allow_repeats,
            seen: &mut self.seen_words_by_key,
        })
    }
}

/// Practice history persisted between sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeProgress {
    /// Words served, so repeat avoidance survives a restart.
    pub seen_words_by_key: SeenWords,
    /// Practice rounds finished.
    pub rounds_played: u64,
    /// Hints taken in practice.
    pub hints_used: u64,
}
