//! The game state aggregate and the guess rules that mutate it.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use hangman_words::domain::catalog::Difficulty;
use hangman_words::domain::selector::{MASK, Selection};
use serde::{Deserialize, Serialize};

use super::multiplayer::MultiplayerState;
use super::practice::PracticeMode;
use super::progression::ProgressionTracker;

/// Mistakes allowed per round outside practice overrides.
pub const DEFAULT_MAX_INCORRECT_GUESSES: u32 = 6;

/// Round lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Accepting guesses.
    Playing,
    /// Suspended; guesses and hints are refused.
    Paused,
    /// Every letter uncovered.
    Won,
    /// Out of guesses or out of time.
    Lost,
}

impl GameStatus {
    /// Whether the round is over.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Won => "won",
            Self::Lost => "lost",
        })
    }
}

/// Why a guess was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The round is paused or over.
    NotPlaying,
    /// The letter was guessed before.
    AlreadyGuessed,
    /// The input is not a single letter `a`–`z`.
    InvalidLetter,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotPlaying => "the round is not in play",
            Self::AlreadyGuessed => "that letter was already guessed",
            Self::InvalidLetter => "guesses must be a single letter a-z",
        })
    }
}

/// Result of one guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// The letter is in the word.
    Correct,
    /// The letter is not in the word.
    Incorrect,
    /// Nothing changed.
    Rejected(RejectReason),
}

impl GuessOutcome {
    /// `true` only for a correct guess.
    #[must_use]
    pub fn is_correct(self) -> bool {
        self == Self::Correct
    }
}

/// Lowercases `input` and checks it is exactly one letter `a`–`z`.
///
/// # Errors
///
/// Returns `RejectReason::InvalidLetter` otherwise.
pub fn parse_letter(input: &str) -> Result<char, RejectReason> {
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_lowercase() {
                Ok(c)
            } else {
                Err(RejectReason::InvalidLetter)
            }
        }
        _ => Err(RejectReason::InvalidLetter),
    }
}

/// Everything about the session the engine mutates.
///
/// Round-scoped fields are replaced by [`GameState::begin_round`]; score,
/// difficulty, category and the mode sub-states carry over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// The word being guessed.
    pub current_word: String,
    /// One cell per character of `current_word`.
    pub hidden_word: Vec<char>,
    /// Every letter guessed or revealed this round.
    pub guessed_letters: BTreeSet<char>,
    /// Wrong guesses this round, in order.
    pub incorrect_guesses: Vec<char>,
    /// Mistakes allowed this round.
    pub max_incorrect_guesses: u32,
    /// Round lifecycle.
    pub game_status: GameStatus,
    /// Session score.
    pub score: u32,
    /// Difficulty of the current word.
    pub difficulty: Difficulty,
    /// Category of the current word.
    pub category: String,
    /// Whether rounds run against a countdown.
    pub timed_mode: bool,
    /// Countdown length.
    pub time_limit_ms: u64,
    /// Countdown left in this round.
    pub time_remaining_ms: u64,
    /// Practice-mode settings and bookkeeping.
    pub practice: PracticeMode,
    /// Multiplayer turn state.
    pub multiplayer: MultiplayerState,
    /// Win streak towards the next difficulty.
    pub progression: ProgressionTracker,
    /// When the current round began.
    pub round_started_at: DateTime<Utc>,
    /// Set while paused.
    pub paused_at: Option<DateTime<Utc>>,
    /// Paused time already banked this round.
    pub paused_ms: u64,
    /// Hints taken this round.
    pub hints_this_round: u32,
    /// Score of the last finished round.
    pub last_round_score: Option<u32>,
}

impl GameState {
    /// Creates a session whose first round plays `selection`.
    #[must_use]
    pub fn new(selection: Selection, max_incorrect_guesses: u32, now: DateTime<Utc>) -> Self {
        Self {
            current_word: selection.word,
            hidden_word: selection.hidden,
            guessed_letters: BTreeSet::new(),
            incorrect_guesses: Vec::new(),
            max_incorrect_guesses,
            game_status: GameStatus::Playing,
            score: 0,
            difficulty: selection.difficulty,
            category: selection.category,
            timed_mode: false,
            time_limit_ms: 0,
            time_remaining_ms: 0,
            practice: PracticeMode::default(),
            multiplayer: MultiplayerState::default(),
            progression: ProgressionTracker::default(),
            round_started_at: now,
            paused_at: None,
            paused_ms: 0,
            hints_this_round: 0,
            last_round_score: None,
        }
    }

    /// Replaces the round-scoped fields with a fresh round on `selection`.
    pub fn begin_round(
        &mut self,
        selection: Selection,
        max_incorrect_guesses: u32,
        now: DateTime<Utc>,
    ) {
        self.current_word = selection.word;
        self.hidden_word = selection.hidden;
        self.difficulty = selection.difficulty;
        self.category = selection.category;
        self.guessed_letters.clear();
        self.incorrect_guesses.clear();
        self.max_incorrect_guesses = max_incorrect_guesses;
        self.game_status = GameStatus::Playing;
        self.round_started_at = now;
        self.paused_at = None;
        self.paused_ms = 0;
        self.hints_this_round = 0;
        self.time_remaining_ms = if self.timed_mode { self.time_limit_ms } else { 0 };
        self.practice.start_round();
    }

    /// Applies a parsed letter.
    ///
    /// Refused without mutation unless the round is in play and the letter
    /// is new.
    pub fn guess(&mut self, letter: char) -> GuessOutcome {
        if self.game_status != GameStatus::Playing {
            return GuessOutcome::Rejected(RejectReason::NotPlaying);
        }
        if !self.guessed_letters.insert(letter) {
            return GuessOutcome::Rejected(RejectReason::AlreadyGuessed);
        }
        if self.reveal(letter) > 0 {
            GuessOutcome::Correct
        } else {
            self.incorrect_guesses.push(letter);
            GuessOutcome::Incorrect
        }
    }

    /// Uncovers every occurrence of `letter`; returns how many cells changed.
    pub fn reveal(&mut self, letter: char) -> usize {
        let mut revealed = 0;
        for (cell, actual) in self.hidden_word.iter_mut().zip(self.current_word.chars()) {
            if actual == letter && *cell == MASK {
                *cell = actual;
                revealed += 1;
            }
        }
        revealed
    }

    /// Distinct letters still masked, in order of first appearance.
    #[must_use]
    pub fn hidden_letters(&self) -> Vec<char> {
        let mut letters = Vec::new();
        for (cell, actual) in self.hidden_word.iter().zip(self.current_word.chars()) {
            if *cell == MASK && !letters.contains(&actual) {
                letters.push(actual);
            }
        }
        letters
    }

    /// Whether no masked cell remains.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        !self.hidden_word.contains(&MASK)
    }

    /// Whether the mistake budget is spent.
    #[must_use]
    pub fn is_out_of_guesses(&self) -> bool {
        self.incorrect_guesses.len() >= self.max_incorrect_guesses as usize
    }

    /// Mistakes left before the round is lost.
    #[must_use]
    pub fn remaining_guesses(&self) -> u32 {
        let made = u32::try_from(self.incorrect_guesses.len()).unwrap_or(u32::MAX);
        self.max_incorrect_guesses.saturating_sub(made)
    }

    /// The mask with cells separated by single spaces, e.g. `c _ t`.
    #[must_use]
    pub fn masked_word(&self) -> String {
        let mut out = String::with_capacity(self.hidden_word.len() * 2);
        for (i, cell) in self.hidden_word.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push(*cell);
        }
        out
    }

    /// Round time so far, not counting pauses.
    #[must_use]
    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        let total = millis_between(self.round_started_at, now);
        let open_pause = self.paused_at.map_or(0, |at| millis_between(at, now));
        total.saturating_sub(self.paused_ms + open_pause)
    }

    /// Moves `Playing` to `Paused`; `false` from any other status.
    pub fn pause(&mut self, now: DateTime<Utc>) -> bool {
        if self.game_status != GameStatus::Playing {
            return false;
        }
        self.game_status = GameStatus::Paused;
        self.paused_at = Some(now);
        true
    }

    /// Moves `Paused` back to `Playing`; `false` from any other status.
    pub fn resume(&mut self, now: DateTime<Utc>) -> bool {
        if self.game_status != GameStatus::Paused {
            return false;
        }
        if let Some(at) = self.paused_at.take() {
            self.paused_ms += millis_between(at, now);
        }
        self.game_status = GameStatus::Playing;
        true
    }

    /// Marks the round won or lost.
    pub fn finish(&mut self, won: bool) {
        self.game_status = if won { GameStatus::Won } else { GameStatus::Lost };
        self.paused_at = None;
    }
}

fn millis_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> u64 {
    u64::try_from(later.signed_duration_since(earlier).num_milliseconds()).unwrap_or(0)
}
