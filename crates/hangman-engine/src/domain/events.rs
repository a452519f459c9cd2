//! Notifications published by the game engine.

use hangman_core::event::{DomainEvent, EventMetadata};
use hangman_words::domain::catalog::Difficulty;
use serde::{Deserialize, Serialize};

use super::achievements::AchievementKey;

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEventKind {
    /// A letter was accepted.
    GuessMade {
        /// The letter guessed.
        letter: char,
        /// Whether it is in the word.
        correct: bool,
    },
    /// A hint uncovered a letter.
    HintRevealed {
        /// The letter uncovered.
        letter: char,
    },
    /// The round was won.
    RoundWon {
        /// The solved word.
        word: String,
        /// Points earned.
        score: u32,
        /// Round time excluding pauses.
        elapsed_ms: u64,
    },
    /// The round was lost.
    RoundLost {
        /// The word the player missed.
        word: String,
    },
    /// The countdown ran out.
    TimeUp,
    /// An achievement was granted.
    AchievementUnlocked {
        /// Which one.
        key: AchievementKey,
    },
    /// A win streak moved the difficulty up.
    DifficultyChanged {
        /// Previous difficulty.
        from: Difficulty,
        /// New difficulty.
        to: Difficulty,
    },
    /// Play passed to the next multiplayer participant.
    PlayerAdvanced {
        /// Name of the player now up.
        player: String,
    },
    /// A multiplayer game finished.
    MultiplayerEnded {
        /// Names of the co-winners.
        winners: Vec<String>,
    },
}

impl GameEventKind {
    /// Dotted type name used in logs and metadata.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::GuessMade { .. } => "game.guess_made",
            Self::HintRevealed { .. } => "game.hint_revealed",
            Self::RoundWon { .. } => "game.round_won",
            Self::RoundLost { .. } => "game.round_lost",
            Self::TimeUp => "game.time_up",
            Self::AchievementUnlocked { .. } => "game.achievement_unlocked",
            Self::DifficultyChanged { .. } => "game.difficulty_changed",
            Self::PlayerAdvanced { .. } => "game.player_advanced",
            Self::MultiplayerEnded { .. } => "game.multiplayer_ended",
        }
    }
}

/// Event envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct GameEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: GameEventKind,
}

impl DomainEvent for GameEvent {
    fn event_type(&self) -> &'static str {
        self.kind.type_name()
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(&self.kind).unwrap_or(serde_json::Value::Null)
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
