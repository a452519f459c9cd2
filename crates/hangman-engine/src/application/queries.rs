//! Read-only snapshot of the game for renderers.

use hangman_words::domain::catalog::Difficulty;
use serde::Serialize;

use crate::domain::state::{GameState, GameStatus};

/// What a renderer needs to draw the current round.
///
/// The word itself is only included once the round is over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameView {
    /// Mask with cells separated by spaces.
    pub masked_word: String,
    /// Letters guessed or revealed, alphabetically.
    pub guessed_letters: Vec<char>,
    /// Wrong guesses in order.
    pub incorrect_guesses: Vec<char>,
    /// Mistakes left.
    pub remaining_guesses: u32,
    /// Round lifecycle.
    pub status: GameStatus,
    /// Session score.
    pub score: u32,
    /// Score of the last finished round.
    pub last_round_score: Option<u32>,
    /// Current difficulty.
    pub difficulty: Difficulty,
    /// Current category.
    pub category: String,
    /// Countdown left, when timed.
    pub time_remaining_ms: Option<u64>,
    /// Whether practice mode is on.
    pub practice: bool,
    /// Score multiplier left after practice hints.
    pub penalty_multiplier: f64,
    /// Whose turn it is in multiplayer.
    pub current_player: Option<String>,
    /// The answer, once the round is over.
    pub revealed_word: Option<String>,
}

impl GameView {
    /// Builds a snapshot of `state`.
    #[must_use]
    pub fn from_state(state: &GameState) -> Self {
        Self {
            masked_word: state.masked_word(),
            guessed_letters: state.guessed_letters.iter().copied().collect(),
            incorrect_guesses: state.incorrect_guesses.clone(),
            remaining_guesses: state.remaining_guesses(),
            status: state.game_status,
            score: state.score,
            last_round_score: state.last_round_score,
            difficulty: state.difficulty,
            category: state.category.clone(),
            time_remaining_ms: state.timed_mode.then_some(state.time_remaining_ms),
            practice: state.practice.enabled,
            penalty_multiplier: state.practice.penalty_multiplier(),
            current_player: state.multiplayer.current_player().map(|p| p.name.clone()),
            revealed_word: state
                .game_status
                .is_terminal()
                .then(|| state.current_word.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hangman_words::domain::selector::{Selection, mask_word};

    fn state() -> GameState {
        GameState::new(
            Selection {
                word: "owl".to_owned(),
                hidden: mask_word("owl"),
                difficulty: Difficulty::Easy,
                category: "animals".to_owned(),
                substitutions: 0,
            },
            6,
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_word_hidden_while_playing() {
        let mut game = state();
        game.guess('w');

        let view = GameView::from_state(&game);

        assert_eq!(view.masked_word, "_ w _");
        assert_eq!(view.revealed_word, None);
        assert_eq!(view.time_remaining_ms, None);
        assert_eq!(view.current_player, None);
    }

    #[test]
    fn test_word_revealed_when_over() {
        let mut game = state();
        game.finish(false);

        let view = GameView::from_state(&game);

        assert_eq!(view.revealed_word.as_deref(), Some("owl"));
        assert_eq!(view.status, GameStatus::Lost);
    }

    #[test]
    fn test_serializes_status_lowercase() {
        let value = serde_json::to_value(GameView::from_state(&state())).unwrap();
        assert_eq!(value["status"], "playing");
        assert_eq!(value["difficulty"], "easy");
    }
}
