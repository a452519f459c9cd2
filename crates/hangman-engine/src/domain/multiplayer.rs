//! Local multiplayer: turn rotation, per-player tallies and winners.

use std::collections::BTreeSet;

use hangman_core::error::GameError;
use serde::{Deserialize, Serialize};

/// Fewest players a multiplayer game accepts.
pub const MIN_PLAYERS: usize = 2;

/// Most players a multiplayer game accepts.
pub const MAX_PLAYERS: usize = 8;

/// One participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Display name, unique within the game.
    pub name: String,
    /// Points earned across the player's rounds.
    pub score: u32,
    /// Rounds won.
    pub wins: u32,
}

impl Player {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            score: 0,
            wins: 0,
        }
    }
}

/// Final standings of a multiplayer game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplayerResult {
    /// Players ordered by score, then wins, best first.
    pub standings: Vec<Player>,
    /// Everyone tied with the leader on both score and wins.
    pub winners: Vec<String>,
}

/// Multiplayer portion of the game state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplayerState {
    /// Whether a multiplayer game is in progress.
    pub enabled: bool,
    /// Participants in turn order.
    pub players: Vec<Player>,
    /// Whose turn it is.
    pub current_player_index: usize,
    /// Turns completed so far.
    pub rounds_played: u32,
    /// Rounds each player gets; `None` plays until ended by hand.
    pub total_rounds: Option<u32>,
}

impl MultiplayerState {
    /// Starts a game for `names`, trimmed.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Validation` if there are fewer than two or more
    /// than eight players, a name is blank, two names are equal, or
    /// `total_rounds` is zero.
    pub fn start<S: AsRef<str>>(names: &[S], total_rounds: Option<u32>) -> Result<Self, GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&names.len()) {
            return Err(GameError::Validation(format!(
                "multiplayer needs {MIN_PLAYERS} to {MAX_PLAYERS} players, got {}",
                names.len()
            )));
        }
        if total_rounds == Some(0) {
            return Err(GameError::Validation(
                "total rounds must be at least 1".to_owned(),
            ));
        }

        let mut unique = BTreeSet::new();
        let mut players = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                return Err(GameError::Validation("player name is blank".to_owned()));
            }
            if !unique.insert(name.to_lowercase()) {
                return Err(GameError::Validation(format!(
                    "duplicate player name: {name}"
                )));
            }
            players.push(Player::new(name));
        }

        Ok(Self {
            enabled: true,
            players,
            current_player_index: 0,
            rounds_played: 0,
            total_rounds,
        })
    }

    /// The player whose turn it is, while a game is in progress.
    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        if !self.enabled {
            return None;
        }
        self.players.get(self.current_player_index)
    }

    /// Credits the finished round to the current player.
    pub fn record_round(&mut self, won: bool, score: u32) {
        if !self.enabled {
            return;
        }
        if let Some(player) = self.players.get_mut(self.current_player_index) {
            player.score += score;
            player.wins += u32::from(won);
        }
    }

    /// Counts the finished turn and hands play to the next player.
    pub fn advance(&mut self) -> Option<&Player> {
        if !self.enabled || self.players.is_empty() {
            return None;
        }
        self.rounds_played += 1;
        self.current_player_index = (self.current_player_index + 1) % self.players.len();
        self.players.get(self.current_player_index)
    }

    /// Whether advancing from here would complete the last full rotation.
    ///
    /// Unlimited games never end on their own.
    #[must_use]
    pub fn should_end_after_advance(&self) -> bool {
        let Some(total_rounds) = self.total_rounds else {
            return false;
        };
        if self.players.is_empty() {
            return true;
        }
        let completed = (self.rounds_played as usize + 1) / self.players.len();
        completed >= total_rounds as usize
    }

    /// Ranks the players, names the co-winners and ends the game.
    pub fn finish(&mut self) -> MultiplayerResult {
        let mut standings = self.players.clone();
        standings.sort_by(|a, b| b.score.cmp(&a.score).then(b.wins.cmp(&a.wins)));
        let winners = standings
            .first()
            .map(|top| {
                standings
                    .iter()
                    .take_while(|p| p.score == top.score && p.wins == top.wins)
                    .map(|p| p.name.clone())
                    .collect()
            })
            .unwrap_or_default();

        self.enabled = false;
        MultiplayerResult { standings, winners }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_players(total_rounds: Option<u32>) -> MultiplayerState {
        MultiplayerState::start(&["Ada", "Grace"], total_rounds).unwrap()
    }

    #[test]
    fn test_start_validates_names() {
        assert!(MultiplayerState::start(&["solo"], None).is_err());
        assert!(MultiplayerState::start(&["a"; 9], None).is_err());
        assert!(MultiplayerState::start(&["Ada", "  "], None).is_err());
        assert!(MultiplayerState::start(&["Ada", "ada"], None).is_err());
        assert!(MultiplayerState::start(&["Ada", "Grace"], Some(0)).is_err());

        let state = MultiplayerState::start(&[" Ada ", "Grace"], Some(3)).unwrap();
        assert!(state.enabled);
        assert_eq!(state.players[0].name, "Ada");
        assert_eq!(state.current_player().unwrap().name, "Ada");
    }

    #[test]
    fn test_advance_rotates_and_counts() {
        let mut state = two_players(None);

        assert_eq!(state.advance().unwrap().name, "Grace");
        assert_eq!(state.advance().unwrap().name, "Ada");
        assert_eq!(state.rounds_played, 2);
        assert_eq!(state.current_player_index, 0);
    }

    #[test]
    fn test_record_round_credits_current_player() {
        let mut state = two_players(None);
        state.record_round(true, 150);
        state.advance();
        state.record_round(false, 0);

        assert_eq!(state.players[0].wins, 1);
        assert_eq!(state.players[0].score, 150);
        assert_eq!(state.players[1].wins, 0);
    }

    #[test]
    fn test_should_end_after_full_rotations() {
        let mut state = two_players(Some(2));
        assert!(!state.should_end_after_advance());
        state.advance();
        assert!(!state.should_end_after_advance());
        state.advance();
        assert!(!state.should_end_after_advance());
        state.advance();
        assert!(state.should_end_after_advance());
    }

    #[test]
    fn test_unlimited_game_never_ends_by_itself() {
        let mut state = two_players(None);
        for _ in 0..100 {
            state.advance();
        }
        assert!(!state.should_end_after_advance());
    }

    #[test]
    fn test_finish_ranks_and_names_co_winners() {
        let mut state = MultiplayerState::start(&["Ada", "Grace", "Linus"], None).unwrap();
        state.players[0].score = 300;
        state.players[0].wins = 2;
        state.players[1].score = 300;
        state.players[1].wins = 2;
        state.players[2].score = 300;
        state.players[2].wins = 1;

        let result = state.finish();

        assert_eq!(result.winners, vec!["Ada".to_owned(), "Grace".to_owned()]);
        assert_eq!(result.standings[2].name, "Linus");
        assert!(!state.enabled);
        assert!(state.current_player().is_none());
    }

    #[test]
    fn test_score_outranks_wins() {
        let mut state = two_players(None);
        state.players[0].score = 100;
        state.players[0].wins = 3;
        state.players[1].score = 200;
        state.players[1].wins = 1;

        assert_eq!(state.finish().winners, vec!["Grace".to_owned()]);
    }
}
