//! Win-streak driven difficulty progression.

use hangman_words::domain::catalog::Difficulty;
use serde::{Deserialize, Serialize};

/// Consecutive wins needed to move up one difficulty tier.
pub const PROMOTION_THRESHOLD: u32 = 3;

/// Counts consecutive wins and promotes the difficulty when the streak
/// reaches [`PROMOTION_THRESHOLD`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionTracker {
    consecutive_wins: u32,
}

impl ProgressionTracker {
    /// Current run of wins since the last loss or promotion.
    #[must_use]
    pub fn consecutive_wins(&self) -> u32 {
        self.consecutive_wins
    }

    /// Records a win at `current` and returns the new difficulty if the
    /// streak triggered a promotion.
    ///
    /// The counter restarts whenever it reaches the threshold, even when
    /// `locked` holds the difficulty in place or `current` is already
    /// `Hard`; in those cases `None` is returned.
    pub fn record_win(&mut self, current: Difficulty, locked: bool) -> Option<Difficulty> {
        self.consecutive_wins += 1;
        if self.consecutive_wins < PROMOTION_THRESHOLD {
            return None;
        }
        self.consecutive_wins = 0;
        let next = current.harder();
        (!locked && next != current).then_some(next)
    }

    /// Records a loss, which breaks the streak without demoting.
    pub fn record_loss(&mut self) {
        self.consecutive_wins = 0;
    }
}
