//! Lifetime statistics, round history and best times.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Utc};
use hangman_words::domain::catalog::Difficulty;
use serde::{Deserialize, Serialize};

/// Oldest history entries are dropped beyond this many.
pub const HISTORY_CAP: usize = 1000;

/// One finished round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// The word that was played.
    pub word: String,
    /// Difficulty the round was played at.
    pub difficulty: Difficulty,
    /// Category the word came from.
    pub category: String,
    /// Whether the round was won.
    pub won: bool,
    /// Points earned (zero for a loss).
    pub score: u32,
    /// Mistakes made.
    pub incorrect_guesses: u32,
    /// Round time excluding pauses.
    pub elapsed_ms: u64,
    /// Whether practice mode was on.
    pub practice: bool,
    /// When the round ended.
    pub played_at: DateTime<Utc>,
}

/// Played/won counters for one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    /// Rounds finished.
    pub played: u32,
    /// Rounds won.
    pub won: u32,
}

impl Tally {
    fn count(&mut self, won: bool) {
        self.played += 1;
        self.won += u32::from(won);
    }
}

/// Aggregate counters plus a bounded round history.
///
/// `games_played` is always `games_won + games_lost`; it is derived rather
/// than stored so a hand-edited blob cannot break that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    games_won: u32,
    games_lost: u32,
    current_streak: u32,
    best_streak: u32,
    by_category: BTreeMap<String, Tally>,
    by_difficulty: BTreeMap<Difficulty, Tally>,
    history: VecDeque<RoundRecord>,
}

impl Statistics {
    /// Creates empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a finished round into the counters and history.
    pub fn record(&mut self, round: RoundRecord) {
        if round.won {
            self.games_won += 1;
            self.current_streak += 1;
            self.best_streak = self.best_streak.max(self.current_streak);
        } else {
            self.games_lost += 1;
            self.current_streak = 0;
        }

        self.by_category
            .entry(round.category.clone())
            .or_default()
            .count(round.won);
        self.by_difficulty
            .entry(round.difficulty)
            .or_default()
            .count(round.won);

        self.history.push_back(round);
        while self.history.len() > HISTORY_CAP {
            self.history.pop_front();
        }
    }

    /// Rounds finished.
    #[must_use]
    pub fn games_played(&self) -> u32 {
        self.games_won + self.games_lost
    }

    /// Rounds won.
    #[must_use]
    pub fn games_won(&self) -> u32 {
        self.games_won
    }

    /// Rounds lost.
    #[must_use]
    pub fn games_lost(&self) -> u32 {
        self.games_lost
    }

    /// `100 × won / played`, or `0.0` before the first round.
    #[must_use]
    pub fn win_percentage(&self) -> f64 {
        match self.games_played() {
            0 => 0.0,
            played => 100.0 * f64::from(self.games_won) / f64::from(played),
        }
    }

    /// Wins since the last loss.
    #[must_use]
    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    /// Longest streak ever reached.
    #[must_use]
    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    /// Per-category tallies.
    #[must_use]
    pub fn by_category(&self) -> &BTreeMap<String, Tally> {
        &self.by_category
    }

    /// Per-difficulty tallies.
    #[must_use]
    pub fn by_difficulty(&self) -> &BTreeMap<Difficulty, Tally> {
        &self.by_difficulty
    }

    /// Number of distinct categories ever played.
    #[must_use]
    pub fn categories_played(&self) -> usize {
        self.by_category.len()
    }

    /// Recent rounds, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &RoundRecord> {
        self.history.iter()
    }
}

/// Fastest winning round per difficulty, in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BestTimes(BTreeMap<Difficulty, u64>);

impl BestTimes {
    /// Records a winning time; returns `true` if it is a new best.
    pub fn record(&mut self, difficulty: Difficulty, elapsed_ms: u64) -> bool {
        match self.0.get(&difficulty) {
            Some(best) if *best <= elapsed_ms => false,
            _ => {
                self.0.insert(difficulty, elapsed_ms);
                true
            }
        }
    }

    /// Best time for `difficulty`, if any round has been won at it.
    #[must_use]
    pub fn get(&self, difficulty: Difficulty) -> Option<u64> {
        self.0.get(&difficulty).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn round(category: &str, won: bool) -> RoundRecord {
        RoundRecord {
            word: "cat".to_owned(),
            difficulty: Difficulty::Easy,
            category: category.to_owned(),
            won,
            score: if won { 100 } else { 0 },
            incorrect_guesses: 1,
            elapsed_ms: 8_000,
            practice: false,
            played_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_empty_statistics_have_zero_percentage() {
        let stats = Statistics::new();
        assert_eq!(stats.games_played(), 0);
        assert!(stats.win_percentage().abs() < f64::EPSILON);
    }

    #[test]
    fn test_counters_stay_consistent() {
        let mut stats = Statistics::new();
        for won in [true, true, false, true] {
            stats.record(round("animals", won));
        }

        assert_eq!(stats.games_played(), stats.games_won() + stats.games_lost());
        assert_eq!(stats.games_won(), 3);
        assert!((stats.win_percentage() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_streaks() {
        let mut stats = Statistics::new();
        for won in [true, true, true, false, true] {
            stats.record(round("animals", won));
        }

        assert_eq!(stats.current_streak(), 1);
        assert_eq!(stats.best_streak(), 3);
    }

    #[test]
    fn test_tallies_by_category_and_difficulty() {
        let mut stats = Statistics::new();
        stats.record(round("animals", true));
        stats.record(round("colors", false));
        stats.record(round("animals", false));

        assert_eq!(stats.categories_played(), 2);
        assert_eq!(stats.by_category()["animals"], Tally { played: 2, won: 1 });
        assert_eq!(stats.by_difficulty()[&Difficulty::Easy], Tally { played: 3, won: 1 });
    }

    #[test]
    fn test_history_is_capped_oldest_first() {
        let mut stats = Statistics::new();
        for i in 0..=HISTORY_CAP {
            let mut record = round("animals", true);
            record.word = format!("word{i}");
            stats.record(record);
        }

        assert_eq!(stats.history().count(), HISTORY_CAP);
        assert_eq!(stats.history().next().unwrap().word, "word1");
        assert_eq!(stats.games_played() as usize, HISTORY_CAP + 1);
    }

    #[test]
    fn test_partial_blob_deserializes_with_defaults() {
        let stats: Statistics =
            serde_json::from_value(serde_json::json!({"games_won": 4, "games_lost": 1})).unwrap();
        assert_eq!(stats.games_played(), 5);
        assert_eq!(stats.history().count(), 0);
    }

    #[test]
    fn test_best_times_keep_fastest() {
        let mut best = BestTimes::default();
        assert!(best.record(Difficulty::Easy, 9_000));
        assert!(!best.record(Difficulty::Easy, 12_000));
        assert!(best.record(Difficulty::Easy, 7_500));

        assert_eq!(best.get(Difficulty::Easy), Some(7_500));
        assert_eq!(best.get(Difficulty::Hard), None);
    }
}
