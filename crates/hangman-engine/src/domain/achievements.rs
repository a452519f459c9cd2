//! Achievement rule table and unlock bookkeeping.
//!
//! Rules are evaluated after every finished round outside practice mode.
//! Unlocks are monotonic: once granted, an achievement keeps its original
//! timestamp and is never re-locked or re-granted.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use hangman_words::domain::catalog::Difficulty;
use serde::{Deserialize, Serialize};

use super::statistics::Statistics;

/// Rounds won faster than this unlock `speedDemon`.
pub const SPEED_DEMON_MS: u64 = 15_000;

/// Distinct categories needed for `categoryExplorer`.
pub const EXPLORER_CATEGORIES: usize = 5;

/// Session score needed for `scoreHunter`.
pub const SCORE_HUNTER_POINTS: u32 = 1000;

/// Identifies one achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AchievementKey {
    /// First round ever won.
    FirstWin,
    /// Five wins in a row.
    Streak5,
    /// Ten wins in a row.
    Streak10,
    /// A win without a single mistake.
    PerfectGame,
    /// A win in under fifteen seconds.
    SpeedDemon,
    /// A win on hard.
    DifficultyMaster,
    /// Five distinct categories played.
    CategoryExplorer,
    /// A session score of at least 1000.
    ScoreHunter,
}

impl AchievementKey {
    /// Every achievement, in display order.
    pub const ALL: [AchievementKey; 8] = [
        Self::FirstWin,
        Self::Streak5,
        Self::Streak10,
        Self::PerfectGame,
        Self::SpeedDemon,
        Self::DifficultyMaster,
        Self::CategoryExplorer,
        Self::ScoreHunter,
    ];

    /// Stable key used in storage and events.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstWin => "firstWin",
            Self::Streak5 => "streak5",
            Self::Streak10 => "streak10",
            Self::PerfectGame => "perfectGame",
            Self::SpeedDemon => "speedDemon",
            Self::DifficultyMaster => "difficultyMaster",
            Self::CategoryExplorer => "categoryExplorer",
            Self::ScoreHunter => "scoreHunter",
        }
    }
}

impl fmt::Display for AchievementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unlock state of one achievement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    /// Whether it has been granted.
    pub unlocked: bool,
    /// When it was granted.
    pub unlocked_at: Option<DateTime<Utc>>,
}

/// What the rules see about the round that just ended.
#[derive(Debug, Clone, Copy)]
pub struct RoundFacts<'a> {
    /// Statistics with the round already recorded.
    pub statistics: &'a Statistics,
    /// Whether the round was won.
    pub won: bool,
    /// Mistakes made in the round.
    pub incorrect_guesses: u32,
    /// Round time excluding pauses.
    pub elapsed_ms: u64,
    /// Difficulty the round was played at.
    pub difficulty: Difficulty,
    /// Session score after the round.
    pub session_score: u32,
}

type Rule = fn(&RoundFacts<'_>) -> bool;

const RULES: [(AchievementKey, Rule); 8] = [
    (AchievementKey::FirstWin, |f| f.statistics.games_won() >= 1),
    (AchievementKey::Streak5, |f| f.statistics.current_streak() >= 5),
    (AchievementKey::Streak10, |f| f.statistics.current_streak() >= 10),
    (AchievementKey::PerfectGame, |f| f.won && f.incorrect_guesses == 0),
    (AchievementKey::SpeedDemon, |f| f.won && f.elapsed_ms < SPEED_DEMON_MS),
    (AchievementKey::DifficultyMaster, |f| {
        f.won && f.difficulty == Difficulty::Hard
    }),
    (AchievementKey::CategoryExplorer, |f| {
        f.statistics.categories_played() >= EXPLORER_CATEGORIES
    }),
    (AchievementKey::ScoreHunter, |f| f.session_score >= SCORE_HUNTER_POINTS),
];

/// Unlock state for every achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Achievements(BTreeMap<AchievementKey, Achievement>);

impl Default for Achievements {
    fn default() -> Self {
        Self(
            AchievementKey::ALL
                .into_iter()
                .map(|key| (key, Achievement::default()))
                .collect(),
        )
    }
}

impl Achievements {
    /// State of one achievement; locked if never recorded.
    #[must_use]
    pub fn get(&self, key: AchievementKey) -> Achievement {
        self.0.get(&key).copied().unwrap_or_default()
    }

    /// Whether `key` has been granted.
    #[must_use]
    pub fn is_unlocked(&self, key: AchievementKey) -> bool {
        self.get(key).unlocked
    }

    /// Every achievement with its state, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (AchievementKey, Achievement)> + '_ {
        AchievementKey::ALL.into_iter().map(|key| (key, self.get(key)))
    }

    /// Number of achievements granted.
    #[must_use]
    pub fn unlocked_count(&self) -> usize {
        self.iter().filter(|(_, a)| a.unlocked).count()
    }

    /// Grants `key` at `at`. Returns `false` if it was already granted.
    pub fn unlock(&mut self, key: AchievementKey, at: DateTime<Utc>) -> bool {
        let entry = self.0.entry(key).or_default();
        if entry.unlocked {
            return false;
        }
        *entry = Achievement {
            unlocked: true,
            unlocked_at: Some(at),
        };
        true
    }
}

/// Runs the rule table and grants whatever newly qualifies.
#[derive(Debug, Clone, Copy, Default)]
pub struct AchievementEvaluator;

impl AchievementEvaluator {
    /// Evaluates every rule against `facts`, returning newly unlocked keys.
    pub fn evaluate(
        self,
        achievements: &mut Achievements,
        facts: &RoundFacts<'_>,
        now: DateTime<Utc>,
    ) -> Vec<AchievementKey> {
        let mut unlocked = Vec::new();
        for (key, rule) in RULES {
            if !achievements.is_unlocked(key) && rule(facts) && achievements.unlock(key, now) {
                unlocked.push(key);
            }
        }
        unlocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::statistics::RoundRecord;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
    }

    fn stats_with(results: &[(&str, bool)]) -> Statistics {
        let mut stats = Statistics::new();
        for (category, won) in results {
            stats.record(RoundRecord {
                word: "cat".to_owned(),
                difficulty: Difficulty::Easy,
                category: (*category).to_owned(),
                won: *won,
                score: 0,
                incorrect_guesses: 0,
                elapsed_ms: 0,
                practice: false,
                played_at: now(),
            });
        }
        stats
    }

    fn facts(statistics: &Statistics) -> RoundFacts<'_> {
        RoundFacts {
            statistics,
            won: true,
            incorrect_guesses: 2,
            elapsed_ms: 20_000,
            difficulty: Difficulty::Easy,
            session_score: 100,
        }
    }

    #[test]
    fn test_keys_serialize_to_stable_names() {
        for key in AchievementKey::ALL {
            assert_eq!(serde_json::to_value(key).unwrap(), key.as_str());
        }
    }

    #[test]
    fn test_first_win_unlocks_once() {
        let stats = stats_with(&[("animals", true)]);
        let mut achievements = Achievements::default();

        let first = AchievementEvaluator.evaluate(&mut achievements, &facts(&stats), now());
        let later = now() + Duration::minutes(5);
        let second = AchievementEvaluator.evaluate(&mut achievements, &facts(&stats), later);

        assert_eq!(first, vec![AchievementKey::FirstWin]);
        assert!(second.is_empty());
        assert_eq!(
            achievements.get(AchievementKey::FirstWin).unlocked_at,
            Some(now())
        );
    }

    #[test]
    fn test_loss_only_unlocks_outcome_independent_rules() {
        let stats = stats_with(&[
            ("a", false),
            ("b", false),
            ("c", false),
            ("d", false),
            ("e", false),
        ]);
        let mut achievements = Achievements::default();
        let loss = RoundFacts {
            won: false,
            incorrect_guesses: 0,
            elapsed_ms: 1_000,
            difficulty: Difficulty::Hard,
            ..facts(&stats)
        };

        let unlocked = AchievementEvaluator.evaluate(&mut achievements, &loss, now());

        assert_eq!(unlocked, vec![AchievementKey::CategoryExplorer]);
    }

    #[test]
    fn test_outcome_rules_on_fast_perfect_hard_win() {
        let stats = stats_with(&[("animals", true)]);
        let mut achievements = Achievements::default();
        let win = RoundFacts {
            incorrect_guesses: 0,
            elapsed_ms: 14_999,
            difficulty: Difficulty::Hard,
            session_score: 1_000,
            ..facts(&stats)
        };

        let unlocked = AchievementEvaluator.evaluate(&mut achievements, &win, now());

        assert_eq!(
            unlocked,
            vec![
                AchievementKey::FirstWin,
                AchievementKey::PerfectGame,
                AchievementKey::SpeedDemon,
                AchievementKey::DifficultyMaster,
                AchievementKey::ScoreHunter,
            ]
        );
    }

    #[test]
    fn test_streak_rules_follow_current_streak() {
        let five: Vec<(&str, bool)> = vec![("animals", true); 5];
        let stats = stats_with(&five);
        let mut achievements = Achievements::default();

        let unlocked = AchievementEvaluator.evaluate(&mut achievements, &facts(&stats), now());

        assert!(unlocked.contains(&AchievementKey::Streak5));
        assert!(!achievements.is_unlocked(AchievementKey::Streak10));
    }

    #[test]
    fn test_ten_win_streak_unlocks_streak10() {
        let mut achievements = Achievements::default();
        let nine: Vec<(&str, bool)> = vec![("animals", true); 9];
        let stats = stats_with(&nine);
        AchievementEvaluator.evaluate(&mut achievements, &facts(&stats), now());
        assert!(!achievements.is_unlocked(AchievementKey::Streak10));

        let ten: Vec<(&str, bool)> = vec![("animals", true); 10];
        let stats = stats_with(&ten);
        let later = now() + Duration::minutes(1);
        let unlocked = AchievementEvaluator.evaluate(&mut achievements, &facts(&stats), later);

        assert_eq!(unlocked, vec![AchievementKey::Streak10]);
        assert_eq!(
            achievements.get(AchievementKey::Streak10).unlocked_at,
            Some(later)
        );
    }

    #[test]
    fn test_unlocks_survive_serialization() {
        let mut achievements = Achievements::default();
        achievements.unlock(AchievementKey::SpeedDemon, now());

        let value = serde_json::to_value(&achievements).unwrap();
        assert_eq!(value["speedDemon"]["unlocked"], true);
        assert_eq!(value["firstWin"]["unlocked"], false);

        let restored: Achievements = serde_json::from_value(value).unwrap();
        assert_eq!(restored, achievements);
        assert_eq!(restored.unlocked_count(), 1);
    }

    #[test]
    fn test_partial_blob_reads_missing_keys_as_locked() {
        let restored: Achievements = serde_json::from_value(serde_json::json!({
            "firstWin": {"unlocked": true, "unlocked_at": "2026-01-15T10:00:00Z"}
        }))
        .unwrap();

        assert!(restored.is_unlocked(AchievementKey::FirstWin));
        assert!(!restored.is_unlocked(AchievementKey::ScoreHunter));
        assert_eq!(restored.iter().count(), AchievementKey::ALL.len());
    }
}
