//! Practice-mode candidate filters: word length and repeat avoidance.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::catalog::Difficulty;

/// Inclusive bounds on a word's letter count (spaces excluded).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthFilter {
    /// Minimum letter count, if bounded below.
    pub min: Option<usize>,
    /// Maximum letter count, if bounded above.
    pub max: Option<usize>,
}

impl LengthFilter {
    /// Whether `word` satisfies the bounds.
    #[must_use]
    pub fn accepts(&self, word: &str) -> bool {
        let letters = word.chars().filter(|c| *c != ' ').count();
        self.min.is_none_or(|min| letters >= min) && self.max.is_none_or(|max| letters <= max)
    }

    /// Whether the filter constrains anything.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Storage key for the seen-set of one difficulty/category pair.
#[must_use]
pub fn seen_key(difficulty: Difficulty, category: &str) -> String {
    format!("{difficulty}-{category}")
}

/// Words already served in practice mode, keyed by `"difficulty-category"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeenWords {
    by_key: BTreeMap<String, BTreeSet<String>>,
}

impl SeenWords {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `word` has been served for this pair.
    #[must_use]
    pub fn contains(&self, difficulty: Difficulty, category: &str, word: &str) -> bool {
        self.by_key
            .get(&seen_key(difficulty, category))
            .is_some_and(|seen| seen.contains(word))
    }

    /// Records `word` as served for this pair.
    pub fn record(&mut self, difficulty: Difficulty, category: &str, word: &str) {
        self.by_key
            .entry(seen_key(difficulty, category))
            .or_default()
            .insert(word.to_owned());
    }

    /// Forgets every word served for this pair.
    pub fn clear(&mut self, difficulty: Difficulty, category: &str) {
        self.by_key.remove(&seen_key(difficulty, category));
    }

    /// Number of words served for this pair.
    #[must_use]
    pub fn count(&self, difficulty: Difficulty, category: &str) -> usize {
        self.by_key
            .get(&seen_key(difficulty, category))
            .map_or(0, BTreeSet::len)
    }

    /// Total words served across all pairs.
    #[must_use]
    pub fn total(&self) -> usize {
        self.by_key.values().map(BTreeSet::len).sum()
    }
}
