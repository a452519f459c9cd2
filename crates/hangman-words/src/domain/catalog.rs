//! Word catalog: difficulty tiers, categories and word validation.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use hangman_core::error::GameError;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Shortest accepted word, counting spaces.
pub const MIN_WORD_LEN: usize = 2;

/// Longest accepted word, counting spaces.
pub const MAX_WORD_LEN: usize = 50;

/// Difficulty tier controlling the word pool and the score multiplier.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Short, common words.
    #[default]
    Easy,
    /// Longer words.
    Medium,
    /// Long words and phrases.
    Hard,
}

impl Difficulty {
    /// Every tier, easiest first.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Lowercase name used in storage keys and catalogs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Multiplier applied to round scores.
    #[must_use]
    pub fn score_multiplier(self) -> u32 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
        }
    }

    /// The next tier up, saturating at `Hard`.
    #[must_use]
    pub fn harder(self) -> Self {
        match self {
            Self::Easy => Self::Medium,
            Self::Medium | Self::Hard => Self::Hard,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(GameError::Validation(format!("unknown difficulty: {other}"))),
        }
    }
}

/// Words grouped by category name.
pub type CategoryWords = BTreeMap<String, Vec<String>>;

/// Catalog shape as it arrives from a provider, before validation.
pub type RawCatalog = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// Normalises a candidate word, returning `None` if it is not playable.
///
/// Accepted words are trimmed, lowercased, contain only `a`–`z` and spaces,
/// include at least one letter, and are 2–50 characters long.
#[must_use]
pub fn normalize_word(raw: &str) -> Option<String> {
    let word = raw.trim().to_lowercase();
    let len = word.chars().count();
    if !(MIN_WORD_LEN..=MAX_WORD_LEN).contains(&len) {
        return None;
    }
    if !word.chars().all(|c| c.is_ascii_lowercase() || c == ' ') {
        return None;
    }
    if !word.chars().any(|c| c.is_ascii_lowercase()) {
        return None;
    }
    Some(word)
}

/// Nested word lists: difficulty → category → words.
///
/// Every stored word has passed [`normalize_word`]; empty categories and
/// tiers are never stored. Tiers iterate easiest first and categories
/// alphabetically, which makes fallback substitution deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WordCatalog {
    tiers: BTreeMap<Difficulty, CategoryWords>,
}

impl WordCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and sanitises a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidCatalog` if the text is not a
    /// difficulty → category → word-list object.
    pub fn from_json(text: &str) -> Result<Self, GameError> {
        let raw: RawCatalog = serde_json::from_str(text)
            .map_err(|e| GameError::InvalidCatalog(format!("catalog parse failed: {e}")))?;
        Ok(Self::from_raw(raw))
    }

    /// Sanitises a catalog from an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidCatalog` if the value has the wrong shape.
    pub fn from_value(value: serde_json::Value) -> Result<Self, GameError> {
        let raw: RawCatalog = serde_json::from_value(value)
            .map_err(|e| GameError::InvalidCatalog(format!("catalog parse failed: {e}")))?;
        Ok(Self::from_raw(raw))
    }

    /// Builds a catalog from raw provider data, dropping anything unplayable.
    #[must_use]
    pub fn from_raw(raw: RawCatalog) -> Self {
        let mut catalog = Self::new();
        for (tier_name, categories) in raw {
            let Ok(difficulty) = tier_name.parse::<Difficulty>() else {
                warn!(tier = %tier_name, "dropping unknown difficulty tier");
                continue;
            };
            for (category, words) in categories {
                catalog.insert(difficulty, &category, words);
            }
        }
        catalog
    }

    /// Adds words to a category, normalising and de-duplicating them.
    ///
    /// Invalid words are dropped with a warning. A category left empty is
    /// not stored.
    pub fn insert<I, S>(&mut self, difficulty: Difficulty, category: &str, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let category = category.trim().to_lowercase();
        if category.is_empty() {
            warn!(%difficulty, "dropping category with a blank name");
            return;
        }

        let existing = self
            .tiers
            .get(&difficulty)
            .and_then(|c| c.get(&category))
            .cloned()
            .unwrap_or_default();
        let mut seen: BTreeSet<String> = existing.iter().cloned().collect();
        let mut accepted = existing;
        let mut dropped = 0_usize;

        for raw in words {
            match normalize_word(raw.as_ref()) {
                Some(word) => {
                    if seen.insert(word.clone()) {
                        accepted.push(word);
                    }
                }
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            warn!(%difficulty, %category, dropped, "dropped invalid words from catalog");
        }
        if accepted.is_empty() {
            return;
        }
        self.tiers
            .entry(difficulty)
            .or_default()
            .insert(category, accepted);
    }

    /// Words for a difficulty/category pair, if present.
    #[must_use]
    pub fn words(&self, difficulty: Difficulty, category: &str) -> Option<&[String]> {
        self.tiers
            .get(&difficulty)?
            .get(category)
            .map(Vec::as_slice)
            .filter(|w| !w.is_empty())
    }

    /// Every category name that appears under any difficulty.
    #[must_use]
    pub fn all_categories(&self) -> BTreeSet<&str> {
        self.tiers
            .values()
            .flat_map(|c| c.keys().map(String::as_str))
            .collect()
    }

    /// Whether `difficulty` has at least one non-empty category.
    #[must_use]
    pub fn is_populated(&self, difficulty: Difficulty) -> bool {
        self.first_populated_category(difficulty).is_some()
    }

    /// The easiest difficulty that has at least one non-empty category.
    #[must_use]
    pub fn first_populated_difficulty(&self) -> Option<Difficulty> {
        Difficulty::ALL.into_iter().find(|d| self.is_populated(*d))
    }

    /// The first non-empty category under `difficulty`.
    #[must_use]
    pub fn first_populated_category(&self, difficulty: Difficulty) -> Option<&str> {
        self.tiers
            .get(&difficulty)?
            .iter()
            .find(|(_, words)| !words.is_empty())
            .map(|(name, _)| name.as_str())
    }

    /// A copy containing only one difficulty tier.
    #[must_use]
    pub fn restricted_to(&self, difficulty: Difficulty) -> Self {
        let mut tiers = BTreeMap::new();
        if let Some(categories) = self.tiers.get(&difficulty) {
            tiers.insert(difficulty, categories.clone());
        }
        Self { tiers }
    }

    /// Whether the catalog holds no words at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.word_count() == 0
    }

    /// Total number of words across every tier and category.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.tiers
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }
}
