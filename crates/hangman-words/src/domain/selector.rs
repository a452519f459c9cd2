//! Word selection with bounded difficulty/category fallback.

use hangman_core::error::GameError;
use hangman_core::rng::DeterministicRng;
use tracing::{debug, warn};

use super::catalog::{Difficulty, WordCatalog};
use super::filters::{LengthFilter, SeenWords};

/// Cap on difficulty/category substitutions before selection gives up.
pub const MAX_SELECTION_ATTEMPTS: u32 = 5;

/// Mask cell shown for a letter that has not been revealed.
pub const MASK: char = '_';

/// Builds the initial mask for `word`: one cell per character, letters
/// hidden, spaces kept as spaces.
#[must_use]
pub fn mask_word(word: &str) -> Vec<char> {
    word.chars()
        .map(|c| if c == ' ' { ' ' } else { MASK })
        .collect()
}

/// Practice-mode inputs to a selection.
#[derive(Debug)]
pub struct PracticeSelection<'a> {
    /// Length bounds applied before repeat avoidance.
    pub length: LengthFilter,
    /// When `true`, words already served may be served again.
    pub allow_repeats: bool,
    /// Words already served; updated with the chosen word.
    pub seen: &'a mut SeenWords,
}

/// The outcome of a successful selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// The chosen word.
    pub word: String,
    /// Initial mask for the word.
    pub hidden: Vec<char>,
    /// Difficulty the word was drawn from (may differ from the request).
    pub difficulty: Difficulty,
    /// Category the word was drawn from (may differ from the request).
    pub category: String,
    /// Number of substitutions needed to reach a populated pool.
    pub substitutions: u32,
}

/// Resolves a word for a difficulty/category pair.
#[derive(Debug, Clone, Copy)]
pub struct WordSelector {
    max_attempts: u32,
}

impl Default for WordSelector {
    fn default() -> Self {
        Self {
            max_attempts: MAX_SELECTION_ATTEMPTS,
        }
    }
}

impl WordSelector {
    /// Creates a selector with the default substitution cap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a selector with a custom substitution cap.
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    /// Picks a word for the requested pair.
    ///
    /// An unpopulated difficulty is replaced by the easiest populated one and
    /// an unknown or empty category by the first populated category of that
    /// difficulty. Practice filters then narrow the pool: length first, then
    /// repeat avoidance (clearing the seen-set once if every word was seen).
    ///
    /// # Errors
    ///
    /// Returns `GameError::SelectionExhausted` if no populated pool can be
    /// reached within the substitution cap.
    pub fn select(
        &self,
        catalog: &WordCatalog,
        difficulty: Difficulty,
        category: &str,
        practice: Option<PracticeSelection<'_>>,
        rng: &mut dyn DeterministicRng,
    ) -> Result<Selection, GameError> {
        let (difficulty, category, substitutions) = self.resolve(catalog, difficulty, category)?;
        let pool = catalog
            .words(difficulty, &category)
            .ok_or(GameError::SelectionExhausted {
                attempts: substitutions,
            })?;

        let word = match practice {
            Some(mut practice) => {
                let candidates = practice_candidates(pool, difficulty, &category, &mut practice);
                let word = pick(&candidates, rng, substitutions)?;
                practice.seen.record(difficulty, &category, &word);
                word
            }
            None => {
                let candidates: Vec<&String> = pool.iter().collect();
                pick(&candidates, rng, substitutions)?
            }
        };

        debug!(%difficulty, %category, substitutions, "selected word");
        Ok(Selection {
            hidden: mask_word(&word),
            word,
            difficulty,
            category,
            substitutions,
        })
    }

    /// Walks the catalog until the pair points at a non-empty word list.
    fn resolve(
        &self,
        catalog: &WordCatalog,
        requested_difficulty: Difficulty,
        requested_category: &str,
    ) -> Result<(Difficulty, String, u32), GameError> {
        let mut difficulty = requested_difficulty;
        let mut category = requested_category.to_owned();
        let mut attempts = 0;

        loop {
            if catalog.words(difficulty, &category).is_some() {
                return Ok((difficulty, category, attempts));
            }
            if attempts >= self.max_attempts {
                warn!(attempts, "word selection exhausted its substitution budget");
                return Err(GameError::SelectionExhausted { attempts });
            }
            attempts += 1;

            if catalog.is_populated(difficulty) {
                let Some(substitute) = catalog.first_populated_category(difficulty) else {
                    return Err(GameError::SelectionExhausted { attempts });
                };
                warn!(%difficulty, requested = %category, %substitute, "substituting category");
                category = substitute.to_owned();
            } else {
                let Some(substitute) = catalog.first_populated_difficulty() else {
                    warn!("word catalog has no populated difficulty");
                    return Err(GameError::SelectionExhausted { attempts });
                };
                warn!(requested = %difficulty, %substitute, "substituting difficulty");
                difficulty = substitute;
            }
        }
    }
}

fn practice_candidates<'w>(
    pool: &'w [String],
    difficulty: Difficulty,
    category: &str,
    practice: &mut PracticeSelection<'_>,
) -> Vec<&'w String> {
    let mut candidates: Vec<&String> = pool.iter().filter(|w| practice.length.accepts(w)).collect();
    if candidates.is_empty() {
        warn!(%difficulty, %category, "length filter matched no words; relaxing it");
        candidates = pool.iter().collect();
    }

    if practice.allow_repeats {
        return candidates;
    }

    let unseen: Vec<&String> = candidates
        .iter()
        .copied()
        .filter(|w| !practice.seen.contains(difficulty, category, w))
        .collect();
    if unseen.is_empty() {
        debug!(%difficulty, %category, "every word already seen; starting the pool over");
        practice.seen.clear(difficulty, category);
        return candidates;
    }
    unseen
}

fn pick(
    candidates: &[&String],
    rng: &mut dyn DeterministicRng,
    attempts: u32,
) -> Result<String, GameError> {
    rng.pick_index(candidates.len())
        .map(|i| candidates[i].clone())
        .ok_or(GameError::SelectionExhausted { attempts })
}
