//! Round scoring.

use hangman_words::domain::catalog::Difficulty;

/// Points every winning round starts from.
pub const BASE_SCORE: u32 = 100;

/// No winning round scores below this.
pub const MIN_SCORE: u32 = 50;

/// Bonus per unused mistake.
pub const EFFICIENCY_BONUS_PER_GUESS: u32 = 10;

/// Untimed rounds solved faster than this earn a speed bonus.
pub const SPEED_BONUS_WINDOW_MS: u64 = 30_000;

/// Countdown state at the end of a timed round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedFinish {
    /// Milliseconds left on the countdown.
    pub remaining_ms: u64,
    /// The countdown's starting value.
    pub limit_ms: u64,
}

/// Everything the score of a round depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundOutcome {
    /// Difficulty the round was played at.
    pub difficulty: Difficulty,
    /// Mistakes allowed in the round.
    pub max_incorrect_guesses: u32,
    /// Mistakes made.
    pub incorrect_guesses: u32,
    /// Present when the round was timed.
    pub timed: Option<TimedFinish>,
    /// Wall time spent in the round, excluding pauses.
    pub elapsed_ms: u64,
    /// Practice penalty; `1.0` outside practice mode.
    pub penalty_multiplier: f64,
}

/// Bonus for unused mistakes.
#[must_use]
pub fn efficiency_bonus(max_incorrect_guesses: u32, incorrect_guesses: u32) -> u32 {
    max_incorrect_guesses
        .saturating_sub(incorrect_guesses)
        .saturating_mul(EFFICIENCY_BONUS_PER_GUESS)
}

/// Bonus for finishing quickly.
///
/// Timed rounds earn the remaining share of the countdown as a percentage.
/// Untimed rounds earn two points per whole second left in a 30 second
/// window.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn time_bonus(timed: Option<TimedFinish>, elapsed_ms: u64) -> u32 {
    match timed {
        Some(TimedFinish { limit_ms: 0, .. }) => 0,
        Some(TimedFinish {
            remaining_ms,
            limit_ms,
        }) => (100.0 * remaining_ms.min(limit_ms) as f64 / limit_ms as f64).round() as u32,
        None => {
            let left_ms = SPEED_BONUS_WINDOW_MS.saturating_sub(elapsed_ms);
            u32::try_from(left_ms / 1000).unwrap_or(0).saturating_mul(2)
        }
    }
}

/// Scores a won round.
///
/// `(base + efficiency + time) × difficulty multiplier × practice penalty`,
/// rounded and floored at [`MIN_SCORE`].
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn calculate_score(outcome: &RoundOutcome) -> u32 {
    let raw = BASE_SCORE
        .saturating_add(efficiency_bonus(
            outcome.max_incorrect_guesses,
            outcome.incorrect_guesses,
        ))
        .saturating_add(time_bonus(outcome.timed, outcome.elapsed_ms));
    let scaled = f64::from(raw)
        * f64::from(outcome.difficulty.score_multiplier())
        * outcome.penalty_multiplier;
    // `as` saturates and maps NaN to zero, so the floor always applies.
    (scaled.round() as u32).max(MIN_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome() -> RoundOutcome {
        RoundOutcome {
            difficulty: Difficulty::Easy,
            max_incorrect_guesses: 6,
            incorrect_guesses: 0,
            timed: None,
            elapsed_ms: 40_000,
            penalty_multiplier: 1.0,
        }
    }

    #[test]
    fn test_perfect_slow_easy_round() {
        assert_eq!(calculate_score(&outcome()), 160);
    }

    #[test]
    fn test_difficulty_multiplies_whole_sum() {
        let hard = RoundOutcome {
            difficulty: Difficulty::Hard,
            incorrect_guesses: 2,
            ..outcome()
        };
        assert_eq!(calculate_score(&hard), (100 + 40) * 3);
    }

    #[test]
    fn test_untimed_speed_bonus_counts_whole_seconds() {
        assert_eq!(time_bonus(None, 0), 60);
        assert_eq!(time_bonus(None, 10_500), 38);
        assert_eq!(time_bonus(None, 29_999), 0);
        assert_eq!(time_bonus(None, 90_000), 0);
    }

    #[test]
    fn test_timed_bonus_is_share_of_countdown() {
        let finish = TimedFinish {
            remaining_ms: 45_000,
            limit_ms: 60_000,
        };
        assert_eq!(time_bonus(Some(finish), 15_000), 75);
        let zero_limit = TimedFinish {
            remaining_ms: 0,
            limit_ms: 0,
        };
        assert_eq!(time_bonus(Some(zero_limit), 0), 0);
    }

    #[test]
    fn test_timed_round_ignores_elapsed_window() {
        let timed = RoundOutcome {
            timed: Some(TimedFinish {
                remaining_ms: 30_000,
                limit_ms: 60_000,
            }),
            elapsed_ms: 1_000,
            ..outcome()
        };
        assert_eq!(calculate_score(&timed), 100 + 60 + 50);
    }

    #[test]
    fn test_practice_penalty_scales_score() {
        let penalised = RoundOutcome {
            penalty_multiplier: 0.81,
            ..outcome()
        };
        assert_eq!(calculate_score(&penalised), 130);
    }

    #[test]
    fn test_score_never_drops_below_floor() {
        let worst = RoundOutcome {
            incorrect_guesses: 9,
            penalty_multiplier: 0.0,
            ..outcome()
        };
        assert_eq!(calculate_score(&worst), MIN_SCORE);

        let nan = RoundOutcome {
            penalty_multiplier: f64::NAN,
            ..outcome()
        };
        assert_eq!(calculate_score(&nan), MIN_SCORE);

        for incorrect in 0..10 {
            for elapsed in [0, 15_000, 60_000] {
                let any = RoundOutcome {
                    incorrect_guesses: incorrect,
                    elapsed_ms: elapsed,
                    penalty_multiplier: 0.5,
                    ..outcome()
                };
                assert!(calculate_score(&any) >= MIN_SCORE);
            }
        }
    }

    #[test]
    fn test_huge_mistake_allowance_saturates() {
        assert_eq!(efficiency_bonus(u32::MAX, 0), u32::MAX);

        let generous = RoundOutcome {
            max_incorrect_guesses: u32::MAX,
            elapsed_ms: 0,
            ..outcome()
        };
        assert!(calculate_score(&generous) >= MIN_SCORE);
    }
}
