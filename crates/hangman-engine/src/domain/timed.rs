//! Countdown bookkeeping for timed mode.
//!
//! The controller does not own a timer. A driver (the terminal loop, a UI
//! event loop) calls back on a fixed interval with the [`TimerToken`] it was
//! handed when the countdown was armed. Every arm and every stop moves the
//! generation on, so a tick scheduled for a superseded countdown is
//! recognised and dropped.

use serde::{Deserialize, Serialize};

/// Default interval between countdown ticks.
pub const DEFAULT_TICK_MS: u64 = 1000;

/// Identifies one armed countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerToken(u64);

/// Result of delivering one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick belonged to a stopped or superseded countdown.
    Ignored,
    /// Time was deducted and some remains.
    Running {
        /// Milliseconds left.
        remaining_ms: u64,
    },
    /// The countdown reached zero; the round is lost.
    Expired,
}

/// Tracks which countdown, if any, is live.
#[derive(Debug, Clone, Default)]
pub struct TimedModeController {
    generation: u64,
    armed: Option<TimerToken>,
}

impl TimedModeController {
    /// Creates a stopped controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a fresh countdown, invalidating any earlier token.
    pub fn arm(&mut self) -> TimerToken {
        self.generation += 1;
        let token = TimerToken(self.generation);
        self.armed = Some(token);
        token
    }

    /// Stops the countdown; outstanding tokens become stale.
    pub fn stop(&mut self) {
        self.generation += 1;
        self.armed = None;
    }

    /// Token of the live countdown.
    #[must_use]
    pub fn token(&self) -> Option<TimerToken> {
        self.armed
    }

    /// Whether `token` belongs to the live countdown.
    #[must_use]
    pub fn is_live(&self, token: TimerToken) -> bool {
        self.armed == Some(token)
    }

    /// Deducts `tick_ms` from `remaining_ms` if `token` is live.
    ///
    /// On expiry the countdown stops itself, so later ticks are ignored.
    pub fn tick(&mut self, token: TimerToken, remaining_ms: &mut u64, tick_ms: u64) -> TickOutcome {
        if !self.is_live(token) {
            return TickOutcome::Ignored;
        }
        *remaining_ms = remaining_ms.saturating_sub(tick_ms);
        if *remaining_ms == 0 {
            self.stop();
            return TickOutcome::Expired;
        }
        TickOutcome::Running {
            remaining_ms: *remaining_ms,
        }
    }
}
