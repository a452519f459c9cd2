//! Wall-clock abstraction used for round timing and unlock timestamps.

use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// Round timing, best times and achievement timestamps all read the clock
/// through this trait so tests can pin or advance time explicitly.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
