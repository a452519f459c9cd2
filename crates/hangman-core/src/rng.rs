//! Random number generator abstraction for determinism.
//!
//! Word picks and hint letters go through this trait. In production it wraps
//! a real RNG; in tests a seeded or scripted implementation is injected.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;

    /// Pick a uniformly random index into a collection of `len` elements.
    ///
    /// Returns `None` for an empty collection. Out-of-range values from a
    /// scripted RNG are clamped to the last index.
    fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let max = u32::try_from(len - 1).unwrap_or(u32::MAX);
        let picked = self.next_u32_range(0, max) as usize;
        Some(picked.min(len - 1))
    }
}

/// Production RNG backed by `rand`'s standard generator.
#[derive(Debug, Clone)]
pub struct StdRandom {
    inner: StdRng,
}

impl StdRandom {
    /// Seeds from the operating system's entropy source.
    #[must_use]
    pub fn from_os() -> Self {
        Self {
            inner: StdRng::from_os_rng(),
        }
    }

    /// Creates a reproducible generator from a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }
}

impl DeterministicRng for StdRandom {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.inner.random_range(min..=max)
    }
}
