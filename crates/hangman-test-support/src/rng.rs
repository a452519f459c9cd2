//! Test RNG — deterministic `DeterministicRng` implementations for tests.

use hangman_core::rng::DeterministicRng;

/// A no-op RNG that always returns `min`. Word picks land on the first
/// candidate and hints on the first hidden letter.
#[derive(Debug, Default)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }
}

/// An RNG that replays a scripted list of picks.
///
/// Each call consumes one value and clamps it into the requested range, so
/// `SequenceRng::new(vec![2])` picks the third candidate when there are at
/// least three and the last one otherwise. Panics once the script runs out,
/// which flags a test that drew more randomness than it planned for.
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<u32>,
    index: usize,
}

impl SequenceRng {
    /// Create a new `SequenceRng` with the given values.
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, index: 0 }
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        let Some(&val) = self.values.get(self.index) else {
            panic!(
                "SequenceRng exhausted after {} values; script more picks",
                self.values.len()
            );
        };
        self.index += 1;
        val.clamp(min, max.max(min))
    }
}
