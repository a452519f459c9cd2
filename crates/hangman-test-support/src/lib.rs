//! Shared test doubles for the hangman game engine.

mod clock;
mod rng;
mod sink;
mod store;

pub use clock::{FixedClock, ManualClock, fixed_time};
pub use rng::{MockRng, SequenceRng};
pub use sink::RecordingSink;
pub use store::{FailingStore, MemoryStore};
