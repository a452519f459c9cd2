//! Hangman Engine — the game orchestration engine.
//!
//! The domain layer holds the game state and the pure rules that act on it
//! (scoring, progression, achievements, statistics and the three game modes).
//! The application layer wires them into [`GameStateMachine`], which owns the
//! state and talks to the clock, RNG, persistence store and event sink.

pub mod application;
pub mod domain;

pub use application::machine::{EngineConfig, EngineContext, GameStateMachine};
pub use domain::events::{GameEvent, GameEventKind};
pub use domain::state::{GameState, GameStatus, GuessOutcome};
