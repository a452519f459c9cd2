//! Domain layer: game state and the rules that act on it.

pub mod achievements;
pub mod events;
pub mod multiplayer;
pub mod practice;
pub mod progression;
pub mod scoring;
pub mod state;
pub mod statistics;
pub mod timed;
