//! Hangman Core — shared abstractions.
//!
//! This crate defines the traits and types that the word, engine and store
//! crates depend on. It contains no game rules and no infrastructure code.

pub mod clock;
pub mod error;
pub mod event;
pub mod rng;
pub mod store;
