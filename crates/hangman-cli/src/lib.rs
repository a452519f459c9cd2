//! Hangman terminal front end.
//!
//! Wires the engine to the file store, the tiered word provider and a
//! line-oriented terminal interface.

pub mod bootstrap;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod session;
