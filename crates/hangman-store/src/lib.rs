//! Durable storage for game progress.

pub mod file_store;
pub mod layout;
