//! Application layer for the Words context.

pub mod provider;
