//! Domain layer for the Words context.

pub mod catalog;
pub mod filters;
pub mod selector;
