//! Hangman — Words bounded context.
//!
//! Responsible for the word catalog, validating and sanitising word data,
//! resolving a word for a difficulty/category with bounded fallback, and
//! loading catalogs through a tiered provider chain.

pub mod application;
pub mod domain;
