//! Souq Core - Shared domain types.
//!
//! This crate provides common types used across all Souq components:
//! - `engine` - The catalog and reputation engine
//! - `integration-tests` - End-to-end scenario tests
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe ids, slugs, scores, prices,
//!   phone numbers, categories, and caller identity

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
