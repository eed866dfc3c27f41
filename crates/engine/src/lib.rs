//! Souq catalog and reputation engine.
//!
//! This crate is the headless core behind the Souq storefront builder:
//! shop and product lifecycles, star ratings with pluggable re-rating
//! policies, score aggregation, marketplace browsing, and WhatsApp order
//! hand-off. It is UI- and transport-free; a web layer drives it through
//! [`Engine`].

#![cfg_attr(not(test), forbid(unsafe_code))]

mod access;
mod sanitize;

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod marketplace;
pub mod models;
pub mod order;
pub mod products;
pub mod ratings;
pub mod shops;
pub mod store;

pub use engine::Engine;
pub use error::{EngineError, Result};
