//! Core types for Souq.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod actor;
pub mod category;
pub mod email;
pub mod id;
pub mod locale;
pub mod phone;
pub mod price;
pub mod score;
pub mod slug;

pub use actor::{Actor, Role};
pub use category::Category;
pub use email::{Email, EmailError};
pub use id::*;
pub use locale::Locale;
pub use phone::{PhoneNumber, PhoneNumberError};
pub use price::{CurrencyCode, Price, PriceError};
pub use score::{Score, ScoreError};
pub use slug::{Slug, SlugError};
