//! Engine error taxonomy.

use chrono::Duration;
use souq_core::{EmailError, PhoneNumberError, PriceError, ScoreError, SlugError};

use crate::store::StoreError;

/// Result type alias for `EngineError`.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Everything an engine operation can fail with.
///
/// Validation variants wrap the domain-type errors from `souq-core`, so the
/// exact reason (too short, out of range, wrong prefix) travels with the
/// error. [`EngineError::Store`] is the only variant that signals an
/// infrastructure problem rather than a caller mistake.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The star value is outside 1 through 5.
    #[error("invalid score: {0}")]
    InvalidScore(#[from] ScoreError),

    /// The price is not positive or exceeds the listing cap.
    #[error("invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    /// An explicitly requested slug failed validation.
    #[error("invalid slug: {0}")]
    InvalidSlug(#[from] SlugError),

    /// The shop name is empty after sanitization or yields no usable slug.
    #[error("shop name {name:?} yields no usable slug")]
    InvalidShopName {
        /// The offending name as submitted.
        name: String,
    },

    /// The contact number is not a Libyan mobile number.
    #[error("invalid contact number: {0}")]
    InvalidContact(#[from] PhoneNumberError),

    /// A business email failed validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// A product field failed validation.
    #[error("invalid product: {0}")]
    InvalidProduct(String),

    /// The operation requires a signed-in user.
    #[error("authentication required")]
    Unauthenticated,

    /// The actor is neither the shop owner nor an admin.
    #[error("not allowed to manage this shop")]
    Forbidden,

    /// The actor already owns a shop.
    #[error("owner already has a shop")]
    ShopExists,

    /// One-time policy: the user has already rated this product.
    #[error("product already rated by this user")]
    AlreadyRated,

    /// Cooldown policy: the user re-rated too soon.
    #[error("rating cooldown active, about {} minute(s) remaining", remaining.num_minutes().max(1))]
    CooldownActive {
        /// Time left until the user may rate again.
        remaining: Duration,
    },

    /// The referenced record does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The persistence layer failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Whether this error is the caller's fault (bad input, missing auth,
    /// policy rejection) rather than an infrastructure failure.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}
