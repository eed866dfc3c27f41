//! Catalog records persisted by the engine.
//!
//! A [`Shop`] is owned by exactly one user and addressed publicly by its
//! [`Slug`]. [`Product`]s belong to a shop and carry a validated [`Price`].
//! [`Rating`]s are one row per `(product, user)` pair; a policy-permitted
//! re-rating updates the row in place rather than appending a new one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use souq_core::{
    Category, Email, PhoneNumber, Price, ProductId, RatingId, Score, ShopId, Slug, UserId,
};

/// A seller's storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    /// Store-minted identifier.
    pub id: ShopId,
    /// The user who owns this shop. One shop per owner.
    pub owner_id: UserId,
    /// Display name, sanitized free text.
    pub name: String,
    /// URL-safe public handle, unique across all shops.
    pub slug: Slug,
    /// Sanitized free-text description shown on the shop page.
    pub description: String,
    /// Canonical Libyan mobile number used for order deep links.
    pub contact: PhoneNumber,
    /// Logo image URL, if the seller uploaded one.
    pub logo_url: Option<String>,
    /// Banner image URL, if the seller uploaded one.
    pub banner_url: Option<String>,
    /// Social profile links shown on the shop page.
    #[serde(default)]
    pub social: SocialLinks,
    /// Optional structured business details.
    pub business: Option<BusinessInfo>,
    /// When the shop was created.
    pub created_at: DateTime<Utc>,
    /// When the shop was last modified.
    pub updated_at: DateTime<Utc>,
}

/// Social profile links a seller can attach to a shop.
///
/// Every field is optional; an all-`None` value is the serde default for
/// records written before this block existed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub twitter: Option<String>,
    pub tiktok: Option<String>,
    pub youtube: Option<String>,
}

impl SocialLinks {
    /// Returns `true` when no link is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.facebook.is_none()
            && self.instagram.is_none()
            && self.twitter.is_none()
            && self.tiktok.is_none()
            && self.youtube.is_none()
    }
}

/// Structured business details shown in the shop footer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessInfo {
    /// Street address, free text.
    pub address: Option<String>,
    /// Secondary contact number, free text (landlines allowed).
    pub phone: Option<String>,
    /// Validated contact email.
    pub email: Option<Email>,
    /// Opening hours, free text.
    pub working_hours: Option<String>,
}

/// A single catalog listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Store-minted identifier.
    pub id: ProductId,
    /// The shop this product belongs to.
    pub shop_id: ShopId,
    /// Display name, sanitized free text.
    pub name: String,
    /// Sanitized description; empty when the seller left it blank.
    #[serde(default)]
    pub description: String,
    /// Validated positive price.
    pub price: Price,
    /// Fixed marketplace category.
    pub category: Category,
    /// Primary image URL.
    pub image_url: String,
    /// When the product was listed.
    pub created_at: DateTime<Utc>,
    /// When the product was last modified.
    pub updated_at: DateTime<Utc>,
}

/// One user's rating of one product.
///
/// `updated_at` moves on every in-place re-rate and is what cooldown
/// policies measure against; `created_at` never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Store-minted identifier.
    pub id: RatingId,
    /// The rated product.
    pub product_id: ProductId,
    /// The rating user. At most one row per `(product_id, user_id)`.
    pub user_id: UserId,
    /// Star value, 1 through 5.
    pub score: Score,
    /// When the user first rated this product.
    pub created_at: DateTime<Utc>,
    /// When the score was last changed.
    pub updated_at: DateTime<Utc>,
}
