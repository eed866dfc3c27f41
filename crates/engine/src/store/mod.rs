//! Persistence abstraction for catalog records.
//!
//! The engine talks to a document store through [`CatalogStore`]: equality
//! lookups, full-collection scans ordered newest first, and two conditional
//! rating writes that back the concurrency contract of rating submission.
//! [`MemoryStore`] is the bundled implementation; a remote adapter plugs in
//! by implementing the same trait.

mod memory;

pub use memory::MemoryStore;

use std::future::Future;

use chrono::{DateTime, Utc};
use souq_core::{Category, PhoneNumber, Price, ProductId, RatingId, Score, ShopId, Slug, UserId};

use crate::models::{BusinessInfo, Product, Rating, Shop, SocialLinks};

/// Errors surfaced by a [`CatalogStore`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached or gave up.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// A uniqueness or precondition check failed inside the store.
    #[error("store conflict: {0}")]
    Conflict(String),
    /// A persisted record could not be decoded.
    #[error("corrupted record: {0}")]
    Corrupted(String),
}

/// Fields for a shop insert. The store mints the id and stamps
/// `updated_at = created_at`.
#[derive(Debug, Clone)]
pub struct NewShop {
    pub owner_id: UserId,
    pub name: String,
    pub slug: Slug,
    pub description: String,
    pub contact: PhoneNumber,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub social: SocialLinks,
    pub business: Option<BusinessInfo>,
    pub created_at: DateTime<Utc>,
}

/// Replacement values for a shop's mutable fields. The slug, owner and
/// `created_at` never change after insert.
#[derive(Debug, Clone)]
pub struct ShopPatch {
    pub name: String,
    pub description: String,
    pub contact: PhoneNumber,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub social: SocialLinks,
    pub business: Option<BusinessInfo>,
}

/// Fields for a product insert.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub shop_id: ShopId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: Category,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// Replacement values for a product's mutable fields.
#[derive(Debug, Clone)]
pub struct ProductPatch {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: Category,
    pub image_url: String,
}

/// Fields for a first-time rating insert.
#[derive(Debug, Clone)]
pub struct NewRating {
    pub product_id: ProductId,
    pub user_id: UserId,
    pub score: Score,
    pub created_at: DateTime<Utc>,
}

/// Outcome of [`CatalogStore::insert_rating_if_absent`].
#[derive(Debug, Clone, PartialEq)]
pub enum RatingInsert {
    /// No row existed for the `(product, user)` pair; this one was written.
    Inserted(Rating),
    /// A row already existed; nothing was written. Carries the current row
    /// so the caller can re-evaluate policy against it.
    AlreadyPresent(Rating),
}

/// Async document store for shops, products and ratings.
///
/// List methods return records ordered newest first by `created_at`, with
/// insertion order breaking ties. The two rating write methods are the only
/// conditional operations: each checks and writes atomically with respect to
/// every other method on the same store.
pub trait CatalogStore: Send + Sync {
    /// Fetch a shop by id.
    fn shop(&self, id: ShopId) -> impl Future<Output = Result<Option<Shop>, StoreError>> + Send;

    /// Fetch a shop by its unique slug.
    fn shop_by_slug(
        &self,
        slug: &Slug,
    ) -> impl Future<Output = Result<Option<Shop>, StoreError>> + Send;

    /// Fetch the shop owned by a user, if any.
    fn shop_by_owner(
        &self,
        owner_id: &UserId,
    ) -> impl Future<Output = Result<Option<Shop>, StoreError>> + Send;

    /// All shops, newest first.
    fn shops(&self) -> impl Future<Output = Result<Vec<Shop>, StoreError>> + Send;

    /// Insert a shop, minting its id.
    ///
    /// Fails with [`StoreError::Conflict`] when the slug is already taken;
    /// the uniqueness check and the write are atomic.
    fn insert_shop(
        &self,
        new: NewShop,
    ) -> impl Future<Output = Result<Shop, StoreError>> + Send;

    /// Overwrite a shop's mutable fields. Returns the updated record, or
    /// `None` when no shop has this id.
    fn update_shop(
        &self,
        id: ShopId,
        patch: ShopPatch,
        updated_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<Option<Shop>, StoreError>> + Send;

    /// Delete a shop row. Returns whether a row existed. Does not touch the
    /// shop's products; cascades are orchestrated above the store.
    fn delete_shop(&self, id: ShopId) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Fetch a product by id.
    fn product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Option<Product>, StoreError>> + Send;

    /// All products, newest first.
    fn products(&self) -> impl Future<Output = Result<Vec<Product>, StoreError>> + Send;

    /// All products of one shop, newest first.
    fn products_by_shop(
        &self,
        shop_id: ShopId,
    ) -> impl Future<Output = Result<Vec<Product>, StoreError>> + Send;

    /// Insert a product, minting its id.
    fn insert_product(
        &self,
        new: NewProduct,
    ) -> impl Future<Output = Result<Product, StoreError>> + Send;

    /// Overwrite a product's mutable fields. Returns the updated record, or
    /// `None` when no product has this id.
    fn update_product(
        &self,
        id: ProductId,
        patch: ProductPatch,
        updated_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<Option<Product>, StoreError>> + Send;

    /// Delete a product row. Returns whether a row existed.
    fn delete_product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// All ratings, newest first.
    fn ratings(&self) -> impl Future<Output = Result<Vec<Rating>, StoreError>> + Send;

    /// All ratings of one product, newest first.
    fn ratings_by_product(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Vec<Rating>, StoreError>> + Send;

    /// The rating one user gave one product, if any.
    fn rating_by_product_and_user(
        &self,
        product_id: ProductId,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Option<Rating>, StoreError>> + Send;

    /// Insert a rating only if the `(product, user)` pair has no row yet.
    ///
    /// The existence check and the insert are atomic: when two submissions
    /// race, exactly one observes [`RatingInsert::Inserted`].
    fn insert_rating_if_absent(
        &self,
        new: NewRating,
    ) -> impl Future<Output = Result<RatingInsert, StoreError>> + Send;

    /// Overwrite a rating's score only if the row still carries
    /// `expected_updated_at`. Returns the updated record, or `None` when the
    /// row is gone or was modified since it was read.
    fn update_rating_guarded(
        &self,
        id: RatingId,
        expected_updated_at: DateTime<Utc>,
        score: Score,
        updated_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<Option<Rating>, StoreError>> + Send;

    /// Delete every rating of one product. Returns the number of rows
    /// removed.
    fn delete_ratings_by_product(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<usize, StoreError>> + Send;
}
