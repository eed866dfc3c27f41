//! In-memory [`CatalogStore`] backed by a single `RwLock`.
//!
//! Every conditional write takes the write lock for its whole
//! check-then-write sequence, which is what makes
//! [`CatalogStore::insert_rating_if_absent`] and
//! [`CatalogStore::update_rating_guarded`] atomic here.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use souq_core::{ProductId, RatingId, Score, ShopId, Slug, UserId};

use crate::models::{Product, Rating, Shop};

use super::{
    CatalogStore, NewProduct, NewRating, NewShop, ProductPatch, RatingInsert, ShopPatch,
    StoreError,
};

/// Thread-safe in-memory store. `Clone` hands out another handle to the
/// same collections.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

#[derive(Debug, Default)]
struct Collections {
    shops: HashMap<ShopId, Row<Shop>>,
    products: HashMap<ProductId, Row<Product>>,
    ratings: HashMap<RatingId, Row<Rating>>,
    next_seq: u64,
}

/// A record plus its insertion sequence number, which breaks `created_at`
/// ties so listing order stays deterministic.
#[derive(Debug, Clone)]
struct Row<T> {
    record: T,
    seq: u64,
}

impl Collections {
    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock only means some thread panicked while holding it;
    // each mutation here leaves the maps consistent at every panic point,
    // so the data is still usable.
    fn read(&self) -> RwLockReadGuard<'_, Collections> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Collections> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Newest first: `created_at` descending, insertion sequence breaking ties.
fn newest_first<T: Clone>(
    rows: impl Iterator<Item = Row<T>>,
    created_at: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<T> {
    let mut rows: Vec<Row<T>> = rows.collect();
    rows.sort_by(|a, b| {
        created_at(&b.record)
            .cmp(&created_at(&a.record))
            .then(b.seq.cmp(&a.seq))
    });
    rows.into_iter().map(|row| row.record).collect()
}

impl CatalogStore for MemoryStore {
    async fn shop(&self, id: ShopId) -> Result<Option<Shop>, StoreError> {
        Ok(self.read().shops.get(&id).map(|row| row.record.clone()))
    }

    async fn shop_by_slug(&self, slug: &Slug) -> Result<Option<Shop>, StoreError> {
        Ok(self
            .read()
            .shops
            .values()
            .find(|row| row.record.slug == *slug)
            .map(|row| row.record.clone()))
    }

    async fn shop_by_owner(&self, owner_id: &UserId) -> Result<Option<Shop>, StoreError> {
        Ok(self
            .read()
            .shops
            .values()
            .find(|row| row.record.owner_id == *owner_id)
            .map(|row| row.record.clone()))
    }

    async fn shops(&self) -> Result<Vec<Shop>, StoreError> {
        Ok(newest_first(
            self.read().shops.values().cloned(),
            |shop| shop.created_at,
        ))
    }

    async fn insert_shop(&self, new: NewShop) -> Result<Shop, StoreError> {
        let mut data = self.write();
        if data.shops.values().any(|row| row.record.slug == new.slug) {
            return Err(StoreError::Conflict(format!(
                "slug already in use: {}",
                new.slug
            )));
        }

        let seq = data.bump_seq();
        let shop = Shop {
            id: ShopId::generate(),
            owner_id: new.owner_id,
            name: new.name,
            slug: new.slug,
            description: new.description,
            contact: new.contact,
            logo_url: new.logo_url,
            banner_url: new.banner_url,
            social: new.social,
            business: new.business,
            created_at: new.created_at,
            updated_at: new.created_at,
        };
        data.shops.insert(
            shop.id,
            Row {
                record: shop.clone(),
                seq,
            },
        );
        Ok(shop)
    }

    async fn update_shop(
        &self,
        id: ShopId,
        patch: ShopPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Shop>, StoreError> {
        let mut data = self.write();
        let Some(row) = data.shops.get_mut(&id) else {
            return Ok(None);
        };
        row.record.name = patch.name;
        row.record.description = patch.description;
        row.record.contact = patch.contact;
        row.record.logo_url = patch.logo_url;
        row.record.banner_url = patch.banner_url;
        row.record.social = patch.social;
        row.record.business = patch.business;
        row.record.updated_at = updated_at;
        Ok(Some(row.record.clone()))
    }

    async fn delete_shop(&self, id: ShopId) -> Result<bool, StoreError> {
        Ok(self.write().shops.remove(&id).is_some())
    }

    async fn product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.read().products.get(&id).map(|row| row.record.clone()))
    }

    async fn products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(newest_first(
            self.read().products.values().cloned(),
            |product| product.created_at,
        ))
    }

    async fn products_by_shop(&self, shop_id: ShopId) -> Result<Vec<Product>, StoreError> {
        Ok(newest_first(
            self.read()
                .products
                .values()
                .filter(|row| row.record.shop_id == shop_id)
                .cloned(),
            |product| product.created_at,
        ))
    }

    async fn insert_product(&self, new: NewProduct) -> Result<Product, StoreError> {
        let mut data = self.write();
        let seq = data.bump_seq();
        let product = Product {
            id: ProductId::generate(),
            shop_id: new.shop_id,
            name: new.name,
            description: new.description,
            price: new.price,
            category: new.category,
            image_url: new.image_url,
            created_at: new.created_at,
            updated_at: new.created_at,
        };
        data.products.insert(
            product.id,
            Row {
                record: product.clone(),
                seq,
            },
        );
        Ok(product)
    }

    async fn update_product(
        &self,
        id: ProductId,
        patch: ProductPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Product>, StoreError> {
        let mut data = self.write();
        let Some(row) = data.products.get_mut(&id) else {
            return Ok(None);
        };
        row.record.name = patch.name;
        row.record.description = patch.description;
        row.record.price = patch.price;
        row.record.category = patch.category;
        row.record.image_url = patch.image_url;
        row.record.updated_at = updated_at;
        Ok(Some(row.record.clone()))
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, StoreError> {
        Ok(self.write().products.remove(&id).is_some())
    }

    async fn ratings(&self) -> Result<Vec<Rating>, StoreError> {
        Ok(newest_first(
            self.read().ratings.values().cloned(),
            |rating| rating.created_at,
        ))
    }

    async fn ratings_by_product(&self, product_id: ProductId) -> Result<Vec<Rating>, StoreError> {
        Ok(newest_first(
            self.read()
                .ratings
                .values()
                .filter(|row| row.record.product_id == product_id)
                .cloned(),
            |rating| rating.created_at,
        ))
    }

    async fn rating_by_product_and_user(
        &self,
        product_id: ProductId,
        user_id: &UserId,
    ) -> Result<Option<Rating>, StoreError> {
        Ok(self
            .read()
            .ratings
            .values()
            .find(|row| row.record.product_id == product_id && row.record.user_id == *user_id)
            .map(|row| row.record.clone()))
    }

    async fn insert_rating_if_absent(&self, new: NewRating) -> Result<RatingInsert, StoreError> {
        let mut data = self.write();
        if let Some(row) = data.ratings.values().find(|row| {
            row.record.product_id == new.product_id && row.record.user_id == new.user_id
        }) {
            return Ok(RatingInsert::AlreadyPresent(row.record.clone()));
        }

        let seq = data.bump_seq();
        let rating = Rating {
            id: RatingId::generate(),
            product_id: new.product_id,
            user_id: new.user_id,
            score: new.score,
            created_at: new.created_at,
            updated_at: new.created_at,
        };
        data.ratings.insert(
            rating.id,
            Row {
                record: rating.clone(),
                seq,
            },
        );
        Ok(RatingInsert::Inserted(rating))
    }

    async fn update_rating_guarded(
        &self,
        id: RatingId,
        expected_updated_at: DateTime<Utc>,
        score: Score,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Rating>, StoreError> {
        let mut data = self.write();
        let Some(row) = data.ratings.get_mut(&id) else {
            return Ok(None);
        };
        if row.record.updated_at != expected_updated_at {
            return Ok(None);
        }
        row.record.score = score;
        row.record.updated_at = updated_at;
        Ok(Some(row.record.clone()))
    }

    async fn delete_ratings_by_product(&self, product_id: ProductId) -> Result<usize, StoreError> {
        let mut data = self.write();
        let before = data.ratings.len();
        data.ratings
            .retain(|_, row| row.record.product_id != product_id);
        Ok(before - data.ratings.len())
    }
}
