//! Reputation rollups.
//!
//! The pure functions here compute summaries from rating rows; the
//! [`Aggregator`] wraps them with store access and an optional
//! time-to-live cache for per-product scores. Cached entries are dropped
//! whenever a rating write goes through, so readers see fresh averages
//! immediately after rating and at worst TTL-stale ones otherwise.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use moka::future::Cache;
use souq_core::{Category, ProductId, ShopId};
use tracing::{debug, instrument};

use crate::config::CacheConfig;
use crate::error::EngineError;
use crate::models::{Product, Rating};
use crate::store::CatalogStore;

/// Average star value and rating count for one product.
///
/// An unrated product is the [`ProductScore::ZERO`] sentinel; use
/// [`ProductScore::stars`] to tell "no ratings yet" apart from a genuine
/// low average.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProductScore {
    /// Mean of all star values; `0.0` when there are none.
    pub average: f64,
    /// Number of ratings.
    pub count: usize,
}

impl ProductScore {
    /// The unrated sentinel.
    pub const ZERO: Self = Self {
        average: 0.0,
        count: 0,
    };

    /// Whether this product has no ratings.
    #[must_use]
    pub const fn is_unrated(&self) -> bool {
        self.count == 0
    }

    /// The average as a display value, or `None` when unrated. A `None`
    /// renders as "no ratings yet", never as zero stars.
    #[must_use]
    pub fn stars(&self) -> Option<f64> {
        (!self.is_unrated()).then_some(self.average)
    }
}

/// Rollup across one shop's products.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShopStats {
    /// Listed products, rated or not.
    pub product_count: usize,
    /// Products with at least one rating.
    pub rated_product_count: usize,
    /// Rating rows across all of the shop's products.
    pub total_ratings: usize,
    /// Mean of per-product averages over rated products only.
    pub average: f64,
}

impl ShopStats {
    /// The shop average as a display value, or `None` when nothing is
    /// rated yet.
    #[must_use]
    pub fn stars(&self) -> Option<f64> {
        (self.rated_product_count > 0).then_some(self.average)
    }
}

/// Score one product from a slice of rating rows. Rows for other products
/// are ignored.
#[must_use]
pub fn product_score(ratings: &[Rating], product_id: ProductId) -> ProductScore {
    let mut sum = 0.0;
    let mut count = 0usize;
    for rating in ratings.iter().filter(|r| r.product_id == product_id) {
        sum += rating.score.as_f64();
        count += 1;
    }
    mean_score(sum, count)
}

/// Score every rated product in one pass. Unrated products simply have no
/// entry; callers fall back to [`ProductScore::ZERO`].
#[must_use]
pub fn scores_by_product(ratings: &[Rating]) -> HashMap<ProductId, ProductScore> {
    let mut sums: HashMap<ProductId, (f64, usize)> = HashMap::new();
    for rating in ratings {
        let entry = sums.entry(rating.product_id).or_insert((0.0, 0));
        entry.0 += rating.score.as_f64();
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(product_id, (sum, count))| (product_id, mean_score(sum, count)))
        .collect()
}

/// Roll up a shop's reputation from its products and a slice of rating
/// rows. Ratings of products outside `products` are ignored, so the full
/// rating collection can be passed as-is.
#[must_use]
pub fn shop_stats(products: &[Product], ratings: &[Rating]) -> ShopStats {
    let members: HashSet<ProductId> = products.iter().map(|product| product.id).collect();

    let mut total_ratings = 0usize;
    let mut rated_product_count = 0usize;
    let mut average_sum = 0.0;
    for (product_id, score) in scores_by_product(ratings) {
        if !members.contains(&product_id) {
            continue;
        }
        total_ratings += score.count;
        rated_product_count += 1;
        average_sum += score.average;
    }

    let average = if rated_product_count == 0 {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)] // counts stay far below 2^52
        let rated = rated_product_count as f64;
        average_sum / rated
    };

    ShopStats {
        product_count: products.len(),
        rated_product_count,
        total_ratings,
        average,
    }
}

/// Count products per category; keys iterate in category order.
#[must_use]
pub fn category_distribution(products: &[Product]) -> BTreeMap<Category, usize> {
    let mut counts = BTreeMap::new();
    for product in products {
        *counts.entry(product.category).or_insert(0) += 1;
    }
    counts
}

fn mean_score(sum: f64, count: usize) -> ProductScore {
    if count == 0 {
        return ProductScore::ZERO;
    }
    #[allow(clippy::cast_precision_loss)] // counts stay far below 2^52
    let divisor = count as f64;
    ProductScore {
        average: sum / divisor,
        count,
    }
}

/// Store-backed score reader with an optional TTL cache.
pub struct Aggregator<S> {
    store: Arc<S>,
    cache: Option<Cache<ProductId, ProductScore>>,
}

impl<S> Clone for Aggregator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: self.cache.clone(),
        }
    }
}

impl<S: CatalogStore> Aggregator<S> {
    /// Create an aggregator; `cache: None` recomputes on every read.
    #[must_use]
    pub fn new(store: Arc<S>, cache: Option<CacheConfig>) -> Self {
        let cache = cache.map(|config| {
            Cache::builder()
                .max_capacity(config.capacity)
                .time_to_live(config.ttl)
                .build()
        });
        Self { store, cache }
    }

    /// Average and count for one product, served from cache when possible.
    ///
    /// A product with no rating rows (including one that does not exist)
    /// scores [`ProductScore::ZERO`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] when the rating rows cannot be read.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn score_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<ProductScore, EngineError> {
        if let Some(cache) = &self.cache {
            if let Some(score) = cache.get(&product_id).await {
                debug!("Cache hit for product score");
                return Ok(score);
            }
        }

        let ratings = self.store.ratings_by_product(product_id).await?;
        let score = product_score(&ratings, product_id);

        if let Some(cache) = &self.cache {
            cache.insert(product_id, score).await;
        }
        Ok(score)
    }

    /// Reputation rollup for one shop. A missing or empty shop rolls up to
    /// all-zero stats.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] when the underlying reads fail.
    #[instrument(skip(self), fields(shop_id = %shop_id))]
    pub async fn stats_for_shop(&self, shop_id: ShopId) -> Result<ShopStats, EngineError> {
        let products = self.store.products_by_shop(shop_id).await?;
        let ratings = self.store.ratings().await?;
        Ok(shop_stats(&products, &ratings))
    }

    /// Drop the cached score for one product. Called after every rating
    /// write and when a product is deleted.
    pub async fn invalidate_product(&self, product_id: ProductId) {
        if let Some(cache) = &self.cache {
            cache.invalidate(&product_id).await;
        }
    }
}
