//! Engine facade.
//!
//! [`Engine`] wires the services over one shared store and hands out
//! references to them. It is cheap to clone; clones share the store and
//! the score cache.

use std::sync::Arc;

use crate::aggregate::Aggregator;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::marketplace::{self, FilterOptions, ProductView};
use crate::products::ProductService;
use crate::ratings::RatingLedger;
use crate::shops::ShopService;
use crate::store::CatalogStore;

/// The catalog and reputation engine over a store `S`.
pub struct Engine<S> {
    store: Arc<S>,
    shops: ShopService<S>,
    products: ProductService<S>,
    ratings: RatingLedger<S>,
    aggregator: Aggregator<S>,
}

impl<S> Clone for Engine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            shops: self.shops.clone(),
            products: self.products.clone(),
            ratings: self.ratings.clone(),
            aggregator: self.aggregator.clone(),
        }
    }
}

impl<S: CatalogStore> Engine<S> {
    /// Build an engine from a store and configuration.
    #[must_use]
    pub fn new(store: Arc<S>, config: EngineConfig) -> Self {
        let aggregator = Aggregator::new(Arc::clone(&store), config.cache);
        Self {
            shops: ShopService::new(Arc::clone(&store), aggregator.clone()),
            products: ProductService::new(Arc::clone(&store), aggregator.clone()),
            ratings: RatingLedger::new(
                Arc::clone(&store),
                config.rating_policy,
                aggregator.clone(),
            ),
            aggregator,
            store,
        }
    }

    /// Build an engine with default configuration: 24-hour re-rating
    /// cooldown and a score cache.
    #[must_use]
    pub fn with_defaults(store: Arc<S>) -> Self {
        Self::new(store, EngineConfig::default())
    }

    /// Shop lifecycle operations.
    #[must_use]
    pub const fn shops(&self) -> &ShopService<S> {
        &self.shops
    }

    /// Product lifecycle operations.
    #[must_use]
    pub const fn products(&self) -> &ProductService<S> {
        &self.products
    }

    /// Rating submission and lookups.
    #[must_use]
    pub const fn ratings(&self) -> &RatingLedger<S> {
        &self.ratings
    }

    /// Score and reputation reads.
    #[must_use]
    pub const fn aggregates(&self) -> &Aggregator<S> {
        &self.aggregator
    }

    /// Browse the marketplace: snapshot the catalog, then join, filter and
    /// sort it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] when any of the snapshot reads fail.
    pub async fn marketplace(
        &self,
        filter: &FilterOptions,
    ) -> Result<Vec<ProductView>, EngineError> {
        let products = self.store.products().await?;
        let shops = self.store.shops().await?;
        let ratings = self.store.ratings().await?;
        Ok(marketplace::query_marketplace(
            &products, &shops, &ratings, filter,
        ))
    }
}
