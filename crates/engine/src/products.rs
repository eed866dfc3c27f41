//! Product lifecycle within a shop.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use souq_core::{Actor, Category, Price, ProductId, ShopId};
use tracing::{info, instrument};

use crate::access;
use crate::aggregate::Aggregator;
use crate::error::EngineError;
use crate::models::Product;
use crate::sanitize::clean_text;
use crate::store::{CatalogStore, NewProduct, ProductPatch};

/// Raw input for listing or editing a product; the same form backs both.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    /// Amount in Libyan dinars; validated against the listing cap.
    pub price: Decimal,
    pub category: Category,
    /// Primary image URL; required.
    pub image_url: String,
}

/// What a product deletion removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductCascade {
    /// Whether the product row itself existed.
    pub product_deleted: bool,
    /// Rating rows removed with it.
    pub ratings_deleted: usize,
}

struct ValidatedDraft {
    name: String,
    description: String,
    price: Price,
    category: Category,
    image_url: String,
}

fn validate_draft(draft: ProductDraft) -> Result<ValidatedDraft, EngineError> {
    let name = clean_text(&draft.name);
    if name.is_empty() {
        return Err(EngineError::InvalidProduct("name is required".to_owned()));
    }

    let image_url = draft.image_url.trim().to_owned();
    if image_url.is_empty() {
        return Err(EngineError::InvalidProduct("image is required".to_owned()));
    }

    Ok(ValidatedDraft {
        name,
        description: clean_text(&draft.description),
        price: Price::lyd(draft.price)?,
        category: draft.category,
        image_url,
    })
}

/// Product management service.
pub struct ProductService<S> {
    store: Arc<S>,
    aggregator: Aggregator<S>,
}

impl<S> Clone for ProductService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            aggregator: self.aggregator.clone(),
        }
    }
}

impl<S: CatalogStore> ProductService<S> {
    /// Create a service over `store`; the aggregator is only used to drop
    /// cached scores when a product is deleted.
    pub fn new(store: Arc<S>, aggregator: Aggregator<S>) -> Self {
        Self { store, aggregator }
    }

    /// List a product in a shop.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Unauthenticated`] for anonymous callers
    /// - [`EngineError::NotFound`] when the shop does not exist
    /// - [`EngineError::Forbidden`] when the caller may not manage the shop
    /// - [`EngineError::InvalidProduct`] / [`EngineError::InvalidPrice`]
    ///   for bad draft fields
    /// - [`EngineError::Store`] when persistence fails
    #[instrument(skip(self, actor, draft), fields(shop_id = %shop_id))]
    pub async fn add_product(
        &self,
        actor: Option<&Actor>,
        shop_id: ShopId,
        draft: ProductDraft,
    ) -> Result<Product, EngineError> {
        let actor = access::require_actor(actor)?;
        let shop = self
            .store
            .shop(shop_id)
            .await?
            .ok_or(EngineError::NotFound("shop"))?;
        access::ensure_owner_or_admin(actor, &shop.owner_id)?;

        let validated = validate_draft(draft)?;
        let product = self
            .store
            .insert_product(NewProduct {
                shop_id,
                name: validated.name,
                description: validated.description,
                price: validated.price,
                category: validated.category,
                image_url: validated.image_url,
                created_at: Utc::now(),
            })
            .await?;

        info!(product_id = %product.id, category = %product.category, "product listed");
        Ok(product)
    }

    /// Overwrite a product's mutable fields.
    ///
    /// # Errors
    ///
    /// As for [`ProductService::add_product`], with
    /// [`EngineError::NotFound`] covering both a missing product and a
    /// missing owning shop.
    #[instrument(skip(self, actor, draft), fields(product_id = %product_id))]
    pub async fn update_product(
        &self,
        actor: Option<&Actor>,
        product_id: ProductId,
        draft: ProductDraft,
    ) -> Result<Product, EngineError> {
        let actor = access::require_actor(actor)?;
        let product = self
            .store
            .product(product_id)
            .await?
            .ok_or(EngineError::NotFound("product"))?;
        let shop = self
            .store
            .shop(product.shop_id)
            .await?
            .ok_or(EngineError::NotFound("shop"))?;
        access::ensure_owner_or_admin(actor, &shop.owner_id)?;

        let validated = validate_draft(draft)?;
        let updated = self
            .store
            .update_product(
                product_id,
                ProductPatch {
                    name: validated.name,
                    description: validated.description,
                    price: validated.price,
                    category: validated.category,
                    image_url: validated.image_url,
                },
                Utc::now(),
            )
            .await?
            .ok_or(EngineError::NotFound("product"))?;

        info!("product updated");
        Ok(updated)
    }

    /// Delete a product together with its ratings.
    ///
    /// Ratings go first so an interrupted deletion never leaves rating rows
    /// pointing at a readable product; running it again finishes the job.
    /// Deleting an already-gone product is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthenticated`] for anonymous callers,
    /// [`EngineError::Forbidden`] when the owning shop exists and the
    /// caller may not manage it, or [`EngineError::Store`] when persistence
    /// fails.
    #[instrument(skip(self, actor), fields(product_id = %product_id))]
    pub async fn delete_product(
        &self,
        actor: Option<&Actor>,
        product_id: ProductId,
    ) -> Result<ProductCascade, EngineError> {
        let actor = access::require_actor(actor)?;
        if let Some(product) = self.store.product(product_id).await? {
            // An orphan product (owning shop already gone) has no owner
            // left to check against.
            if let Some(shop) = self.store.shop(product.shop_id).await? {
                access::ensure_owner_or_admin(actor, &shop.owner_id)?;
            }
        }

        let ratings_deleted = self.store.delete_ratings_by_product(product_id).await?;
        let product_deleted = self.store.delete_product(product_id).await?;
        self.aggregator.invalidate_product(product_id).await;

        info!(product_deleted, ratings_deleted, "product removed");
        Ok(ProductCascade {
            product_deleted,
            ratings_deleted,
        })
    }

    /// Fetch a product by id.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] when the lookup fails.
    pub async fn product(&self, product_id: ProductId) -> Result<Option<Product>, EngineError> {
        Ok(self.store.product(product_id).await?)
    }

    /// All products of one shop, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] when the listing fails.
    pub async fn products_for_shop(&self, shop_id: ShopId) -> Result<Vec<Product>, EngineError> {
        Ok(self.store.products_by_shop(shop_id).await?)
    }

    /// Every product across all shops, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] when the listing fails.
    pub async fn list_products(&self) -> Result<Vec<Product>, EngineError> {
        Ok(self.store.products().await?)
    }
}
