//! Shop lifecycle: creation, slug assignment, updates and the delete
//! cascade.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use souq_core::{Actor, Email, PhoneNumber, ShopId, Slug};
use tracing::{debug, info, instrument};

use crate::access;
use crate::aggregate::Aggregator;
use crate::error::EngineError;
use crate::models::{BusinessInfo, Shop, SocialLinks};
use crate::sanitize::{clean_optional, clean_text};
use crate::store::{CatalogStore, NewShop, ShopPatch, StoreError};

/// Raw input for opening a shop. Free-text fields are sanitized and the
/// contact number validated before anything is stored.
#[derive(Debug, Clone, Default)]
pub struct CreateShop {
    /// Display name; also the source of the derived slug.
    pub name: String,
    /// Explicitly chosen slug; derived from `name` when `None`.
    pub slug: Option<String>,
    pub description: String,
    /// Libyan mobile number in any accepted form.
    pub contact: String,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub social: SocialLinks,
    pub business: Option<BusinessDraft>,
}

/// Raw replacement values for a shop's mutable fields. The slug is not
/// among them; it never changes after creation.
#[derive(Debug, Clone, Default)]
pub struct UpdateShop {
    pub name: String,
    pub description: String,
    pub contact: String,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub social: SocialLinks,
    pub business: Option<BusinessDraft>,
}

/// Raw business details; the email is validated, the rest is sanitized
/// free text.
#[derive(Debug, Clone, Default)]
pub struct BusinessDraft {
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub working_hours: Option<String>,
}

/// What a shop deletion removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopCascade {
    /// Whether the shop row itself existed.
    pub shop_deleted: bool,
    /// Product rows removed.
    pub products_deleted: usize,
    /// Rating rows removed across all of the shop's products.
    pub ratings_deleted: usize,
}

/// Shop management service.
pub struct ShopService<S> {
    store: Arc<S>,
    aggregator: Aggregator<S>,
}

impl<S> Clone for ShopService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            aggregator: self.aggregator.clone(),
        }
    }
}

impl<S: CatalogStore> ShopService<S> {
    /// Create a service over `store`; the aggregator is only used to drop
    /// cached scores when a cascade removes products.
    pub fn new(store: Arc<S>, aggregator: Aggregator<S>) -> Self {
        Self { store, aggregator }
    }

    /// Open a shop for the calling user.
    ///
    /// The slug is validated when chosen explicitly, otherwise derived from
    /// the display name; either way a collision gets a timestamp suffix
    /// instead of failing.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Unauthenticated`] for anonymous callers
    /// - [`EngineError::InvalidShopName`] when the name sanitizes to
    ///   nothing or yields no usable slug
    /// - [`EngineError::InvalidSlug`] when an explicit slug fails validation
    /// - [`EngineError::InvalidContact`] / [`EngineError::InvalidEmail`]
    ///   for bad contact details
    /// - [`EngineError::ShopExists`] when the caller already owns a shop
    /// - [`EngineError::Store`] when persistence fails
    #[instrument(skip(self, actor, draft))]
    pub async fn create_shop(
        &self,
        actor: Option<&Actor>,
        draft: CreateShop,
    ) -> Result<Shop, EngineError> {
        let actor = access::require_actor(actor)?;

        let name = clean_text(&draft.name);
        if name.is_empty() {
            return Err(EngineError::InvalidShopName { name: draft.name });
        }
        let contact = PhoneNumber::parse(&draft.contact)?;
        let business = validate_business(draft.business)?;

        if self.store.shop_by_owner(&actor.user_id).await?.is_some() {
            return Err(EngineError::ShopExists);
        }

        let now = Utc::now();
        let slug = self.assign_slug(&name, draft.slug.as_deref(), now).await?;

        let mut new = NewShop {
            owner_id: actor.user_id.clone(),
            name,
            slug,
            description: clean_text(&draft.description),
            contact,
            logo_url: clean_optional(draft.logo_url),
            banner_url: clean_optional(draft.banner_url),
            social: clean_social(draft.social),
            business,
            created_at: now,
        };

        let shop = match self.store.insert_shop(new.clone()).await {
            Ok(shop) => shop,
            // Lost a slug race after our uniqueness read: suffix and retry.
            Err(StoreError::Conflict(_)) => {
                new.slug = new.slug.with_disambiguator(now.timestamp_millis());
                debug!(slug = %new.slug, "slug raced, retrying with disambiguator");
                self.store.insert_shop(new).await?
            }
            Err(err) => return Err(err.into()),
        };

        info!(shop_id = %shop.id, slug = %shop.slug, owner = %shop.owner_id, "shop created");
        Ok(shop)
    }

    async fn assign_slug(
        &self,
        name: &str,
        requested: Option<&str>,
        minted_at: DateTime<Utc>,
    ) -> Result<Slug, EngineError> {
        let candidate = match requested {
            Some(raw) => Slug::parse(raw)?,
            None => Slug::derive(name).map_err(|_| EngineError::InvalidShopName {
                name: name.to_owned(),
            })?,
        };

        if self.store.shop_by_slug(&candidate).await?.is_none() {
            return Ok(candidate);
        }

        let slug = candidate.with_disambiguator(minted_at.timestamp_millis());
        debug!(candidate = %candidate, slug = %slug, "slug taken, appended disambiguator");
        Ok(slug)
    }

    /// Overwrite a shop's mutable fields.
    ///
    /// # Errors
    ///
    /// Validation errors as for [`ShopService::create_shop`], plus
    /// [`EngineError::NotFound`] for an unknown shop and
    /// [`EngineError::Forbidden`] when the caller is neither the owner nor
    /// an admin.
    #[instrument(skip(self, actor, update), fields(shop_id = %shop_id))]
    pub async fn update_shop(
        &self,
        actor: Option<&Actor>,
        shop_id: ShopId,
        update: UpdateShop,
    ) -> Result<Shop, EngineError> {
        let actor = access::require_actor(actor)?;
        let shop = self
            .store
            .shop(shop_id)
            .await?
            .ok_or(EngineError::NotFound("shop"))?;
        access::ensure_owner_or_admin(actor, &shop.owner_id)?;

        let name = clean_text(&update.name);
        if name.is_empty() {
            return Err(EngineError::InvalidShopName { name: update.name });
        }
        let contact = PhoneNumber::parse(&update.contact)?;
        let business = validate_business(update.business)?;

        let patch = ShopPatch {
            name,
            description: clean_text(&update.description),
            contact,
            logo_url: clean_optional(update.logo_url),
            banner_url: clean_optional(update.banner_url),
            social: clean_social(update.social),
            business,
        };
        let updated = self
            .store
            .update_shop(shop_id, patch, Utc::now())
            .await?
            .ok_or(EngineError::NotFound("shop"))?;

        info!(slug = %updated.slug, "shop updated");
        Ok(updated)
    }

    /// Delete a shop together with its products and their ratings.
    ///
    /// Ratings go first, then each product, then the shop row itself, so a
    /// cascade interrupted halfway can simply be run again; the report then
    /// carries whatever was still left. Deleting an already-gone shop is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthenticated`] for anonymous callers,
    /// [`EngineError::Forbidden`] when the shop exists and the caller may
    /// not manage it, or [`EngineError::Store`] when persistence fails.
    #[instrument(skip(self, actor), fields(shop_id = %shop_id))]
    pub async fn delete_shop(
        &self,
        actor: Option<&Actor>,
        shop_id: ShopId,
    ) -> Result<ShopCascade, EngineError> {
        let actor = access::require_actor(actor)?;
        if let Some(shop) = self.store.shop(shop_id).await? {
            access::ensure_owner_or_admin(actor, &shop.owner_id)?;
        }

        let products = self.store.products_by_shop(shop_id).await?;
        let mut ratings_deleted = 0usize;
        let mut products_deleted = 0usize;
        for product in &products {
            ratings_deleted += self.store.delete_ratings_by_product(product.id).await?;
            if self.store.delete_product(product.id).await? {
                products_deleted += 1;
            }
            self.aggregator.invalidate_product(product.id).await;
        }
        let shop_deleted = self.store.delete_shop(shop_id).await?;

        info!(shop_deleted, products_deleted, ratings_deleted, "shop cascade finished");
        Ok(ShopCascade {
            shop_deleted,
            products_deleted,
            ratings_deleted,
        })
    }

    /// Fetch a shop by id.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] when the lookup fails.
    pub async fn shop(&self, shop_id: ShopId) -> Result<Option<Shop>, EngineError> {
        Ok(self.store.shop(shop_id).await?)
    }

    /// Resolve a public shop page address.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] when the lookup fails.
    pub async fn shop_by_slug(&self, slug: &Slug) -> Result<Option<Shop>, EngineError> {
        Ok(self.store.shop_by_slug(slug).await?)
    }

    /// The calling user's own shop, if they opened one.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthenticated`] for anonymous callers, or
    /// [`EngineError::Store`] when the lookup fails.
    pub async fn shop_for_owner(&self, actor: Option<&Actor>) -> Result<Option<Shop>, EngineError> {
        let actor = access::require_actor(actor)?;
        Ok(self.store.shop_by_owner(&actor.user_id).await?)
    }

    /// All shops, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] when the listing fails.
    pub async fn list_shops(&self) -> Result<Vec<Shop>, EngineError> {
        Ok(self.store.shops().await?)
    }
}

fn clean_social(social: SocialLinks) -> SocialLinks {
    SocialLinks {
        facebook: clean_optional(social.facebook),
        instagram: clean_optional(social.instagram),
        twitter: clean_optional(social.twitter),
        tiktok: clean_optional(social.tiktok),
        youtube: clean_optional(social.youtube),
    }
}

fn validate_business(draft: Option<BusinessDraft>) -> Result<Option<BusinessInfo>, EngineError> {
    let Some(draft) = draft else {
        return Ok(None);
    };

    let email = match clean_optional(draft.email) {
        Some(raw) => Some(Email::parse(&raw)?),
        None => None,
    };
    let info = BusinessInfo {
        address: clean_optional(draft.address),
        phone: clean_optional(draft.phone),
        email,
        working_hours: clean_optional(draft.working_hours),
    };

    // An all-blank block collapses to no block at all.
    Ok((info != BusinessInfo::default()).then_some(info))
}
