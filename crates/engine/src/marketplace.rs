//! Marketplace browsing.
//!
//! [`query_marketplace`] is a pure pipeline over snapshots of the three
//! collections: join products with their shops and scores, filter, then
//! sort. Running it twice over the same snapshot gives the same result, so
//! callers are free to cache or re-run it.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use souq_core::{Category, ShopId};
use tracing::warn;

use crate::aggregate::{ProductScore, scores_by_product};
use crate::models::{Product, Rating, Shop};

/// Sort orders for marketplace results.
///
/// All sorts are stable: products that compare equal keep their
/// newest-first listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Most recently listed first.
    #[default]
    Newest,
    /// Oldest listings first.
    Oldest,
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
    /// Best average score first; unrated products sink to the end.
    Rating,
}

/// Inclusive price bounds. An unset side is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriceRange {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl PriceRange {
    /// Whether `amount` falls inside the range.
    #[must_use]
    pub fn contains(&self, amount: Decimal) -> bool {
        self.min.is_none_or(|min| amount >= min) && self.max.is_none_or(|max| amount <= max)
    }
}

/// Marketplace filters. The default value selects everything, newest
/// first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterOptions {
    /// Case-insensitive term matched against product and shop text. Blank
    /// or whitespace-only terms are ignored.
    pub search_term: Option<String>,
    /// Restrict to one category; `None` is the "all categories" view.
    pub category: Option<Category>,
    pub price_range: PriceRange,
    pub sort: SortOrder,
}

/// One marketplace result: a product joined with its shop and score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
    pub product: Product,
    pub shop: Shop,
    pub score: ProductScore,
}

/// Join, filter and sort a snapshot of the catalog.
///
/// Products whose shop is missing from `shops` are dropped rather than
/// shown half-joined. Ratings of unknown products are ignored.
#[must_use]
pub fn query_marketplace(
    products: &[Product],
    shops: &[Shop],
    ratings: &[Rating],
    filter: &FilterOptions,
) -> Vec<ProductView> {
    let shops_by_id: HashMap<ShopId, &Shop> = shops.iter().map(|shop| (shop.id, shop)).collect();
    let scores = scores_by_product(ratings);

    let mut views: Vec<ProductView> = products
        .iter()
        .filter_map(|product| {
            let Some(shop) = shops_by_id.get(&product.shop_id) else {
                warn!(product_id = %product.id, "dropping product without a shop");
                return None;
            };
            Some(ProductView {
                product: product.clone(),
                shop: (*shop).clone(),
                score: scores
                    .get(&product.id)
                    .copied()
                    .unwrap_or(ProductScore::ZERO),
            })
        })
        .collect();

    if let Some(term) = normalized_term(filter.search_term.as_deref()) {
        views.retain(|view| matches_term(view, &term));
    }
    if let Some(category) = filter.category {
        views.retain(|view| view.product.category == category);
    }
    views.retain(|view| filter.price_range.contains(view.product.price.amount()));

    sort_views(&mut views, filter.sort);
    views
}

fn normalized_term(term: Option<&str>) -> Option<String> {
    term.map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
}

/// A term matches on the product's name or description, or on the owning
/// shop's name or description, so searching a seller surfaces their whole
/// catalog.
fn matches_term(view: &ProductView, term: &str) -> bool {
    view.product.name.to_lowercase().contains(term)
        || view.product.description.to_lowercase().contains(term)
        || view.shop.name.to_lowercase().contains(term)
        || view.shop.description.to_lowercase().contains(term)
}

fn sort_views(views: &mut [ProductView], sort: SortOrder) {
    match sort {
        SortOrder::Newest => {
            views.sort_by(|a, b| b.product.created_at.cmp(&a.product.created_at));
        }
        SortOrder::Oldest => {
            views.sort_by(|a, b| a.product.created_at.cmp(&b.product.created_at));
        }
        SortOrder::PriceLow => {
            views.sort_by(|a, b| a.product.price.amount().cmp(&b.product.price.amount()));
        }
        SortOrder::PriceHigh => {
            views.sort_by(|a, b| b.product.price.amount().cmp(&a.product.price.amount()));
        }
        SortOrder::Rating => {
            views.sort_by(|a, b| b.score.average.total_cmp(&a.score.average));
        }
    }
}
