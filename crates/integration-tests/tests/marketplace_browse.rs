//! Integration tests for marketplace browsing.
//!
//! One seeded market, many filter combinations: every test queries the
//! same kind of snapshot through the facade and checks what a buyer
//! would see.

use rust_decimal::Decimal;
use souq_core::{Actor, Category, ProductId};
use souq_engine::Engine;
use souq_engine::marketplace::{FilterOptions, PriceRange, ProductView, SortOrder};
use souq_engine::models::Product;
use souq_engine::store::MemoryStore;
use souq_integration_tests::{engine, product_draft, shop_draft};

/// A small seeded market: two shops, four products, three ratings.
struct Market {
    engine: Engine<MemoryStore>,
    /// "Nokia Phone", 900 LYD, electronics, rated 5 and 4.
    phone: Product,
    /// "Car Charger", 45 LYD, electronics, unrated.
    charger: Product,
    /// "Silk Abaya", 250 LYD, clothing, unrated, Arabic description.
    abaya: Product,
    /// "Leather Sandals", 80 LYD, clothing, rated 3.
    sandals: Product,
}

impl Market {
    async fn browse(&self, filter: &FilterOptions) -> Vec<ProductView> {
        self.engine
            .marketplace(filter)
            .await
            .expect("Failed to browse the marketplace")
    }
}

fn ids(views: &[ProductView]) -> Vec<ProductId> {
    views.iter().map(|view| view.product.id).collect()
}

async fn seed_market() -> Market {
    let engine = engine();
    let electronics_owner = Actor::regular("owner-1");
    let fashion_owner = Actor::regular("owner-2");

    let electronics = engine
        .shops()
        .create_shop(Some(&electronics_owner), shop_draft("Sahara Electronics"))
        .await
        .expect("Failed to create electronics shop");
    let fashion = engine
        .shops()
        .create_shop(Some(&fashion_owner), shop_draft("Tripoli Fashion House"))
        .await
        .expect("Failed to create fashion shop");

    let phone = engine
        .products()
        .add_product(
            Some(&electronics_owner),
            electronics.id,
            product_draft("Nokia Phone", 900, Category::Electronics),
        )
        .await
        .expect("Failed to add phone");
    let charger = engine
        .products()
        .add_product(
            Some(&electronics_owner),
            electronics.id,
            product_draft("Car Charger", 45, Category::Electronics),
        )
        .await
        .expect("Failed to add charger");

    let mut abaya_draft = product_draft("Silk Abaya", 250, Category::Clothing);
    abaya_draft.description = "عباية حريرية فاخرة".to_owned();
    let abaya = engine
        .products()
        .add_product(Some(&fashion_owner), fashion.id, abaya_draft)
        .await
        .expect("Failed to add abaya");
    let sandals = engine
        .products()
        .add_product(
            Some(&fashion_owner),
            fashion.id,
            product_draft("Leather Sandals", 80, Category::Clothing),
        )
        .await
        .expect("Failed to add sandals");

    for (buyer, product_id, score) in [
        ("buyer-1", phone.id, 5),
        ("buyer-2", phone.id, 4),
        ("buyer-1", sandals.id, 3),
    ] {
        let actor = Actor::regular(buyer);
        engine
            .ratings()
            .submit(Some(&actor), product_id, score)
            .await
            .expect("Failed to seed rating");
    }

    Market {
        engine,
        phone,
        charger,
        abaya,
        sandals,
    }
}

// ============================================================================
// Default Browse
// ============================================================================

#[tokio::test]
async fn test_default_browse_lists_everything_newest_first() {
    let market = seed_market().await;

    let views = market.browse(&FilterOptions::default()).await;

    assert_eq!(
        ids(&views),
        vec![
            market.sandals.id,
            market.abaya.id,
            market.charger.id,
            market.phone.id
        ]
    );

    // Each entry carries its shop and score.
    let phone_view = views
        .iter()
        .find(|view| view.product.id == market.phone.id)
        .expect("Phone should be listed");
    assert_eq!(phone_view.shop.name, "Sahara Electronics");
    assert_eq!(phone_view.score.count, 2);
    assert!((phone_view.score.average - 4.5).abs() < f64::EPSILON);
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_matches_product_names_case_insensitively() {
    let market = seed_market().await;

    let views = market
        .browse(&FilterOptions {
            search_term: Some("NOKIA".to_owned()),
            ..FilterOptions::default()
        })
        .await;

    assert_eq!(ids(&views), vec![market.phone.id]);
}

#[tokio::test]
async fn test_search_by_shop_name_surfaces_its_whole_catalog() {
    let market = seed_market().await;

    let views = market
        .browse(&FilterOptions {
            search_term: Some("sahara".to_owned()),
            ..FilterOptions::default()
        })
        .await;

    assert_eq!(ids(&views), vec![market.charger.id, market.phone.id]);
}

#[tokio::test]
async fn test_search_matches_arabic_descriptions() {
    let market = seed_market().await;

    let views = market
        .browse(&FilterOptions {
            search_term: Some("عباية".to_owned()),
            ..FilterOptions::default()
        })
        .await;

    assert_eq!(ids(&views), vec![market.abaya.id]);
}

#[tokio::test]
async fn test_unmatched_search_returns_nothing() {
    let market = seed_market().await;

    let views = market
        .browse(&FilterOptions {
            search_term: Some("submarine".to_owned()),
            ..FilterOptions::default()
        })
        .await;

    assert!(views.is_empty());
}

// ============================================================================
// Category & Price Filters
// ============================================================================

#[tokio::test]
async fn test_category_filter_narrows_and_none_means_all() {
    let market = seed_market().await;

    let clothing = market
        .browse(&FilterOptions {
            category: Some(Category::Clothing),
            ..FilterOptions::default()
        })
        .await;
    assert_eq!(ids(&clothing), vec![market.sandals.id, market.abaya.id]);

    let all = market.browse(&FilterOptions::default()).await;
    assert_eq!(all.len(), 4);
}

#[tokio::test]
async fn test_price_range_bounds_are_inclusive() {
    let market = seed_market().await;

    let views = market
        .browse(&FilterOptions {
            price_range: PriceRange {
                min: Some(Decimal::from(45)),
                max: Some(Decimal::from(250)),
            },
            ..FilterOptions::default()
        })
        .await;

    // 45 and 250 are themselves inside; 900 is out.
    assert_eq!(
        ids(&views),
        vec![market.sandals.id, market.abaya.id, market.charger.id]
    );
}

#[tokio::test]
async fn test_filters_compose() {
    let market = seed_market().await;

    let views = market
        .browse(&FilterOptions {
            category: Some(Category::Clothing),
            price_range: PriceRange {
                min: None,
                max: Some(Decimal::from(100)),
            },
            ..FilterOptions::default()
        })
        .await;

    assert_eq!(ids(&views), vec![market.sandals.id]);
}

// ============================================================================
// Sorting
// ============================================================================

#[tokio::test]
async fn test_price_sorts_order_by_amount() {
    let market = seed_market().await;

    let cheap_first = market
        .browse(&FilterOptions {
            sort: SortOrder::PriceLow,
            ..FilterOptions::default()
        })
        .await;
    assert_eq!(
        ids(&cheap_first),
        vec![
            market.charger.id,
            market.sandals.id,
            market.abaya.id,
            market.phone.id
        ]
    );

    let dear_first = market
        .browse(&FilterOptions {
            sort: SortOrder::PriceHigh,
            ..FilterOptions::default()
        })
        .await;
    assert_eq!(
        ids(&dear_first),
        vec![
            market.phone.id,
            market.abaya.id,
            market.sandals.id,
            market.charger.id
        ]
    );
}

#[tokio::test]
async fn test_oldest_sort_reverses_the_default() {
    let market = seed_market().await;

    let views = market
        .browse(&FilterOptions {
            sort: SortOrder::Oldest,
            ..FilterOptions::default()
        })
        .await;

    assert_eq!(
        ids(&views),
        vec![
            market.phone.id,
            market.charger.id,
            market.abaya.id,
            market.sandals.id
        ]
    );
}

#[tokio::test]
async fn test_rating_sort_puts_best_first_and_unrated_last() {
    let market = seed_market().await;

    let views = market
        .browse(&FilterOptions {
            sort: SortOrder::Rating,
            ..FilterOptions::default()
        })
        .await;

    // Phone averages 4.5, sandals 3.0; the unrated pair keeps its
    // newest-first relative order at the end.
    assert_eq!(
        ids(&views),
        vec![
            market.phone.id,
            market.sandals.id,
            market.abaya.id,
            market.charger.id
        ]
    );
}

// ============================================================================
// Catalog Changes
// ============================================================================

#[tokio::test]
async fn test_deleted_products_leave_the_results() {
    let market = seed_market().await;
    let owner = Actor::regular("owner-1");

    market
        .engine
        .products()
        .delete_product(Some(&owner), market.charger.id)
        .await
        .expect("Failed to delete charger");

    let views = market.browse(&FilterOptions::default()).await;
    assert_eq!(views.len(), 3);
    assert!(ids(&views).iter().all(|id| *id != market.charger.id));
}

#[tokio::test]
async fn test_repeated_queries_see_the_same_snapshot() {
    let market = seed_market().await;
    let filter = FilterOptions {
        search_term: Some("sahara".to_owned()),
        sort: SortOrder::PriceLow,
        ..FilterOptions::default()
    };

    let first = market.browse(&filter).await;
    let second = market.browse(&filter).await;

    assert_eq!(first, second);
}
