//! Integration tests for the shop and product lifecycle.
//!
//! These suites drive the engine facade over an in-memory store the way a
//! transport layer would: create shops, stock them, resolve public pages
//! by slug, and tear catalogs down again.

use souq_core::{Actor, Category};
use souq_engine::EngineError;
use souq_engine::shops::UpdateShop;
use souq_integration_tests::{engine, init_tracing, product_draft, shop_draft};

// ============================================================================
// Shop Creation & Slugs
// ============================================================================

#[tokio::test]
async fn test_same_name_shops_get_distinct_slugs() {
    let engine = engine();
    let first_owner = Actor::regular("owner-1");
    let second_owner = Actor::regular("owner-2");

    let first = engine
        .shops()
        .create_shop(Some(&first_owner), shop_draft("Atlas Traders"))
        .await
        .expect("Failed to create first shop");
    let second = engine
        .shops()
        .create_shop(Some(&second_owner), shop_draft("Atlas Traders"))
        .await
        .expect("Failed to create second shop");

    assert_ne!(first.slug, second.slug);

    // Both stay resolvable through the public lookup.
    for shop in [&first, &second] {
        let found = engine
            .shops()
            .shop_by_slug(&shop.slug)
            .await
            .expect("Failed to resolve slug");
        assert_eq!(found.map(|s| s.id), Some(shop.id));
    }
}

#[tokio::test]
async fn test_requested_slug_is_honored() {
    let engine = engine();
    let owner = Actor::regular("owner-1");

    let mut draft = shop_draft("Benghazi Books");
    draft.slug = Some("bb-books".to_owned());

    let shop = engine
        .shops()
        .create_shop(Some(&owner), draft)
        .await
        .expect("Failed to create shop");

    assert_eq!(shop.slug.as_str(), "bb-books");
}

#[tokio::test]
async fn test_second_shop_for_same_owner_is_rejected() {
    let engine = engine();
    let owner = Actor::regular("owner-1");

    engine
        .shops()
        .create_shop(Some(&owner), shop_draft("First Venture"))
        .await
        .expect("Failed to create shop");
    let err = engine
        .shops()
        .create_shop(Some(&owner), shop_draft("Second Venture"))
        .await
        .expect_err("Second shop for the same owner should be rejected");

    assert!(matches!(err, EngineError::ShopExists));

    // The first shop is still the one resolved for the owner.
    let mine = engine
        .shops()
        .shop_for_owner(Some(&owner))
        .await
        .expect("Failed to look up own shop")
        .expect("Owner should still have a shop");
    assert_eq!(mine.name, "First Venture");
}

#[tokio::test]
async fn test_anonymous_callers_cannot_create_shops() {
    let engine = engine();

    let err = engine
        .shops()
        .create_shop(None, shop_draft("Ghost Shop"))
        .await
        .expect_err("Anonymous creation should fail");

    assert!(matches!(err, EngineError::Unauthenticated));
}

// ============================================================================
// Public Storefront Reads
// ============================================================================

#[tokio::test]
async fn test_slug_resolution_serves_the_shop_catalog() {
    let engine = engine();
    let owner = Actor::regular("owner-1");

    let shop = engine
        .shops()
        .create_shop(Some(&owner), shop_draft("Sahara Electronics"))
        .await
        .expect("Failed to create shop");
    let phone = engine
        .products()
        .add_product(
            Some(&owner),
            shop.id,
            product_draft("Nokia Phone", 900, Category::Electronics),
        )
        .await
        .expect("Failed to add product");
    let charger = engine
        .products()
        .add_product(
            Some(&owner),
            shop.id,
            product_draft("Car Charger", 45, Category::Electronics),
        )
        .await
        .expect("Failed to add product");

    let page = engine
        .shops()
        .shop_by_slug(&shop.slug)
        .await
        .expect("Failed to resolve slug")
        .expect("Shop should resolve by its slug");
    let catalog = engine
        .products()
        .products_for_shop(page.id)
        .await
        .expect("Failed to list the shop catalog");

    // Newest first.
    let ids: Vec<_> = catalog.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![charger.id, phone.id]);
}

// ============================================================================
// Authorization
// ============================================================================

#[tokio::test]
async fn test_strangers_cannot_touch_another_shops_products() {
    let engine = engine();
    let owner = Actor::regular("owner-1");
    let stranger = Actor::regular("stranger-1");

    let shop = engine
        .shops()
        .create_shop(Some(&owner), shop_draft("Misrata Outfitters"))
        .await
        .expect("Failed to create shop");
    let product = engine
        .products()
        .add_product(
            Some(&owner),
            shop.id,
            product_draft("Wool Coat", 150, Category::Clothing),
        )
        .await
        .expect("Failed to add product");

    let err = engine
        .products()
        .add_product(
            Some(&stranger),
            shop.id,
            product_draft("Counterfeit Coat", 20, Category::Clothing),
        )
        .await
        .expect_err("Stranger should not stock the shop");
    assert!(matches!(err, EngineError::Forbidden));

    let err = engine
        .products()
        .update_product(
            Some(&stranger),
            product.id,
            product_draft("Hijacked Coat", 1, Category::Clothing),
        )
        .await
        .expect_err("Stranger should not edit the product");
    assert!(matches!(err, EngineError::Forbidden));

    let err = engine
        .products()
        .delete_product(Some(&stranger), product.id)
        .await
        .expect_err("Stranger should not delete the product");
    assert!(matches!(err, EngineError::Forbidden));

    let err = engine
        .shops()
        .delete_shop(Some(&stranger), shop.id)
        .await
        .expect_err("Stranger should not delete the shop");
    assert!(matches!(err, EngineError::Forbidden));
}

#[tokio::test]
async fn test_admins_can_manage_any_shop() {
    let engine = engine();
    let owner = Actor::regular("owner-1");
    let admin = Actor::admin("admin-1");

    let shop = engine
        .shops()
        .create_shop(Some(&owner), shop_draft("Derna Crafts"))
        .await
        .expect("Failed to create shop");
    let product = engine
        .products()
        .add_product(
            Some(&owner),
            shop.id,
            product_draft("Clay Vase", 35, Category::Home),
        )
        .await
        .expect("Failed to add product");

    let moderated = engine
        .products()
        .update_product(
            Some(&admin),
            product.id,
            product_draft("Moderated Vase", 35, Category::Home),
        )
        .await
        .expect("Admin edit should succeed");
    assert_eq!(moderated.name, "Moderated Vase");

    let cascade = engine
        .shops()
        .delete_shop(Some(&admin), shop.id)
        .await
        .expect("Admin takedown should succeed");
    assert!(cascade.shop_deleted);
    assert_eq!(cascade.products_deleted, 1);
}

// ============================================================================
// Shop Updates
// ============================================================================

#[tokio::test]
async fn test_shop_update_keeps_the_slug_and_strips_markup() {
    let engine = engine();
    let owner = Actor::regular("owner-1");

    let shop = engine
        .shops()
        .create_shop(Some(&owner), shop_draft("Zawiya Plants"))
        .await
        .expect("Failed to create shop");

    let updated = engine
        .shops()
        .update_shop(
            Some(&owner),
            shop.id,
            UpdateShop {
                name: "Zawiya <b>Plants</b> & More".to_owned(),
                description: "Seedlings and succulents".to_owned(),
                contact: "218913334455".to_owned(),
                ..UpdateShop::default()
            },
        )
        .await
        .expect("Failed to update shop");

    assert_eq!(updated.slug, shop.slug);
    assert_eq!(updated.name, "Zawiya bPlants/b & More");
    assert_eq!(updated.contact.as_str(), "218913334455");
    assert_eq!(updated.created_at, shop.created_at);
    assert!(updated.updated_at >= shop.updated_at);
}

// ============================================================================
// Cascade Deletion
// ============================================================================

#[tokio::test]
async fn test_shop_deletion_erases_catalog_and_reputation() {
    let _guard = init_tracing();
    let engine = engine();
    let owner = Actor::regular("owner-1");
    let neighbor = Actor::regular("owner-2");
    let buyer = Actor::regular("buyer-1");

    let doomed = engine
        .shops()
        .create_shop(Some(&owner), shop_draft("Doomed Goods"))
        .await
        .expect("Failed to create shop");
    let steady = engine
        .shops()
        .create_shop(Some(&neighbor), shop_draft("Steady Goods"))
        .await
        .expect("Failed to create neighbor shop");

    let lamp = engine
        .products()
        .add_product(
            Some(&owner),
            doomed.id,
            product_draft("Brass Lamp", 60, Category::Home),
        )
        .await
        .expect("Failed to add product");
    engine
        .products()
        .add_product(
            Some(&owner),
            doomed.id,
            product_draft("Wool Rug", 120, Category::Home),
        )
        .await
        .expect("Failed to add product");
    let kettle = engine
        .products()
        .add_product(
            Some(&neighbor),
            steady.id,
            product_draft("Copper Kettle", 80, Category::Home),
        )
        .await
        .expect("Failed to add neighbor product");

    engine
        .ratings()
        .submit(Some(&buyer), lamp.id, 5)
        .await
        .expect("Failed to rate the lamp");
    engine
        .ratings()
        .submit(Some(&buyer), kettle.id, 4)
        .await
        .expect("Failed to rate the kettle");

    let cascade = engine
        .shops()
        .delete_shop(Some(&owner), doomed.id)
        .await
        .expect("Failed to delete shop");
    assert!(cascade.shop_deleted);
    assert_eq!(cascade.products_deleted, 2);
    assert_eq!(cascade.ratings_deleted, 1);

    // Nothing of the shop survives in public reads.
    let gone = engine
        .shops()
        .shop(doomed.id)
        .await
        .expect("Failed to look up shop");
    assert!(gone.is_none());
    let product_gone = engine
        .products()
        .product(lamp.id)
        .await
        .expect("Failed to look up product");
    assert!(product_gone.is_none());
    let ratings_gone = engine
        .ratings()
        .ratings_for_product(lamp.id)
        .await
        .expect("Failed to list ratings");
    assert!(ratings_gone.is_empty());

    // The neighbor's catalog and reputation are untouched.
    let kept = engine
        .products()
        .products_for_shop(steady.id)
        .await
        .expect("Failed to list neighbor catalog");
    assert_eq!(kept.len(), 1);
    let kettle_score = engine
        .aggregates()
        .score_for_product(kettle.id)
        .await
        .expect("Failed to read neighbor score");
    assert_eq!(kettle_score.count, 1);

    // Running the cascade again reports nothing left to remove.
    let rerun = engine
        .shops()
        .delete_shop(Some(&owner), doomed.id)
        .await
        .expect("Re-running the cascade should not fail");
    assert!(!rerun.shop_deleted);
    assert_eq!(rerun.products_deleted, 0);
    assert_eq!(rerun.ratings_deleted, 0);
}
