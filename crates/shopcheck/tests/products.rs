//! Catalog, sorting and cart badge behaviour

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod common;

use proptest::prelude::*;
use shopcheck::prelude::*;
use shopcheck::sort::{expected_name_order, names_ordered};
use std::sync::Arc;

#[tokio::test]
async fn test_catalog_lists_six_products() {
    let (session, _shop) = common::simulated();
    let products = common::logged_in(&session).await;
    products.assert_product_count(6).await.unwrap();
    for product in &Fixtures::builtin().products {
        products.assert_has_product(&product.display_name).await.unwrap();
        assert_eq!(
            products.product_price(&product.display_name).await.unwrap(),
            product.unit_price().unwrap()
        );
    }
}

#[tokio::test]
async fn test_sort_name_orders() {
    let (session, _shop) = common::simulated();
    let products = common::logged_in(&session).await;

    products.sort_by(SortMode::NameDesc).await.unwrap();
    products.assert_sorted(SortMode::NameDesc).await.unwrap();
    let za = products.product_names().await.unwrap();

    products.sort_by(SortMode::NameAsc).await.unwrap();
    products.assert_sorted(SortMode::NameAsc).await.unwrap();
    let az = products.product_names().await.unwrap();

    assert_eq!(az.first().map(String::as_str), Some("Sauce Labs Backpack"));
    assert_eq!(az.iter().rev().cloned().collect::<Vec<_>>(), za);
}

#[tokio::test]
async fn test_sort_is_idempotent() {
    let (session, _shop) = common::simulated();
    let products = common::logged_in(&session).await;
    for mode in SortMode::ALL {
        products.sort_by(mode).await.unwrap();
        let once = products.product_names().await.unwrap();
        products.sort_by(mode).await.unwrap();
        assert_eq!(products.product_names().await.unwrap(), once, "{mode}");
        products.assert_sorted(mode).await.unwrap();
    }
}

#[tokio::test]
async fn test_price_sort_extremes() {
    let (session, _shop) = common::simulated();
    let products = common::logged_in(&session).await;
    products.sort_by(SortMode::PriceAsc).await.unwrap();
    let prices = products.product_prices().await.unwrap();
    assert_eq!(prices.first(), Some(&Price::from_cents(799)));
    assert_eq!(prices.last(), Some(&Price::from_cents(4999)));
    products.sort_by(SortMode::PriceDesc).await.unwrap();
    products.assert_sorted(SortMode::PriceDesc).await.unwrap();
}

#[tokio::test]
async fn test_badge_tracks_adds_and_removes() {
    let (session, shop) = common::simulated();
    let products = common::logged_in(&session).await;
    assert_eq!(products.cart_badge_count().await.unwrap(), 0);

    products.add_to_cart("sauce-labs-backpack").await.unwrap();
    products.assert_cart_badge(1).await.unwrap();
    products.add_to_cart("sauce-labs-bike-light").await.unwrap();
    products.assert_cart_badge(2).await.unwrap();

    products.remove_from_cart("sauce-labs-backpack").await.unwrap();
    products.assert_cart_badge(1).await.unwrap();
    products.remove_from_cart("sauce-labs-bike-light").await.unwrap();
    products.assert_cart_badge(0).await.unwrap();

    assert!(shop.cart_slugs().is_empty());
    assert!(session
        .driver()
        .find_all(".shopping_cart_badge")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_product_detail_round_trip() {
    let (session, _shop) = common::simulated();
    let products = common::logged_in(&session).await;
    let detail = products.open_product("Sauce Labs Onesie").await.unwrap();
    detail.assert_product("Sauce Labs Onesie").await.unwrap();
    assert_eq!(detail.price().await.unwrap(), Price::from_cents(799));

    detail.add_to_cart().await.unwrap();
    detail.assert_cart_badge(1).await.unwrap();
    detail.remove_from_cart().await.unwrap();
    detail.assert_cart_badge(0).await.unwrap();

    let products = detail.back_to_products().await.unwrap();
    products.assert_product_count(6).await.unwrap();
}

#[tokio::test]
async fn test_unknown_product_slug_is_element_not_found() {
    let (session, _shop) = common::simulated();
    let products = common::logged_in(&session).await;
    let err = products.add_to_cart("no-such-thing").await.unwrap_err();
    assert!(matches!(err, ShopError::ElementNotFound { screen: Screen::Products, .. }));
}

#[tokio::test]
async fn test_custom_catalog() {
    let catalog = vec![
        Product::new("zeta-mug", "Zeta Mug", "$4.00"),
        Product::new("alpha-cap", "Alpha Cap", "$12.50"),
    ];
    let shop = Arc::new(SimulatedStorefront::with_products(&catalog).unwrap());
    let session = Session::new(shop, common::fast_config());
    let products = common::logged_in(&session).await;
    products.assert_product_count(2).await.unwrap();
    assert_eq!(
        products.product_names().await.unwrap(),
        expected_name_order(SortMode::NameAsc, &["Zeta Mug".to_string(), "Alpha Cap".to_string()])
    );
}

fn subset_strategy() -> impl Strategy<Value = Vec<bool>> {
    proptest::collection::vec(any::<bool>(), 6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Adding any subset of the catalog shows a badge equal to its size
    #[test]
    fn prop_badge_equals_subset_size(subset in subset_strategy()) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let (badge, names_sorted) = runtime.block_on(async {
            let (session, _shop) = common::simulated();
            let products = common::logged_in(&session).await;
            let fixtures = Fixtures::builtin();
            for (product, chosen) in fixtures.products.iter().zip(&subset) {
                if *chosen {
                    products.add_to_cart(&product.name).await.unwrap();
                }
            }
            let names = products.product_names().await.unwrap();
            (
                products.cart_badge_count().await.unwrap(),
                names_ordered(SortMode::NameAsc, &names),
            )
        });
        prop_assert_eq!(badge, subset.iter().filter(|c| **c).count());
        prop_assert!(names_sorted);
    }
}
