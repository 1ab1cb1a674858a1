//! Checkout form validation, overview amounts and confirmation

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod common;

use shopcheck::page::{ORDER_COMPLETE_HEADER, ORDER_COMPLETE_TEXT};
use shopcheck::prelude::*;

async fn info_page(session: &Session, slugs: &[&str]) -> CheckoutInfoPage {
    let products = common::logged_in(session).await;
    for slug in slugs {
        products.add_to_cart(slug).await.unwrap();
    }
    products
        .open_cart()
        .await
        .unwrap()
        .proceed_to_checkout()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_empty_first_name_is_rejected() {
    let (session, shop) = common::simulated();
    let info = info_page(&session, &["sauce-labs-backpack"]).await;
    let form = CheckoutForm::new("", "Doe", "12345");
    match info.submit(&form).await.unwrap() {
        Submission::Rejected(state) => {
            assert_eq!(state.screen, Screen::CheckoutInfo);
            assert_eq!(state.message, "Error: First Name is required");
        }
        Submission::Advanced(_) => panic!("form without first name was accepted"),
    }
    info.assert_on_screen().await.unwrap();
    assert_eq!(shop.current_screen(), Some(Screen::CheckoutInfo));
}

#[tokio::test]
async fn test_every_invalid_form_shows_its_error() {
    let fixtures = Fixtures::builtin();
    for (key, case) in &fixtures.checkout_info.invalid {
        let (session, _shop) = common::simulated();
        let info = info_page(&session, &["sauce-labs-onesie"]).await;
        match info.submit(&case.form).await.unwrap() {
            Submission::Rejected(state) => assert_eq!(state.message, case.expected_error, "{key}"),
            Submission::Advanced(_) => panic!("{key} was accepted"),
        }
        info.assert_error_message(&case.expected_error).await.unwrap();
    }
}

#[tokio::test]
async fn test_corrected_form_advances() {
    let (session, _shop) = common::simulated();
    let info = info_page(&session, &["sauce-labs-onesie"]).await;
    let rejected = info
        .submit(&CheckoutForm::new("John", "", "12345"))
        .await
        .unwrap();
    assert!(matches!(rejected, Submission::Rejected(_)));
    let overview = info
        .continue_to_overview(&CheckoutForm::new("John", "Doe", "12345"))
        .await
        .unwrap();
    overview.assert_on_screen().await.unwrap();
}

#[tokio::test]
async fn test_overview_totals_are_consistent() {
    let (session, _shop) = common::simulated();
    let info = info_page(&session, &["sauce-labs-backpack", "sauce-labs-bike-light"]).await;
    let overview = info
        .continue_to_overview(&Fixtures::builtin().checkout_info.valid)
        .await
        .unwrap();

    overview
        .assert_item_count(2)
        .await
        .unwrap()
        .assert_contains_item("Sauce Labs Bike Light")
        .await
        .unwrap()
        .assert_summary_visible()
        .await
        .unwrap()
        .assert_total_consistent()
        .await
        .unwrap()
        .assert_item_total_matches_lines()
        .await
        .unwrap();

    let summary = overview.summary().await.unwrap();
    assert_eq!(summary.item_total, Price::from_cents(3998));
    assert_eq!(summary.expected_total(), Some(summary.total));
    assert!(summary.tax > Price::from_cents(0));
}

#[tokio::test]
async fn test_cancel_from_info_returns_to_cart() {
    let (session, _shop) = common::simulated();
    let info = info_page(&session, &["sauce-labs-backpack"]).await;
    let cart = info.cancel().await.unwrap();
    cart.assert_item_count(1).await.unwrap();
}

#[tokio::test]
async fn test_cancel_from_overview_returns_to_products() {
    let (session, _shop) = common::simulated();
    let info = info_page(&session, &["sauce-labs-backpack"]).await;
    let overview = info
        .continue_to_overview(&CheckoutForm::new("Ada", "Lovelace", "SW1A"))
        .await
        .unwrap();
    let products = overview.cancel().await.unwrap();
    products.assert_cart_badge(1).await.unwrap();
}

#[tokio::test]
async fn test_finish_places_order_and_empties_cart() {
    let (session, shop) = common::simulated();
    let info = info_page(&session, &["sauce-labs-fleece-jacket"]).await;
    let complete = info
        .continue_to_overview(&CheckoutForm::new("John", "Doe", "12345"))
        .await
        .unwrap()
        .finish()
        .await
        .unwrap();
    complete.assert_order_complete().await.unwrap();
    assert!(ORDER_COMPLETE_HEADER.starts_with("Thank you"));
    assert!(!ORDER_COMPLETE_TEXT.is_empty());
    assert!(shop.cart_slugs().is_empty());

    let products = complete.back_home().await.unwrap();
    products.assert_cart_badge(0).await.unwrap();
}
