//! End-to-end flows, screen verification failures and the scenario runner

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod common;

use shopcheck::prelude::*;
use shopcheck::workflow::CurrentPage;

#[tokio::test]
async fn test_full_purchase_flow() {
    let fixtures = Fixtures::builtin();
    let (session, shop) = common::simulated();
    let mut shopper = Shopper::start(session).await.unwrap();
    assert_eq!(shopper.state(), FlowState::LoggedOut);

    let summary = shopper
        .purchase(
            fixtures.standard_user().unwrap(),
            &["sauce-labs-backpack", "sauce-labs-bike-light"],
            &fixtures.checkout_info.valid,
        )
        .await
        .unwrap();

    assert!(summary.is_consistent());
    assert_eq!(summary.item_total, Price::from_cents(3998));
    assert_eq!(shopper.state(), FlowState::Products);
    assert!(matches!(shopper.page(), CurrentPage::Products(_)));
    assert!(shop.cart_slugs().is_empty());

    let visited: Vec<FlowState> = shopper.trail().iter().map(|(_, state)| *state).collect();
    assert!(visited.contains(&FlowState::CheckoutOverview));
    assert!(visited.contains(&FlowState::CheckoutComplete));
    assert_eq!(visited.last(), Some(&FlowState::Products));
}

#[tokio::test]
async fn test_shopper_rejects_out_of_order_step() {
    let (session, _shop) = common::simulated();
    let mut shopper = Shopper::start(session).await.unwrap();
    let err = shopper.finish().await.unwrap_err();
    assert!(matches!(err, ShopError::InvalidTransition { from: Screen::Login, .. }));
    assert_eq!(shopper.state(), FlowState::LoggedOut);
}

#[tokio::test]
async fn test_shopper_stays_on_refused_login() {
    let fixtures = Fixtures::builtin();
    let (session, _shop) = common::simulated();
    let mut shopper = Shopper::start(session).await.unwrap();
    let error = shopper
        .login(fixtures.invalid_user("locked_out_user").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(error.message, "Epic sadface: Sorry, this user has been locked out.");
    assert_eq!(shopper.state(), FlowState::LoggedOut);
}

#[tokio::test]
async fn test_wrong_title_is_content_mismatch() {
    let fixtures = Fixtures::builtin();
    let (session, shop) = common::simulated();
    shop.override_title(Screen::Products, "Inventory");
    let login = session.open().await.unwrap();
    let err = login
        .login_as(fixtures.standard_user().unwrap())
        .await
        .unwrap_err();
    match err {
        ShopError::ContentMismatch {
            screen,
            expected,
            actual,
            ..
        } => {
            assert_eq!(screen, Screen::Products);
            assert_eq!(expected, "Products");
            assert!(actual.contains("Inventory"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_stuck_navigation_is_navigation_mismatch() {
    let (session, shop) = common::simulated();
    let products = common::logged_in(&session).await;
    shop.freeze_navigation(true);
    let err = products.open_cart().await.unwrap_err();
    match err {
        ShopError::NavigationMismatch { screen, actual, .. } => {
            assert_eq!(screen, Screen::Cart);
            assert!(actual.ends_with("/inventory.html"));
        }
        other => panic!("unexpected {other:?}"),
    }
    shop.clear_faults();
    products.open_cart().await.unwrap().assert_item_count(0).await.unwrap();
}

#[tokio::test]
async fn test_runner_passes_whole_catalogue_on_sim() {
    let runner = Runner::new(Backend::Sim, common::fast_config(), Fixtures::builtin());
    let scenarios = shopcheck::scenario::catalogue();
    let report = runner.run(&scenarios).await;
    assert_eq!(report.failed(), 0, "{:?}", report.failures().collect::<Vec<_>>());
    assert_eq!(report.passed(), scenarios.len());
    assert!(report.is_success());
}

#[tokio::test]
async fn test_runner_selection_by_tag() {
    let selected = shopcheck::scenario::select(&[], &[Tag::Smoke]).unwrap();
    assert!(!selected.is_empty());
    assert!(selected.iter().all(|s| s.has_tag(Tag::Smoke)));
}
