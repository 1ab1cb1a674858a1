//! Shared setup for the storefront integration tests

#![allow(dead_code)]

use shopcheck::prelude::*;
use shopcheck::SharedDriver;
use std::sync::Arc;

/// Config with short waits, for tests that expect a failure
pub fn fast_config() -> SessionConfig {
    SessionConfig::default()
        .with_screen_timeout(300)
        .with_element_timeout(300)
        .with_poll_interval(10)
}

/// Session plus a handle on its simulated storefront for fault injection
pub fn simulated() -> (Session, Arc<SimulatedStorefront>) {
    let shop = Arc::new(SimulatedStorefront::new());
    let driver: SharedDriver = shop.clone();
    (Session::new(driver, fast_config()), shop)
}

/// Log in as the standard user and return the verified catalog page
pub async fn logged_in(session: &Session) -> ProductsPage {
    let fixtures = Fixtures::builtin();
    session
        .open()
        .await
        .unwrap()
        .login_as(fixtures.standard_user().unwrap())
        .await
        .unwrap()
}
