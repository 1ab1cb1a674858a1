//! Page Object Model for the storefront screens.
//!
//! Each screen has one page object. Page objects hold no DOM state: they
//! carry a [`PageContext`] (shared driver, session config, locator catalog)
//! and read the live page on every call.
//!
//! Staying on a screen returns `&Self` for chaining; moving to another screen
//! returns a freshly built destination page object, and only after
//! [`PageContext::verify_screen`] confirmed the destination.
//!
//! ```ignore
//! let products = session.open().await?.login_as(&user).await?;
//! products
//!     .add_to_cart("sauce-labs-backpack").await?
//!     .assert_cart_badge(1).await?;
//! let cart = products.open_cart().await?;
//! ```

mod cart;
mod checkout;
mod detail;
mod login;
mod products;

pub use cart::CartPage;
pub use checkout::{
    CheckoutCompletePage, CheckoutInfoPage, CheckoutOverviewPage, Submission, ORDER_COMPLETE_HEADER,
    ORDER_COMPLETE_TEXT,
};
pub use detail::ProductDetailPage;
pub use login::{LoginAttempt, LoginPage};
pub use products::ProductsPage;

use crate::config::SessionConfig;
use crate::driver::{Driver, ElementHandle, SharedDriver};
use crate::locator::{Locator, LocatorCatalog};
use crate::model::CartLine;
use crate::money::Price;
use crate::result::{ShopError, ShopResult};
use crate::screen::Screen;
use crate::wait::{poll_until, wait_for_element, wait_for_visible, WaitOptions};
use async_trait::async_trait;
use std::sync::Arc;

/// Trait implemented by every storefront page object
#[async_trait]
pub trait PageObject: Send + Sync {
    /// Context the page object operates in
    fn context(&self) -> &PageContext;

    /// Screen this page object models
    fn screen(&self) -> Screen {
        self.context().screen()
    }

    /// Driver the page object talks to
    fn driver(&self) -> &dyn Driver {
        self.context().driver()
    }

    /// Budget for screen detection
    fn wait_options(&self) -> WaitOptions {
        self.context().config().screen_wait()
    }

    /// Confirm the browser shows this screen
    ///
    /// Fails with [`ShopError::NavigationMismatch`] when the location never
    /// matches and with [`ShopError::ContentMismatch`] when the title marker
    /// never does.
    async fn assert_on_screen(&self) -> ShopResult<&Self> {
        self.context().verify_screen().await?;
        Ok(self)
    }
}

/// Outcome of an action that either moves on or shows an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    Moved,
    Refused(String),
}

/// Driver, configuration and locators of one screen
#[derive(Debug, Clone)]
pub struct PageContext {
    driver: SharedDriver,
    config: Arc<SessionConfig>,
    catalog: LocatorCatalog,
}

impl PageContext {
    /// Create a context for `screen`
    #[must_use]
    pub fn new(screen: Screen, driver: SharedDriver, config: Arc<SessionConfig>) -> Self {
        Self {
            driver,
            config,
            catalog: LocatorCatalog::for_screen(screen),
        }
    }

    /// Context for another screen of the same session
    #[must_use]
    pub fn for_screen(&self, screen: Screen) -> Self {
        Self::new(screen, Arc::clone(&self.driver), Arc::clone(&self.config))
    }

    /// Screen this context belongs to
    #[must_use]
    pub const fn screen(&self) -> Screen {
        self.catalog.screen()
    }

    /// Driver
    #[must_use]
    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    /// Session configuration
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Locator catalog of the screen
    #[must_use]
    pub const fn catalog(&self) -> &LocatorCatalog {
        &self.catalog
    }

    /// Look up a locator by semantic name
    pub fn locator(&self, name: &str) -> ShopResult<&Locator> {
        self.catalog.get(name)
    }

    /// Wait until the location and title marker both match this screen
    pub async fn verify_screen(&self) -> ShopResult<()> {
        let screen = self.screen();
        let options = self.config.screen_wait();
        let driver = self.driver();
        let base_url = self.config.base_url.as_str();

        let located = poll_until(&options, screen.path(), || async move {
            let url = driver.current_url().await?;
            Ok(screen.matches_location(base_url, &url).then_some(()))
        })
        .await;
        if let Err(err) = located {
            return Err(match err {
                ShopError::Timeout { .. } => ShopError::NavigationMismatch {
                    screen,
                    expected: screen.path_pattern().to_string(),
                    actual: driver.current_url().await?,
                },
                other => other,
            });
        }

        let marker = screen.title_marker();
        let locator = self.locator(marker.locator)?;
        let shown = poll_until(&options, locator.name(), || async move {
            for handle in locator.query(driver).await? {
                if !driver.is_visible(&handle).await? {
                    continue;
                }
                match marker.text {
                    None => return Ok(Some(())),
                    Some(text) if driver.text(&handle).await?.trim() == text => {
                        return Ok(Some(()));
                    }
                    Some(_) => {}
                }
            }
            Ok(None)
        })
        .await;
        match shown {
            Ok(()) => {
                tracing::debug!(screen = %screen, "screen verified");
                Ok(())
            }
            Err(ShopError::Timeout { .. }) => {
                let observed = locator.all_texts(driver).await?;
                Err(ShopError::ContentMismatch {
                    screen,
                    locator: marker.locator.to_string(),
                    expected: marker.text.unwrap_or("visible marker").to_string(),
                    actual: if observed.is_empty() {
                        "<absent>".to_string()
                    } else {
                        observed.join(" | ")
                    },
                })
            }
            Err(other) => Err(other),
        }
    }

    /// Verified context for the screen a transition leads to
    pub(crate) async fn arrive(&self, destination: Screen) -> ShopResult<Self> {
        let next = self.for_screen(destination);
        next.verify_screen().await?;
        tracing::info!(from = %self.screen(), to = %destination, "transition verified");
        Ok(next)
    }

    /// Wait until either `destination` is reached or the screen's error shows
    pub(crate) async fn await_outcome(&self, destination: Screen) -> ShopResult<Outcome> {
        let error = self.locator("error")?;
        let driver = self.driver();
        let options = self.config.screen_wait();
        let base_url = self.config.base_url.as_str();
        let outcome = poll_until(&options, destination.path(), || async move {
            let url = driver.current_url().await?;
            if destination.matches_location(base_url, &url) {
                return Ok(Some(Outcome::Moved));
            }
            for handle in error.query(driver).await? {
                if driver.is_visible(&handle).await? {
                    return Ok(Some(Outcome::Refused(driver.text(&handle).await?)));
                }
            }
            Ok(None)
        })
        .await;
        match outcome {
            Err(ShopError::Timeout { .. }) => Err(ShopError::NavigationMismatch {
                screen: destination,
                expected: destination.path_pattern().to_string(),
                actual: driver.current_url().await?,
            }),
            other => other,
        }
    }

    /// Wait for an element by locator
    pub async fn find(&self, locator: &Locator) -> ShopResult<ElementHandle> {
        wait_for_element(self.driver(), locator, &self.config.element_wait()).await
    }

    /// Wait for an element by semantic name
    pub async fn element(&self, name: &str) -> ShopResult<ElementHandle> {
        self.find(self.locator(name)?).await
    }

    /// Wait for a visible element by semantic name
    pub async fn visible_element(&self, name: &str) -> ShopResult<ElementHandle> {
        wait_for_visible(self.driver(), self.locator(name)?, &self.config.element_wait()).await
    }

    /// Wait for an element and click it
    pub async fn click_locator(&self, locator: &Locator) -> ShopResult<()> {
        let handle = self.find(locator).await?;
        tracing::debug!(
            screen = %self.screen(),
            locator = locator.name(),
            selector = %locator.selector(),
            "click"
        );
        self.driver().click(&handle).await
    }

    /// Wait for an element by name and click it
    pub async fn click(&self, name: &str) -> ShopResult<()> {
        self.click_locator(self.locator(name)?).await
    }

    /// Clear an input, then type `text` into it
    pub async fn fill(&self, name: &str, text: &str) -> ShopResult<()> {
        let locator = self.locator(name)?;
        let handle = self.find(locator).await?;
        tracing::debug!(
            screen = %self.screen(),
            locator = locator.name(),
            selector = %locator.selector(),
            chars = text.len(),
            "fill"
        );
        self.driver().clear(&handle).await?;
        if !text.is_empty() {
            self.driver().type_text(&handle, text).await?;
        }
        Ok(())
    }

    /// Wait for an element and read its text
    pub async fn text(&self, name: &str) -> ShopResult<String> {
        let handle = self.element(name).await?;
        self.driver().text(&handle).await
    }

    /// Texts of all current matches, without waiting
    pub async fn texts(&self, name: &str) -> ShopResult<Vec<String>> {
        self.locator(name)?.all_texts(self.driver()).await
    }

    /// Number of current matches, without waiting
    pub async fn count(&self, name: &str) -> ShopResult<usize> {
        self.locator(name)?.count(self.driver()).await
    }

    /// Number of current visible matches, without waiting
    pub async fn visible_count(&self, name: &str) -> ShopResult<usize> {
        self.locator(name)?.visible_count(self.driver()).await
    }

    /// Text of the first visible match, if any
    pub async fn visible_text(&self, name: &str) -> ShopResult<Option<String>> {
        let driver = self.driver();
        for handle in self.locator(name)?.query(driver).await? {
            if driver.is_visible(&handle).await? {
                return Ok(Some(driver.text(&handle).await?));
            }
        }
        Ok(None)
    }

    /// Cart badge count; an absent or hidden badge counts as zero
    pub async fn cart_badge_count(&self) -> ShopResult<usize> {
        match self.visible_text("cart_badge").await? {
            None => Ok(0),
            Some(text) => text
                .trim()
                .parse()
                .map_err(|_| ShopError::parse("cart badge", text)),
        }
    }

    /// Fail unless the cart badge shows `expected`
    pub async fn assert_cart_badge(&self, expected: usize) -> ShopResult<()> {
        let actual = self.cart_badge_count().await?;
        if actual == expected {
            Ok(())
        } else {
            Err(ShopError::assertion(self.screen(), "cart badge", expected, actual))
        }
    }

    /// Lines rendered on a cart-like screen, in display order
    pub async fn cart_lines(&self) -> ShopResult<Vec<CartLine>> {
        let names = self.texts("item_names").await?;
        let prices = self.texts("item_prices").await?;
        let quantities = self.texts("quantities").await?;
        if prices.len() != names.len() || quantities.len() != names.len() {
            return Err(ShopError::assertion(
                self.screen(),
                "cart line structure",
                format!("{} names, prices and quantities", names.len()),
                format!(
                    "{} names, {} prices, {} quantities",
                    names.len(),
                    prices.len(),
                    quantities.len()
                ),
            ));
        }
        names
            .into_iter()
            .zip(prices)
            .zip(quantities)
            .map(|((display_name, price), quantity)| {
                Ok(CartLine {
                    display_name,
                    unit_price: Price::parse(&price)?,
                    quantity: quantity
                        .trim()
                        .parse()
                        .map_err(|_| ShopError::parse("quantity", quantity.clone()))?,
                })
            })
            .collect()
    }

    /// Line with the given display name
    pub async fn cart_line(&self, display_name: &str) -> ShopResult<CartLine> {
        self.cart_lines()
            .await?
            .into_iter()
            .find(|line| line.display_name == display_name)
            .ok_or_else(|| self.missing_item(display_name))
    }

    /// Fail unless exactly `expected` lines are rendered
    pub async fn assert_line_count(&self, expected: usize) -> ShopResult<()> {
        let actual = self.count("items").await?;
        if actual == expected {
            Ok(())
        } else {
            Err(ShopError::assertion(self.screen(), "cart item count", expected, actual))
        }
    }

    /// Fail unless a line with `display_name` is rendered
    pub async fn assert_line_present(&self, display_name: &str, present: bool) -> ShopResult<()> {
        let names = self.texts("item_names").await?;
        if names.iter().any(|n| n == display_name) == present {
            Ok(())
        } else {
            Err(ShopError::assertion(
                self.screen(),
                format!("cart contains {display_name:?}"),
                present,
                format!("{names:?}"),
            ))
        }
    }

    fn missing_item(&self, display_name: &str) -> ShopError {
        ShopError::ElementNotFound {
            screen: self.screen(),
            locator: format!("item:{display_name}"),
            selector: self
                .locator("item_names")
                .map(|l| l.selector().clone().with_text(display_name).to_string())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedStorefront;

    fn context(shop: &Arc<SimulatedStorefront>, screen: Screen, timeout_ms: u64) -> PageContext {
        let driver: SharedDriver = shop.clone();
        let config = SessionConfig::default()
            .with_screen_timeout(timeout_ms)
            .with_element_timeout(timeout_ms);
        PageContext::new(screen, driver, Arc::new(config))
    }

    #[tokio::test(start_paused = true)]
    async fn test_verify_login_screen() {
        let shop = Arc::new(SimulatedStorefront::new());
        shop.navigate("https://www.saucedemo.com/").await.unwrap();
        assert!(context(&shop, Screen::Login, 500).verify_screen().await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_location_is_navigation_mismatch() {
        let shop = Arc::new(SimulatedStorefront::new());
        shop.navigate("https://www.saucedemo.com/").await.unwrap();
        let err = context(&shop, Screen::Cart, 500)
            .verify_screen()
            .await
            .unwrap_err();
        match err {
            ShopError::NavigationMismatch {
                screen,
                expected,
                actual,
            } => {
                assert_eq!(screen, Screen::Cart);
                assert!(expected.contains("cart"));
                assert_eq!(actual, "https://www.saucedemo.com/");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_element_is_element_not_found() {
        let shop = Arc::new(SimulatedStorefront::new());
        shop.navigate("https://www.saucedemo.com/").await.unwrap();
        let err = context(&shop, Screen::Login, 200)
            .element("error")
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::ElementNotFound { screen: Screen::Login, .. }));
    }

    #[tokio::test]
    async fn test_unknown_locator_name() {
        let shop = Arc::new(SimulatedStorefront::new());
        let err = context(&shop, Screen::Cart, 10)
            .click("add_buttons")
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::ElementNotFound { .. }));
    }
}
