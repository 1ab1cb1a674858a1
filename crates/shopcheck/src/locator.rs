//! Locator catalog for the storefront screens.
//!
//! # Design
//!
//! - **Static catalog**: every screen maps semantic names to selectors once,
//!   when its page object is built. Locators are immutable afterwards.
//! - **Per-item templates**: controls bound to one product are derived by the
//!   pure function [`resolve_item`], never by ad-hoc string building in page
//!   objects.
//! - **Live resolution**: [`Locator::query`] re-reads the DOM on every call.

use crate::driver::{Driver, ElementHandle};
use crate::result::{ShopError, ShopResult};
use crate::screen::Screen;
use std::collections::BTreeMap;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// CSS selector (e.g., ".inventory_item")
    Css(String),
    /// Exact `data-test` attribute
    TestId(String),
    /// `data-test` attribute prefix
    TestIdPrefix(String),
    /// CSS selector narrowed to elements whose text contains `text`
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a `data-test` selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// Create a `data-test` prefix selector
    #[must_use]
    pub fn test_id_prefix(prefix: impl Into<String>) -> Self {
        Self::TestIdPrefix(prefix.into())
    }

    /// CSS expression handed to the driver
    #[must_use]
    pub fn to_css(&self) -> String {
        match self {
            Self::Css(s) | Self::CssWithText { css: s, .. } => s.clone(),
            Self::TestId(id) => format!("[data-test=\"{id}\"]"),
            Self::TestIdPrefix(prefix) => format!("[data-test^=\"{prefix}\"]"),
        }
    }

    /// Text filter applied after the CSS query, if any
    #[must_use]
    pub fn text_filter(&self) -> Option<&str> {
        match self {
            Self::CssWithText { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Narrow this selector by text content
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        Self::CssWithText {
            css: self.to_css(),
            text: text.into(),
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.text_filter() {
            Some(text) => write!(f, "{}:has-text({text:?})", self.to_css()),
            None => f.write_str(&self.to_css()),
        }
    }
}

/// A named selector bound to a screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    screen: Screen,
    name: String,
    selector: Selector,
}

impl Locator {
    /// Create a locator
    #[must_use]
    pub fn new(screen: Screen, name: impl Into<String>, selector: Selector) -> Self {
        Self {
            screen,
            name: name.into(),
            selector,
        }
    }

    /// Screen this locator belongs to
    #[must_use]
    pub const fn screen(&self) -> Screen {
        self.screen
    }

    /// Semantic name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Underlying selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Same locator narrowed by text content
    #[must_use]
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            screen: self.screen,
            name: format!("{}[{text}]", self.name),
            selector: self.selector.clone().with_text(text),
        }
    }

    /// Resolve all currently matching elements
    pub async fn query(&self, driver: &dyn Driver) -> ShopResult<Vec<ElementHandle>> {
        let handles = driver.find_all(&self.selector.to_css()).await?;
        let Some(text) = self.selector.text_filter() else {
            return Ok(handles);
        };
        let mut matching = Vec::new();
        for handle in handles {
            if driver.text(&handle).await?.contains(text) {
                matching.push(handle);
            }
        }
        Ok(matching)
    }

    /// Count matching elements
    pub async fn count(&self, driver: &dyn Driver) -> ShopResult<usize> {
        Ok(self.query(driver).await?.len())
    }

    /// Count matching elements that are visible
    pub async fn visible_count(&self, driver: &dyn Driver) -> ShopResult<usize> {
        let mut visible = 0;
        for handle in self.query(driver).await? {
            if driver.is_visible(&handle).await? {
                visible += 1;
            }
        }
        Ok(visible)
    }

    /// Text of every matching element, in document order
    pub async fn all_texts(&self, driver: &dyn Driver) -> ShopResult<Vec<String>> {
        let mut texts = Vec::new();
        for handle in self.query(driver).await? {
            texts.push(driver.text(&handle).await?);
        }
        Ok(texts)
    }

    /// Error describing this locator as missing
    #[must_use]
    pub fn not_found(&self) -> ShopError {
        ShopError::ElementNotFound {
            screen: self.screen,
            locator: self.name.clone(),
            selector: self.selector.to_string(),
        }
    }
}

/// Actions that target one product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemAction {
    /// "Add to cart" button of a product
    AddToCart,
    /// "Remove" button of a product
    Remove,
    /// Product name link, matched by display name
    OpenDetail,
}

impl ItemAction {
    /// Semantic name used in locator names and logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddToCart => "add_to_cart",
            Self::Remove => "remove",
            Self::OpenDetail => "open_detail",
        }
    }
}

/// Resolve a per-item control.
///
/// `entity` is the product slug for button actions (e.g.
/// `sauce-labs-backpack`) and the display name for [`ItemAction::OpenDetail`].
/// The slug is interpolated verbatim: casing and punctuation are significant.
/// Returns `None` when the screen has no such control.
#[must_use]
pub fn resolve_item(screen: Screen, action: ItemAction, entity: &str) -> Option<Locator> {
    let selector = match (screen, action) {
        (Screen::Products, ItemAction::AddToCart) => {
            Selector::test_id(format!("add-to-cart-{entity}"))
        }
        (Screen::Products | Screen::Cart, ItemAction::Remove) => {
            Selector::test_id(format!("remove-{entity}"))
        }
        (Screen::Products, ItemAction::OpenDetail) => {
            Selector::css(".inventory_item_name").with_text(entity)
        }
        _ => return None,
    };
    Some(Locator::new(
        screen,
        format!("{}:{entity}", action.as_str()),
        selector,
    ))
}

/// Per-screen mapping from semantic element name to locator
#[derive(Debug, Clone)]
pub struct LocatorCatalog {
    screen: Screen,
    locators: BTreeMap<&'static str, Locator>,
}

impl LocatorCatalog {
    /// Build the catalog for a screen
    #[must_use]
    pub fn for_screen(screen: Screen) -> Self {
        let entries: Vec<(&'static str, Selector)> = match screen {
            Screen::Login => vec![
                ("username", Selector::test_id("username")),
                ("password", Selector::test_id("password")),
                ("login_button", Selector::test_id("login-button")),
                ("error", Selector::test_id("error")),
                ("error_button", Selector::css(".error-button")),
            ],
            Screen::Products => vec![
                ("title", Selector::css(".title")),
                ("menu_button", Selector::css("#react-burger-menu-btn")),
                ("logout_link", Selector::css("#logout_sidebar_link")),
                ("cart_link", Selector::css(".shopping_cart_link")),
                ("cart_badge", Selector::css(".shopping_cart_badge")),
                ("sort_select", Selector::css(".product_sort_container")),
                ("items", Selector::css(".inventory_item")),
                ("item_names", Selector::css(".inventory_item_name")),
                ("item_prices", Selector::css(".inventory_item_price")),
                ("add_buttons", Selector::test_id_prefix("add-to-cart")),
                ("remove_buttons", Selector::test_id_prefix("remove")),
            ],
            Screen::ProductDetail => vec![
                ("detail_name", Selector::css(".inventory_details_name")),
                ("detail_price", Selector::css(".inventory_details_price")),
                ("back_to_products", Selector::test_id("back-to-products")),
                ("add_button", Selector::test_id("add-to-cart")),
                ("remove_button", Selector::test_id("remove")),
                ("cart_link", Selector::css(".shopping_cart_link")),
                ("cart_badge", Selector::css(".shopping_cart_badge")),
            ],
            Screen::Cart => vec![
                ("title", Selector::css(".title")),
                ("cart_badge", Selector::css(".shopping_cart_badge")),
                ("items", Selector::css(".cart_item")),
                ("item_names", Selector::css(".inventory_item_name")),
                ("item_prices", Selector::css(".inventory_item_price")),
                ("quantities", Selector::css(".cart_quantity")),
                ("remove_buttons", Selector::test_id_prefix("remove")),
                ("continue_shopping", Selector::test_id("continue-shopping")),
                ("checkout", Selector::test_id("checkout")),
            ],
            Screen::CheckoutInfo => vec![
                ("title", Selector::css(".title")),
                ("first_name", Selector::test_id("firstName")),
                ("last_name", Selector::test_id("lastName")),
                ("postal_code", Selector::test_id("postalCode")),
                ("continue", Selector::test_id("continue")),
                ("cancel", Selector::test_id("cancel")),
                ("error", Selector::test_id("error")),
            ],
            Screen::CheckoutOverview => vec![
                ("title", Selector::css(".title")),
                ("items", Selector::css(".cart_item")),
                ("item_names", Selector::css(".inventory_item_name")),
                ("item_prices", Selector::css(".inventory_item_price")),
                ("quantities", Selector::css(".cart_quantity")),
                ("summary_labels", Selector::css(".summary_info_label")),
                ("item_total", Selector::css(".summary_subtotal_label")),
                ("tax", Selector::css(".summary_tax_label")),
                ("total", Selector::css(".summary_total_label")),
                ("finish", Selector::test_id("finish")),
                ("cancel", Selector::test_id("cancel")),
            ],
            Screen::CheckoutComplete => vec![
                ("title", Selector::css(".title")),
                ("complete_header", Selector::css(".complete-header")),
                ("complete_text", Selector::css(".complete-text")),
                ("back_home", Selector::test_id("back-to-products")),
            ],
        };

        let locators = entries
            .into_iter()
            .map(|(name, selector)| (name, Locator::new(screen, name, selector)))
            .collect();
        Self { screen, locators }
    }

    /// Screen this catalog describes
    #[must_use]
    pub const fn screen(&self) -> Screen {
        self.screen
    }

    /// Look up a locator by semantic name
    pub fn get(&self, name: &str) -> ShopResult<&Locator> {
        self.locators.get(name).ok_or_else(|| ShopError::ElementNotFound {
            screen: self.screen,
            locator: name.to_string(),
            selector: "<not in catalog>".to_string(),
        })
    }

    /// Semantic names in the catalog
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.locators.keys().copied().collect()
    }
}
