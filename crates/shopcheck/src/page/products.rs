//! Product catalog (inventory) screen.

use super::{CartPage, LoginPage, PageContext, PageObject, ProductDetailPage};
use crate::locator::{resolve_item, ItemAction, Locator};
use crate::money::Price;
use crate::result::{ShopError, ShopResult};
use crate::screen::Screen;
use crate::sort::{verify_names, verify_prices, SortMode};

/// Page object for the product catalog
#[derive(Debug, Clone)]
pub struct ProductsPage {
    ctx: PageContext,
}

impl PageObject for ProductsPage {
    fn context(&self) -> &PageContext {
        &self.ctx
    }
}

impl ProductsPage {
    pub(crate) fn from_context(ctx: PageContext) -> Self {
        debug_assert_eq!(ctx.screen(), Screen::Products);
        Self { ctx }
    }

    fn item(action: ItemAction, entity: &str) -> ShopResult<Locator> {
        resolve_item(Screen::Products, action, entity).ok_or_else(|| ShopError::ElementNotFound {
            screen: Screen::Products,
            locator: format!("{}:{entity}", action.as_str()),
            selector: "<no template>".to_string(),
        })
    }

    /// Add a product by slug, e.g. `sauce-labs-backpack`
    pub async fn add_to_cart(&self, slug: &str) -> ShopResult<&Self> {
        self.ctx
            .click_locator(&Self::item(ItemAction::AddToCart, slug)?)
            .await?;
        Ok(self)
    }

    /// Remove a product by slug
    pub async fn remove_from_cart(&self, slug: &str) -> ShopResult<&Self> {
        self.ctx
            .click_locator(&Self::item(ItemAction::Remove, slug)?)
            .await?;
        Ok(self)
    }

    /// Choose a sort order in the dropdown
    pub async fn sort_by(&self, mode: SortMode) -> ShopResult<&Self> {
        let select = self.ctx.element("sort_select").await?;
        tracing::debug!(mode = %mode, "sort");
        self.ctx
            .driver()
            .select_option(&select, mode.option_value())
            .await?;
        Ok(self)
    }

    /// Product names in display order
    pub async fn product_names(&self) -> ShopResult<Vec<String>> {
        self.ctx.texts("item_names").await
    }

    /// Product prices in display order
    pub async fn product_prices(&self) -> ShopResult<Vec<Price>> {
        self.ctx
            .texts("item_prices")
            .await?
            .iter()
            .map(|p| Price::parse(p))
            .collect()
    }

    /// Fail unless the catalog is ordered under `mode`
    pub async fn assert_sorted(&self, mode: SortMode) -> ShopResult<&Self> {
        if mode.by_name() {
            verify_names(mode, &self.product_names().await?)?;
        } else {
            verify_prices(mode, &self.product_prices().await?)?;
        }
        Ok(self)
    }

    /// Fail unless exactly `expected` products are listed
    pub async fn assert_product_count(&self, expected: usize) -> ShopResult<&Self> {
        let actual = self.ctx.count("items").await?;
        if actual == expected {
            Ok(self)
        } else {
            Err(ShopError::assertion(Screen::Products, "product count", expected, actual))
        }
    }

    /// Fail unless a product with `display_name` is listed
    pub async fn assert_has_product(&self, display_name: &str) -> ShopResult<&Self> {
        let names = self.product_names().await?;
        if names.iter().any(|n| n == display_name) {
            Ok(self)
        } else {
            Err(ShopError::assertion(
                Screen::Products,
                "listed products",
                format!("contains {display_name:?}"),
                format!("{names:?}"),
            ))
        }
    }

    /// Cart badge count (zero when the badge is absent)
    pub async fn cart_badge_count(&self) -> ShopResult<usize> {
        self.ctx.cart_badge_count().await
    }

    /// Fail unless the cart badge shows `expected`; zero means no badge
    pub async fn assert_cart_badge(&self, expected: usize) -> ShopResult<&Self> {
        self.ctx.assert_cart_badge(expected).await?;
        Ok(self)
    }

    /// Listed price of a product
    pub async fn product_price(&self, display_name: &str) -> ShopResult<Price> {
        let names = self.product_names().await?;
        let prices = self.product_prices().await?;
        names
            .iter()
            .position(|n| n == display_name)
            .and_then(|i| prices.get(i).copied())
            .ok_or_else(|| {
                Self::item(ItemAction::OpenDetail, display_name)
                    .map_or_else(|e| e, |l| l.not_found())
            })
    }

    /// Open the cart
    pub async fn open_cart(&self) -> ShopResult<CartPage> {
        self.ctx.click("cart_link").await?;
        Ok(CartPage::from_context(self.ctx.arrive(Screen::Cart).await?))
    }

    /// Open a product's detail view by display name
    pub async fn open_product(&self, display_name: &str) -> ShopResult<ProductDetailPage> {
        self.ctx
            .click_locator(&Self::item(ItemAction::OpenDetail, display_name)?)
            .await?;
        let ctx = self.ctx.arrive(Screen::ProductDetail).await?;
        Ok(ProductDetailPage::from_context(ctx))
    }

    /// Log out through the side menu
    pub async fn logout(&self) -> ShopResult<LoginPage> {
        self.ctx.click("menu_button").await?;
        let link = self.ctx.visible_element("logout_link").await?;
        self.ctx.driver().click(&link).await?;
        Ok(LoginPage::from_context(self.ctx.arrive(Screen::Login).await?))
    }
}
