//! Cart screen.

use super::{CheckoutInfoPage, PageContext, PageObject, ProductsPage};
use crate::locator::{resolve_item, ItemAction};
use crate::model::CartLine;
use crate::money::Price;
use crate::result::{ShopError, ShopResult};
use crate::screen::Screen;

/// Page object for the cart
#[derive(Debug, Clone)]
pub struct CartPage {
    ctx: PageContext,
}

impl PageObject for CartPage {
    fn context(&self) -> &PageContext {
        &self.ctx
    }
}

impl CartPage {
    pub(crate) fn from_context(ctx: PageContext) -> Self {
        debug_assert_eq!(ctx.screen(), Screen::Cart);
        Self { ctx }
    }

    /// Remove a line by product slug
    pub async fn remove_item(&self, slug: &str) -> ShopResult<&Self> {
        let locator = resolve_item(Screen::Cart, ItemAction::Remove, slug).ok_or_else(|| {
            ShopError::ElementNotFound {
                screen: Screen::Cart,
                locator: format!("remove:{slug}"),
                selector: "<no template>".to_string(),
            }
        })?;
        self.ctx.click_locator(&locator).await?;
        Ok(self)
    }

    /// Lines currently in the cart, in display order
    pub async fn lines(&self) -> ShopResult<Vec<CartLine>> {
        self.ctx.cart_lines().await
    }

    /// Fail unless the cart holds exactly `expected` lines
    pub async fn assert_item_count(&self, expected: usize) -> ShopResult<&Self> {
        self.ctx.assert_line_count(expected).await?;
        Ok(self)
    }

    /// Fail unless a line with `display_name` is present
    pub async fn assert_contains_item(&self, display_name: &str) -> ShopResult<&Self> {
        self.ctx.assert_line_present(display_name, true).await?;
        Ok(self)
    }

    /// Fail if a line with `display_name` is present
    pub async fn assert_not_contains_item(&self, display_name: &str) -> ShopResult<&Self> {
        self.ctx.assert_line_present(display_name, false).await?;
        Ok(self)
    }

    /// Unit price of a named line
    pub async fn item_price(&self, display_name: &str) -> ShopResult<Price> {
        Ok(self.ctx.cart_line(display_name).await?.unit_price)
    }

    /// Quantity of a named line
    pub async fn item_quantity(&self, display_name: &str) -> ShopResult<u32> {
        Ok(self.ctx.cart_line(display_name).await?.quantity)
    }

    /// Cart badge count (zero when the badge is absent)
    pub async fn cart_badge_count(&self) -> ShopResult<usize> {
        self.ctx.cart_badge_count().await
    }

    /// Back to the catalog
    pub async fn continue_shopping(&self) -> ShopResult<ProductsPage> {
        self.ctx.click("continue_shopping").await?;
        Ok(ProductsPage::from_context(
            self.ctx.arrive(Screen::Products).await?,
        ))
    }

    /// Start checkout; allowed with an empty cart
    pub async fn proceed_to_checkout(&self) -> ShopResult<CheckoutInfoPage> {
        self.ctx.click("checkout").await?;
        Ok(CheckoutInfoPage::from_context(
            self.ctx.arrive(Screen::CheckoutInfo).await?,
        ))
    }
}
