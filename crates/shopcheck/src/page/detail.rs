//! Product detail screen.

use super::{CartPage, PageContext, PageObject, ProductsPage};
use crate::money::Price;
use crate::result::{ShopError, ShopResult};
use crate::screen::Screen;

/// Page object for a single product's detail view
#[derive(Debug, Clone)]
pub struct ProductDetailPage {
    ctx: PageContext,
}

impl PageObject for ProductDetailPage {
    fn context(&self) -> &PageContext {
        &self.ctx
    }
}

impl ProductDetailPage {
    pub(crate) fn from_context(ctx: PageContext) -> Self {
        debug_assert_eq!(ctx.screen(), Screen::ProductDetail);
        Self { ctx }
    }

    /// Displayed product name
    pub async fn name(&self) -> ShopResult<String> {
        self.ctx.text("detail_name").await
    }

    /// Displayed product price
    pub async fn price(&self) -> ShopResult<Price> {
        Price::parse(&self.ctx.text("detail_price").await?)
    }

    /// Fail unless the view shows `display_name`
    pub async fn assert_product(&self, display_name: &str) -> ShopResult<&Self> {
        let actual = self.name().await?;
        if actual == display_name {
            Ok(self)
        } else {
            Err(ShopError::assertion(
                Screen::ProductDetail,
                "product name",
                display_name,
                actual,
            ))
        }
    }

    /// Add the shown product to the cart
    pub async fn add_to_cart(&self) -> ShopResult<&Self> {
        self.ctx.click("add_button").await?;
        Ok(self)
    }

    /// Remove the shown product from the cart
    pub async fn remove_from_cart(&self) -> ShopResult<&Self> {
        self.ctx.click("remove_button").await?;
        Ok(self)
    }

    /// Fail unless the cart badge shows `expected`
    pub async fn assert_cart_badge(&self, expected: usize) -> ShopResult<&Self> {
        self.ctx.assert_cart_badge(expected).await?;
        Ok(self)
    }

    /// Return to the catalog
    pub async fn back_to_products(&self) -> ShopResult<ProductsPage> {
        self.ctx.click("back_to_products").await?;
        Ok(ProductsPage::from_context(
            self.ctx.arrive(Screen::Products).await?,
        ))
    }

    /// Open the cart
    pub async fn open_cart(&self) -> ShopResult<CartPage> {
        self.ctx.click("cart_link").await?;
        Ok(CartPage::from_context(self.ctx.arrive(Screen::Cart).await?))
    }
}
