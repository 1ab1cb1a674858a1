//! Checkout screens: customer information, overview and confirmation.

use super::{CartPage, Outcome, PageContext, PageObject, ProductsPage};
use crate::model::{CartLine, CheckoutForm, ErrorState, FormField};
use crate::money::{OrderSummary, Price};
use crate::result::{ShopError, ShopResult};
use crate::screen::Screen;

/// Header shown once an order is placed
pub const ORDER_COMPLETE_HEADER: &str = "Thank you for your order!";

/// Start of the confirmation text
pub const ORDER_COMPLETE_TEXT: &str = "Your order has been dispatched";

/// Result of submitting the customer information form
#[derive(Debug)]
pub enum Submission {
    /// Form accepted; the overview is verified
    Advanced(CheckoutOverviewPage),
    /// Form refused; still on the information screen
    Rejected(ErrorState),
}

// =============================================================================
// STEP ONE: CUSTOMER INFORMATION
// =============================================================================

/// Page object for checkout step one
#[derive(Debug, Clone)]
pub struct CheckoutInfoPage {
    ctx: PageContext,
}

impl PageObject for CheckoutInfoPage {
    fn context(&self) -> &PageContext {
        &self.ctx
    }
}

impl CheckoutInfoPage {
    pub(crate) fn from_context(ctx: PageContext) -> Self {
        debug_assert_eq!(ctx.screen(), Screen::CheckoutInfo);
        Self { ctx }
    }

    /// Clear and type every field; empty values leave the field blank
    pub async fn fill(&self, form: &CheckoutForm) -> ShopResult<&Self> {
        for field in FormField::ALL {
            self.ctx.fill(field.locator(), form.value(field)).await?;
        }
        Ok(self)
    }

    /// Press Continue without judging the outcome
    pub async fn click_continue(&self) -> ShopResult<&Self> {
        self.ctx.click("continue").await?;
        Ok(self)
    }

    /// Fill the form, press Continue and report what happened
    pub async fn submit(&self, form: &CheckoutForm) -> ShopResult<Submission> {
        self.fill(form).await?.click_continue().await?;
        match self.ctx.await_outcome(Screen::CheckoutOverview).await? {
            Outcome::Moved => {
                let ctx = self.ctx.arrive(Screen::CheckoutOverview).await?;
                Ok(Submission::Advanced(CheckoutOverviewPage::from_context(ctx)))
            }
            Outcome::Refused(message) => {
                tracing::info!(%message, "checkout form rejected");
                Ok(Submission::Rejected(ErrorState {
                    screen: Screen::CheckoutInfo,
                    message,
                }))
            }
        }
    }

    /// Submit a form that must be accepted
    pub async fn continue_to_overview(&self, form: &CheckoutForm) -> ShopResult<CheckoutOverviewPage> {
        match self.submit(form).await? {
            Submission::Advanced(overview) => Ok(overview),
            Submission::Rejected(state) => Err(ShopError::assertion(
                Screen::CheckoutInfo,
                "checkout form",
                "accepted",
                state.message,
            )),
        }
    }

    /// Visible error message, if any
    pub async fn error_message(&self) -> ShopResult<Option<String>> {
        self.ctx.visible_text("error").await
    }

    /// Fail unless a visible error contains `expected`
    pub async fn assert_error_message(&self, expected: &str) -> ShopResult<&Self> {
        let handle = self.ctx.visible_element("error").await?;
        let actual = self.ctx.driver().text(&handle).await?;
        if actual.contains(expected) {
            Ok(self)
        } else {
            Err(ShopError::assertion(
                Screen::CheckoutInfo,
                "error message",
                expected,
                actual,
            ))
        }
    }

    /// Abandon checkout and return to the cart
    pub async fn cancel(&self) -> ShopResult<CartPage> {
        self.ctx.click("cancel").await?;
        Ok(CartPage::from_context(self.ctx.arrive(Screen::Cart).await?))
    }
}

// =============================================================================
// STEP TWO: OVERVIEW
// =============================================================================

/// Page object for checkout step two
#[derive(Debug, Clone)]
pub struct CheckoutOverviewPage {
    ctx: PageContext,
}

impl PageObject for CheckoutOverviewPage {
    fn context(&self) -> &PageContext {
        &self.ctx
    }
}

impl CheckoutOverviewPage {
    pub(crate) fn from_context(ctx: PageContext) -> Self {
        debug_assert_eq!(ctx.screen(), Screen::CheckoutOverview);
        Self { ctx }
    }

    /// Lines being ordered
    pub async fn lines(&self) -> ShopResult<Vec<CartLine>> {
        self.ctx.cart_lines().await
    }

    /// Fail unless exactly `expected` lines are listed
    pub async fn assert_item_count(&self, expected: usize) -> ShopResult<&Self> {
        self.ctx.assert_line_count(expected).await?;
        Ok(self)
    }

    /// Fail unless a line with `display_name` is listed
    pub async fn assert_contains_item(&self, display_name: &str) -> ShopResult<&Self> {
        self.ctx.assert_line_present(display_name, true).await?;
        Ok(self)
    }

    /// Item total, tax and total as displayed
    pub async fn summary(&self) -> ShopResult<OrderSummary> {
        OrderSummary::parse(
            &self.ctx.text("item_total").await?,
            &self.ctx.text("tax").await?,
            &self.ctx.text("total").await?,
        )
    }

    /// Fail unless `total == item total + tax`
    pub async fn assert_total_consistent(&self) -> ShopResult<&Self> {
        let summary = self.summary().await?;
        if summary.is_consistent() {
            Ok(self)
        } else {
            Err(ShopError::assertion(
                Screen::CheckoutOverview,
                "total = item total + tax",
                summary
                    .expected_total()
                    .map_or_else(|| "<overflow>".to_string(), |p| p.to_string()),
                summary.total,
            ))
        }
    }

    /// Fail unless the item total equals the sum of the listed lines
    pub async fn assert_item_total_matches_lines(&self) -> ShopResult<&Self> {
        let lines = self.lines().await?;
        let expected = lines
            .iter()
            .map(CartLine::line_total)
            .try_fold(Price::default(), |sum, line| sum.checked_add(line?));
        let actual = self.summary().await?.item_total;
        if expected == Some(actual) {
            Ok(self)
        } else {
            Err(ShopError::assertion(
                Screen::CheckoutOverview,
                "item total",
                expected.map_or_else(|| "<overflow>".to_string(), |p| p.to_string()),
                actual,
            ))
        }
    }

    /// Fail unless the summary labels and amounts are visible
    pub async fn assert_summary_visible(&self) -> ShopResult<&Self> {
        if self.ctx.visible_count("summary_labels").await? == 0 {
            return Err(self.ctx.locator("summary_labels")?.not_found());
        }
        for name in ["item_total", "tax", "total"] {
            let _ = self.ctx.visible_element(name).await?;
        }
        Ok(self)
    }

    /// Place the order
    pub async fn finish(&self) -> ShopResult<CheckoutCompletePage> {
        self.ctx.click("finish").await?;
        let ctx = self.ctx.arrive(Screen::CheckoutComplete).await?;
        tracing::info!("order placed");
        Ok(CheckoutCompletePage::from_context(ctx))
    }

    /// Abandon checkout and return to the catalog
    pub async fn cancel(&self) -> ShopResult<ProductsPage> {
        self.ctx.click("cancel").await?;
        Ok(ProductsPage::from_context(
            self.ctx.arrive(Screen::Products).await?,
        ))
    }
}

// =============================================================================
// CONFIRMATION
// =============================================================================

/// Page object for the order confirmation
#[derive(Debug, Clone)]
pub struct CheckoutCompletePage {
    ctx: PageContext,
}

impl PageObject for CheckoutCompletePage {
    fn context(&self) -> &PageContext {
        &self.ctx
    }
}

impl CheckoutCompletePage {
    pub(crate) fn from_context(ctx: PageContext) -> Self {
        debug_assert_eq!(ctx.screen(), Screen::CheckoutComplete);
        Self { ctx }
    }

    /// Fail unless the confirmation header and text are shown
    pub async fn assert_order_complete(&self) -> ShopResult<&Self> {
        let header = self.ctx.text("complete_header").await?;
        if header.trim() != ORDER_COMPLETE_HEADER {
            return Err(ShopError::assertion(
                Screen::CheckoutComplete,
                "confirmation header",
                ORDER_COMPLETE_HEADER,
                header,
            ));
        }
        let text = self.ctx.text("complete_text").await?;
        if !text.contains(ORDER_COMPLETE_TEXT) {
            return Err(ShopError::assertion(
                Screen::CheckoutComplete,
                "confirmation text",
                ORDER_COMPLETE_TEXT,
                text,
            ));
        }
        Ok(self)
    }

    /// Return to the catalog
    pub async fn back_home(&self) -> ShopResult<ProductsPage> {
        self.ctx.click("back_home").await?;
        Ok(ProductsPage::from_context(
            self.ctx.arrive(Screen::Products).await?,
        ))
    }
}
