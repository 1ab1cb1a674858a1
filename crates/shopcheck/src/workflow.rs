//! Checkout workflow: transition table and orchestrator.
//!
//! [`next`] is the pure state machine. [`Shopper`] walks real page objects
//! through it: every step is checked against the table first, performed
//! through the page object, and only recorded once the destination screen
//! has been verified.
//!
//! ```text
//!  LoggedOut ──login──▶ Products ◀──▶ ProductDetail
//!      ▲                 │  ▲  ▲
//!    logout          cart│  │  └──────────── cancel ───────────┐
//!      │                 ▼  │ continue                          │
//!      └─────────────── Cart ◀── cancel ── CheckoutInfo ──▶ CheckoutOverview
//!                         │ checkout           ▲                  │ finish
//!                         └────────────────────┘                  ▼
//!                 Products ◀──────────── back home ───────── CheckoutComplete
//! ```

use crate::fixture::UserRecord;
use crate::model::{CheckoutForm, ErrorState};
use crate::money::OrderSummary;
use crate::page::{
    CartPage, CheckoutCompletePage, CheckoutInfoPage, CheckoutOverviewPage, LoginAttempt,
    LoginPage, PageObject, ProductDetailPage, ProductsPage, Submission,
};
use crate::result::{ShopError, ShopResult};
use crate::screen::Screen;
use crate::session::Session;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    /// On the login form, not authenticated
    LoggedOut,
    /// Product catalog
    Products,
    /// Product detail view
    ProductDetail,
    /// Cart
    Cart,
    /// Checkout step one
    CheckoutInfo,
    /// Checkout step two
    CheckoutOverview,
    /// Order placed
    CheckoutComplete,
}

impl FlowState {
    /// Screen shown in this state
    #[must_use]
    pub const fn screen(self) -> Screen {
        match self {
            Self::LoggedOut => Screen::Login,
            Self::Products => Screen::Products,
            Self::ProductDetail => Screen::ProductDetail,
            Self::Cart => Screen::Cart,
            Self::CheckoutInfo => Screen::CheckoutInfo,
            Self::CheckoutOverview => Screen::CheckoutOverview,
            Self::CheckoutComplete => Screen::CheckoutComplete,
        }
    }

    /// State showing `screen`
    #[must_use]
    pub const fn from_screen(screen: Screen) -> Self {
        match screen {
            Screen::Login => Self::LoggedOut,
            Screen::Products => Self::Products,
            Screen::ProductDetail => Self::ProductDetail,
            Screen::Cart => Self::Cart,
            Screen::CheckoutInfo => Self::CheckoutInfo,
            Screen::CheckoutOverview => Self::CheckoutOverview,
            Screen::CheckoutComplete => Self::CheckoutComplete,
        }
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.screen(), f)
    }
}

/// Workflow transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Submit credentials; `accepted` is the guard outcome
    Login {
        /// Whether the credentials are accepted
        accepted: bool,
    },
    /// Log out through the side menu
    Logout,
    /// Open a product's detail view
    OpenProduct,
    /// Leave the detail view
    BackToProducts,
    /// Open the cart (also with zero items)
    OpenCart,
    /// Leave the cart for the catalog
    ContinueShopping,
    /// Start checkout (unguarded, also for an empty cart)
    Checkout,
    /// Submit customer information; `complete` is the guard outcome
    SubmitInfo {
        /// Whether every field is non-empty
        complete: bool,
    },
    /// Abandon step one
    CancelInfo,
    /// Place the order
    Finish,
    /// Abandon step two
    CancelOverview,
    /// Leave the confirmation
    BackHome,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::OpenProduct => "open_product",
            Self::BackToProducts => "back_to_products",
            Self::OpenCart => "open_cart",
            Self::ContinueShopping => "continue_shopping",
            Self::Checkout => "checkout",
            Self::SubmitInfo { .. } => "submit_info",
            Self::CancelInfo => "cancel_info",
            Self::Finish => "finish",
            Self::CancelOverview => "cancel_overview",
            Self::BackHome => "back_home",
        };
        f.write_str(name)
    }
}

/// Apply a transition; `None` when it is not available in `state`.
///
/// A failed guard keeps the state unchanged instead of being invalid.
#[must_use]
pub const fn next(state: FlowState, transition: Transition) -> Option<FlowState> {
    use FlowState as S;
    use Transition as T;
    let to = match (state, transition) {
        (S::LoggedOut, T::Login { accepted: true }) => S::Products,
        (S::LoggedOut, T::Login { accepted: false }) => S::LoggedOut,
        (S::Products, T::Logout) => S::LoggedOut,
        (S::Products, T::OpenProduct) => S::ProductDetail,
        (S::ProductDetail, T::BackToProducts) => S::Products,
        (S::Products | S::ProductDetail, T::OpenCart) => S::Cart,
        (S::Cart, T::ContinueShopping) => S::Products,
        (S::Cart, T::Checkout) => S::CheckoutInfo,
        (S::CheckoutInfo, T::SubmitInfo { complete: true }) => S::CheckoutOverview,
        (S::CheckoutInfo, T::SubmitInfo { complete: false }) => S::CheckoutInfo,
        (S::CheckoutInfo, T::CancelInfo) => S::Cart,
        (S::CheckoutOverview, T::Finish) => S::CheckoutComplete,
        (S::CheckoutOverview, T::CancelOverview) => S::Products,
        (S::CheckoutComplete, T::BackHome) => S::Products,
        _ => return None,
    };
    Some(to)
}

/// The page object for the current state
#[derive(Debug)]
pub enum CurrentPage {
    /// Login form
    Login(LoginPage),
    /// Catalog
    Products(ProductsPage),
    /// Detail view
    ProductDetail(ProductDetailPage),
    /// Cart
    Cart(CartPage),
    /// Step one
    CheckoutInfo(CheckoutInfoPage),
    /// Step two
    CheckoutOverview(CheckoutOverviewPage),
    /// Confirmation
    CheckoutComplete(CheckoutCompletePage),
}

impl CurrentPage {
    /// Screen of the held page object
    #[must_use]
    pub fn screen(&self) -> Screen {
        match self {
            Self::Login(p) => p.screen(),
            Self::Products(p) => p.screen(),
            Self::ProductDetail(p) => p.screen(),
            Self::Cart(p) => p.screen(),
            Self::CheckoutInfo(p) => p.screen(),
            Self::CheckoutOverview(p) => p.screen(),
            Self::CheckoutComplete(p) => p.screen(),
        }
    }
}

/// Drives one session through the workflow, verifying every transition
#[derive(Debug)]
pub struct Shopper {
    session: Session,
    state: FlowState,
    page: CurrentPage,
    trail: Vec<(Transition, FlowState)>,
}

impl Shopper {
    /// Open the storefront and start in [`FlowState::LoggedOut`]
    pub async fn start(session: Session) -> ShopResult<Self> {
        let login = session.open().await?;
        Ok(Self {
            session,
            state: FlowState::LoggedOut,
            page: CurrentPage::Login(login),
            trail: Vec::new(),
        })
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> FlowState {
        self.state
    }

    /// Current page object
    #[must_use]
    pub const fn page(&self) -> &CurrentPage {
        &self.page
    }

    /// Transitions taken so far, with the state each led to
    #[must_use]
    pub fn trail(&self) -> &[(Transition, FlowState)] {
        &self.trail
    }

    /// Underlying session
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Finish and hand back the session
    #[must_use]
    pub fn into_session(self) -> Session {
        self.session
    }

    fn guard(&self, transition: Transition) -> ShopResult<FlowState> {
        next(self.state, transition).ok_or_else(|| ShopError::InvalidTransition {
            from: self.state.screen(),
            transition: transition.to_string(),
        })
    }

    fn enter(&mut self, transition: Transition, page: CurrentPage) -> ShopResult<()> {
        let expected = self.guard(transition)?;
        let reached = FlowState::from_screen(page.screen());
        if reached != expected {
            return Err(ShopError::NavigationMismatch {
                screen: expected.screen(),
                expected: expected.screen().path_pattern().to_string(),
                actual: reached.screen().path().to_string(),
            });
        }
        tracing::info!(from = %self.state, to = %reached, %transition, "workflow step");
        self.state = reached;
        self.page = page;
        self.trail.push((transition, reached));
        Ok(())
    }

    fn record_stay(&mut self, transition: Transition) {
        tracing::info!(state = %self.state, %transition, "workflow guard held");
        self.trail.push((transition, self.state));
    }

    fn wrong_page(&self, transition: Transition) -> ShopError {
        ShopError::InvalidTransition {
            from: self.page.screen(),
            transition: transition.to_string(),
        }
    }

    /// Catalog page object, if that is the current page
    pub fn products(&self) -> ShopResult<&ProductsPage> {
        match &self.page {
            CurrentPage::Products(p) => Ok(p),
            _ => Err(self.wrong_page(Transition::OpenCart)),
        }
    }

    /// Cart page object, if that is the current page
    pub fn cart(&self) -> ShopResult<&CartPage> {
        match &self.page {
            CurrentPage::Cart(p) => Ok(p),
            _ => Err(self.wrong_page(Transition::Checkout)),
        }
    }

    /// Overview page object, if that is the current page
    pub fn overview(&self) -> ShopResult<&CheckoutOverviewPage> {
        match &self.page {
            CurrentPage::CheckoutOverview(p) => Ok(p),
            _ => Err(self.wrong_page(Transition::Finish)),
        }
    }

    /// Log in; a refusal keeps the state and returns the error shown
    pub async fn login(&mut self, user: &UserRecord) -> ShopResult<Option<ErrorState>> {
        let CurrentPage::Login(login) = &self.page else {
            return Err(self.wrong_page(Transition::Login { accepted: true }));
        };
        match login.attempt(user).await? {
            LoginAttempt::LoggedIn(products) => {
                self.enter(
                    Transition::Login { accepted: true },
                    CurrentPage::Products(products),
                )?;
                Ok(None)
            }
            LoginAttempt::Refused(error) => {
                let transition = Transition::Login { accepted: false };
                let _ = self.guard(transition)?;
                self.record_stay(transition);
                Ok(Some(error))
            }
        }
    }

    /// Add products by slug; stays on the catalog
    pub async fn add_products(&mut self, slugs: &[&str]) -> ShopResult<&mut Self> {
        let products = self.products()?;
        for slug in slugs {
            products.add_to_cart(slug).await?;
        }
        Ok(self)
    }

    /// Open a product's detail view
    pub async fn open_product(&mut self, display_name: &str) -> ShopResult<&mut Self> {
        let transition = Transition::OpenProduct;
        let _ = self.guard(transition)?;
        let detail = self.products()?.open_product(display_name).await?;
        self.enter(transition, CurrentPage::ProductDetail(detail))?;
        Ok(self)
    }

    /// Leave the detail view
    pub async fn back_to_products(&mut self) -> ShopResult<&mut Self> {
        let transition = Transition::BackToProducts;
        let _ = self.guard(transition)?;
        let CurrentPage::ProductDetail(detail) = &self.page else {
            return Err(self.wrong_page(transition));
        };
        let products = detail.back_to_products().await?;
        self.enter(transition, CurrentPage::Products(products))?;
        Ok(self)
    }

    /// Open the cart from the catalog or a detail view
    pub async fn open_cart(&mut self) -> ShopResult<&mut Self> {
        let transition = Transition::OpenCart;
        let _ = self.guard(transition)?;
        let cart = match &self.page {
            CurrentPage::Products(p) => p.open_cart().await?,
            CurrentPage::ProductDetail(p) => p.open_cart().await?,
            _ => return Err(self.wrong_page(transition)),
        };
        self.enter(transition, CurrentPage::Cart(cart))?;
        Ok(self)
    }

    /// Leave the cart for the catalog
    pub async fn continue_shopping(&mut self) -> ShopResult<&mut Self> {
        let transition = Transition::ContinueShopping;
        let _ = self.guard(transition)?;
        let products = self.cart()?.continue_shopping().await?;
        self.enter(transition, CurrentPage::Products(products))?;
        Ok(self)
    }

    /// Start checkout
    pub async fn checkout(&mut self) -> ShopResult<&mut Self> {
        let transition = Transition::Checkout;
        let _ = self.guard(transition)?;
        let info = self.cart()?.proceed_to_checkout().await?;
        self.enter(transition, CurrentPage::CheckoutInfo(info))?;
        Ok(self)
    }

    /// Submit customer information; a rejection keeps the state
    pub async fn submit_info(&mut self, form: &CheckoutForm) -> ShopResult<Option<ErrorState>> {
        let CurrentPage::CheckoutInfo(info) = &self.page else {
            return Err(self.wrong_page(Transition::SubmitInfo { complete: true }));
        };
        match info.submit(form).await? {
            Submission::Advanced(overview) => {
                self.enter(
                    Transition::SubmitInfo { complete: true },
                    CurrentPage::CheckoutOverview(overview),
                )?;
                Ok(None)
            }
            Submission::Rejected(error) => {
                let transition = Transition::SubmitInfo { complete: false };
                let _ = self.guard(transition)?;
                self.record_stay(transition);
                Ok(Some(error))
            }
        }
    }

    /// Abandon checkout from step one or step two
    pub async fn cancel(&mut self) -> ShopResult<&mut Self> {
        match &self.page {
            CurrentPage::CheckoutInfo(info) => {
                let cart = info.cancel().await?;
                self.enter(Transition::CancelInfo, CurrentPage::Cart(cart))?;
            }
            CurrentPage::CheckoutOverview(overview) => {
                let products = overview.cancel().await?;
                self.enter(Transition::CancelOverview, CurrentPage::Products(products))?;
            }
            _ => return Err(self.wrong_page(Transition::CancelInfo)),
        }
        Ok(self)
    }

    /// Place the order, checking the totals first
    pub async fn finish(&mut self) -> ShopResult<OrderSummary> {
        let transition = Transition::Finish;
        let _ = self.guard(transition)?;
        let overview = self.overview()?;
        overview.assert_total_consistent().await?;
        let summary = overview.summary().await?;
        let complete = overview.finish().await?;
        complete.assert_order_complete().await?;
        self.enter(transition, CurrentPage::CheckoutComplete(complete))?;
        Ok(summary)
    }

    /// Leave the confirmation
    pub async fn back_home(&mut self) -> ShopResult<&mut Self> {
        let transition = Transition::BackHome;
        let _ = self.guard(transition)?;
        let CurrentPage::CheckoutComplete(complete) = &self.page else {
            return Err(self.wrong_page(transition));
        };
        let products = complete.back_home().await?;
        self.enter(transition, CurrentPage::Products(products))?;
        Ok(self)
    }

    /// Log out from the catalog
    pub async fn logout(&mut self) -> ShopResult<&mut Self> {
        let transition = Transition::Logout;
        let _ = self.guard(transition)?;
        let login = self.products()?.logout().await?;
        self.enter(transition, CurrentPage::Login(login))?;
        Ok(self)
    }

    /// Full purchase: log in, add `slugs`, check out with `form`, finish
    /// and return to the catalog. Returns the overview amounts.
    pub async fn purchase(
        &mut self,
        user: &UserRecord,
        slugs: &[&str],
        form: &CheckoutForm,
    ) -> ShopResult<OrderSummary> {
        if let Some(error) = self.login(user).await? {
            return Err(ShopError::assertion(
                Screen::Login,
                format!("login of {:?}", user.username),
                "accepted",
                error.message,
            ));
        }
        self.add_products(slugs).await?;
        self.products()?.assert_cart_badge(slugs.len()).await?;
        self.open_cart().await?;
        self.cart()?.assert_item_count(slugs.len()).await?;
        self.checkout().await?;
        if let Some(error) = self.submit_info(form).await? {
            return Err(ShopError::assertion(
                Screen::CheckoutInfo,
                "checkout form",
                "accepted",
                error.message,
            ));
        }
        self.overview()?.assert_item_count(slugs.len()).await?;
        let summary = self.finish().await?;
        self.back_home().await?;
        self.products()?.assert_cart_badge(0).await?;
        Ok(summary)
    }
}
