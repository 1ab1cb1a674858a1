//! Shopcheck: page objects and a checkout state machine for the Swag Labs
//! storefront.
//!
//! Tests drive the storefront through typed page objects. Every screen
//! transition is verified by URL pattern and title marker before the next
//! page object is handed out, so a test can never act on a screen it is not
//! actually on.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    SHOPCHECK Architecture                        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Scenario   │    │ Shopper /  │    │ Driver     │            │
//! │   │ catalogue  │───►│ page       │───►│ sim or     │            │
//! │   │ + Runner   │    │ objects    │    │ chromium   │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use shopcheck::prelude::*;
//!
//! # async fn demo() -> ShopResult<()> {
//! let session = Session::simulated(SessionConfig::default());
//! let fixtures = Fixtures::builtin();
//! let products = session
//!     .open()
//!     .await?
//!     .login_as(fixtures.standard_user()?)
//!     .await?;
//! products.add_to_cart("sauce-labs-backpack").await?;
//! products.assert_cart_badge(1).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

#[cfg(feature = "browser")]
mod chromium;
mod config;
mod driver;
mod fixture;
mod locator;
mod model;
mod money;
mod result;
mod screen;
mod session;

/// Page objects, one per storefront screen
pub mod page;
/// Scenario catalogue and runner
pub mod scenario;
/// In-memory storefront backend
pub mod sim;
/// Sort modes and order checks for the product list
pub mod sort;
/// Bounded polling
pub mod wait;
/// Navigation state machine and the `Shopper` orchestrator
pub mod workflow;

#[cfg(feature = "browser")]
pub use chromium::ChromiumDriver;
pub use config::{
    SessionConfig, DEFAULT_BASE_URL, ENV_BASE_URL, ENV_CHROMIUM_PATH, ENV_HEADLESS,
    ENV_TIMEOUT_MS,
};
pub use driver::{DeviceProfile, Driver, ElementHandle, SharedDriver};
pub use fixture::{
    CheckoutFixtures, Fixtures, InvalidCheckout, LoginOutcome, Product, UserRecord, DEMO_PASSWORD,
};
pub use locator::{resolve_item, ItemAction, Locator, LocatorCatalog, Selector};
pub use model::{CartLine, CheckoutForm, ErrorState, FormField};
pub use money::{OrderSummary, Price};
pub use result::{ShopError, ShopResult};
pub use screen::{join_url, relative_path, url_path, Screen, TitleMarker};
pub use session::Session;

/// Prelude for convenient imports
pub mod prelude {
    pub use super::page::{
        CartPage, CheckoutCompletePage, CheckoutInfoPage, CheckoutOverviewPage, LoginAttempt,
        LoginPage, PageContext, PageObject, ProductDetailPage, ProductsPage, Submission,
    };
    pub use super::scenario::{Backend, RunReport, Runner, Scenario, ScenarioId, Tag};
    pub use super::sim::SimulatedStorefront;
    pub use super::sort::SortMode;
    pub use super::wait::WaitOptions;
    pub use super::workflow::{FlowState, Shopper, Transition};
    pub use super::{
        CartLine, CheckoutForm, DeviceProfile, Driver, ErrorState, Fixtures, FormField,
        LoginOutcome, OrderSummary, Price, Product, Screen, Session, SessionConfig, ShopError,
        ShopResult, UserRecord,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_exports() {
        let _ = SessionConfig::default();
        let _ = Fixtures::builtin();
        assert_eq!(Screen::Login.to_string(), "Login");
    }
}
