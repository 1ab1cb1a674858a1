//! Scenario catalogue and runner.
//!
//! Each scenario is a complete check of one storefront behavior, written
//! against page objects only, so it runs unchanged on any [`Backend`]. The
//! [`Runner`] gives every scenario a fresh session and collects outcomes into
//! a [`RunReport`]; a failing scenario never stops the run.

use crate::config::SessionConfig;
use crate::fixture::Fixtures;
use crate::page::{LoginAttempt, PageObject, ProductsPage, Submission};
use crate::result::{ShopError, ShopResult};
use crate::screen::Screen;
use crate::session::Session;
use crate::sort::SortMode;
use crate::workflow::Shopper;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::Instrument;

// =============================================================================
// CATALOGUE
// =============================================================================

/// Area of the storefront a scenario covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suite {
    /// Login form
    Login,
    /// Catalog and detail view
    Products,
    /// Cart
    Cart,
    /// Checkout steps
    Checkout,
    /// Whole purchase
    E2e,
}

/// Selection label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    /// Quick confidence check
    Smoke,
    /// Expects a refusal or validation error
    Negative,
    /// Runs with the mobile profile
    Mobile,
    /// Walks the whole purchase
    E2e,
}

impl Tag {
    /// All tags
    pub const ALL: [Self; 4] = [Self::Smoke, Self::Negative, Self::Mobile, Self::E2e];

    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Smoke => "smoke",
            Self::Negative => "negative",
            Self::Mobile => "mobile",
            Self::E2e => "e2e",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ShopError::parse("tag", s))
    }
}

/// Scenario identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioId {
    /// Every valid user reaches the catalog
    LoginValidUsers,
    /// Every invalid user sees its exact error
    LoginInvalidUsers,
    /// The login error can be dismissed
    LoginErrorDismissal,
    /// Catalog lists the fixture products at their prices
    ProductsCatalog,
    /// Every sort mode orders the catalog
    ProductsSorting,
    /// Detail view shows the product and can add it
    ProductsDetail,
    /// Badge tracks adds and removes
    CartBadge,
    /// Cart lists what was added and removes lines
    CartContents,
    /// Two-item checkout with consistent totals
    CheckoutHappyPath,
    /// Each missing field is reported
    CheckoutValidation,
    /// Cancel from both checkout steps
    CheckoutCancel,
    /// Checkout with an empty cart is allowed
    CheckoutEmptyCart,
    /// Logging out returns to the login form
    Logout,
    /// Full purchase through the workflow orchestrator
    EndToEndPurchase,
    /// Full purchase on the mobile profile
    EndToEndMobile,
}

/// Catalogue entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scenario {
    /// Identity
    pub id: ScenarioId,
    /// Unique name used for selection
    pub name: &'static str,
    /// Suite
    pub suite: Suite,
    /// Tags
    pub tags: &'static [Tag],
    /// One-line description
    pub description: &'static str,
}

impl Scenario {
    const fn new(
        id: ScenarioId,
        name: &'static str,
        suite: Suite,
        tags: &'static [Tag],
        description: &'static str,
    ) -> Self {
        Self {
            id,
            name,
            suite,
            tags,
            description,
        }
    }

    /// Whether the scenario carries `tag`
    #[must_use]
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Every scenario, in run order
#[must_use]
pub fn catalogue() -> Vec<Scenario> {
    use ScenarioId as Id;
    use Tag::{E2e, Mobile, Negative, Smoke};
    vec![
        Scenario::new(Id::LoginValidUsers, "login_valid_users", Suite::Login, &[Smoke], "valid users land on the catalog"),
        Scenario::new(Id::LoginInvalidUsers, "login_invalid_users", Suite::Login, &[Negative], "invalid users see the expected error"),
        Scenario::new(Id::LoginErrorDismissal, "login_error_dismissal", Suite::Login, &[Negative], "login error banner can be dismissed"),
        Scenario::new(Id::ProductsCatalog, "products_catalog", Suite::Products, &[Smoke], "catalog lists every product at its price"),
        Scenario::new(Id::ProductsSorting, "products_sorting", Suite::Products, &[], "every sort mode orders the catalog"),
        Scenario::new(Id::ProductsDetail, "products_detail", Suite::Products, &[], "detail view shows and adds the product"),
        Scenario::new(Id::CartBadge, "cart_badge", Suite::Cart, &[Smoke], "badge counts distinct products"),
        Scenario::new(Id::CartContents, "cart_contents", Suite::Cart, &[], "cart lists added products and removes lines"),
        Scenario::new(Id::CheckoutHappyPath, "checkout_happy_path", Suite::Checkout, &[Smoke], "two-item checkout with consistent totals"),
        Scenario::new(Id::CheckoutValidation, "checkout_validation", Suite::Checkout, &[Negative], "missing fields are reported in order"),
        Scenario::new(Id::CheckoutCancel, "checkout_cancel", Suite::Checkout, &[], "cancel from both checkout steps"),
        Scenario::new(Id::CheckoutEmptyCart, "checkout_empty_cart", Suite::Checkout, &[], "checkout is allowed with an empty cart"),
        Scenario::new(Id::Logout, "logout", Suite::Login, &[], "logout returns to the login form"),
        Scenario::new(Id::EndToEndPurchase, "e2e_purchase", Suite::E2e, &[Smoke, E2e], "login to confirmation and back"),
        Scenario::new(Id::EndToEndMobile, "e2e_mobile", Suite::E2e, &[Mobile, E2e], "full purchase on a 375x667 viewport"),
    ]
}

/// Pick scenarios by name and tag.
///
/// Empty `names` and `tags` select everything. A scenario must match one of
/// the names (when given) and carry every tag (when given).
pub fn select(names: &[String], tags: &[Tag]) -> ShopResult<Vec<Scenario>> {
    let all = catalogue();
    if let Some(unknown) = names
        .iter()
        .find(|n| !all.iter().any(|s| s.name == n.as_str()))
    {
        return Err(ShopError::parse("scenario", unknown.as_str()));
    }
    Ok(all
        .into_iter()
        .filter(|s| names.is_empty() || names.iter().any(|n| n == s.name))
        .filter(|s| tags.iter().all(|t| s.has_tag(*t)))
        .collect())
}

// =============================================================================
// BACKENDS
// =============================================================================

/// Automation engine a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// In-memory storefront
    #[default]
    Sim,
    /// Chromium over CDP (requires the `browser` feature)
    Chromium,
}

impl Backend {
    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sim => "sim",
            Self::Chromium => "chromium",
        }
    }

    /// Start a session on this backend
    pub async fn session(self, config: SessionConfig) -> ShopResult<Session> {
        match self {
            Self::Sim => Ok(Session::simulated(config)),
            #[cfg(feature = "browser")]
            Self::Chromium => Session::chromium(config).await,
            #[cfg(not(feature = "browser"))]
            Self::Chromium => Err(ShopError::BrowserLaunch {
                message: "built without the `browser` feature".to_string(),
            }),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// REPORT
// =============================================================================

/// Outcome of one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Scenario name
    pub name: String,
    /// Suite
    pub suite: Suite,
    /// Backend it ran on
    pub backend: Backend,
    /// Device profile name
    pub device: String,
    /// Session id
    pub session_id: String,
    /// Whether it passed
    pub passed: bool,
    /// Failure message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall time in milliseconds
    pub duration_ms: u64,
}

/// Outcomes of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Per-scenario outcomes, in run order
    pub results: Vec<ScenarioResult>,
    /// Wall time of the whole run in milliseconds
    pub duration_ms: u64,
}

impl RunReport {
    /// Number of passed scenarios
    #[must_use]
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Number of failed scenarios
    #[must_use]
    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    /// Whether every scenario passed
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Failed outcomes
    pub fn failures(&self) -> impl Iterator<Item = &ScenarioResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    /// Pretty JSON
    pub fn to_json(&self) -> ShopResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// =============================================================================
// RUNNER
// =============================================================================

/// Runs scenarios, one fresh session each
#[derive(Debug, Clone)]
pub struct Runner {
    backend: Backend,
    config: SessionConfig,
    fixtures: Arc<Fixtures>,
}

impl Runner {
    /// Create a runner
    #[must_use]
    pub fn new(backend: Backend, config: SessionConfig, fixtures: Fixtures) -> Self {
        Self {
            backend,
            config,
            fixtures: Arc::new(fixtures),
        }
    }

    /// Fixtures in use
    #[must_use]
    pub fn fixtures(&self) -> &Fixtures {
        &self.fixtures
    }

    /// Run scenarios in order
    pub async fn run(&self, scenarios: &[Scenario]) -> RunReport {
        let start = Instant::now();
        let mut report = RunReport::default();
        for scenario in scenarios {
            report.results.push(self.run_one(scenario).await);
        }
        report.duration_ms = elapsed_ms(start);
        tracing::info!(
            passed = report.passed(),
            failed = report.failed(),
            duration_ms = report.duration_ms,
            "run finished"
        );
        report
    }

    /// Run one scenario in a fresh session
    pub async fn run_one(&self, scenario: &Scenario) -> ScenarioResult {
        let start = Instant::now();
        let mut config = self.config.clone();
        if scenario.has_tag(Tag::Mobile) {
            config = config.mobile();
        }
        let device = config.device.name.to_string();

        let (session_id, outcome) = match self.backend.session(config).await {
            Ok(session) => {
                let id = session.id().to_string();
                let span = session.span().clone();
                let outcome = execute(scenario.id, &session, &self.fixtures)
                    .instrument(span)
                    .await;
                if let Err(e) = session.close().await {
                    tracing::warn!(error = %e, "session close failed");
                }
                (id, outcome)
            }
            Err(e) => (String::new(), Err(e)),
        };

        match &outcome {
            Ok(()) => tracing::info!(scenario = scenario.name, "scenario passed"),
            Err(e) => tracing::warn!(scenario = scenario.name, error = %e, "scenario failed"),
        }
        ScenarioResult {
            name: scenario.name.to_string(),
            suite: scenario.suite,
            backend: self.backend,
            device,
            session_id,
            passed: outcome.is_ok(),
            error: outcome.err().map(|e| e.to_string()),
            duration_ms: elapsed_ms(start),
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

// =============================================================================
// SCENARIO BODIES
// =============================================================================

/// Run a scenario body against an open session
pub async fn execute(id: ScenarioId, session: &Session, fixtures: &Fixtures) -> ShopResult<()> {
    match id {
        ScenarioId::LoginValidUsers => login_valid_users(session, fixtures).await,
        ScenarioId::LoginInvalidUsers => login_invalid_users(session, fixtures).await,
        ScenarioId::LoginErrorDismissal => login_error_dismissal(session).await,
        ScenarioId::ProductsCatalog => products_catalog(session, fixtures).await,
        ScenarioId::ProductsSorting => products_sorting(session, fixtures).await,
        ScenarioId::ProductsDetail => products_detail(session, fixtures).await,
        ScenarioId::CartBadge => cart_badge(session, fixtures).await,
        ScenarioId::CartContents => cart_contents(session, fixtures).await,
        ScenarioId::CheckoutHappyPath => checkout_happy_path(session, fixtures).await,
        ScenarioId::CheckoutValidation => checkout_validation(session, fixtures).await,
        ScenarioId::CheckoutCancel => checkout_cancel(session, fixtures).await,
        ScenarioId::CheckoutEmptyCart => checkout_empty_cart(session, fixtures).await,
        ScenarioId::Logout => logout(session, fixtures).await,
        ScenarioId::EndToEndPurchase | ScenarioId::EndToEndMobile => {
            end_to_end(session, fixtures).await
        }
    }
}

async fn logged_in(session: &Session, fixtures: &Fixtures) -> ShopResult<ProductsPage> {
    session.open().await?.login_as(fixtures.standard_user()?).await
}

fn slugs(fixtures: &Fixtures, count: usize) -> Vec<&str> {
    fixtures
        .products
        .iter()
        .take(count)
        .map(|p| p.name.as_str())
        .collect()
}

async fn login_valid_users(session: &Session, fixtures: &Fixtures) -> ShopResult<()> {
    for user in fixtures.valid_users.values() {
        let products = session.open().await?.login_as(user).await?;
        products.assert_product_count(fixtures.products.len()).await?;
    }
    Ok(())
}

async fn login_invalid_users(session: &Session, fixtures: &Fixtures) -> ShopResult<()> {
    for user in fixtures.invalid_users.values() {
        let login = session.open().await?;
        let expected = user.expected_error.as_deref().unwrap_or_default();
        match login.attempt(user).await? {
            LoginAttempt::LoggedIn(_) => {
                return Err(ShopError::assertion(
                    Screen::Login,
                    format!("login of {:?}", user.username),
                    expected,
                    "accepted",
                ));
            }
            LoginAttempt::Refused(_) => {
                login
                    .assert_error_message(expected)
                    .await?
                    .assert_on_screen()
                    .await?;
            }
        }
    }
    Ok(())
}

async fn login_error_dismissal(session: &Session) -> ShopResult<()> {
    let login = session.open().await?;
    login
        .login("", "")
        .await?
        .assert_error_message("Username is required")
        .await?
        .clear_error()
        .await?
        .assert_no_error()
        .await?;
    Ok(())
}

async fn products_catalog(session: &Session, fixtures: &Fixtures) -> ShopResult<()> {
    let products = logged_in(session, fixtures).await?;
    products
        .assert_product_count(fixtures.products.len())
        .await?
        .assert_cart_badge(0)
        .await?;
    for product in &fixtures.products {
        products.assert_has_product(&product.display_name).await?;
        let listed = products.product_price(&product.display_name).await?;
        let expected = product.unit_price()?;
        if listed != expected {
            return Err(ShopError::assertion(
                Screen::Products,
                format!("price of {}", product.display_name),
                expected,
                listed,
            ));
        }
    }
    Ok(())
}

async fn products_sorting(session: &Session, fixtures: &Fixtures) -> ShopResult<()> {
    let products = logged_in(session, fixtures).await?;
    products.assert_sorted(SortMode::NameAsc).await?;
    for mode in SortMode::ALL {
        products.sort_by(mode).await?.assert_sorted(mode).await?;
        products.sort_by(mode).await?.assert_sorted(mode).await?;
    }

    products.sort_by(SortMode::NameAsc).await?;
    let mut az = products.product_names().await?;
    products.sort_by(SortMode::NameDesc).await?;
    let za = products.product_names().await?;
    az.reverse();
    if az != za {
        return Err(ShopError::assertion(
            Screen::Products,
            "za is the reverse of az",
            format!("{az:?}"),
            format!("{za:?}"),
        ));
    }
    Ok(())
}

async fn products_detail(session: &Session, fixtures: &Fixtures) -> ShopResult<()> {
    let product = fixtures.product(0)?;
    let products = logged_in(session, fixtures).await?;
    let detail = products.open_product(&product.display_name).await?;
    detail.assert_product(&product.display_name).await?;
    let price = detail.price().await?;
    if price != product.unit_price()? {
        return Err(ShopError::assertion(
            Screen::ProductDetail,
            "detail price",
            &product.price,
            price,
        ));
    }
    detail.add_to_cart().await?.assert_cart_badge(1).await?;
    detail
        .back_to_products()
        .await?
        .assert_cart_badge(1)
        .await?;
    Ok(())
}

async fn cart_badge(session: &Session, fixtures: &Fixtures) -> ShopResult<()> {
    let products = logged_in(session, fixtures).await?;
    let chosen = slugs(fixtures, 3);
    for (i, slug) in chosen.iter().enumerate() {
        products.add_to_cart(slug).await?.assert_cart_badge(i + 1).await?;
    }
    for (i, slug) in chosen.iter().enumerate() {
        products
            .remove_from_cart(slug)
            .await?
            .assert_cart_badge(chosen.len() - i - 1)
            .await?;
    }
    Ok(())
}

async fn cart_contents(session: &Session, fixtures: &Fixtures) -> ShopResult<()> {
    let first = fixtures.product(0)?;
    let second = fixtures.product(1)?;
    let products = logged_in(session, fixtures).await?;
    products
        .add_to_cart(&first.name)
        .await?
        .add_to_cart(&second.name)
        .await?;

    let cart = products.open_cart().await?;
    cart.assert_item_count(2)
        .await?
        .assert_contains_item(&first.display_name)
        .await?
        .assert_contains_item(&second.display_name)
        .await?;
    for product in [first, second] {
        let price = cart.item_price(&product.display_name).await?;
        if price != product.unit_price()? {
            return Err(ShopError::assertion(
                Screen::Cart,
                format!("price of {}", product.display_name),
                &product.price,
                price,
            ));
        }
        let quantity = cart.item_quantity(&product.display_name).await?;
        if quantity != 1 {
            return Err(ShopError::assertion(Screen::Cart, "quantity", 1, quantity));
        }
    }

    cart.remove_item(&first.name)
        .await?
        .assert_item_count(1)
        .await?
        .assert_not_contains_item(&first.display_name)
        .await?;
    cart.continue_shopping()
        .await?
        .assert_cart_badge(1)
        .await?;
    Ok(())
}

async fn checkout_happy_path(session: &Session, fixtures: &Fixtures) -> ShopResult<()> {
    let products = logged_in(session, fixtures).await?;
    for slug in slugs(fixtures, 2) {
        products.add_to_cart(slug).await?;
    }
    let overview = products
        .open_cart()
        .await?
        .proceed_to_checkout()
        .await?
        .continue_to_overview(&fixtures.checkout_info.valid)
        .await?;
    overview
        .assert_item_count(2)
        .await?
        .assert_summary_visible()
        .await?
        .assert_item_total_matches_lines()
        .await?
        .assert_total_consistent()
        .await?;
    overview.finish().await?.assert_order_complete().await?;
    Ok(())
}

async fn checkout_validation(session: &Session, fixtures: &Fixtures) -> ShopResult<()> {
    let products = logged_in(session, fixtures).await?;
    products.add_to_cart(&fixtures.product(0)?.name).await?;
    let info = products.open_cart().await?.proceed_to_checkout().await?;
    for case in fixtures.checkout_info.invalid.values() {
        match info.submit(&case.form).await? {
            Submission::Advanced(_) => {
                return Err(ShopError::assertion(
                    Screen::CheckoutInfo,
                    "checkout form",
                    &case.expected_error,
                    "accepted",
                ));
            }
            Submission::Rejected(_) => {
                info.assert_error_message(&case.expected_error)
                    .await?
                    .assert_on_screen()
                    .await?;
            }
        }
    }
    Ok(())
}

async fn checkout_cancel(session: &Session, fixtures: &Fixtures) -> ShopResult<()> {
    let products = logged_in(session, fixtures).await?;
    products.add_to_cart(&fixtures.product(0)?.name).await?;
    let cart = products
        .open_cart()
        .await?
        .proceed_to_checkout()
        .await?
        .cancel()
        .await?;
    cart.assert_item_count(1).await?;

    let products = cart
        .proceed_to_checkout()
        .await?
        .continue_to_overview(&fixtures.checkout_info.valid)
        .await?
        .cancel()
        .await?;
    products.assert_cart_badge(1).await?;
    Ok(())
}

async fn checkout_empty_cart(session: &Session, fixtures: &Fixtures) -> ShopResult<()> {
    let cart = logged_in(session, fixtures).await?.open_cart().await?;
    cart.assert_item_count(0).await?;
    let overview = cart
        .proceed_to_checkout()
        .await?
        .continue_to_overview(&fixtures.checkout_info.valid)
        .await?;
    overview
        .assert_item_count(0)
        .await?
        .assert_total_consistent()
        .await?;
    let summary = overview.summary().await?;
    if summary.total.cents() != 0 {
        return Err(ShopError::assertion(
            Screen::CheckoutOverview,
            "empty cart total",
            "$0.00",
            summary.total,
        ));
    }
    Ok(())
}

async fn logout(session: &Session, fixtures: &Fixtures) -> ShopResult<()> {
    let login = logged_in(session, fixtures).await?.logout().await?;
    login.assert_no_error().await?;
    let url = session.config().url(Screen::Products.path());
    session.driver().navigate(&url).await?;
    login
        .assert_on_screen()
        .await?
        .assert_error_message("when you are logged in")
        .await?;
    Ok(())
}

async fn end_to_end(session: &Session, fixtures: &Fixtures) -> ShopResult<()> {
    let product = fixtures.product(0)?;
    let mut shopper = Shopper::start(session.clone()).await?;
    let summary = shopper
        .purchase(
            fixtures.standard_user()?,
            &[product.name.as_str()],
            &fixtures.checkout_info.valid,
        )
        .await?;
    if summary.item_total != product.unit_price()? {
        return Err(ShopError::assertion(
            Screen::CheckoutOverview,
            "item total",
            &product.price,
            summary.item_total,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    mod catalogue_tests {
        use super::*;
        use std::collections::HashSet;

        #[test]
        fn test_names_are_unique() {
            let all = catalogue();
            let names: HashSet<_> = all.iter().map(|s| s.name).collect();
            assert_eq!(names.len(), all.len());
        }

        #[test]
        fn test_select_by_tag() {
            let smoke = select(&[], &[Tag::Smoke]).unwrap();
            assert!(!smoke.is_empty());
            assert!(smoke.iter().all(|s| s.has_tag(Tag::Smoke)));
            let mobile = select(&[], &[Tag::Mobile]).unwrap();
            assert_eq!(mobile.len(), 1);
            assert_eq!(mobile[0].id, ScenarioId::EndToEndMobile);
        }

        #[test]
        fn test_select_by_name() {
            let picked = select(&["cart_badge".to_string()], &[]).unwrap();
            assert_eq!(picked.len(), 1);
            assert!(matches!(
                select(&["nope".to_string()], &[]),
                Err(ShopError::Parse { .. })
            ));
        }

        #[test]
        fn test_tag_parse() {
            assert_eq!("negative".parse::<Tag>().unwrap(), Tag::Negative);
            assert!("slow".parse::<Tag>().is_err());
        }
    }

    mod report_tests {
        use super::*;

        fn result(name: &str, passed: bool) -> ScenarioResult {
            ScenarioResult {
                name: name.to_string(),
                suite: Suite::Cart,
                backend: Backend::Sim,
                device: "Desktop".to_string(),
                session_id: String::new(),
                passed,
                error: (!passed).then(|| "boom".to_string()),
                duration_ms: 1,
            }
        }

        #[test]
        fn test_counts() {
            let report = RunReport {
                results: vec![result("a", true), result("b", false)],
                duration_ms: 2,
            };
            assert_eq!(report.passed(), 1);
            assert_eq!(report.failed(), 1);
            assert!(!report.is_success());
            assert_eq!(report.failures().count(), 1);
        }

        #[test]
        fn test_json_omits_absent_error() {
            let report = RunReport {
                results: vec![result("a", true)],
                duration_ms: 1,
            };
            let json = report.to_json().unwrap();
            assert!(!json.contains("\"error\""));
            assert!(json.contains("\"backend\": \"sim\""));
        }
    }

    mod runner_tests {
        use super::*;

        fn runner() -> Runner {
            Runner::new(
                Backend::Sim,
                SessionConfig::default().with_screen_timeout(500),
                Fixtures::builtin(),
            )
        }

        #[tokio::test]
        async fn test_whole_catalogue_passes_on_sim() {
            let report = runner().run(&catalogue()).await;
            let failures: Vec<_> = report
                .failures()
                .map(|r| format!("{}: {:?}", r.name, r.error))
                .collect();
            assert!(failures.is_empty(), "{failures:?}");
            assert_eq!(report.results.len(), catalogue().len());
        }

        #[tokio::test]
        async fn test_mobile_tag_switches_profile() {
            let scenario = select(&[], &[Tag::Mobile]).unwrap()[0];
            let result = runner().run_one(&scenario).await;
            assert!(result.passed, "{:?}", result.error);
            assert_eq!(result.device, "Mobile");
        }

        #[cfg(not(feature = "browser"))]
        #[tokio::test]
        async fn test_chromium_without_feature_fails_per_scenario() {
            let runner = Runner::new(Backend::Chromium, SessionConfig::default(), Fixtures::builtin());
            let report = runner.run(&select(&["logout".to_string()], &[]).unwrap()).await;
            assert_eq!(report.failed(), 1);
            assert!(report.results[0]
                .error
                .as_deref()
                .unwrap_or_default()
                .contains("browser"));
        }
    }
}
