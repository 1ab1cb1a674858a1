//! In-memory storefront backend.
//!
//! [`SimulatedStorefront`] implements [`Driver`] over a model of the demo
//! shop: screens and their locations, rendered elements, login rules, the
//! cart, sorting, checkout validation and the 8% tax. Every query renders the
//! current state afresh, so element handles behave like the live DOM and go
//! stale when the page changes.
//!
//! Fault hooks ([`SimulatedStorefront::freeze_navigation`],
//! [`SimulatedStorefront::override_title`]) make the screen-detection failure
//! paths reproducible.

use crate::config::DEFAULT_BASE_URL;
use crate::driver::{Driver, ElementHandle};
use crate::fixture::{Fixtures, Product, DEMO_PASSWORD};
use crate::model::CheckoutForm;
use crate::money::Price;
use crate::result::{ShopError, ShopResult};
use crate::screen::{join_url, relative_path, url_path, Screen};
use crate::sort::{sort_catalog, SortMode};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use url::Url;

/// Accounts the storefront accepts with [`DEMO_PASSWORD`]
pub const ACCEPTED_USERS: [&str; 5] = [
    "standard_user",
    "problem_user",
    "performance_glitch_user",
    "error_user",
    "visual_user",
];

/// Account that exists but is refused
pub const LOCKED_OUT_USER: &str = "locked_out_user";

/// Sales tax rate applied on the overview, in percent
pub const TAX_RATE_PERCENT: u64 = 8;

const COMPLETE_HEADER: &str = "Thank you for your order!";
const COMPLETE_TEXT: &str =
    "Your order has been dispatched, and will arrive just as fast as the pony can get there!";

#[derive(Debug, Clone, PartialEq, Eq)]
struct SimProduct {
    slug: String,
    display_name: String,
    price: Price,
}

/// What clicking an element does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    None,
    Input(&'static str),
    Sort,
    Login,
    DismissError,
    Menu,
    Logout,
    CartLink,
    AddToCart(usize),
    Remove(usize),
    OpenDetail(usize),
    BackToProducts,
    ContinueShopping,
    Checkout,
    ContinueInfo,
    CancelInfo,
    Finish,
    CancelOverview,
}

/// One rendered element
#[derive(Debug, Clone)]
struct Node {
    classes: Vec<&'static str>,
    id: Option<&'static str>,
    test_id: Option<String>,
    text: String,
    visible: bool,
    control: Control,
}

impl Node {
    fn new(text: impl Into<String>) -> Self {
        Self {
            classes: Vec::new(),
            id: None,
            test_id: None,
            text: text.into(),
            visible: true,
            control: Control::None,
        }
    }

    fn class(mut self, class: &'static str) -> Self {
        self.classes.push(class);
        self
    }

    fn id(mut self, id: &'static str) -> Self {
        self.id = Some(id);
        self
    }

    fn test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id = Some(id.into());
        self
    }

    fn control(mut self, control: Control) -> Self {
        self.control = control;
        self
    }

    fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    fn matches(&self, selector: &SimpleSelector<'_>) -> bool {
        match selector {
            SimpleSelector::Class(class) => self.classes.contains(class),
            SimpleSelector::Id(id) => self.id == Some(*id),
            SimpleSelector::TestId(id) => self.test_id.as_deref() == Some(*id),
            SimpleSelector::TestIdPrefix(prefix) => self
                .test_id
                .as_deref()
                .is_some_and(|t| t.starts_with(prefix)),
        }
    }
}

/// The selector forms the storefront's locator catalog uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SimpleSelector<'a> {
    Class(&'a str),
    Id(&'a str),
    TestId(&'a str),
    TestIdPrefix(&'a str),
}

fn parse_selector(css: &str) -> ShopResult<SimpleSelector<'_>> {
    let css = css.trim();
    let attr = |prefix: &str| {
        css.strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix("\"]"))
    };
    if let Some(prefix) = attr("[data-test^=\"") {
        Ok(SimpleSelector::TestIdPrefix(prefix))
    } else if let Some(id) = attr("[data-test=\"") {
        Ok(SimpleSelector::TestId(id))
    } else if let Some(class) = css.strip_prefix('.').filter(|c| is_ident(c)) {
        Ok(SimpleSelector::Class(class))
    } else if let Some(id) = css.strip_prefix('#').filter(|c| is_ident(c)) {
        Ok(SimpleSelector::Id(id))
    } else {
        Err(ShopError::driver(format!("unsupported selector: {css}")))
    }
}

fn is_ident(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[derive(Debug, Default, Clone)]
struct Faults {
    frozen: bool,
    titles: HashMap<Screen, String>,
}

#[derive(Debug)]
struct ShopState {
    screen: Option<Screen>,
    location: String,
    user: Option<String>,
    cart: Vec<usize>,
    sort: SortMode,
    inputs: HashMap<&'static str, String>,
    error: Option<String>,
    menu_open: bool,
    detail: Option<usize>,
    faults: Faults,
    history: Vec<String>,
}

impl ShopState {
    fn new() -> Self {
        Self {
            screen: None,
            location: "about:blank".to_string(),
            user: None,
            cart: Vec::new(),
            sort: SortMode::NameAsc,
            inputs: HashMap::new(),
            error: None,
            menu_open: false,
            detail: None,
            faults: Faults::default(),
            history: Vec::new(),
        }
    }

    fn input(&self, key: &str) -> String {
        self.inputs.get(key).cloned().unwrap_or_default()
    }
}

/// In-memory model of the demo shop
#[derive(Debug)]
pub struct SimulatedStorefront {
    base_url: String,
    products: Vec<SimProduct>,
    latency: Duration,
    state: Mutex<ShopState>,
}

impl Default for SimulatedStorefront {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedStorefront {
    /// Storefront with the built-in product catalog
    #[must_use]
    pub fn new() -> Self {
        let products = Fixtures::builtin()
            .products
            .iter()
            .filter_map(|p| sim_product(p).ok())
            .collect();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            products,
            latency: Duration::ZERO,
            state: Mutex::new(ShopState::new()),
        }
    }

    /// Storefront selling the given catalog
    pub fn with_products(products: &[Product]) -> ShopResult<Self> {
        let products = products.iter().map(sim_product).collect::<ShopResult<_>>()?;
        Ok(Self {
            products,
            ..Self::new()
        })
    }

    /// Serve locations under a different base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Delay every navigation and click
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Keep the location unchanged on every transition (fault hook)
    pub fn freeze_navigation(&self, frozen: bool) {
        self.lock().faults.frozen = frozen;
    }

    /// Render `text` as the title of `screen` (fault hook)
    pub fn override_title(&self, screen: Screen, text: impl Into<String>) {
        let _ = self.lock().faults.titles.insert(screen, text.into());
    }

    /// Remove all fault hooks
    pub fn clear_faults(&self) {
        self.lock().faults = Faults::default();
    }

    /// Screen currently rendered
    pub fn current_screen(&self) -> Option<Screen> {
        self.lock().screen
    }

    /// Slugs of the products in the cart, in the order they were added
    pub fn cart_slugs(&self) -> Vec<String> {
        let state = self.lock();
        state
            .cart
            .iter()
            .map(|&i| self.products[i].slug.clone())
            .collect()
    }

    /// Logged-in username
    pub fn logged_in_user(&self) -> Option<String> {
        self.lock().user.clone()
    }

    /// Driver calls received so far, e.g. `click [data-test="login-button"][0]`
    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    fn lock(&self) -> MutexGuard<'_, ShopState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn settle(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn location_of(&self, screen: Screen, detail: Option<usize>) -> String {
        let url = join_url(&self.base_url, screen.path());
        match (screen, detail) {
            (Screen::ProductDetail, Some(i)) => format!("{url}?id={i}"),
            _ => url,
        }
    }

    fn go(&self, state: &mut ShopState, screen: Screen) {
        if state.faults.frozen {
            tracing::debug!(screen = %screen, "navigation frozen");
            return;
        }
        state.location = self.location_of(screen, state.detail);
        state.screen = Some(screen);
        state.menu_open = false;
        state.error = None;
    }

    fn catalog_order(&self, sort: SortMode) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.products.len()).collect();
        sort_catalog(
            sort,
            &mut order,
            |&i| self.products[i].display_name.as_str(),
            |&i| self.products[i].price,
        );
        order
    }

    fn render(&self, state: &ShopState) -> Vec<Node> {
        let Some(screen) = state.screen else {
            return Vec::new();
        };
        let mut nodes = Vec::new();

        if screen != Screen::Login {
            nodes.push(
                Node::new("Open Menu")
                    .id("react-burger-menu-btn")
                    .control(Control::Menu),
            );
            nodes.push(
                Node::new("Logout")
                    .id("logout_sidebar_link")
                    .control(Control::Logout)
                    .visible(state.menu_open),
            );
            nodes.push(
                Node::new("")
                    .class("shopping_cart_link")
                    .control(Control::CartLink),
            );
            if !state.cart.is_empty() {
                nodes.push(Node::new(state.cart.len().to_string()).class("shopping_cart_badge"));
            }
            if let Some(title) = default_title(screen) {
                let text = state
                    .faults
                    .titles
                    .get(&screen)
                    .cloned()
                    .unwrap_or_else(|| title.to_string());
                nodes.push(Node::new(text).class("title"));
            }
        }

        match screen {
            Screen::Login => Self::render_login(state, &mut nodes),
            Screen::Products => self.render_products(state, &mut nodes),
            Screen::ProductDetail => self.render_detail(state, &mut nodes),
            Screen::Cart => {
                self.render_lines(state, &mut nodes, true);
                nodes.push(
                    Node::new("Continue Shopping")
                        .test_id("continue-shopping")
                        .control(Control::ContinueShopping),
                );
                nodes.push(
                    Node::new("Checkout")
                        .test_id("checkout")
                        .control(Control::Checkout),
                );
            }
            Screen::CheckoutInfo => {
                for key in ["firstName", "lastName", "postalCode"] {
                    nodes.push(
                        Node::new(state.input(key))
                            .test_id(key)
                            .control(Control::Input(key)),
                    );
                }
                if let Some(error) = &state.error {
                    nodes.push(Node::new(error.clone()).test_id("error"));
                }
                nodes.push(
                    Node::new("Cancel")
                        .test_id("cancel")
                        .control(Control::CancelInfo),
                );
                nodes.push(
                    Node::new("Continue")
                        .test_id("continue")
                        .control(Control::ContinueInfo),
                );
            }
            Screen::CheckoutOverview => self.render_overview(state, &mut nodes),
            Screen::CheckoutComplete => {
                nodes.push(Node::new(COMPLETE_HEADER).class("complete-header"));
                nodes.push(Node::new(COMPLETE_TEXT).class("complete-text"));
                nodes.push(
                    Node::new("Back Home")
                        .test_id("back-to-products")
                        .control(Control::BackToProducts),
                );
            }
        }
        nodes
    }

    fn render_login(state: &ShopState, nodes: &mut Vec<Node>) {
        for key in ["username", "password"] {
            nodes.push(
                Node::new(state.input(key))
                    .test_id(key)
                    .control(Control::Input(key)),
            );
        }
        if let Some(error) = &state.error {
            nodes.push(Node::new(error.clone()).test_id("error"));
            nodes.push(
                Node::new("")
                    .class("error-button")
                    .control(Control::DismissError),
            );
        }
        nodes.push(
            Node::new("Login")
                .test_id("login-button")
                .control(Control::Login),
        );
    }

    fn render_products(&self, state: &ShopState, nodes: &mut Vec<Node>) {
        nodes.push(
            Node::new(state.sort.option_value())
                .class("product_sort_container")
                .control(Control::Sort),
        );
        for i in self.catalog_order(state.sort) {
            let product = &self.products[i];
            let in_cart = state.cart.contains(&i);
            let (button_id, button_text, control) = if in_cart {
                (format!("remove-{}", product.slug), "Remove", Control::Remove(i))
            } else {
                (
                    format!("add-to-cart-{}", product.slug),
                    "Add to cart",
                    Control::AddToCart(i),
                )
            };
            nodes.push(
                Node::new(format!(
                    "{}\n{}\n{button_text}",
                    product.display_name, product.price
                ))
                .class("inventory_item"),
            );
            nodes.push(
                Node::new(product.display_name.clone())
                    .class("inventory_item_name")
                    .control(Control::OpenDetail(i)),
            );
            nodes.push(Node::new(product.price.to_string()).class("inventory_item_price"));
            nodes.push(Node::new(button_text).test_id(button_id).control(control));
        }
    }

    fn render_detail(&self, state: &ShopState, nodes: &mut Vec<Node>) {
        nodes.push(
            Node::new("Back to products")
                .test_id("back-to-products")
                .control(Control::BackToProducts),
        );
        let Some(i) = state.detail else {
            nodes.push(Node::new("ITEM NOT FOUND").class("inventory_details_name"));
            return;
        };
        let product = &self.products[i];
        nodes.push(Node::new(product.display_name.clone()).class("inventory_details_name"));
        nodes.push(Node::new(product.price.to_string()).class("inventory_details_price"));
        if state.cart.contains(&i) {
            nodes.push(
                Node::new("Remove")
                    .test_id("remove")
                    .control(Control::Remove(i)),
            );
        } else {
            nodes.push(
                Node::new("Add to cart")
                    .test_id("add-to-cart")
                    .control(Control::AddToCart(i)),
            );
        }
    }

    fn render_lines(&self, state: &ShopState, nodes: &mut Vec<Node>, removable: bool) {
        for &i in &state.cart {
            let product = &self.products[i];
            nodes.push(
                Node::new(format!(
                    "1\n{}\n{}",
                    product.display_name, product.price
                ))
                .class("cart_item"),
            );
            nodes.push(Node::new("1").class("cart_quantity"));
            nodes.push(Node::new(product.display_name.clone()).class("inventory_item_name"));
            nodes.push(Node::new(product.price.to_string()).class("inventory_item_price"));
            if removable {
                nodes.push(
                    Node::new("Remove")
                        .test_id(format!("remove-{}", product.slug))
                        .control(Control::Remove(i)),
                );
            }
        }
    }

    fn render_overview(&self, state: &ShopState, nodes: &mut Vec<Node>) {
        self.render_lines(state, nodes, false);
        let item_total = Price::checked_sum(state.cart.iter().map(|&i| self.products[i].price))
            .unwrap_or_default();
        let tax = item_total.percent(TAX_RATE_PERCENT).unwrap_or_default();
        let total = item_total.checked_add(tax).unwrap_or_default();
        for label in ["Payment Information:", "Shipping Information:", "Price Total"] {
            nodes.push(Node::new(label).class("summary_info_label"));
        }
        nodes.push(Node::new(format!("Item total: {item_total}")).class("summary_subtotal_label"));
        nodes.push(Node::new(format!("Tax: {tax}")).class("summary_tax_label"));
        nodes.push(Node::new(format!("Total: {total}")).class("summary_total_label"));
        nodes.push(
            Node::new("Cancel")
                .test_id("cancel")
                .control(Control::CancelOverview),
        );
        nodes.push(
            Node::new("Finish")
                .test_id("finish")
                .control(Control::Finish),
        );
    }

    fn resolve(&self, state: &ShopState, element: &ElementHandle) -> ShopResult<Node> {
        let selector = parse_selector(&element.selector)?;
        self.render(state)
            .into_iter()
            .filter(|n| n.matches(&selector))
            .nth(element.index)
            .ok_or_else(|| ShopError::driver(format!("stale element reference: {element}")))
    }

    fn attempt_login(&self, state: &mut ShopState) {
        let username = state.input("username");
        let password = state.input("password");
        let error = if username.is_empty() {
            Some("Epic sadface: Username is required".to_string())
        } else if password.is_empty() {
            Some("Epic sadface: Password is required".to_string())
        } else if password != DEMO_PASSWORD {
            Some(mismatch_message())
        } else if username == LOCKED_OUT_USER {
            Some("Epic sadface: Sorry, this user has been locked out.".to_string())
        } else if ACCEPTED_USERS.contains(&username.as_str()) {
            None
        } else {
            Some(mismatch_message())
        };

        match error {
            Some(message) => {
                tracing::debug!(%username, %message, "login refused");
                state.error = Some(message);
            }
            None => {
                tracing::debug!(%username, "login accepted");
                state.user = Some(username);
                state.inputs.clear();
                self.go(state, Screen::Products);
            }
        }
    }

    fn activate(&self, state: &mut ShopState, control: Control) {
        match control {
            Control::None | Control::Input(_) | Control::Sort => {}
            Control::Login => self.attempt_login(state),
            Control::DismissError => state.error = None,
            Control::Menu => state.menu_open = !state.menu_open,
            Control::Logout => {
                state.user = None;
                state.inputs.clear();
                self.go(state, Screen::Login);
            }
            Control::CartLink => self.go(state, Screen::Cart),
            Control::AddToCart(i) => {
                if !state.cart.contains(&i) {
                    state.cart.push(i);
                }
            }
            Control::Remove(i) => state.cart.retain(|&c| c != i),
            Control::OpenDetail(i) => {
                state.detail = Some(i);
                self.go(state, Screen::ProductDetail);
            }
            Control::BackToProducts | Control::ContinueShopping | Control::CancelOverview => {
                self.go(state, Screen::Products);
            }
            Control::Checkout => self.go(state, Screen::CheckoutInfo),
            Control::ContinueInfo => {
                let form = CheckoutForm::new(
                    state.input("firstName"),
                    state.input("lastName"),
                    state.input("postalCode"),
                );
                match form.expected_error() {
                    Some(message) => state.error = Some(message),
                    None => self.go(state, Screen::CheckoutOverview),
                }
            }
            Control::CancelInfo => self.go(state, Screen::Cart),
            Control::Finish => {
                state.cart.clear();
                self.go(state, Screen::CheckoutComplete);
            }
        }
    }
}

fn sim_product(product: &Product) -> ShopResult<SimProduct> {
    Ok(SimProduct {
        slug: product.name.clone(),
        display_name: product.display_name.clone(),
        price: product.unit_price()?,
    })
}

fn mismatch_message() -> String {
    "Epic sadface: Username and password do not match any user in this service".to_string()
}

const fn default_title(screen: Screen) -> Option<&'static str> {
    match screen {
        Screen::Login | Screen::ProductDetail => None,
        other => other.title_marker().text,
    }
}

fn detail_id(location: &str) -> Option<usize> {
    Url::parse(location)
        .ok()?
        .query_pairs()
        .find(|(key, _)| key == "id")
        .and_then(|(_, id)| id.parse().ok())
}

#[async_trait]
impl Driver for SimulatedStorefront {
    fn backend(&self) -> &'static str {
        "sim"
    }

    async fn navigate(&self, url: &str) -> ShopResult<()> {
        self.settle().await;
        let mut state = self.lock();
        state.history.push(format!("navigate {url}"));
        let screen = Screen::from_location(&self.base_url, url)
            .ok_or_else(|| ShopError::driver(format!("404: no page at {url}")))?;

        if screen != Screen::Login && state.user.is_none() {
            let path = relative_path(&self.base_url, url).unwrap_or_else(|| url_path(url));
            state.screen = Some(Screen::Login);
            state.location = self.location_of(Screen::Login, None);
            state.menu_open = false;
            state.error = Some(format!(
                "Epic sadface: You can only access '{path}' when you are logged in."
            ));
            return Ok(());
        }

        if screen == Screen::ProductDetail {
            state.detail = detail_id(url).filter(|&i| i < self.products.len());
        }
        state.screen = Some(screen);
        state.location = self.location_of(screen, state.detail);
        state.menu_open = false;
        state.error = None;
        Ok(())
    }

    async fn current_url(&self) -> ShopResult<String> {
        Ok(self.lock().location.clone())
    }

    async fn find_all(&self, selector: &str) -> ShopResult<Vec<ElementHandle>> {
        let parsed = parse_selector(selector)?;
        let state = self.lock();
        let count = self
            .render(&state)
            .iter()
            .filter(|n| n.matches(&parsed))
            .count();
        tracing::trace!(selector, count, "sim query");
        Ok(ElementHandle::all(selector, count))
    }

    async fn click(&self, element: &ElementHandle) -> ShopResult<()> {
        self.settle().await;
        let mut state = self.lock();
        state.history.push(format!("click {element}"));
        let node = self.resolve(&state, element)?;
        if !node.visible {
            return Err(ShopError::driver(format!(
                "element not interactable: {element}"
            )));
        }
        self.activate(&mut state, node.control);
        Ok(())
    }

    async fn type_text(&self, element: &ElementHandle, text: &str) -> ShopResult<()> {
        let mut state = self.lock();
        state.history.push(format!("type {element} {text:?}"));
        match self.resolve(&state, element)?.control {
            Control::Input(key) => {
                state.inputs.entry(key).or_default().push_str(text);
                Ok(())
            }
            _ => Err(ShopError::driver(format!("element is not editable: {element}"))),
        }
    }

    async fn clear(&self, element: &ElementHandle) -> ShopResult<()> {
        let mut state = self.lock();
        state.history.push(format!("clear {element}"));
        match self.resolve(&state, element)?.control {
            Control::Input(key) => {
                let _ = state.inputs.remove(key);
                Ok(())
            }
            _ => Err(ShopError::driver(format!("element is not editable: {element}"))),
        }
    }

    async fn text(&self, element: &ElementHandle) -> ShopResult<String> {
        let state = self.lock();
        Ok(self.resolve(&state, element)?.text)
    }

    async fn is_visible(&self, element: &ElementHandle) -> ShopResult<bool> {
        let state = self.lock();
        Ok(self.resolve(&state, element)?.visible)
    }

    async fn select_option(&self, element: &ElementHandle, value: &str) -> ShopResult<()> {
        let mut state = self.lock();
        state.history.push(format!("select {element} {value:?}"));
        if self.resolve(&state, element)?.control != Control::Sort {
            return Err(ShopError::driver(format!("element is not a select: {element}")));
        }
        state.sort = value
            .parse()
            .map_err(|_| ShopError::driver(format!("no option with value {value:?}")))?;
        Ok(())
    }

    async fn close(&self) -> ShopResult<()> {
        let mut state = self.lock();
        state.history.push("close".to_string());
        state.screen = None;
        state.location = "about:blank".to_string();
        Ok(())
    }
}
