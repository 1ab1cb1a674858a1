//! Screen identity and detection.
//!
//! The storefront is always on exactly one [`Screen`]. A screen is detected
//! only through two observable facts: the path of the current location and a
//! title marker element. No other hidden state is assumed.
//!
//! Paths are matched relative to the session's base URL, so a storefront
//! mounted under a path prefix (`http://host/demo/`) is detected the same way
//! as one served from the root.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use url::Url;

/// One navigable view of the storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Login form
    Login,
    /// Product catalog (inventory)
    Products,
    /// Single product detail view
    ProductDetail,
    /// Cart contents
    Cart,
    /// Checkout step one: customer information form
    CheckoutInfo,
    /// Checkout step two: order overview
    CheckoutOverview,
    /// Order confirmation
    CheckoutComplete,
}

/// How a screen's title marker is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleMarker {
    /// Semantic name of the marker locator in the screen's catalog
    pub locator: &'static str,
    /// Text the marker must contain; `None` means visibility is enough
    pub text: Option<&'static str>,
}

impl Screen {
    /// All screens
    pub const ALL: [Self; 7] = [
        Self::Login,
        Self::Products,
        Self::ProductDetail,
        Self::Cart,
        Self::CheckoutInfo,
        Self::CheckoutOverview,
        Self::CheckoutComplete,
    ];

    /// Path (relative to the base URL) this screen lives at
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Products => "/inventory.html",
            Self::ProductDetail => "/inventory-item.html",
            Self::Cart => "/cart.html",
            Self::CheckoutInfo => "/checkout-step-one.html",
            Self::CheckoutOverview => "/checkout-step-two.html",
            Self::CheckoutComplete => "/checkout-complete.html",
        }
    }

    /// Regex source the location path must match
    #[must_use]
    pub const fn path_pattern(self) -> &'static str {
        match self {
            Self::Login => r"^/(index\.html)?$",
            Self::Products => r"^/inventory\.html$",
            Self::ProductDetail => r"^/inventory-item\.html$",
            Self::Cart => r"^/cart\.html$",
            Self::CheckoutInfo => r"^/checkout-step-one\.html$",
            Self::CheckoutOverview => r"^/checkout-step-two\.html$",
            Self::CheckoutComplete => r"^/checkout-complete\.html$",
        }
    }

    /// Title marker that confirms the screen's content
    #[must_use]
    pub const fn title_marker(self) -> TitleMarker {
        match self {
            Self::Login => TitleMarker {
                locator: "login_button",
                text: None,
            },
            Self::Products => TitleMarker {
                locator: "title",
                text: Some("Products"),
            },
            Self::ProductDetail => TitleMarker {
                locator: "back_to_products",
                text: None,
            },
            Self::Cart => TitleMarker {
                locator: "title",
                text: Some("Your Cart"),
            },
            Self::CheckoutInfo => TitleMarker {
                locator: "title",
                text: Some("Checkout: Your Information"),
            },
            Self::CheckoutOverview => TitleMarker {
                locator: "title",
                text: Some("Checkout: Overview"),
            },
            Self::CheckoutComplete => TitleMarker {
                locator: "title",
                text: Some("Checkout: Complete!"),
            },
        }
    }

    /// Check whether a location belongs to this screen of the storefront
    /// served at `base_url`
    #[must_use]
    pub fn matches_location(self, base_url: &str, location: &str) -> bool {
        match (compiled_pattern(self), relative_path(base_url, location)) {
            (Some(re), Some(path)) => re.is_match(&path),
            _ => false,
        }
    }

    /// Identify the screen a location belongs to, if any
    #[must_use]
    pub fn from_location(base_url: &str, location: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.matches_location(base_url, location))
    }

    /// Snake-case name used in logs and reports
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Products => "products",
            Self::ProductDetail => "product_detail",
            Self::Cart => "cart",
            Self::CheckoutInfo => "checkout_info",
            Self::CheckoutOverview => "checkout_overview",
            Self::CheckoutComplete => "checkout_complete",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Login => "Login",
            Self::Products => "Products",
            Self::ProductDetail => "ProductDetail",
            Self::Cart => "Cart",
            Self::CheckoutInfo => "CheckoutInfo",
            Self::CheckoutOverview => "CheckoutOverview",
            Self::CheckoutComplete => "CheckoutComplete",
        };
        f.write_str(name)
    }
}

fn compiled_pattern(screen: Screen) -> Option<&'static Regex> {
    static PATTERNS: [OnceLock<Option<Regex>>; Screen::ALL.len()] = [
        OnceLock::new(),
        OnceLock::new(),
        OnceLock::new(),
        OnceLock::new(),
        OnceLock::new(),
        OnceLock::new(),
        OnceLock::new(),
    ];
    PATTERNS[screen as usize]
        .get_or_init(|| Regex::new(screen.path_pattern()).ok())
        .as_ref()
}

/// Extract the path component of a location.
///
/// Absolute URLs are parsed; query string and fragment are dropped and a URL
/// with no path yields `/`. Inputs that are not absolute URLs (`/cart.html`)
/// are treated as a bare path.
#[must_use]
pub fn url_path(location: &str) -> String {
    if let Ok(url) = Url::parse(location) {
        return url.path().to_string();
    }
    let end = location
        .find(|c| c == '?' || c == '#')
        .unwrap_or(location.len());
    let path = &location[..end];
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Path of `location` relative to the storefront mounted at `base_url`.
///
/// The base URL's own path is stripped as a prefix. `None` when the location
/// lies outside that prefix.
#[must_use]
pub fn relative_path(base_url: &str, location: &str) -> Option<String> {
    let path = url_path(location);
    let base = url_path(base_url);
    let prefix = base.trim_end_matches('/');
    if prefix.is_empty() {
        return Some(path);
    }
    path.strip_prefix(prefix)
        .filter(|rest| rest.is_empty() || rest.starts_with('/'))
        .map(|rest| if rest.is_empty() { "/" } else { rest }.to_string())
}

/// Resolve a storefront path (`/cart.html`) under `base`, keeping any path
/// prefix the base URL carries
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    let relative = path.trim_start_matches('/');
    let Ok(mut url) = Url::parse(base) else {
        return format!("{}/{relative}", base.trim_end_matches('/'));
    };
    if !url.path().ends_with('/') {
        let dir = format!("{}/", url.path());
        url.set_path(&dir);
    }
    match url.join(relative) {
        Ok(joined) => joined.to_string(),
        Err(_) => format!("{}/{relative}", base.trim_end_matches('/')),
    }
}
