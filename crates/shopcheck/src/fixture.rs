//! Fixture data: users, products and checkout field sets.
//!
//! Fixtures are read-only inputs to page objects and scenarios. They can be
//! loaded from JSON or YAML, or taken from the built-in set that mirrors the
//! public demo shop. Keys accept both `snake_case` and the `camelCase` used by
//! the JavaScript suites this data format comes from.

use crate::model::CheckoutForm;
use crate::money::Price;
use crate::result::{ShopError, ShopResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Password shared by every demo account
pub const DEMO_PASSWORD: &str = "secret_sauce";

/// Login credentials plus the error the storefront is expected to show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Username (may be empty)
    #[serde(default)]
    pub username: String,
    /// Password (may be empty)
    #[serde(default)]
    pub password: String,
    /// Expected login error; `None` means the login succeeds
    #[serde(default, alias = "expectedError", skip_serializing_if = "Option::is_none")]
    pub expected_error: Option<String>,
}

/// Classified login result a user record predicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginOutcome {
    /// Credentials accepted
    Success,
    /// Account locked
    LockedOut,
    /// Unknown user or wrong password
    InvalidCredentials,
    /// Username or password left empty
    MissingField,
}

impl UserRecord {
    /// Create a user expected to log in
    #[must_use]
    pub fn valid(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            expected_error: None,
        }
    }

    /// Create a user expected to be rejected with `error`
    #[must_use]
    pub fn rejected(
        username: impl Into<String>,
        password: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            expected_error: Some(error.into()),
        }
    }

    /// Classify the outcome this record predicts
    #[must_use]
    pub fn outcome(&self) -> LoginOutcome {
        match self.expected_error.as_deref() {
            None => LoginOutcome::Success,
            Some(msg) if msg.contains("locked out") => LoginOutcome::LockedOut,
            Some(msg) if msg.contains("is required") => LoginOutcome::MissingField,
            Some(_) => LoginOutcome::InvalidCredentials,
        }
    }
}

/// A catalog product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Slug used in `data-test` ids, e.g. `sauce-labs-backpack`
    pub name: String,
    /// Name as displayed, e.g. `Sauce Labs Backpack`
    #[serde(alias = "displayName")]
    pub display_name: String,
    /// Displayed price, e.g. `$29.99`
    pub price: String,
}

impl Product {
    /// Create a product
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            price: price.into(),
        }
    }

    /// Parsed price
    pub fn unit_price(&self) -> ShopResult<Price> {
        Price::parse(&self.price)
    }
}

/// Checkout form submission expected to be rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidCheckout {
    /// Submitted form
    #[serde(flatten)]
    pub form: CheckoutForm,
    /// Expected validation message
    #[serde(alias = "expectedError")]
    pub expected_error: String,
}

/// Checkout field sets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutFixtures {
    /// A form the storefront accepts
    pub valid: CheckoutForm,
    /// Forms the storefront rejects, keyed by case name
    #[serde(default)]
    pub invalid: BTreeMap<String, InvalidCheckout>,
}

/// Complete fixture set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixtures {
    /// Accounts expected to log in, keyed by case name
    #[serde(alias = "validUsers")]
    pub valid_users: BTreeMap<String, UserRecord>,
    /// Accounts expected to be rejected, keyed by case name
    #[serde(alias = "invalidUsers", default)]
    pub invalid_users: BTreeMap<String, UserRecord>,
    /// Product catalog
    pub products: Vec<Product>,
    /// Checkout field sets
    #[serde(alias = "checkoutInfo")]
    pub checkout_info: CheckoutFixtures,
}

impl Fixtures {
    /// Built-in fixtures matching the public demo shop
    #[must_use]
    pub fn builtin() -> Self {
        let valid_users = [
            "standard_user",
            "problem_user",
            "performance_glitch_user",
            "error_user",
            "visual_user",
        ]
        .into_iter()
        .map(|u| (u.to_string(), UserRecord::valid(u, DEMO_PASSWORD)))
        .collect();

        let invalid_users = BTreeMap::from([
            (
                "locked_out_user".to_string(),
                UserRecord::rejected(
                    "locked_out_user",
                    DEMO_PASSWORD,
                    "Epic sadface: Sorry, this user has been locked out.",
                ),
            ),
            (
                "invalid_credentials".to_string(),
                UserRecord::rejected(
                    "invalid_user",
                    "wrong_password",
                    "Epic sadface: Username and password do not match any user in this service",
                ),
            ),
            (
                "empty_username".to_string(),
                UserRecord::rejected("", DEMO_PASSWORD, "Epic sadface: Username is required"),
            ),
            (
                "empty_password".to_string(),
                UserRecord::rejected(
                    "standard_user",
                    "",
                    "Epic sadface: Password is required",
                ),
            ),
        ]);

        let products = vec![
            Product::new("sauce-labs-backpack", "Sauce Labs Backpack", "$29.99"),
            Product::new("sauce-labs-bike-light", "Sauce Labs Bike Light", "$9.99"),
            Product::new("sauce-labs-bolt-t-shirt", "Sauce Labs Bolt T-Shirt", "$15.99"),
            Product::new("sauce-labs-fleece-jacket", "Sauce Labs Fleece Jacket", "$49.99"),
            Product::new("sauce-labs-onesie", "Sauce Labs Onesie", "$7.99"),
            Product::new(
                "test.allthethings()-t-shirt-(red)",
                "Test.allTheThings() T-Shirt (Red)",
                "$15.99",
            ),
        ];

        let invalid_checkout = [
            ("missing_first_name", CheckoutForm::new("", "Doe", "12345")),
            ("missing_last_name", CheckoutForm::new("John", "", "12345")),
            ("missing_postal_code", CheckoutForm::new("John", "Doe", "")),
        ]
        .into_iter()
        .filter_map(|(key, form)| {
            let expected_error = form.expected_error()?;
            Some((
                key.to_string(),
                InvalidCheckout {
                    form,
                    expected_error,
                },
            ))
        })
        .collect();

        Self {
            valid_users,
            invalid_users,
            products,
            checkout_info: CheckoutFixtures {
                valid: CheckoutForm::new("John", "Doe", "12345"),
                invalid: invalid_checkout,
            },
        }
    }

    /// Parse fixtures from JSON
    pub fn from_json_str(input: &str) -> ShopResult<Self> {
        let fixtures: Self = serde_json::from_str(input)?;
        fixtures.validate()?;
        Ok(fixtures)
    }

    /// Parse fixtures from YAML
    pub fn from_yaml_str(input: &str) -> ShopResult<Self> {
        let fixtures: Self = serde_yaml_ng::from_str(input)?;
        fixtures.validate()?;
        Ok(fixtures)
    }

    /// Load fixtures from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: impl AsRef<Path>) -> ShopResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("yaml" | "yml") => Self::from_yaml_str(&content),
            _ => Err(ShopError::fixture(format!(
                "unsupported fixture format: {}",
                path.display()
            ))),
        }
    }

    /// Check internal consistency
    pub fn validate(&self) -> ShopResult<()> {
        if self.products.is_empty() {
            return Err(ShopError::fixture("product catalog is empty"));
        }
        let mut seen = HashSet::new();
        for product in &self.products {
            if !seen.insert(product.name.as_str()) {
                return Err(ShopError::fixture(format!(
                    "duplicate product slug: {}",
                    product.name
                )));
            }
            product.unit_price()?;
        }
        if let Some((key, _)) = self
            .valid_users
            .iter()
            .find(|(_, u)| u.expected_error.is_some())
        {
            return Err(ShopError::fixture(format!(
                "valid user {key} declares an expected error"
            )));
        }
        if let Some((key, _)) = self
            .invalid_users
            .iter()
            .find(|(_, u)| u.expected_error.as_deref().map_or(true, |e| e.trim().is_empty()))
        {
            return Err(ShopError::fixture(format!(
                "invalid user {key} has no expected error"
            )));
        }
        if !self.checkout_info.valid.is_complete() {
            return Err(ShopError::fixture("valid checkout form has empty fields"));
        }
        if let Some((key, _)) = self
            .checkout_info
            .invalid
            .iter()
            .find(|(_, case)| case.expected_error.trim().is_empty())
        {
            return Err(ShopError::fixture(format!(
                "invalid checkout case {key} has no expected error"
            )));
        }
        Ok(())
    }

    /// Look up a valid user by case name
    pub fn valid_user(&self, key: &str) -> ShopResult<&UserRecord> {
        self.valid_users
            .get(key)
            .ok_or_else(|| ShopError::fixture(format!("no valid user {key:?}")))
    }

    /// Look up an invalid user by case name
    pub fn invalid_user(&self, key: &str) -> ShopResult<&UserRecord> {
        self.invalid_users
            .get(key)
            .ok_or_else(|| ShopError::fixture(format!("no invalid user {key:?}")))
    }

    /// The standard account used by most flows
    pub fn standard_user(&self) -> ShopResult<&UserRecord> {
        self.valid_user("standard_user")
    }

    /// Product at a catalog position
    pub fn product(&self, index: usize) -> ShopResult<&Product> {
        self.products
            .get(index)
            .ok_or_else(|| ShopError::fixture(format!("no product at index {index}")))
    }

    /// Product by slug
    pub fn product_by_name(&self, name: &str) -> ShopResult<&Product> {
        self.products
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ShopError::fixture(format!("no product {name:?}")))
    }

    /// Product by display name
    pub fn product_by_display_name(&self, display_name: &str) -> ShopResult<&Product> {
        self.products
            .iter()
            .find(|p| p.display_name == display_name)
            .ok_or_else(|| ShopError::fixture(format!("no product {display_name:?}")))
    }

    /// Rejected checkout case by name
    pub fn invalid_checkout(&self, key: &str) -> ShopResult<&InvalidCheckout> {
        self.checkout_info
            .invalid
            .get(key)
            .ok_or_else(|| ShopError::fixture(format!("no invalid checkout case {key:?}")))
    }
}

impl Default for Fixtures {
    fn default() -> Self {
        Self::builtin()
    }
}
