//! Transient entities observed on or submitted to the storefront.

use crate::money::Price;
use crate::screen::Screen;
use serde::{Deserialize, Serialize};

/// Fields of the checkout information form, in validation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    /// First name
    FirstName,
    /// Last name
    LastName,
    /// Postal / ZIP code
    PostalCode,
}

impl FormField {
    /// All fields, in the order the storefront validates them
    pub const ALL: [Self; 3] = [Self::FirstName, Self::LastName, Self::PostalCode];

    /// Label used in validation messages
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::PostalCode => "Postal Code",
        }
    }

    /// Message shown when the field is left empty
    #[must_use]
    pub fn required_message(self) -> String {
        format!("Error: {} is required", self.label())
    }

    /// Locator name of the input on the checkout information screen
    #[must_use]
    pub const fn locator(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::PostalCode => "postal_code",
        }
    }
}

/// Customer information submitted on checkout step one
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutForm {
    /// First name
    #[serde(alias = "firstName", default)]
    pub first_name: String,
    /// Last name
    #[serde(alias = "lastName", default)]
    pub last_name: String,
    /// Postal code
    #[serde(alias = "postalCode", default)]
    pub postal_code: String,
}

impl CheckoutForm {
    /// Create a form
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            postal_code: postal_code.into(),
        }
    }

    /// Value of one field
    #[must_use]
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::FirstName => &self.first_name,
            FormField::LastName => &self.last_name,
            FormField::PostalCode => &self.postal_code,
        }
    }

    /// First empty field in validation order
    #[must_use]
    pub fn first_missing(&self) -> Option<FormField> {
        FormField::ALL
            .into_iter()
            .find(|f| self.value(*f).is_empty())
    }

    /// Whether every field is filled in
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.first_missing().is_none()
    }

    /// Message the storefront shows when this form is submitted, if any
    #[must_use]
    pub fn expected_error(&self) -> Option<String> {
        self.first_missing().map(FormField::required_message)
    }
}

/// A validation failure rendered on a screen instead of a transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorState {
    /// Screen the message is attached to
    pub screen: Screen,
    /// Message text
    pub message: String,
}

impl std::fmt::Display for ErrorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.screen, self.message)
    }
}

/// One line of the cart as rendered on the Cart or Overview screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Display name
    pub display_name: String,
    /// Unit price
    pub unit_price: Price,
    /// Quantity
    pub quantity: u32,
}

impl CartLine {
    /// Price of the whole line, `None` on overflow
    #[must_use]
    pub const fn line_total(&self) -> Option<Price> {
        self.unit_price.checked_mul(self.quantity as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_messages() {
        assert_eq!(
            FormField::FirstName.required_message(),
            "Error: First Name is required"
        );
        assert_eq!(
            FormField::LastName.required_message(),
            "Error: Last Name is required"
        );
        assert_eq!(
            FormField::PostalCode.required_message(),
            "Error: Postal Code is required"
        );
    }

    #[test]
    fn test_first_missing_follows_validation_order() {
        assert_eq!(
            CheckoutForm::new("", "", "").first_missing(),
            Some(FormField::FirstName)
        );
        assert_eq!(
            CheckoutForm::new("John", "", "").first_missing(),
            Some(FormField::LastName)
        );
        assert_eq!(
            CheckoutForm::new("John", "Doe", "").first_missing(),
            Some(FormField::PostalCode)
        );
        assert!(CheckoutForm::new("John", "Doe", "12345").is_complete());
    }

    #[test]
    fn test_expected_error() {
        let form = CheckoutForm::new("", "Doe", "12345");
        assert_eq!(
            form.expected_error().as_deref(),
            Some("Error: First Name is required")
        );
    }

    #[test]
    fn test_camel_case_aliases() {
        let form: CheckoutForm = serde_json::from_str(
            r#"{"firstName": "John", "lastName": "Doe", "postalCode": "12345"}"#,
        )
        .unwrap();
        assert_eq!(form, CheckoutForm::new("John", "Doe", "12345"));
    }

    #[test]
    fn test_line_total() {
        let line = CartLine {
            display_name: "Sauce Labs Onesie".to_string(),
            unit_price: Price::from_cents(799),
            quantity: 2,
        };
        assert_eq!(line.line_total().map(Price::cents), Some(1598));
    }

    #[test]
    fn test_line_total_overflow() {
        let line = CartLine {
            display_name: "Sauce Labs Onesie".to_string(),
            unit_price: Price::from_cents(u64::MAX / 2),
            quantity: 3,
        };
        assert_eq!(line.line_total(), None);
    }
}
