//! Currency amounts read off the storefront.
//!
//! Displayed amounts are parsed into integer cents so that the overview
//! invariant `total == item total + tax` is an exact comparison. Amounts come
//! from text the storefront displays, so all arithmetic is checked and an
//! overflow is reported as an inconsistency rather than a panic.

use crate::result::{ShopError, ShopResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-negative dollar amount in cents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price {
    cents: u64,
}

impl Price {
    /// Create from a cent amount
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    /// Amount in cents
    #[must_use]
    pub const fn cents(self) -> u64 {
        self.cents
    }

    /// Amount in dollars
    #[must_use]
    pub fn as_dollars(self) -> f64 {
        self.cents as f64 / 100.0
    }

    /// Parse a displayed amount.
    ///
    /// Accepts bare (`29.99`), dollar (`$29.99`) and labelled
    /// (`Item total: $29.99`) forms with at most two decimal places.
    pub fn parse(text: &str) -> ShopResult<Self> {
        let err = || ShopError::parse("price", text);
        let amount = match text.rfind('$') {
            Some(i) => &text[i + 1..],
            None => text.rsplit(':').next().unwrap_or(text),
        }
        .trim();

        let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
        if whole.is_empty()
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || fraction.len() > 2
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(err());
        }

        let dollars: u64 = whole.parse().map_err(|_| err())?;
        let cents: u64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().map_err(|_| err())? * 10,
            _ => fraction.parse().map_err(|_| err())?,
        };
        dollars
            .checked_mul(100)
            .and_then(|d| d.checked_add(cents))
            .map(Self::from_cents)
            .ok_or_else(err)
    }

    /// Sum of two amounts, `None` on overflow
    #[must_use]
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.cents.checked_add(rhs.cents) {
            Some(cents) => Some(Self::from_cents(cents)),
            None => None,
        }
    }

    /// Amount times a quantity, `None` on overflow
    #[must_use]
    pub const fn checked_mul(self, factor: u64) -> Option<Self> {
        match self.cents.checked_mul(factor) {
            Some(cents) => Some(Self::from_cents(cents)),
            None => None,
        }
    }

    /// Sum of all amounts, `None` on overflow
    pub fn checked_sum(amounts: impl IntoIterator<Item = Self>) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Self::default(), Self::checked_add)
    }

    /// Apply a percentage rate, rounding half up to the cent.
    /// `None` on overflow.
    #[must_use]
    pub const fn percent(self, rate_percent: u64) -> Option<Self> {
        match self.cents.checked_mul(rate_percent) {
            Some(scaled) => match scaled.checked_add(50) {
                Some(rounded) => Some(Self::from_cents(rounded / 100)),
                None => None,
            },
            None => None,
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.cents / 100, self.cents % 100)
    }
}

/// Amounts shown on the checkout overview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Sum of line prices ("Item total")
    pub item_total: Price,
    /// Tax
    pub tax: Price,
    /// Grand total
    pub total: Price,
}

impl OrderSummary {
    /// Parse from the three displayed labels
    pub fn parse(item_total: &str, tax: &str, total: &str) -> ShopResult<Self> {
        Ok(Self {
            item_total: Price::parse(item_total)?,
            tax: Price::parse(tax)?,
            total: Price::parse(total)?,
        })
    }

    /// `item_total + tax`, `None` on overflow
    #[must_use]
    pub const fn expected_total(&self) -> Option<Price> {
        self.item_total.checked_add(self.tax)
    }

    /// Whether `total == item_total + tax` holds exactly
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.expected_total() == Some(self.total)
    }
}
