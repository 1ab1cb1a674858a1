//! Product ordering and its verification.
//!
//! Verification is a pure function over an observed sequence: the sequence
//! must equal the deterministic sort of itself under the selected mode.

use crate::money::Price;
use crate::result::{ShopError, ShopResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Sort options offered by the product sort dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortMode {
    /// Name (A to Z)
    #[serde(rename = "az")]
    NameAsc,
    /// Name (Z to A)
    #[serde(rename = "za")]
    NameDesc,
    /// Price (low to high)
    #[serde(rename = "lohi")]
    PriceAsc,
    /// Price (high to low)
    #[serde(rename = "hilo")]
    PriceDesc,
}

impl SortMode {
    /// All modes, in dropdown order
    pub const ALL: [Self; 4] = [Self::NameAsc, Self::NameDesc, Self::PriceAsc, Self::PriceDesc];

    /// `<option>` value in the dropdown
    #[must_use]
    pub const fn option_value(self) -> &'static str {
        match self {
            Self::NameAsc => "az",
            Self::NameDesc => "za",
            Self::PriceAsc => "lohi",
            Self::PriceDesc => "hilo",
        }
    }

    /// Whether this mode orders by name (otherwise by price)
    #[must_use]
    pub const fn by_name(self) -> bool {
        matches!(self, Self::NameAsc | Self::NameDesc)
    }

    /// Mode producing the reverse order
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::NameAsc => Self::NameDesc,
            Self::NameDesc => Self::NameAsc,
            Self::PriceAsc => Self::PriceDesc,
            Self::PriceDesc => Self::PriceAsc,
        }
    }

    /// Compare two names under this mode
    #[must_use]
    pub fn compare_names(self, a: &str, b: &str) -> Ordering {
        match self {
            Self::NameDesc => b.cmp(a),
            _ => a.cmp(b),
        }
    }

    /// Compare two prices under this mode
    #[must_use]
    pub fn compare_prices(self, a: Price, b: Price) -> Ordering {
        match self {
            Self::PriceDesc => b.cmp(&a),
            _ => a.cmp(&b),
        }
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.option_value())
    }
}

impl FromStr for SortMode {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.option_value() == s)
            .ok_or_else(|| ShopError::parse("sort mode", s))
    }
}

/// Names in the order `mode` prescribes (ties keep their observed order)
#[must_use]
pub fn expected_name_order(mode: SortMode, names: &[String]) -> Vec<String> {
    let mut sorted = names.to_vec();
    sorted.sort_by(|a, b| mode.compare_names(a, b));
    sorted
}

/// Prices in the order `mode` prescribes
#[must_use]
pub fn expected_price_order(mode: SortMode, prices: &[Price]) -> Vec<Price> {
    let mut sorted = prices.to_vec();
    sorted.sort_by(|a, b| mode.compare_prices(*a, *b));
    sorted
}

/// Whether observed names are ordered under `mode`
#[must_use]
pub fn names_ordered(mode: SortMode, names: &[String]) -> bool {
    names
        .windows(2)
        .all(|w| mode.compare_names(&w[0], &w[1]) != Ordering::Greater)
}

/// Whether observed prices are ordered under `mode`
#[must_use]
pub fn prices_ordered(mode: SortMode, prices: &[Price]) -> bool {
    prices
        .windows(2)
        .all(|w| mode.compare_prices(w[0], w[1]) != Ordering::Greater)
}

/// Apply a sort mode to an in-memory catalog of `(name, price)` pairs.
///
/// Name sorts order by name. Price sorts order by price and break ties by
/// name ascending, so the result is fully deterministic.
pub fn sort_catalog<'a, T, N, P>(mode: SortMode, items: &mut [T], name: N, price: P)
where
    N: Fn(&T) -> &'a str,
    P: Fn(&T) -> Price,
{
    items.sort_by(|a, b| {
        if mode.by_name() {
            mode.compare_names(name(a), name(b))
        } else {
            mode.compare_prices(price(a), price(b))
                .then_with(|| name(a).cmp(name(b)))
        }
    });
}

/// Check observed names, returning the expected order on failure
pub fn verify_names(mode: SortMode, names: &[String]) -> ShopResult<()> {
    if names_ordered(mode, names) {
        Ok(())
    } else {
        Err(ShopError::AssertionFailed {
            screen: crate::screen::Screen::Products,
            what: format!("product names sorted {mode}"),
            expected: format!("{:?}", expected_name_order(mode, names)),
            actual: format!("{names:?}"),
        })
    }
}

/// Check observed prices, returning the expected order on failure
pub fn verify_prices(mode: SortMode, prices: &[Price]) -> ShopResult<()> {
    if prices_ordered(mode, prices) {
        Ok(())
    } else {
        let show = |ps: &[Price]| ps.iter().map(ToString::to_string).collect::<Vec<_>>();
        Err(ShopError::AssertionFailed {
            screen: crate::screen::Screen::Products,
            what: format!("product prices sorted {mode}"),
            expected: format!("{:?}", show(&expected_price_order(mode, prices))),
            actual: format!("{:?}", show(prices)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    mod sort_mode_tests {
        use super::*;

        #[test]
        fn test_option_values_roundtrip() {
            for mode in SortMode::ALL {
                assert_eq!(mode.option_value().parse::<SortMode>().unwrap(), mode);
            }
            assert!("random".parse::<SortMode>().is_err());
        }

        #[test]
        fn test_inverse() {
            for mode in SortMode::ALL {
                assert_eq!(mode.inverse().inverse(), mode);
                assert_eq!(mode.inverse().by_name(), mode.by_name());
            }
        }
    }

    mod verification_tests {
        use super::*;

        #[test]
        fn test_names_ordered() {
            let sorted = names(&["Sauce Labs Backpack", "Sauce Labs Bike Light", "Test.allTheThings()"]);
            assert!(names_ordered(SortMode::NameAsc, &sorted));
            assert!(!names_ordered(SortMode::NameDesc, &sorted));
            assert!(verify_names(SortMode::NameAsc, &sorted).is_ok());
        }

        #[test]
        fn test_prices_ordered() {
            let prices: Vec<Price> = [799, 999, 1599, 1599, 2999, 4999]
                .into_iter()
                .map(Price::from_cents)
                .collect();
            assert!(prices_ordered(SortMode::PriceAsc, &prices));
            assert!(!prices_ordered(SortMode::PriceDesc, &prices));
        }

        #[test]
        fn test_failure_carries_expected_and_actual() {
            let observed = names(&["b", "a"]);
            match verify_names(SortMode::NameAsc, &observed) {
                Err(ShopError::AssertionFailed {
                    expected, actual, ..
                }) => {
                    assert_eq!(expected, "[\"a\", \"b\"]");
                    assert_eq!(actual, "[\"b\", \"a\"]");
                }
                other => panic!("unexpected {other:?}"),
            }
        }

        #[test]
        fn test_empty_and_single_are_ordered() {
            assert!(names_ordered(SortMode::NameDesc, &[]));
            assert!(prices_ordered(SortMode::PriceAsc, &[Price::from_cents(1)]));
        }
    }

    mod catalog_sort_tests {
        use super::*;

        #[test]
        fn test_price_ties_break_by_name() {
            let mut items = vec![
                ("Test.allTheThings() T-Shirt (Red)", 1599),
                ("Sauce Labs Bolt T-Shirt", 1599),
                ("Sauce Labs Onesie", 799),
            ];
            sort_catalog(SortMode::PriceDesc, &mut items, |i| i.0, |i| Price::from_cents(i.1));
            assert_eq!(items[0].0, "Sauce Labs Bolt T-Shirt");
            assert_eq!(items[2].0, "Sauce Labs Onesie");
        }

        #[test]
        fn test_sort_indices_into_external_table() {
            let names = [
                "Sauce Labs Onesie".to_string(),
                "Sauce Labs Backpack".to_string(),
                "Sauce Labs Bike Light".to_string(),
            ];
            let prices = [799, 2999, 999];
            let mut order = vec![0usize, 1, 2];
            sort_catalog(
                SortMode::NameAsc,
                &mut order,
                |&i| names[i].as_str(),
                |&i| Price::from_cents(prices[i]),
            );
            assert_eq!(order, vec![1, 2, 0]);
            sort_catalog(
                SortMode::PriceAsc,
                &mut order,
                |&i| names[i].as_str(),
                |&i| Price::from_cents(prices[i]),
            );
            assert_eq!(order, vec![0, 2, 1]);
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_expected_order_is_ordered(list in proptest::collection::vec("[A-Za-z ]{0,12}", 0..12)) {
                for mode in [SortMode::NameAsc, SortMode::NameDesc] {
                    let sorted = expected_name_order(mode, &list);
                    prop_assert!(names_ordered(mode, &sorted));
                    // idempotent
                    prop_assert_eq!(expected_name_order(mode, &sorted), sorted.clone());
                }
            }

            #[test]
            fn prop_za_reverses_az_for_distinct_names(set in proptest::collection::btree_set("[a-z]{1,8}", 0..10)) {
                let list: Vec<String> = set.into_iter().collect();
                let az = expected_name_order(SortMode::NameAsc, &list);
                let mut za = expected_name_order(SortMode::NameDesc, &az);
                za.reverse();
                prop_assert_eq!(za, az);
            }

            #[test]
            fn prop_price_order(cents in proptest::collection::vec(0u64..100_000, 0..12)) {
                let prices: Vec<Price> = cents.into_iter().map(Price::from_cents).collect();
                for mode in [SortMode::PriceAsc, SortMode::PriceDesc] {
                    let sorted = expected_price_order(mode, &prices);
                    prop_assert!(prices_ordered(mode, &sorted));
                    prop_assert!(verify_prices(mode, &sorted).is_ok());
                }
            }
        }
    }
}
