//! Variant price as a decimal amount.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when parsing a [`Price`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// No price was given.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// A price in the shop currency.
///
/// Shopify takes variant prices as decimal strings, so the `Display` form is
/// always two decimal places (`"19.90"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero price, used when the wizard submits no usable price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Parse a price, accepting an optional leading `$`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is blank or not a decimal number.
    pub fn parse(input: &str) -> Result<Self, PriceError> {
        let trimmed = input.trim();
        let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }
        Decimal::from_str(trimmed)
            .map(Self)
            .map_err(|_| PriceError::Invalid(input.to_owned()))
    }

    /// Parse a price for variant creation.
    ///
    /// Anything missing, malformed, zero or negative becomes [`Price::ZERO`].
    #[must_use]
    pub fn parse_or_zero(input: Option<&str>) -> Self {
        input
            .and_then(|raw| Self::parse(raw).ok())
            .filter(|price| price.0 > Decimal::ZERO)
            .unwrap_or(Self::ZERO)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the price is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0.round_dp(2))
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::parse("19.9").unwrap().to_string(), "19.90");
        assert_eq!(Price::parse("$ 5").unwrap().to_string(), "5.00");
        assert_eq!(Price::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Price::parse(""), Err(PriceError::Empty));
        assert!(matches!(Price::parse("ten"), Err(PriceError::Invalid(_))));
    }

    #[test]
    fn test_parse_or_zero_defaults() {
        assert_eq!(Price::parse_or_zero(None), Price::ZERO);
        assert_eq!(Price::parse_or_zero(Some("abc")), Price::ZERO);
        assert_eq!(Price::parse_or_zero(Some("-4.00")), Price::ZERO);
        assert_eq!(Price::parse_or_zero(Some("0")), Price::ZERO);
        assert_eq!(Price::parse_or_zero(Some("12.5")).to_string(), "12.50");
    }
}
