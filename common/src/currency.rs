//! Currency types for RateBridge.

use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO 4217 currency code.
///
/// Codes are normalized to upper case, so `"usd"` and `"USD"` name the same
/// currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Currency(String);

impl Currency {
    /// Create a new currency from code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Check whether the code is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn eur() -> Self {
        Self::new("EUR")
    }

    pub fn gbp() -> Self {
        Self::new("GBP")
    }

    pub fn cad() -> Self {
        Self::new("CAD")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Currency {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&Currency> for Currency {
    fn from(c: &Currency) -> Self {
        c.clone()
    }
}

/// An ordered currency pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Currency the amount is expressed in.
    pub base: Currency,
    /// Currency the amount is converted into.
    pub quote: Currency,
}

impl CurrencyPair {
    /// Create a new currency pair.
    pub fn new(base: Currency, quote: Currency) -> Self {
        Self { base, quote }
    }

    /// Get the inverse pair.
    pub fn inverse(&self) -> Self {
        Self {
            base: self.quote.clone(),
            quote: self.base.clone(),
        }
    }

    /// Whether both sides name the same currency.
    pub fn is_identity(&self) -> bool {
        self.base == self.quote
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// A known direct rate: one unit of `from` buys `rate` units of `to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRate {
    pub from: Currency,
    pub to: Currency,
    pub rate: f64,
}

impl ConversionRate {
    /// Create a new conversion rate.
    pub fn new(from: impl Into<Currency>, to: impl Into<Currency>, rate: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            rate,
        }
    }

    /// The pair this rate quotes.
    pub fn pair(&self) -> CurrencyPair {
        CurrencyPair::new(self.from.clone(), self.to.clone())
    }

    /// The rate for the opposite direction.
    pub fn inverse(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
            rate: 1.0 / self.rate,
        }
    }

    /// A usable rate is finite and strictly positive, and so is its reciprocal.
    pub fn is_usable(&self) -> bool {
        self.rate.is_finite() && self.rate > 0.0 && (1.0 / self.rate).is_finite()
    }
}

impl fmt::Display for ConversionRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} @ {}", self.from, self.to, self.rate)
    }
}

impl<A: Into<Currency>, B: Into<Currency>> From<(A, B, f64)> for ConversionRate {
    fn from((from, to, rate): (A, B, f64)) -> Self {
        Self::new(from, to, rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_normalized() {
        assert_eq!(Currency::new("usd"), Currency::usd());
        assert_eq!(Currency::new(" cad "), Currency::cad());
        assert_eq!(Currency::from("gbp").code(), "GBP");
        assert!(Currency::new("  ").is_empty());
    }

    #[test]
    fn test_pair_inverse() {
        let pair = CurrencyPair::new(Currency::usd(), Currency::eur());
        let inverse = pair.inverse();

        assert_eq!(inverse.base, Currency::eur());
        assert_eq!(inverse.quote, Currency::usd());
        assert_eq!(pair.to_string(), "USD/EUR");
        assert!(!pair.is_identity());
    }

    #[test]
    fn test_rate_from_tuple() {
        let rate: ConversionRate = ("usd", "cad", 1.34).into();

        assert_eq!(rate.from, Currency::usd());
        assert_eq!(rate.to, Currency::cad());
        assert_eq!(rate.pair().to_string(), "USD/CAD");
        assert!(rate.is_usable());
    }

    #[test]
    fn test_rate_inverse() {
        let rate = ConversionRate::new("USD", "EUR", 0.8);
        let inverse = rate.inverse();

        assert_eq!(inverse.from, Currency::eur());
        assert!((inverse.rate - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_unusable_rates() {
        assert!(!ConversionRate::new("USD", "EUR", 0.0).is_usable());
        assert!(!ConversionRate::new("USD", "EUR", -1.0).is_usable());
        assert!(!ConversionRate::new("USD", "EUR", f64::NAN).is_usable());
        assert!(!ConversionRate::new("USD", "EUR", f64::INFINITY).is_usable());
        // Subnormal: positive and finite, but the reciprocal overflows.
        assert!(!ConversionRate::new("USD", "EUR", 1e-309).is_usable());
        assert!(ConversionRate::new("USD", "EUR", 1e-300).is_usable());
    }

    #[test]
    fn test_currency_serde() {
        let json = serde_json::to_string(&Currency::usd()).unwrap();
        assert_eq!(json, "\"USD\"");
    }
}
