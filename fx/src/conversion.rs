//! Conversion result types.

use ratebridge_common::{Currency, CurrencyPair};
use serde::{Deserialize, Serialize};

/// How a conversion result was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Source and target are the same currency; no lookup happened.
    Identity,
    /// Rates multiplied along a path from source to target.
    Forward,
    /// Rates divided along a path from target to source.
    Reverse,
}

/// A completed currency conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    /// Requested pair.
    pub pair: CurrencyPair,
    /// Input amount, in `pair.base`.
    pub input: f64,
    /// Output amount, in `pair.quote`.
    pub output: f64,
    /// Currencies visited from `pair.base` to `pair.quote`.
    pub route: Vec<Currency>,
    pub direction: Direction,
}

impl Conversion {
    /// Create a new conversion record.
    pub fn new(
        pair: CurrencyPair,
        input: f64,
        output: f64,
        route: Vec<Currency>,
        direction: Direction,
    ) -> Self {
        Self {
            pair,
            input,
            output,
            route,
            direction,
        }
    }

    /// Conversion of a currency into itself.
    pub fn identity(pair: CurrencyPair, amount: f64) -> Self {
        let route = vec![pair.base.clone()];
        Self::new(pair, amount, amount, route, Direction::Identity)
    }

    /// Get the effective rate used.
    pub fn effective_rate(&self) -> f64 {
        if self.input == 0.0 {
            return 0.0;
        }
        self.output / self.input
    }

    /// Number of rates composed.
    pub fn hops(&self) -> usize {
        self.route.len().saturating_sub(1)
    }
}
