//! Simulation scenarios.

use ratebridge_common::{ConversionRate, Currency};
use serde::{Deserialize, Serialize};

/// A simulation scenario: a rate set and the conversions checked against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Rates applied to the converter.
    pub rates: Vec<ConversionRate>,
    /// Conversions with known answers.
    pub probes: Vec<Probe>,
}

/// A conversion whose answer is known up front.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Probe {
    pub from: Currency,
    pub to: Currency,
    pub amount: f64,
    pub expected: Expectation,
}

/// Expected probe outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Expectation {
    /// Converted amount, compared within the run's tolerance.
    Amount(f64),
    /// No path connects the currencies.
    NoPath,
}

impl Probe {
    fn amount(from: &str, to: &str, amount: f64, expected: f64) -> Self {
        Self {
            from: Currency::new(from),
            to: Currency::new(to),
            amount,
            expected: Expectation::Amount(expected),
        }
    }

    fn no_path(from: &str, to: &str, amount: f64) -> Self {
        Self {
            from: Currency::new(from),
            to: Currency::new(to),
            amount,
            expected: Expectation::NoPath,
        }
    }
}

impl Scenario {
    /// Names accepted by [`Scenario::load`].
    pub const NAMES: [&'static str; 3] = ["reference", "chain", "disconnected"];

    /// Load a scenario by name.
    pub fn load(name: &str) -> anyhow::Result<Self> {
        match name {
            "reference" => Ok(Self::reference()),
            "chain" => Ok(Self::chain()),
            "disconnected" => Ok(Self::disconnected()),
            _ => Err(anyhow::anyhow!(
                "Unknown scenario: {} (expected one of {})",
                name,
                Self::NAMES.join(", ")
            )),
        }
    }

    /// Every currency named by the scenario's rates, in first-seen order.
    pub fn currencies(&self) -> Vec<Currency> {
        let mut currencies: Vec<Currency> = Vec::new();
        for rate in &self.rates {
            for currency in [&rate.from, &rate.to] {
                if !currencies.contains(currency) {
                    currencies.push(currency.clone());
                }
            }
        }
        currencies
    }

    /// Eight currencies in two components, exercising multi-hop paths and
    /// the no-path sentinel.
    fn reference() -> Self {
        Self {
            name: "reference".to_string(),
            description: "Eight currencies, two disconnected groups".to_string(),
            rates: vec![
                ConversionRate::new("USD", "CAD", 1.34),
                ConversionRate::new("CAD", "GBP", 0.58),
                ConversionRate::new("USD", "EUR", 0.86),
                ConversionRate::new("GBP", "IIR", 300000.25),
                ConversionRate::new("GBP", "JPY", 2.5),
                ConversionRate::new("CNY", "AUD", 0.2),
            ],
            probes: vec![
                Probe::amount("CAD", "IIR", 50.0, 8_700_007.25),
                Probe::amount("IIR", "CAD", 8_700_007.25, 50.0),
                Probe::amount("CAD", "EUR", 50.0, 32.0),
                Probe::amount("EUR", "CAD", 32.0, 50.0),
                Probe::amount("IIR", "EUR", 340_000.0, 1.2),
                Probe::amount("USD", "EUR", 10.0, 8.6),
                Probe::amount("USD", "USD", 10.0, 10.0),
                Probe::no_path("AUD", "USD", 10.0),
            ],
        }
    }

    /// A three-currency chain.
    fn chain() -> Self {
        Self {
            name: "chain".to_string(),
            description: "Two-hop composition A -> B -> C".to_string(),
            rates: vec![
                ConversionRate::new("AAA", "BBB", 1.34),
                ConversionRate::new("BBB", "CCC", 0.58),
            ],
            probes: vec![
                Probe::amount("AAA", "CCC", 100.0, 77.72),
                Probe::amount("CCC", "AAA", 77.72, 100.0),
                Probe::amount("BBB", "AAA", 134.0, 100.0),
            ],
        }
    }

    /// Two islands with no rate between them.
    fn disconnected() -> Self {
        Self {
            name: "disconnected".to_string(),
            description: "Two unconnected currency groups".to_string(),
            rates: vec![
                ConversionRate::new("USD", "EUR", 0.86),
                ConversionRate::new("CNY", "AUD", 0.2),
            ],
            probes: vec![
                Probe::amount("EUR", "USD", 86.0, 100.0),
                Probe::amount("AUD", "CNY", 2.0, 10.0),
                Probe::no_path("USD", "CNY", 10.0),
                Probe::no_path("AUD", "EUR", 10.0),
            ],
        }
    }
}
