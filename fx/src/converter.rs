//! Multi-hop rate converter.

use std::sync::Arc;

use parking_lot::RwLock;
use ratebridge_common::{ConversionRate, Currency, CurrencyPair};
use ratebridge_graph::{Graph, PathCacheStats, RankedPaths};
use tracing::{debug, info, instrument, warn};

use crate::config::ConverterConfig;
use crate::conversion::{Conversion, Direction};
use crate::error::{FxError, FxResult};

/// Returned by [`RateConverter::convert`] when no path connects the two
/// currencies. Amounts are never negative, so callers must treat any
/// negative result as a failure.
pub const NO_CONVERSION_PATH: f64 = -1.0;

/// One applied configuration: the rates and the graph built from them.
struct ConfiguredGraph {
    rates: Vec<ConversionRate>,
    graph: Graph<Currency, f64>,
}

impl ConfiguredGraph {
    fn build(rates: Vec<ConversionRate>, hop_cost: u32) -> Self {
        let mut graph = Graph::new();
        for rate in &rates {
            graph.add_edge(rate.from.clone(), rate.to.clone(), hop_cost, rate.rate);
            graph.add_edge(rate.to.clone(), rate.from.clone(), hop_cost, 1.0 / rate.rate);
        }
        Self { rates, graph }
    }

    fn paths(&self, from: &Currency, to: &Currency, use_cache: bool) -> RankedPaths<'_, Currency, f64> {
        if use_cache {
            self.graph.find_shortest_path(from, to)
        } else {
            self.graph.find_shortest_path_uncached(from, to)
        }
    }

    /// Multiply `amount` along the best path from base to quote.
    fn forward(&self, pair: &CurrencyPair, amount: f64, use_cache: bool) -> Option<Conversion> {
        let paths = self.paths(&pair.base, &pair.quote, use_cache);
        let best = paths.best();
        if best.first()?.source() != &pair.base {
            return None;
        }

        let output = best.edges().fold(amount, |acc, edge| acc * edge.payload());
        Some(Conversion::new(
            pair.clone(),
            amount,
            output,
            best.vertices(),
            Direction::Forward,
        ))
    }

    /// Divide `amount` along the best path from quote back to base.
    fn reverse(&self, pair: &CurrencyPair, amount: f64, use_cache: bool) -> Option<Conversion> {
        let paths = self.paths(&pair.quote, &pair.base, use_cache);
        let best = paths.best();
        if best.first()?.source() != &pair.quote {
            return None;
        }

        let output = best.edges().fold(amount, |acc, edge| acc / edge.payload());
        let mut route = best.vertices();
        route.reverse();
        Some(Conversion::new(
            pair.clone(),
            amount,
            output,
            route,
            Direction::Reverse,
        ))
    }
}

/// Converts amounts between currencies by chaining known rates.
///
/// Holds at most one active configuration. Conversions take a snapshot of
/// it, so `update_configuration` and `clear_configuration` may run while
/// other threads convert; each conversion sees either the old or the new
/// rates, never a mix.
pub struct RateConverter {
    state: RwLock<Option<Arc<ConfiguredGraph>>>,
    config: ConverterConfig,
}

impl RateConverter {
    /// Create an unconfigured converter.
    pub fn new(config: ConverterConfig) -> Self {
        Self {
            state: RwLock::new(None),
            config,
        }
    }

    /// Create a converter and apply `rates` to it.
    pub fn with_rates<I>(config: ConverterConfig, rates: I) -> FxResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<ConversionRate>,
    {
        let converter = Self::new(config);
        converter.update_configuration(rates)?;
        Ok(converter)
    }

    /// Replace the active configuration.
    ///
    /// Every rate `A -> B` is added together with its reciprocal `B -> A`.
    /// Fails on empty or absent input (pass `None` for absent), empty
    /// currency codes and rates that are not finite and positive; a failed
    /// update leaves the previous configuration active.
    #[instrument(skip_all)]
    pub fn update_configuration<I>(&self, rates: I) -> FxResult<()>
    where
        I: IntoIterator,
        I::Item: Into<ConversionRate>,
    {
        self.config.validate()?;

        let rates: Vec<ConversionRate> = rates.into_iter().map(Into::into).collect();
        if rates.is_empty() {
            warn!("Rejected empty rate configuration");
            return Err(FxError::InvalidConfiguration(
                "conversion rates must not be empty".to_string(),
            ));
        }

        for rate in &rates {
            if rate.from.is_empty() || rate.to.is_empty() {
                warn!(rate = %rate, "Rejected rate with empty currency code");
                return Err(FxError::InvalidConfiguration(format!(
                    "empty currency code in {}",
                    rate
                )));
            }
            if !rate.is_usable() {
                warn!(pair = %rate.pair(), rate = rate.rate, "Rejected unusable rate");
                return Err(FxError::InvalidConfiguration(format!(
                    "rate for {} must be finite and positive with a finite reciprocal, got {}",
                    rate.pair(),
                    rate.rate
                )));
            }
        }

        let configured = ConfiguredGraph::build(rates, self.config.hop_cost);
        info!(
            rates = configured.rates.len(),
            currencies = configured.graph.vertex_count(),
            edges = configured.graph.edge_count(),
            "Rate configuration applied"
        );

        *self.state.write() = Some(Arc::new(configured));
        Ok(())
    }

    /// Drop the active configuration. Idempotent.
    pub fn clear_configuration(&self) {
        if self.state.write().take().is_some() {
            info!("Rate configuration cleared");
        }
    }

    pub fn is_configured(&self) -> bool {
        self.state.read().is_some()
    }

    /// The rates of the active configuration, as supplied.
    pub fn rates(&self) -> Vec<ConversionRate> {
        self.state
            .read()
            .as_ref()
            .map(|state| state.rates.clone())
            .unwrap_or_default()
    }

    /// Convert `amount` from one currency to another.
    ///
    /// Returns [`NO_CONVERSION_PATH`] when the currencies are not connected.
    pub fn convert(
        &self,
        from: impl Into<Currency>,
        to: impl Into<Currency>,
        amount: f64,
    ) -> FxResult<f64> {
        match self.convert_detailed(from, to, amount) {
            Ok(conversion) => Ok(conversion.output),
            Err(FxError::NoPathFound { .. }) => Ok(NO_CONVERSION_PATH),
            Err(e) => Err(e),
        }
    }

    /// Convert and report how the result was obtained.
    pub fn convert_detailed(
        &self,
        from: impl Into<Currency>,
        to: impl Into<Currency>,
        amount: f64,
    ) -> FxResult<Conversion> {
        self.convert_pair(CurrencyPair::new(from.into(), to.into()), amount)
    }

    /// Convert `amount` across `pair`.
    #[instrument(skip(self, pair), fields(pair = %pair))]
    pub fn convert_pair(&self, pair: CurrencyPair, amount: f64) -> FxResult<Conversion> {
        let state = self.snapshot()?;

        if pair.is_identity() {
            return Ok(Conversion::identity(pair, amount));
        }

        let use_cache = self.config.cache_enabled;
        if let Some(conversion) = state.forward(&pair, amount, use_cache) {
            debug!(hops = conversion.hops(), "Converted along forward path");
            return Ok(conversion);
        }

        if self.config.reverse_fallback {
            if let Some(conversion) = state.reverse(&pair, amount, use_cache) {
                debug!(hops = conversion.hops(), "Converted along reverse path");
                return Ok(conversion);
            }
        }

        debug!("No conversion path");
        Err(FxError::NoPathFound {
            from: pair.base,
            to: pair.quote,
        })
    }

    /// Get converter statistics.
    pub fn stats(&self) -> ConverterStats {
        match self.state.read().as_ref() {
            Some(state) => ConverterStats {
                currencies: state.graph.vertex_count(),
                rates: state.rates.len(),
                cache: state.graph.cache_stats(),
            },
            None => ConverterStats::default(),
        }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    fn snapshot(&self) -> FxResult<Arc<ConfiguredGraph>> {
        self.state
            .read()
            .as_ref()
            .map(Arc::clone)
            .ok_or(FxError::NotConfigured)
    }
}

impl Default for RateConverter {
    fn default() -> Self {
        Self::new(ConverterConfig::default())
    }
}

/// Converter statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConverterStats {
    pub currencies: usize,
    pub rates: usize,
    pub cache: PathCacheStats,
}
