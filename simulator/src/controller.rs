//! Simulation controller.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};

use ratebridge_common::Currency;
use ratebridge_fx::{ConverterConfig, RateConverter, NO_CONVERSION_PATH};

use crate::metrics::{MetricsSummary, SimulationMetrics};
use crate::scenario::{Expectation, Probe, Scenario};

/// Relative error allowed when a converted amount is converted back.
const ROUND_TRIP_EPSILON: f64 = 1e-9;

/// Smallest amount generated for load conversions.
const MIN_AMOUNT: f64 = 0.01;

/// Outcome of one probe.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeOutcome {
    pub from: Currency,
    pub to: Currency,
    pub amount: f64,
    pub expected: Expectation,
    /// Converted amount, `None` when the converter returned an error.
    pub actual: Option<f64>,
    pub passed: bool,
}

/// Result of a full simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub scenario: String,
    pub currencies: usize,
    pub rates: usize,
    pub probes: Vec<ProbeOutcome>,
    pub load: MetricsSummary,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub elapsed_ms: u64,
}

impl SimulationReport {
    /// Number of probes that did not match their expectation.
    pub fn failed_probes(&self) -> usize {
        self.probes.iter().filter(|p| !p.passed).count()
    }

    /// Whether every probe passed and no load conversion misbehaved.
    pub fn passed(&self) -> bool {
        self.failed_probes() == 0 && !self.load.has_failures()
    }
}

/// Controls the simulation.
pub struct SimulationController {
    /// Converter under test.
    converter: Arc<RateConverter>,
    /// Random number generator.
    rng: StdRng,
    /// Absolute tolerance for probe results.
    tolerance: f64,
    /// Upper bound for generated amounts.
    max_amount: f64,
    /// Number of blocking workers for the load phase.
    workers: usize,
}

impl SimulationController {
    /// Create a new simulation controller.
    pub fn new(
        config: ConverterConfig,
        seed: Option<u64>,
        tolerance: f64,
        max_amount: f64,
    ) -> anyhow::Result<Self> {
        config.validate()?;
        if !tolerance.is_finite() || tolerance < 0.0 {
            anyhow::bail!("Tolerance must be a non-negative number, got {}", tolerance);
        }
        if !max_amount.is_finite() || max_amount <= MIN_AMOUNT {
            anyhow::bail!("Maximum amount must exceed {}, got {}", MIN_AMOUNT, max_amount);
        }

        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);

        Ok(Self {
            converter: Arc::new(RateConverter::new(config)),
            rng,
            tolerance,
            max_amount,
            workers,
        })
    }

    /// Override the number of load workers.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Run a scenario: apply its rates, check its probes, then drive
    /// `conversions` random conversions through the converter concurrently.
    pub async fn run_scenario(
        &mut self,
        scenario: &Scenario,
        conversions: usize,
    ) -> anyhow::Result<SimulationReport> {
        info!("Running scenario: {} - {}", scenario.name, scenario.description);
        let start = Instant::now();

        self.converter
            .update_configuration(scenario.rates.iter().cloned())?;

        let probes = self.run_probes(&scenario.probes);

        let load_start = Instant::now();
        let metrics = self.run_load(&scenario.currencies(), conversions).await?;
        let load = metrics.summary(load_start.elapsed());

        let stats = self.converter.stats();
        Ok(SimulationReport {
            scenario: scenario.name.clone(),
            currencies: stats.currencies,
            rates: stats.rates,
            probes,
            load,
            cache_hits: stats.cache.hits,
            cache_misses: stats.cache.misses,
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Convert every probe and compare with its expectation.
    pub fn run_probes(&self, probes: &[Probe]) -> Vec<ProbeOutcome> {
        probes.iter().map(|probe| self.run_probe(probe)).collect()
    }

    fn run_probe(&self, probe: &Probe) -> ProbeOutcome {
        let result = self
            .converter
            .convert(probe.from.clone(), probe.to.clone(), probe.amount);

        let actual = match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(from = %probe.from, to = %probe.to, error = %e, "Probe conversion failed");
                None
            }
        };

        let passed = match (probe.expected, actual) {
            (Expectation::Amount(expected), Some(actual)) => {
                actual != NO_CONVERSION_PATH && (actual - expected).abs() <= self.tolerance
            }
            (Expectation::NoPath, Some(actual)) => actual == NO_CONVERSION_PATH,
            (_, None) => false,
        };

        if passed {
            info!(
                "PASS {} {} -> {} = {:?}",
                probe.amount, probe.from, probe.to, actual
            );
        } else {
            warn!(
                "FAIL {} {} -> {}: expected {:?}, got {:?}",
                probe.amount, probe.from, probe.to, probe.expected, actual
            );
        }

        ProbeOutcome {
            from: probe.from.clone(),
            to: probe.to.clone(),
            amount: probe.amount,
            expected: probe.expected,
            actual,
            passed,
        }
    }

    /// Drive random conversions across the blocking thread pool.
    pub async fn run_load(
        &mut self,
        currencies: &[Currency],
        conversions: usize,
    ) -> anyhow::Result<SimulationMetrics> {
        let mut metrics = SimulationMetrics::new();
        if conversions == 0 || currencies.is_empty() {
            return Ok(metrics);
        }

        let jobs: Vec<(Currency, Currency, f64)> = (0..conversions)
            .map(|_| {
                let from = currencies[self.rng.gen_range(0..currencies.len())].clone();
                let to = currencies[self.rng.gen_range(0..currencies.len())].clone();
                let amount = self.rng.gen_range(MIN_AMOUNT..self.max_amount);
                (from, to, amount)
            })
            .collect();

        let chunk_size = conversions.div_ceil(self.workers);
        info!(
            "Driving {} conversions across {} workers",
            conversions,
            conversions.div_ceil(chunk_size)
        );

        let handles = jobs.chunks(chunk_size).map(|chunk| {
            let converter = Arc::clone(&self.converter);
            let chunk = chunk.to_vec();
            tokio::task::spawn_blocking(move || run_worker(&converter, chunk))
        });

        for result in join_all(handles).await {
            metrics.merge(result?);
        }

        info!(
            "Load complete: {} converted, {} without path, {} round-trip failures",
            metrics.converted, metrics.no_path, metrics.round_trip_failures
        );

        Ok(metrics)
    }
}

fn run_worker(converter: &RateConverter, jobs: Vec<(Currency, Currency, f64)>) -> SimulationMetrics {
    let mut metrics = SimulationMetrics::with_capacity(jobs.len());

    for (from, to, amount) in jobs {
        let start = Instant::now();
        let result = converter.convert(from.clone(), to.clone(), amount);
        let latency = elapsed_us(start.elapsed());

        match result {
            Ok(value) if value == NO_CONVERSION_PATH => metrics.record_no_path(latency),
            Ok(value) => {
                metrics.record_converted(latency);
                if !round_trips(converter, &from, &to, amount, value) {
                    debug!(%from, %to, amount, "Round trip drifted");
                    metrics.record_round_trip_failure();
                }
            }
            Err(e) => {
                warn!(%from, %to, error = %e, "Conversion failed");
                metrics.record_error();
            }
        }
    }

    metrics
}

fn round_trips(
    converter: &RateConverter,
    from: &Currency,
    to: &Currency,
    amount: f64,
    converted: f64,
) -> bool {
    match converter.convert(to.clone(), from.clone(), converted) {
        Ok(back) => (back - amount).abs() <= ROUND_TRIP_EPSILON * amount.abs().max(1.0),
        Err(_) => false,
    }
}

fn elapsed_us(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(tolerance: f64) -> SimulationController {
        SimulationController::new(ConverterConfig::default(), Some(7), tolerance, 10_000.0)
            .unwrap()
            .with_workers(4)
    }

    #[tokio::test]
    async fn test_reference_scenario_passes() {
        let scenario = Scenario::load("reference").unwrap();
        let mut controller = controller(1.0);

        let report = controller.run_scenario(&scenario, 2_000).await.unwrap();

        assert!(report.passed(), "{:?}", report);
        assert_eq!(report.currencies, 8);
        assert_eq!(report.rates, 6);
        assert_eq!(report.load.total_conversions, 2_000);
        assert!(report.load.no_path > 0);
        assert!(report.cache_hits > 0);
    }

    #[tokio::test]
    async fn test_every_scenario_passes() {
        for name in Scenario::NAMES {
            let scenario = Scenario::load(name).unwrap();
            let report = controller(1.0).run_scenario(&scenario, 200).await.unwrap();
            assert!(report.passed(), "{}: {:?}", name, report);
        }
    }

    #[tokio::test]
    async fn test_tight_tolerance_fails_probes() {
        let scenario = Scenario::load("reference").unwrap();
        let mut controller = controller(0.0);

        let report = controller.run_scenario(&scenario, 0).await.unwrap();

        // CAD -> EUR yields 32.09, not 32.
        assert!(!report.passed());
        assert!(report.failed_probes() >= 1);
        assert!(!report.load.has_failures());
    }

    #[test]
    fn test_probes_without_configuration_fail() {
        let scenario = Scenario::load("chain").unwrap();
        let outcomes = controller(1.0).run_probes(&scenario.probes);

        assert!(outcomes.iter().all(|o| !o.passed && o.actual.is_none()));
    }

    #[test]
    fn test_invalid_settings() {
        assert!(SimulationController::new(ConverterConfig::default(), None, -1.0, 100.0).is_err());
        assert!(SimulationController::new(ConverterConfig::default(), None, 1.0, 0.0).is_err());
    }

    #[test]
    fn test_report_serializes() {
        let scenario = Scenario::load("disconnected").unwrap();
        let controller = controller(1.0);
        controller
            .converter
            .update_configuration(scenario.rates.iter().cloned())
            .unwrap();

        let probes = controller.run_probes(&scenario.probes);
        let json = serde_json::to_value(&probes).unwrap();

        assert_eq!(json[2]["expected"], "NoPath");
        assert_eq!(json[2]["actual"], -1.0);
        assert_eq!(json[2]["passed"], true);
    }
}
