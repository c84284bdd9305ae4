//! Simulation metrics.

use std::collections::VecDeque;
use std::time::Duration;

use serde::Serialize;

/// Conversion metrics collected during a load run.
#[derive(Debug, Clone)]
pub struct SimulationMetrics {
    /// Total conversions attempted.
    pub total_conversions: u64,
    /// Conversions that produced an amount.
    pub converted: u64,
    /// Conversions that returned the no-path sentinel.
    pub no_path: u64,
    /// Converted amounts that did not survive the trip back.
    pub round_trip_failures: u64,
    /// Conversions that returned an error.
    pub errors: u64,
    /// Latency samples (µs).
    latency_samples: VecDeque<u64>,
    /// Maximum samples to keep.
    max_samples: usize,
}

/// Serializable summary of [`SimulationMetrics`].
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub total_conversions: u64,
    pub converted: u64,
    pub no_path: u64,
    pub round_trip_failures: u64,
    pub errors: u64,
    pub min_latency_us: u64,
    pub max_latency_us: u64,
    pub average_latency_us: u64,
    pub p50_latency_us: u64,
    pub p99_latency_us: u64,
    pub throughput_per_sec: f64,
}

impl MetricsSummary {
    /// Whether any conversion failed or lost accuracy.
    pub fn has_failures(&self) -> bool {
        self.round_trip_failures > 0 || self.errors > 0
    }
}

impl SimulationMetrics {
    /// Create new metrics.
    pub fn new() -> Self {
        Self::with_capacity(100_000)
    }

    /// Create metrics keeping at most `max_samples` latency samples.
    pub fn with_capacity(max_samples: usize) -> Self {
        Self {
            total_conversions: 0,
            converted: 0,
            no_path: 0,
            round_trip_failures: 0,
            errors: 0,
            latency_samples: VecDeque::with_capacity(max_samples.min(100_000)),
            max_samples: max_samples.max(1),
        }
    }

    /// Record a conversion that produced an amount.
    pub fn record_converted(&mut self, latency_us: u64) {
        self.total_conversions += 1;
        self.converted += 1;
        self.push_sample(latency_us);
    }

    /// Record a conversion that found no path.
    pub fn record_no_path(&mut self, latency_us: u64) {
        self.total_conversions += 1;
        self.no_path += 1;
        self.push_sample(latency_us);
    }

    /// Record a converted amount whose reverse conversion disagreed.
    pub fn record_round_trip_failure(&mut self) {
        self.round_trip_failures += 1;
    }

    /// Record a conversion that failed outright.
    pub fn record_error(&mut self) {
        self.total_conversions += 1;
        self.errors += 1;
    }

    /// Fold another worker's metrics into this one.
    pub fn merge(&mut self, other: SimulationMetrics) {
        self.total_conversions += other.total_conversions;
        self.converted += other.converted;
        self.no_path += other.no_path;
        self.round_trip_failures += other.round_trip_failures;
        self.errors += other.errors;
        for sample in other.latency_samples {
            self.push_sample(sample);
        }
    }

    fn push_sample(&mut self, latency_us: u64) {
        if self.latency_samples.len() >= self.max_samples {
            self.latency_samples.pop_front();
        }
        self.latency_samples.push_back(latency_us);
    }

    /// Get average latency in µs.
    pub fn average_latency_us(&self) -> u64 {
        if self.latency_samples.is_empty() {
            return 0;
        }

        let sum: u64 = self.latency_samples.iter().sum();
        sum / self.latency_samples.len() as u64
    }

    pub fn min_latency_us(&self) -> u64 {
        self.latency_samples.iter().copied().min().unwrap_or(0)
    }

    pub fn max_latency_us(&self) -> u64 {
        self.latency_samples.iter().copied().max().unwrap_or(0)
    }

    /// Get p50 latency.
    pub fn p50_latency_us(&self) -> u64 {
        self.percentile_latency(50)
    }

    /// Get p99 latency.
    pub fn p99_latency_us(&self) -> u64 {
        self.percentile_latency(99)
    }

    fn percentile_latency(&self, percentile: usize) -> u64 {
        if self.latency_samples.is_empty() {
            return 0;
        }

        let mut sorted: Vec<_> = self.latency_samples.iter().copied().collect();
        sorted.sort_unstable();

        let idx = (sorted.len() * percentile / 100).min(sorted.len() - 1);
        sorted[idx]
    }

    /// Get throughput (conversions per second).
    pub fn throughput(&self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }

        self.total_conversions as f64 / secs
    }

    /// Summarize for reporting.
    pub fn summary(&self, elapsed: Duration) -> MetricsSummary {
        MetricsSummary {
            total_conversions: self.total_conversions,
            converted: self.converted,
            no_path: self.no_path,
            round_trip_failures: self.round_trip_failures,
            errors: self.errors,
            min_latency_us: self.min_latency_us(),
            max_latency_us: self.max_latency_us(),
            average_latency_us: self.average_latency_us(),
            p50_latency_us: self.p50_latency_us(),
            p99_latency_us: self.p99_latency_us(),
            throughput_per_sec: self.throughput(elapsed),
        }
    }
}

impl Default for SimulationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let mut metrics = SimulationMetrics::new();

        metrics.record_converted(100);
        metrics.record_converted(200);
        metrics.record_no_path(150);
        metrics.record_error();

        assert_eq!(metrics.total_conversions, 4);
        assert_eq!(metrics.converted, 2);
        assert_eq!(metrics.no_path, 1);
        assert_eq!(metrics.errors, 1);
        assert_eq!(metrics.average_latency_us(), 150);
        assert_eq!(metrics.min_latency_us(), 100);
        assert_eq!(metrics.max_latency_us(), 200);
        assert!(metrics.summary(Duration::from_secs(1)).has_failures());
    }

    #[test]
    fn test_percentiles() {
        let mut metrics = SimulationMetrics::new();
        for latency in 1..=100 {
            metrics.record_converted(latency);
        }

        assert_eq!(metrics.p50_latency_us(), 51);
        assert_eq!(metrics.p99_latency_us(), 100);
    }

    #[test]
    fn test_sample_window() {
        let mut metrics = SimulationMetrics::with_capacity(2);
        metrics.record_converted(1);
        metrics.record_converted(10);
        metrics.record_converted(20);

        assert_eq!(metrics.total_conversions, 3);
        assert_eq!(metrics.min_latency_us(), 10);
    }

    #[test]
    fn test_merge() {
        let mut left = SimulationMetrics::new();
        left.record_converted(10);

        let mut right = SimulationMetrics::new();
        right.record_no_path(30);
        right.record_round_trip_failure();

        left.merge(right);

        assert_eq!(left.total_conversions, 2);
        assert_eq!(left.round_trip_failures, 1);
        assert_eq!(left.average_latency_us(), 20);
        assert!(left.summary(Duration::from_secs(1)).has_failures());
    }

    #[test]
    fn test_empty_metrics() {
        let metrics = SimulationMetrics::default();
        let summary = metrics.summary(Duration::ZERO);

        assert_eq!(summary.p99_latency_us, 0);
        assert_eq!(summary.throughput_per_sec, 0.0);
        assert!(!summary.has_failures());
    }
}
