//! RateBridge Simulator
//!
//! Runs a built-in rate scenario against the converter: checks known
//! conversions, then drives concurrent random conversions and reports
//! latency and accuracy.

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod controller;
mod metrics;
mod scenario;

use controller::SimulationController;
use ratebridge_fx::ConverterConfig;
use scenario::Scenario;

/// RateBridge Simulator CLI
#[derive(Parser, Debug)]
#[command(name = "simulator")]
#[command(about = "RateBridge conversion scenario runner")]
struct Args {
    /// Scenario to run (reference, chain, disconnected)
    #[arg(short, long, default_value = "reference")]
    scenario: String,

    /// Number of random conversions in the load phase
    #[arg(short, long, default_value = "10000")]
    conversions: usize,

    /// Upper bound for randomly generated amounts
    #[arg(long, default_value = "1000000")]
    max_amount: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Absolute tolerance for probe results
    #[arg(long, default_value = "1.0")]
    tolerance: f64,

    /// Number of load workers (defaults to available parallelism)
    #[arg(long)]
    workers: Option<usize>,

    /// Emit JSON logs and print the report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so a JSON report on stdout stays parseable
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(
            args.json
                .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
        .with(
            (!args.json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
        .init();

    info!("Starting RateBridge Simulator");

    let config = ConverterConfig::from_env();
    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(e.into());
    }
    info!(
        hop_cost = config.hop_cost,
        reverse_fallback = config.reverse_fallback,
        cache_enabled = config.cache_enabled,
        "Converter configured"
    );

    let scenario = Scenario::load(&args.scenario)?;

    let mut controller =
        SimulationController::new(config, args.seed, args.tolerance, args.max_amount)?;
    if let Some(workers) = args.workers {
        controller = controller.with_workers(workers);
    }

    let report = controller.run_scenario(&scenario, args.conversions).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        info!("Simulation complete in {}ms", report.elapsed_ms);
        info!(
            "Probes: {} passed, {} failed",
            report.probes.len() - report.failed_probes(),
            report.failed_probes()
        );
        info!("Conversions: {}", report.load.total_conversions);
        info!("No path: {}", report.load.no_path);
        info!("Round-trip failures: {}", report.load.round_trip_failures);
        info!(
            "Latency (µs): min {} / avg {} / p50 {} / p99 {} / max {}",
            report.load.min_latency_us,
            report.load.average_latency_us,
            report.load.p50_latency_us,
            report.load.p99_latency_us,
            report.load.max_latency_us
        );
        info!("Throughput: {:.0} conversions/s", report.load.throughput_per_sec);
        info!(
            "Path cache: {} hits, {} misses",
            report.cache_hits, report.cache_misses
        );
    }

    if !report.passed() {
        anyhow::bail!(
            "Scenario {} failed: {} probe failures, {} round-trip failures, {} errors",
            report.scenario,
            report.failed_probes(),
            report.load.round_trip_failures,
            report.load.errors
        );
    }

    Ok(())
}
