use std::sync::Arc;
use std::thread;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratebridge_fx::{ConverterConfig, RateConverter, NO_CONVERSION_PATH};

const CURRENCIES: [&str; 8] = ["USD", "CAD", "GBP", "EUR", "IIR", "JPY", "CNY", "AUD"];

fn scenario_converter() -> RateConverter {
    RateConverter::with_rates(
        ConverterConfig::default(),
        [
            ("USD", "CAD", 1.34),
            ("CAD", "GBP", 0.58),
            ("USD", "EUR", 0.86),
            ("GBP", "IIR", 300000.25),
        ],
    )
    .unwrap()
}

fn full_converter() -> RateConverter {
    RateConverter::with_rates(
        ConverterConfig::default(),
        [
            ("USD", "CAD", 1.34),
            ("CAD", "GBP", 0.58),
            ("USD", "EUR", 0.86),
            ("GBP", "IIR", 300000.25),
            ("GBP", "JPY", 2.5),
            ("CNY", "AUD", 0.2),
        ],
    )
    .unwrap()
}

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0)
}

#[test]
fn test_reference_scenario() {
    let converter = scenario_converter();

    let iir = converter.convert("CAD", "IIR", 50.0).unwrap();
    assert!((iir - 8_700_007.25).abs() < 0.01, "got {iir}");

    let cad = converter.convert("IIR", "CAD", 8_700_007.25).unwrap();
    assert!((cad - 50.0).abs() < 0.01, "got {cad}");

    let eur = converter.convert("CAD", "EUR", 50.0).unwrap();
    assert!((eur - 32.09).abs() < 0.01, "got {eur}");

    assert_eq!(converter.convert("AUD", "USD", 10.0).unwrap(), NO_CONVERSION_PATH);
}

#[test]
fn test_long_chain_within_tolerance() {
    let converter = full_converter();

    let eur = converter.convert("IIR", "EUR", 340000.0).unwrap();
    assert!((eur - 1.2).abs() < 1.0, "got {eur}");

    let usd = converter.convert("EUR", "CAD", 32.0).unwrap();
    assert!((usd - 50.0).abs() < 1.0, "got {usd}");
}

#[test]
fn test_cached_paths_are_stable() {
    let converter = full_converter();

    let first = converter.convert_detailed("JPY", "EUR", 10.0).unwrap();
    let second = converter.convert_detailed("JPY", "EUR", 10.0).unwrap();

    assert_eq!(first.route, second.route);
    assert_eq!(first.output.to_bits(), second.output.to_bits());
}

#[test]
fn test_concurrent_conversions_round_trip() {
    let converter = Arc::new(full_converter());

    let handles: Vec<_> = (0..16u64)
        .map(|worker| {
            let converter = Arc::clone(&converter);
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(worker);
                for _ in 0..500 {
                    let from = CURRENCIES[rng.gen_range(0..CURRENCIES.len())];
                    let to = CURRENCIES[rng.gen_range(0..CURRENCIES.len())];
                    let amount = rng.gen_range(1.0..1_000_000.0);

                    let converted = converter.convert(from, to, amount).unwrap();
                    if converted == NO_CONVERSION_PATH {
                        assert_eq!(
                            converter.convert(to, from, amount).unwrap(),
                            NO_CONVERSION_PATH
                        );
                        continue;
                    }

                    let back = converter.convert(to, from, converted).unwrap();
                    assert!(close(back, amount), "{from}->{to}: {amount} came back as {back}");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_reconfiguration_while_converting() {
    let converter = Arc::new(full_converter());

    let reader = {
        let converter = Arc::clone(&converter);
        thread::spawn(move || {
            for i in 0..2_000 {
                let eur = converter.convert("USD", "EUR", 100.0).unwrap();
                assert!(
                    close(eur, 86.0) || close(eur, 90.0),
                    "iteration {i}: unexpected {eur}"
                );
            }
        })
    };

    for i in 0..50 {
        let rate = if i % 2 == 0 { 0.9 } else { 0.86 };
        converter
            .update_configuration([("USD", "EUR", rate), ("USD", "CAD", 1.34)])
            .unwrap();
    }

    reader.join().unwrap();
}

proptest! {
    #[test]
    fn prop_direct_rate_round_trip(rate in 0.0001f64..10_000.0, amount in 0.01f64..1_000_000.0) {
        let converter = RateConverter::with_rates(
            ConverterConfig::default(),
            [("AAA", "BBB", rate)],
        ).unwrap();

        let forward = converter.convert("AAA", "BBB", amount).unwrap();
        prop_assert!(close(forward, amount * rate));

        let back = converter.convert("BBB", "AAA", forward).unwrap();
        prop_assert!(close(back, amount));
    }

    #[test]
    fn prop_two_hop_composition(
        first in 0.001f64..1000.0,
        second in 0.001f64..1000.0,
        amount in 0.01f64..1_000_000.0,
    ) {
        let converter = RateConverter::with_rates(
            ConverterConfig::default(),
            [("AAA", "BBB", first), ("BBB", "CCC", second)],
        ).unwrap();

        let forward = converter.convert("AAA", "CCC", amount).unwrap();
        prop_assert!(close(forward, amount * first * second));

        let back = converter.convert("CCC", "AAA", forward).unwrap();
        prop_assert!(close(back, amount));
    }

    #[test]
    fn prop_identity_is_exact(code in "[A-Z]{3}", amount in 0.0f64..1e12) {
        let converter = scenario_converter();
        prop_assert_eq!(converter.convert(code.as_str(), code.as_str(), amount).unwrap(), amount);
    }
}
