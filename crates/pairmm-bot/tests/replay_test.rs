//! Replay integration tests.
//!
//! Runs the fixture snapshot file through the full host pipeline:
//! config → maker → replay → JSON output.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use pairmm_bot::{AppConfig, Replayer};
use pairmm_core::{InstrumentId, Price};
use pairmm_mm::PairMaker;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

fn fixture(name: &str) -> BufReader<File> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    BufReader::new(File::open(path).unwrap())
}

/// Decimals are serialized as strings; compare by value, not scale.
fn num(v: &Value) -> Decimal {
    v.as_str().unwrap().parse().unwrap()
}

fn replay(config: AppConfig) -> (pairmm_bot::ReplaySummary, Vec<Value>) {
    let maker = PairMaker::new(config.maker).unwrap();
    let replayer = Replayer::new(maker, config.telemetry.metrics_enabled);

    let mut out = Vec::new();
    let summary = replayer.run(fixture("ticks.jsonl"), &mut out).unwrap();
    let lines = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    (summary, lines)
}

#[test]
fn test_fixture_replay_with_defaults() {
    let (summary, lines) = replay(AppConfig::default());

    assert_eq!(summary.ticks, 4);
    assert_eq!(lines.len(), 4);

    // Tick 0: reference only, nothing to quote
    assert!(lines[0]["orders"].as_object().unwrap().is_empty());

    // Tick 100: crossed derived book around 5000, both sides fire
    let bananas = lines[1]["orders"]["BANANAS"].as_array().unwrap();
    assert_eq!(bananas.len(), 2);
    assert_eq!(num(&bananas[0]["price"]), dec!(4995));
    assert_eq!(num(&bananas[0]["quantity"]), dec!(8));
    assert_eq!(num(&bananas[1]["price"]), dec!(5010));
    assert_eq!(num(&bananas[1]["quantity"]), dec!(-3));
    let pearls = lines[1]["orders"]["PEARLS"].as_array().unwrap();
    assert_eq!(pearls.len(), 2);

    // Tick 200: one-sided reference keeps 10000; bid 5002 > 5000 sells,
    // hedge skipped for lack of a derived ask
    let bananas = lines[2]["orders"]["BANANAS"].as_array().unwrap();
    assert_eq!(bananas.len(), 1);
    assert_eq!(num(&bananas[0]["quantity"]), dec!(-6));
    assert!(lines[2]["orders"].get("PEARLS").is_none());

    // Tick 300: reference absent, fairly priced derived book
    assert!(lines[3]["orders"]["BANANAS"].as_array().unwrap().is_empty());

    assert_eq!(summary.orders, 5);
    assert_eq!(
        summary.state.fair_value(&InstrumentId::from("PEARLS")),
        Some(Price::new(dec!(10000)))
    );
}

#[test]
fn test_fixture_replay_with_exact_hedges() {
    let config = AppConfig::from_toml(
        r#"
[maker]
hedge_rounding = "exact"

[telemetry]
metrics_enabled = false
"#,
    )
    .unwrap();
    let (_, lines) = replay(config);

    let pearls = lines[1]["orders"]["PEARLS"].as_array().unwrap();
    assert_eq!(num(&pearls[0]["quantity"]), dec!(-1.5));
    assert_eq!(num(&pearls[0]["price"]), dec!(9999));
    assert_eq!(num(&pearls[1]["quantity"]), dec!(4.0));
    assert_eq!(num(&pearls[1]["price"]), dec!(10001));
}
