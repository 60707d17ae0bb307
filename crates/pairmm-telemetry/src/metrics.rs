//! Prometheus metrics for the pair market maker.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. Registration only fails on
//! duplicate metric names, which is a programming error caught at first
//! use, never a runtime condition.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_gauge_vec, register_int_counter, CounterVec, Encoder,
    GaugeVec, IntCounter, TextEncoder,
};

use crate::error::TelemetryResult;

/// Total ticks processed.
pub static TICKS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("pairmm_ticks_total", "Total market snapshots processed").unwrap()
});

/// Total orders emitted.
/// Labels: instrument, side (buy/sell), reason
pub static ORDERS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "pairmm_orders_total",
        "Total orders emitted by the generator",
        &["instrument", "side", "reason"]
    )
    .unwrap()
});

/// Ticks where the fair value was carried over instead of re-estimated.
pub static FAIR_VALUE_SKIPPED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "pairmm_fair_value_skipped_total",
        "Ticks where the fair value estimate was retained",
        &["instrument", "reason"]
    )
    .unwrap()
});

/// Current fair value per instrument.
pub static FAIR_VALUE: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "pairmm_fair_value",
        "Fair value in effect after the last tick",
        &["instrument"]
    )
    .unwrap()
});

/// Metrics facade.
pub struct Metrics;

impl Metrics {
    /// Record a processed tick.
    pub fn tick() {
        TICKS_TOTAL.inc();
    }

    /// Record an emitted order.
    pub fn order(instrument: &str, side: &str, reason: &str) {
        ORDERS_TOTAL
            .with_label_values(&[instrument, side, reason])
            .inc();
    }

    /// Record a retained fair value.
    pub fn fair_value_skipped(instrument: &str, reason: &str) {
        FAIR_VALUE_SKIPPED_TOTAL
            .with_label_values(&[instrument, reason])
            .inc();
    }

    /// Set the fair value gauge.
    pub fn fair_value(instrument: &str, value: f64) {
        FAIR_VALUE.with_label_values(&[instrument]).set(value);
    }

    /// Render the default registry in the Prometheus text format.
    pub fn gather_text() -> TelemetryResult<String> {
        let encoder = TextEncoder::new();
        let mut buf = Vec::new();
        encoder.encode(&prometheus::gather(), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
