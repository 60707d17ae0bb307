//! Order event sinks backed by tracing and Prometheus.

use pairmm_core::{InstrumentId, OrderRequest};
use pairmm_mm::{FairValueUpdate, OrderEventSink, OrderReason, TickOutcome};
use tracing::info;

use crate::metrics::Metrics;

/// Logs each emitted order as a structured `info` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl OrderEventSink for TracingSink {
    fn on_order(&mut self, order: &OrderRequest, reason: OrderReason) {
        info!(
            instrument = %order.instrument,
            side = %order.side(),
            price = %order.price,
            quantity = %order.quantity,
            %reason,
            "Order emitted"
        );
    }
}

/// Counts emitted orders in `pairmm_orders_total`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSink;

impl MetricsSink {
    /// Record per-tick gauges and counters once the tick is done.
    pub fn record_tick(
        &self,
        outcome: &TickOutcome,
        reference: &InstrumentId,
        derived: &InstrumentId,
    ) {
        Metrics::tick();

        if let FairValueUpdate::Retained(_, reason) = outcome.reference_fair_value {
            Metrics::fair_value_skipped(reference.as_str(), &reason.to_string());
        }
        if let Some(value) = outcome.reference_fair_value.value().to_f64() {
            Metrics::fair_value(reference.as_str(), value);
        }
        if let Some(value) = outcome.derived_fair_value.to_f64() {
            Metrics::fair_value(derived.as_str(), value);
        }
    }
}

impl OrderEventSink for MetricsSink {
    fn on_order(&mut self, order: &OrderRequest, reason: OrderReason) {
        Metrics::order(
            order.instrument.as_str(),
            &order.side().to_string(),
            reason.as_str(),
        );
    }
}
