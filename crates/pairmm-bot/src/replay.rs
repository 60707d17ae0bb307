//! Replay loop: snapshots in, orders out.

use std::io::{BufRead, Write};

use pairmm_core::TickResult;
use pairmm_mm::{EstimatorState, PairMaker};
use pairmm_telemetry::{MetricsSink, TracingSink};
use serde::Serialize;
use tracing::info;

use crate::error::AppResult;
use crate::snapshot::SnapshotReader;

/// One output line.
#[derive(Debug, Serialize)]
struct TickRecord<'a> {
    timestamp: Option<i64>,
    orders: &'a TickResult,
}

/// Totals for a finished replay.
#[derive(Debug, Clone, Default)]
pub struct ReplaySummary {
    pub ticks: usize,
    pub orders: usize,
    /// State after the last tick.
    pub state: EstimatorState,
}

/// Feeds snapshots through a `PairMaker`, one tick per snapshot.
pub struct Replayer {
    maker: PairMaker,
    metrics_enabled: bool,
}

impl Replayer {
    pub fn new(maker: PairMaker, metrics_enabled: bool) -> Self {
        Self {
            maker,
            metrics_enabled,
        }
    }

    /// Run every snapshot in `input`, writing one JSON line per tick to `out`.
    ///
    /// Stops at the first unreadable snapshot.
    pub fn run<R: BufRead, W: Write>(&self, input: R, out: &mut W) -> AppResult<ReplaySummary> {
        let config = self.maker.config();
        let mut summary = ReplaySummary::default();
        let mut state = EstimatorState::new();

        for snapshot in SnapshotReader::new(input) {
            let snapshot = snapshot?;

            let outcome = if self.metrics_enabled {
                let mut sink = (TracingSink, MetricsSink);
                self.maker.on_tick(&snapshot, state, &mut sink)
            } else {
                self.maker.on_tick(&snapshot, state, &mut TracingSink)
            };

            if self.metrics_enabled {
                MetricsSink.record_tick(
                    &outcome,
                    &config.reference_instrument,
                    &config.derived_instrument,
                );
            }

            let record = TickRecord {
                timestamp: snapshot.timestamp,
                orders: &outcome.orders,
            };
            serde_json::to_writer(&mut *out, &record)?;
            out.write_all(b"\n")?;

            summary.ticks += 1;
            summary.orders += outcome.orders.order_count();
            state = outcome.state;
        }

        out.flush()?;
        info!(
            ticks = summary.ticks,
            orders = summary.orders,
            "Replay finished"
        );
        summary.state = state;
        Ok(summary)
    }
}
