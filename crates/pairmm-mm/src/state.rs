//! Last-known fair values, carried between ticks by the caller.

use std::collections::BTreeMap;

use pairmm_core::{InstrumentId, Price};
use serde::{Deserialize, Serialize};

/// Fair values from previous ticks.
///
/// The strategy holds no state of its own. The caller moves this value
/// into each tick and keeps the one handed back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatorState {
    fair_values: BTreeMap<InstrumentId, Price>,
}

impl EstimatorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known fair value, if any tick produced one.
    pub fn fair_value(&self, instrument: &InstrumentId) -> Option<Price> {
        self.fair_values.get(instrument).copied()
    }

    /// Last known fair value, or `default` on first use.
    pub fn fair_value_or(&self, instrument: &InstrumentId, default: Price) -> Price {
        self.fair_value(instrument).unwrap_or(default)
    }

    pub fn set_fair_value(&mut self, instrument: InstrumentId, value: Price) {
        self.fair_values.insert(instrument, value);
    }

    pub fn is_empty(&self) -> bool {
        self.fair_values.is_empty()
    }
}
