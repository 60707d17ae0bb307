//! One-tick pipeline: estimate reference → relate → quote derived.

use pairmm_core::{MarketSnapshot, Price, TickResult};
use tracing::{debug, info, trace};

use crate::config::MakerConfig;
use crate::error::MakerResult;
use crate::fair_value::{update_fair_value, FairValueUpdate};
use crate::generator::{generate_orders, GeneratorInput, HedgePolicy};
use crate::relation::PriceRelation;
use crate::sink::OrderEventSink;
use crate::state::EstimatorState;

/// Everything one tick produced.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    /// Orders grouped by instrument.
    pub orders: TickResult,
    /// State to pass into the next tick.
    pub state: EstimatorState,
    /// Reference estimator result for this tick.
    pub reference_fair_value: FairValueUpdate,
    /// Derived fair value used by the generator.
    pub derived_fair_value: Price,
}

/// Pair market maker.
///
/// Holds only validated configuration; all per-tick memory lives in the
/// `EstimatorState` passed through `on_tick`.
#[derive(Debug, Clone)]
pub struct PairMaker {
    config: MakerConfig,
    relation: PriceRelation,
    hedge: HedgePolicy,
}

impl PairMaker {
    /// Create a maker, validating the configuration once.
    pub fn new(config: MakerConfig) -> MakerResult<Self> {
        config.validate()?;
        let relation = PriceRelation::new(config.price_ratio)?;
        let hedge = HedgePolicy::from_config(&config);
        Ok(Self {
            config,
            relation,
            hedge,
        })
    }

    pub fn config(&self) -> &MakerConfig {
        &self.config
    }

    /// Process one snapshot.
    ///
    /// The derived instrument is only quoted after the reference fair value
    /// for this tick is final. The derived fair value moves only when the
    /// reference estimator produced a fresh value; otherwise it keeps its
    /// previous value, or the configured default on first use.
    pub fn on_tick(
        &self,
        snapshot: &MarketSnapshot,
        mut state: EstimatorState,
        sink: &mut impl OrderEventSink,
    ) -> TickOutcome {
        let reference = &self.config.reference_instrument;
        let derived = &self.config.derived_instrument;

        for instrument in snapshot.order_depths.keys() {
            if instrument != reference && instrument != derived {
                trace!(%instrument, "Not part of the configured pair, ignored");
            }
        }

        // Reference estimator
        let reference_book = snapshot.book(reference);
        let previous = state.fair_value_or(reference, self.config.default_reference_fair_value);
        let reference_fair_value = update_fair_value(reference_book, previous);
        match reference_fair_value {
            FairValueUpdate::Updated(value) => state.set_fair_value(reference.clone(), value),
            FairValueUpdate::Retained(value, reason) => {
                debug!(
                    instrument = %reference,
                    fair_value = %value,
                    %reason,
                    "Reference fair value retained"
                );
            }
        }

        // Price relation
        let derived_fair_value = match reference_fair_value {
            FairValueUpdate::Updated(value) => {
                let derived_value = self.relation.derive(value);
                state.set_fair_value(derived.clone(), derived_value);
                derived_value
            }
            FairValueUpdate::Retained(..) => {
                state.fair_value_or(derived, self.config.default_derived_fair_value)
            }
        };

        // Order generator
        let mut orders = TickResult::new();
        match snapshot.book(derived) {
            Some(derived_book) => {
                let input = GeneratorInput {
                    derived,
                    derived_book,
                    derived_fair_value,
                    reference,
                    reference_best_bid: reference_book.and_then(|b| b.best_bid()),
                    reference_best_ask: reference_book.and_then(|b| b.best_ask()),
                    hedge: self.hedge,
                };
                generate_orders(&input, sink).record_into(derived, &mut orders);
            }
            None => debug!(instrument = %derived, "Derived book absent, no quotes"),
        }

        info!(
            timestamp = ?snapshot.timestamp,
            reference_fair_value = %reference_fair_value.value(),
            reference_updated = reference_fair_value.is_updated(),
            derived_fair_value = %derived_fair_value,
            orders = orders.order_count(),
            "Tick processed"
        );

        TickOutcome {
            orders,
            state,
            reference_fair_value,
            derived_fair_value,
        }
    }
}
