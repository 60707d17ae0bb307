//! Pair market making strategy.
//!
//! Quotes a derived instrument against a fair value implied by a
//! reference instrument:
//! - Fair value estimation from the reference book (distance-weighted depth)
//! - Fixed-ratio relation from reference to derived fair value
//! - Threshold quoting on the derived book with half-size reference hedges
//!
//! # Architecture
//!
//! ```text
//! MarketSnapshot → PairMaker.on_tick(state)
//!                   ├─ fair_value: reference book → reference fair value
//!                   ├─ relation:   reference / ratio → derived fair value
//!                   └─ generator:  derived book vs fair → quotes + hedges
//!                        ↓
//!                   TickResult + EstimatorState (next tick)
//! ```

pub mod config;
pub mod error;
pub mod fair_value;
pub mod generator;
pub mod maker;
pub mod relation;
pub mod sink;
pub mod state;

pub use config::{HedgeRounding, MakerConfig};
pub use error::{MakerError, MakerResult};
pub use fair_value::{
    estimate_fair_value, update_fair_value, FairValueUpdate, RetainReason, SideWeight,
};
pub use generator::{generate_orders, GeneratedOrders, GeneratorInput, HedgePolicy};
pub use maker::{PairMaker, TickOutcome};
pub use relation::PriceRelation;
pub use sink::{NoopSink, OrderEventSink, OrderReason};
pub use state::EstimatorState;
