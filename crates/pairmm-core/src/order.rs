//! Order requests emitted by the strategy.
//!
//! Quantities carry the side: positive is a buy, negative is a sell.

use crate::{InstrumentId, Price, Size};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Order side: buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// A single order handed to the execution collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub instrument: InstrumentId,
    pub price: Price,
    /// Signed quantity: positive = buy, negative = sell.
    pub quantity: Size,
}

impl OrderRequest {
    /// Buy `size` (magnitude taken) at `price`.
    pub fn buy(instrument: InstrumentId, price: Price, size: Size) -> Self {
        Self {
            instrument,
            price,
            quantity: size.abs(),
        }
    }

    /// Sell `size` (magnitude taken) at `price`.
    pub fn sell(instrument: InstrumentId, price: Price, size: Size) -> Self {
        Self {
            instrument,
            price,
            quantity: -size.abs(),
        }
    }

    /// Order on `side`; the quantity sign follows the side.
    pub fn on_side(instrument: InstrumentId, side: OrderSide, price: Price, size: Size) -> Self {
        match side {
            OrderSide::Buy => Self::buy(instrument, price, size),
            OrderSide::Sell => Self::sell(instrument, price, size),
        }
    }

    pub fn side(&self) -> OrderSide {
        if self.quantity.inner().is_sign_negative() {
            OrderSide::Sell
        } else {
            OrderSide::Buy
        }
    }
}

impl fmt::Display for OrderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}x {} @ {}",
            self.side(),
            self.quantity.abs(),
            self.instrument,
            self.price
        )
    }
}

/// Orders produced in one tick, grouped by instrument.
///
/// Only instruments the strategy acted on have an entry. Orders keep
/// their emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TickResult(BTreeMap<InstrumentId, Vec<OrderRequest>>);

impl TickResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure an entry exists for the instrument, even if no order follows.
    pub fn touch(&mut self, instrument: &InstrumentId) {
        self.0.entry(instrument.clone()).or_default();
    }

    /// Append an order under its own instrument's entry.
    pub fn push(&mut self, order: OrderRequest) {
        self.0.entry(order.instrument.clone()).or_default().push(order);
    }

    pub fn orders_for(&self, instrument: &InstrumentId) -> Option<&[OrderRequest]> {
        self.0.get(instrument).map(Vec::as_slice)
    }

    pub fn contains(&self, instrument: &InstrumentId) -> bool {
        self.0.contains_key(instrument)
    }

    /// Total number of orders across all instruments.
    pub fn order_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
