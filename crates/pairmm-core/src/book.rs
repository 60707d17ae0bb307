//! Per-tick order book and market snapshot types.
//!
//! A book holds resting sells and resting bids as price → quantity maps.
//! Crossed books are legal input; `BookState` only describes them.

use crate::error::Result;
use crate::{InstrumentId, Price, Size};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A price paired with its resting quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: Price,
    /// Signed as stored in the book. Use `quantity.abs()` for sizing.
    pub quantity: Size,
}

impl PriceLevel {
    pub fn new(price: Price, quantity: Size) -> Self {
        Self { price, quantity }
    }
}

/// Shape of a book's top level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookState {
    /// Both sides present and best bid < best ask.
    TwoSided,
    /// No resting bids.
    NoBid,
    /// No resting offers.
    NoAsk,
    /// Both sides empty.
    Empty,
    /// Best bid >= best ask.
    Crossed,
}

impl std::fmt::Display for BookState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TwoSided => write!(f, "TWO_SIDED"),
            Self::NoBid => write!(f, "NO_BID"),
            Self::NoAsk => write!(f, "NO_ASK"),
            Self::Empty => write!(f, "EMPTY"),
            Self::Crossed => write!(f, "CROSSED"),
        }
    }
}

/// Resting orders for one instrument in one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    /// Resting offers: price → offered quantity (may be negative).
    #[serde(default)]
    pub sell_orders: BTreeMap<Price, Size>,
    /// Resting bids: price → bid quantity.
    #[serde(default)]
    pub buy_orders: BTreeMap<Price, Size>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a resting offer.
    pub fn with_sell(mut self, price: Price, quantity: Size) -> Self {
        self.sell_orders.insert(price, quantity);
        self
    }

    /// Add or replace a resting bid.
    pub fn with_buy(mut self, price: Price, quantity: Size) -> Self {
        self.buy_orders.insert(price, quantity);
        self
    }

    /// Lowest resting offer, if any.
    pub fn best_ask(&self) -> Option<PriceLevel> {
        self.sell_orders
            .iter()
            .next()
            .map(|(p, q)| PriceLevel::new(*p, *q))
    }

    /// Highest resting bid, if any.
    pub fn best_bid(&self) -> Option<PriceLevel> {
        self.buy_orders
            .iter()
            .next_back()
            .map(|(p, q)| PriceLevel::new(*p, *q))
    }

    pub fn sell_levels(&self) -> impl Iterator<Item = PriceLevel> + '_ {
        self.sell_orders.iter().map(|(p, q)| PriceLevel::new(*p, *q))
    }

    pub fn buy_levels(&self) -> impl Iterator<Item = PriceLevel> + '_ {
        self.buy_orders.iter().map(|(p, q)| PriceLevel::new(*p, *q))
    }

    pub fn is_empty(&self) -> bool {
        self.sell_orders.is_empty() && self.buy_orders.is_empty()
    }

    pub fn state(&self) -> BookState {
        match (self.best_bid(), self.best_ask()) {
            (None, None) => BookState::Empty,
            (Some(_), None) => BookState::NoAsk,
            (None, Some(_)) => BookState::NoBid,
            (Some(bid), Some(ask)) => {
                if bid.price < ask.price {
                    BookState::TwoSided
                } else {
                    BookState::Crossed
                }
            }
        }
    }
}

/// All order books observed in one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Exchange timestamp of the tick, when the feed provides one.
    #[serde(default)]
    pub timestamp: Option<i64>,
    pub order_depths: BTreeMap<InstrumentId, OrderBook>,
}

impl MarketSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_book(mut self, instrument: InstrumentId, book: OrderBook) -> Self {
        self.order_depths.insert(instrument, book);
        self
    }

    pub fn book(&self, instrument: &InstrumentId) -> Option<&OrderBook> {
        self.order_depths.get(instrument)
    }

    /// Parse one JSON snapshot, e.g. a single line of a replay file.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}
