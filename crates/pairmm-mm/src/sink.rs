//! Observer hook for emitted orders.
//!
//! The generator reports every order it emits exactly once, after the
//! decision is made. Sinks must not influence the decision.

use pairmm_core::OrderRequest;

/// Why an order was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderReason {
    /// Derived best ask below derived fair value.
    UnderpricedAsk,
    /// Derived best bid above derived fair value.
    OverpricedBid,
    /// Reference sell offsetting an `UnderpricedAsk` buy.
    HedgeSell,
    /// Reference buy offsetting an `OverpricedBid` sell.
    HedgeBuy,
}

impl OrderReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnderpricedAsk => "underpriced_ask",
            Self::OverpricedBid => "overpriced_bid",
            Self::HedgeSell => "hedge_sell",
            Self::HedgeBuy => "hedge_buy",
        }
    }
}

impl std::fmt::Display for OrderReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives one callback per emitted order.
pub trait OrderEventSink {
    fn on_order(&mut self, order: &OrderRequest, reason: OrderReason);
}

/// Discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl OrderEventSink for NoopSink {
    fn on_order(&mut self, _order: &OrderRequest, _reason: OrderReason) {}
}

/// Records events in emission order.
impl OrderEventSink for Vec<(OrderRequest, OrderReason)> {
    fn on_order(&mut self, order: &OrderRequest, reason: OrderReason) {
        self.push((order.clone(), reason));
    }
}

impl<S: OrderEventSink + ?Sized> OrderEventSink for &mut S {
    fn on_order(&mut self, order: &OrderRequest, reason: OrderReason) {
        (**self).on_order(order, reason);
    }
}

/// Fan out to two sinks, first then second.
impl<A: OrderEventSink, B: OrderEventSink> OrderEventSink for (A, B) {
    fn on_order(&mut self, order: &OrderRequest, reason: OrderReason) {
        self.0.on_order(order, reason);
        self.1.on_order(order, reason);
    }
}
