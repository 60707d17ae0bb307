//! Threshold quoting for the derived instrument.
//!
//! - Buy: best_ask(derived) < fair(derived). Take the full offered size,
//!   hedge by selling a fraction of the derived best-bid size in the
//!   reference instrument at the reference best bid.
//! - Sell: best_bid(derived) > fair(derived). Hit the full bid size,
//!   hedge by buying a fraction of the derived best-ask size in the
//!   reference instrument at the reference best ask.
//!
//! The two checks are independent. Both fire on a book crossed around
//! the fair value.

use pairmm_core::{
    InstrumentId, OrderBook, OrderRequest, OrderSide, Price, PriceLevel, Size, TickResult,
};
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{HedgeRounding, MakerConfig};
use crate::sink::{OrderEventSink, OrderReason};

/// Hedge sizing: `round(|backing| * fraction)` to the lot size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HedgePolicy {
    pub fraction: Decimal,
    pub rounding: HedgeRounding,
    pub lot_size: Size,
}

impl HedgePolicy {
    pub fn from_config(config: &MakerConfig) -> Self {
        Self {
            fraction: config.hedge_fraction,
            rounding: config.hedge_rounding,
            lot_size: config.hedge_lot_size,
        }
    }

    /// Unsigned hedge quantity backed by `backing`.
    pub fn size(&self, backing: Size) -> Size {
        self.rounding
            .apply(backing.abs() * self.fraction, self.lot_size)
            .abs()
    }
}

impl Default for HedgePolicy {
    fn default() -> Self {
        Self::from_config(&MakerConfig::default())
    }
}

/// Everything the generator reads for one tick.
#[derive(Debug, Clone)]
pub struct GeneratorInput<'a> {
    pub derived: &'a InstrumentId,
    pub derived_book: &'a OrderBook,
    pub derived_fair_value: Price,
    pub reference: &'a InstrumentId,
    pub reference_best_bid: Option<PriceLevel>,
    pub reference_best_ask: Option<PriceLevel>,
    pub hedge: HedgePolicy,
}

/// Orders emitted for one tick, split by destination entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedOrders {
    /// Orders in the derived instrument.
    pub quotes: Vec<OrderRequest>,
    /// Orders in the reference instrument.
    pub hedges: Vec<OrderRequest>,
}

impl GeneratedOrders {
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty() && self.hedges.is_empty()
    }

    /// Record into the tick result. The derived entry is created even when
    /// no quote fired; the reference entry only when a hedge did.
    pub fn record_into(self, derived: &InstrumentId, result: &mut TickResult) {
        result.touch(derived);
        for order in self.quotes.into_iter().chain(self.hedges) {
            result.push(order);
        }
    }
}

/// Compare the derived book against its fair value and emit orders.
pub fn generate_orders(
    input: &GeneratorInput<'_>,
    sink: &mut impl OrderEventSink,
) -> GeneratedOrders {
    let mut out = GeneratedOrders::default();
    let fair = input.derived_fair_value;
    let best_ask = input.derived_book.best_ask();
    let best_bid = input.derived_book.best_bid();

    match best_ask {
        Some(ask) if ask.price < fair => {
            if let Some(quote) = take_level(input.derived, ask, OrderSide::Buy) {
                sink.on_order(&quote, OrderReason::UnderpricedAsk);
                out.quotes.push(quote);

                let hedge = size_hedge(
                    input.reference,
                    best_bid,
                    input.reference_best_bid,
                    &input.hedge,
                    OrderSide::Sell,
                );
                if let Some(hedge) = hedge {
                    sink.on_order(&hedge, OrderReason::HedgeSell);
                    out.hedges.push(hedge);
                }
            }
        }
        Some(_) => {}
        None => debug!(instrument = %input.derived, "No offers, skipping buy check"),
    }

    match best_bid {
        Some(bid) if bid.price > fair => {
            if let Some(quote) = take_level(input.derived, bid, OrderSide::Sell) {
                sink.on_order(&quote, OrderReason::OverpricedBid);
                out.quotes.push(quote);

                let hedge = size_hedge(
                    input.reference,
                    best_ask,
                    input.reference_best_ask,
                    &input.hedge,
                    OrderSide::Buy,
                );
                if let Some(hedge) = hedge {
                    sink.on_order(&hedge, OrderReason::HedgeBuy);
                    out.hedges.push(hedge);
                }
            }
        }
        Some(_) => {}
        None => debug!(instrument = %input.derived, "No bids, skipping sell check"),
    }

    out
}

/// Take the whole level on `side`. Zero-size levels produce nothing.
fn take_level(
    instrument: &InstrumentId,
    level: PriceLevel,
    side: OrderSide,
) -> Option<OrderRequest> {
    if level.quantity.is_zero() {
        debug!(%instrument, price = %level.price, %side, "Zero-size level, no quote");
        return None;
    }
    Some(OrderRequest::on_side(
        instrument.clone(),
        side,
        level.price,
        level.quantity,
    ))
}

/// Size the hedge from the derived `backing` level and price it at the
/// reference `touch`. Skipped if either is missing or the size rounds to 0.
fn size_hedge(
    reference: &InstrumentId,
    backing: Option<PriceLevel>,
    touch: Option<PriceLevel>,
    policy: &HedgePolicy,
    side: OrderSide,
) -> Option<OrderRequest> {
    let (Some(backing), Some(touch)) = (backing, touch) else {
        debug!(
            %reference,
            %side,
            has_backing = backing.is_some(),
            has_reference_price = touch.is_some(),
            "Hedge skipped, missing book side"
        );
        return None;
    };

    let size = policy.size(backing.quantity);
    if size.is_zero() {
        debug!(
            %reference,
            %side,
            backing = %backing.quantity,
            "Hedge rounds to zero, skipped"
        );
        return None;
    }

    Some(OrderRequest::on_side(reference.clone(), side, touch.price, size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn px(v: Decimal) -> Price {
        Price::new(v)
    }

    fn qty(v: Decimal) -> Size {
        Size::new(v)
    }

    fn bananas() -> InstrumentId {
        InstrumentId::from("BANANAS")
    }

    fn pearls() -> InstrumentId {
        InstrumentId::from("PEARLS")
    }

    fn reference_book() -> OrderBook {
        OrderBook::new()
            .with_sell(px(dec!(10001)), qty(dec!(-5)))
            .with_buy(px(dec!(9999)), qty(dec!(5)))
    }

    fn run(
        derived_book: &OrderBook,
        fair: Decimal,
        hedge: HedgePolicy,
    ) -> (GeneratedOrders, Vec<(OrderRequest, OrderReason)>) {
        let derived = bananas();
        let reference = pearls();
        let reference_book = reference_book();
        let input = GeneratorInput {
            derived: &derived,
            derived_book,
            derived_fair_value: px(fair),
            reference: &reference,
            reference_best_bid: reference_book.best_bid(),
            reference_best_ask: reference_book.best_ask(),
            hedge,
        };
        let mut events = Vec::new();
        let out = generate_orders(&input, &mut events);
        (out, events)
    }

    #[test]
    fn test_crossed_book_fires_both_sides() {
        let book = OrderBook::new()
            .with_sell(px(dec!(4995)), qty(dec!(8)))
            .with_buy(px(dec!(5010)), qty(dec!(3)));

        let (out, events) = run(&book, dec!(5000), HedgePolicy::default());

        assert_eq!(
            out.quotes,
            vec![
                OrderRequest {
                    instrument: bananas(),
                    price: px(dec!(4995)),
                    quantity: qty(dec!(8)),
                },
                OrderRequest {
                    instrument: bananas(),
                    price: px(dec!(5010)),
                    quantity: qty(dec!(-3)),
                },
            ]
        );

        // Buy hedge: sell trunc(3 / 2) = 1 at reference bid.
        // Sell hedge: buy 8 / 2 = 4 at reference ask.
        assert_eq!(
            out.hedges,
            vec![
                OrderRequest {
                    instrument: pearls(),
                    price: px(dec!(9999)),
                    quantity: qty(dec!(-1)),
                },
                OrderRequest {
                    instrument: pearls(),
                    price: px(dec!(10001)),
                    quantity: qty(dec!(4)),
                },
            ]
        );

        let reasons: Vec<OrderReason> = events.iter().map(|(_, r)| *r).collect();
        assert_eq!(
            reasons,
            vec![
                OrderReason::UnderpricedAsk,
                OrderReason::HedgeSell,
                OrderReason::OverpricedBid,
                OrderReason::HedgeBuy,
            ]
        );
    }

    #[test]
    fn test_no_offers_skips_buy_check() {
        let book = OrderBook::new().with_buy(px(dec!(5010)), qty(dec!(3)));
        let (out, events) = run(&book, dec!(5000), HedgePolicy::default());

        assert_eq!(out.quotes.len(), 1);
        assert_eq!(out.quotes[0].side(), OrderSide::Sell);
        // Hedge buy is backed by the derived ask size, which does not exist
        assert!(out.hedges.is_empty());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_no_bids_skips_sell_check() {
        let book = OrderBook::new().with_sell(px(dec!(4995)), qty(dec!(-8)));
        let (out, _) = run(&book, dec!(5000), HedgePolicy::default());

        assert_eq!(out.quotes.len(), 1);
        assert_eq!(out.quotes[0].side(), OrderSide::Buy);
        assert_eq!(out.quotes[0].quantity, qty(dec!(8)));
        assert!(out.hedges.is_empty());
    }

    #[test]
    fn test_fairly_priced_book_emits_nothing() {
        let book = OrderBook::new()
            .with_sell(px(dec!(5001)), qty(dec!(8)))
            .with_buy(px(dec!(4999)), qty(dec!(3)));
        let (out, events) = run(&book, dec!(5000), HedgePolicy::default());
        assert!(out.is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn test_touch_equal_to_fair_does_not_fire() {
        let book = OrderBook::new()
            .with_sell(px(dec!(5000)), qty(dec!(8)))
            .with_buy(px(dec!(5000)), qty(dec!(3)));
        let (out, _) = run(&book, dec!(5000), HedgePolicy::default());
        assert!(out.is_empty());
    }

    #[test]
    fn test_exact_hedge_keeps_fraction() {
        let book = OrderBook::new()
            .with_sell(px(dec!(4995)), qty(dec!(8)))
            .with_buy(px(dec!(4990)), qty(dec!(3)));
        let policy = HedgePolicy {
            rounding: HedgeRounding::Exact,
            ..HedgePolicy::default()
        };
        let (out, _) = run(&book, dec!(5000), policy);

        assert_eq!(out.quotes.len(), 1);
        assert_eq!(out.hedges.len(), 1);
        assert_eq!(out.hedges[0].quantity, qty(dec!(-1.5)));
        assert_eq!(out.hedges[0].price, px(dec!(9999)));
    }

    #[test]
    fn test_nearest_hedge_rounds_half_up() {
        let book = OrderBook::new()
            .with_sell(px(dec!(4995)), qty(dec!(8)))
            .with_buy(px(dec!(4990)), qty(dec!(3)));
        let policy = HedgePolicy {
            rounding: HedgeRounding::Nearest,
            ..HedgePolicy::default()
        };
        let (out, events) = run(&book, dec!(5000), policy);

        // 3 * 0.5 = 1.5 -> 2
        assert_eq!(out.hedges.len(), 1);
        assert_eq!(out.hedges[0].quantity, qty(dec!(-2)));
        assert_eq!(out.hedges[0].price, px(dec!(9999)));
        assert_eq!(events[1].1, OrderReason::HedgeSell);
    }

    #[test]
    fn test_hedge_rounding_to_zero_is_skipped() {
        let book = OrderBook::new()
            .with_sell(px(dec!(4995)), qty(dec!(8)))
            .with_buy(px(dec!(4990)), qty(dec!(1)));
        let (out, events) = run(&book, dec!(5000), HedgePolicy::default());

        // trunc(1 / 2) = 0
        assert_eq!(out.quotes.len(), 1);
        assert!(out.hedges.is_empty());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_zero_size_level_emits_nothing() {
        let book = OrderBook::new().with_sell(px(dec!(4995)), Size::ZERO);
        let (out, _) = run(&book, dec!(5000), HedgePolicy::default());
        assert!(out.is_empty());
    }

    #[test]
    fn test_missing_reference_touch_skips_hedge() {
        let derived = bananas();
        let reference = pearls();
        let book = OrderBook::new()
            .with_sell(px(dec!(4995)), qty(dec!(8)))
            .with_buy(px(dec!(4990)), qty(dec!(4)));
        let input = GeneratorInput {
            derived: &derived,
            derived_book: &book,
            derived_fair_value: px(dec!(5000)),
            reference: &reference,
            reference_best_bid: None,
            reference_best_ask: None,
            hedge: HedgePolicy::default(),
        };
        let out = generate_orders(&input, &mut crate::sink::NoopSink);
        assert_eq!(out.quotes.len(), 1);
        assert!(out.hedges.is_empty());
    }

    #[test]
    fn test_record_into_routes_hedges() {
        let book = OrderBook::new()
            .with_sell(px(dec!(4995)), qty(dec!(8)))
            .with_buy(px(dec!(5010)), qty(dec!(3)));
        let (out, _) = run(&book, dec!(5000), HedgePolicy::default());

        let mut result = TickResult::new();
        out.record_into(&bananas(), &mut result);

        let derived = result.orders_for(&bananas()).unwrap();
        assert_eq!(derived.len(), 2);
        assert!(derived.iter().all(|o| o.instrument == bananas()));

        let reference = result.orders_for(&pearls()).unwrap();
        assert_eq!(reference.len(), 2);
        assert!(reference.iter().all(|o| o.instrument == pearls()));
    }

    #[test]
    fn test_record_into_keeps_empty_derived_entry() {
        let mut result = TickResult::new();
        GeneratedOrders::default().record_into(&bananas(), &mut result);
        assert_eq!(result.orders_for(&bananas()).unwrap().len(), 0);
        assert!(!result.contains(&pearls()));
    }
}
