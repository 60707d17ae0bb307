//! Fair value estimation from a single order book.
//!
//! Each side's depth is weighted by `|q| * exp(-|p - best|)`, so only
//! levels within a few price units of the touch contribute. The two side
//! weights then blend the best prices crosswise:
//!
//! ```text
//! fair = (ask_weight * best_bid + bid_weight * best_ask) / (ask_weight + bid_weight)
//! ```
//!
//! Heavy resting offers near the ask pull the estimate toward the bid,
//! heavy resting bids pull it toward the ask.

use pairmm_core::{BookState, OrderBook, Price, PriceLevel};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Exponentially weighted depth of one book side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideWeight {
    /// Best price on this side and its quantity.
    pub best: PriceLevel,
    /// `Σ |q| * exp(-|p - best|)` over the side.
    pub weight: f64,
}

/// Why a tick left the fair value untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetainReason {
    /// Instrument absent from the snapshot.
    MissingBook,
    /// One or both book sides are empty.
    OneSided(BookState),
    /// Total weight was zero or the blend was not finite.
    DegenerateWeights,
}

impl std::fmt::Display for RetainReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingBook => write!(f, "missing_book"),
            Self::OneSided(state) => write!(f, "one_sided:{state}"),
            Self::DegenerateWeights => write!(f, "degenerate_weights"),
        }
    }
}

/// Result of one estimator pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FairValueUpdate {
    /// A fresh estimate from this tick's book.
    Updated(Price),
    /// The previous value, carried over.
    Retained(Price, RetainReason),
}

impl FairValueUpdate {
    /// Fair value in effect after this pass.
    pub fn value(&self) -> Price {
        match self {
            Self::Updated(p) | Self::Retained(p, _) => *p,
        }
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }
}

/// Weighted depth of `levels` measured from `best`.
///
/// Returns None if a price or quantity cannot be represented as f64.
pub fn depth_weight(levels: impl Iterator<Item = PriceLevel>, best: Price) -> Option<f64> {
    let mut weight = 0.0;
    for level in levels {
        let volume = level.quantity.abs().to_f64()?;
        let distance = Price::new(level.price.distance(best)).to_f64()?;
        weight += volume * (-distance).exp();
    }
    Some(weight)
}

/// Weighted depth of the sell side, anchored at the best ask.
pub fn ask_weight(book: &OrderBook) -> Option<SideWeight> {
    let best = book.best_ask()?;
    let weight = depth_weight(book.sell_levels(), best.price)?;
    Some(SideWeight { best, weight })
}

/// Weighted depth of the buy side, anchored at the best bid.
pub fn bid_weight(book: &OrderBook) -> Option<SideWeight> {
    let best = book.best_bid()?;
    let weight = depth_weight(book.buy_levels(), best.price)?;
    Some(SideWeight { best, weight })
}

/// Blend best bid and best ask by the opposite side's weight.
///
/// Evaluated as `bid + (ask - bid) * bid_w / (bid_w + ask_w)`, which is
/// the same blend but stays within `[min(bid, ask), max(bid, ask)]`
/// under decimal rounding. Returns None if the weights cannot produce a
/// finite share.
pub fn blend(bid: &SideWeight, ask: &SideWeight) -> Option<Price> {
    let total = bid.weight + ask.weight;
    if !total.is_finite() || total <= 0.0 {
        return None;
    }

    let share = bid.weight / total;
    if !share.is_finite() {
        return None;
    }
    let share = Decimal::from_f64_retain(share.clamp(0.0, 1.0))?;

    let bid_px = bid.best.price;
    let ask_px = ask.best.price;
    Some(bid_px + (ask_px - bid_px) * share)
}

/// Estimate a fair value from one book.
///
/// Returns None when either side is empty or the weights are degenerate.
pub fn estimate_fair_value(book: &OrderBook) -> Option<Price> {
    let ask = ask_weight(book)?;
    let bid = bid_weight(book)?;
    blend(&bid, &ask)
}

/// Run the estimator against this tick's book, falling back to `previous`.
pub fn update_fair_value(book: Option<&OrderBook>, previous: Price) -> FairValueUpdate {
    let Some(book) = book else {
        return FairValueUpdate::Retained(previous, RetainReason::MissingBook);
    };

    let state = book.state();
    let (Some(bid), Some(ask)) = (bid_weight(book), ask_weight(book)) else {
        return FairValueUpdate::Retained(previous, RetainReason::OneSided(state));
    };

    if state == BookState::Crossed {
        debug!(
            best_bid = %bid.best.price,
            best_ask = %ask.best.price,
            "Crossed book, estimating anyway"
        );
    }

    match blend(&bid, &ask) {
        Some(value) => {
            debug!(
                bid_weight = bid.weight,
                ask_weight = ask.weight,
                best_bid = %bid.best.price,
                best_ask = %ask.best.price,
                fair_value = %value,
                "Fair value estimated"
            );
            FairValueUpdate::Updated(value)
        }
        None => {
            warn!(
                bid_weight = bid.weight,
                ask_weight = ask.weight,
                previous = %previous,
                "Degenerate book weights, keeping previous fair value"
            );
            FairValueUpdate::Retained(previous, RetainReason::DegenerateWeights)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairmm_core::Size;
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal_macros::dec;

    fn px(v: Decimal) -> Price {
        Price::new(v)
    }

    fn qty(v: Decimal) -> Size {
        Size::new(v)
    }

    fn reference_book() -> OrderBook {
        OrderBook::new()
            .with_sell(px(dec!(10001)), qty(dec!(-5)))
            .with_buy(px(dec!(9999)), qty(dec!(5)))
    }

    /// Straight transcription of the blend formula, for regression checks.
    fn formula(bid_px: f64, bid_w: f64, ask_px: f64, ask_w: f64) -> f64 {
        (ask_w * bid_px + bid_w * ask_px) / (ask_w + bid_w)
    }

    #[test]
    fn test_symmetric_book_is_midpoint() {
        // (5 * 9999 + 5 * 10001) / 10 = 10000
        let fair = estimate_fair_value(&reference_book()).unwrap();
        assert_eq!(fair.inner(), dec!(10000));
    }

    #[test]
    fn test_single_level_weight_is_volume() {
        let book = reference_book();
        let ask = ask_weight(&book).unwrap();
        let bid = bid_weight(&book).unwrap();

        // One level per side: exp(0) = 1, sign of the stored quantity ignored
        assert_eq!(ask.weight, 5.0);
        assert_eq!(bid.weight, 5.0);
        assert_eq!(ask.best.price, px(dec!(10001)));
        assert_eq!(bid.best.price, px(dec!(9999)));
    }

    #[test]
    fn test_depth_decays_with_distance() {
        let book = OrderBook::new()
            .with_sell(px(dec!(100)), qty(dec!(2)))
            .with_sell(px(dec!(101)), qty(dec!(3)))
            .with_sell(px(dec!(110)), qty(dec!(1000)));

        let ask = ask_weight(&book).unwrap();
        let expected = 2.0 + 3.0 * (-1.0f64).exp() + 1000.0 * (-10.0f64).exp();
        assert!((ask.weight - expected).abs() < 1e-9);
    }

    #[test]
    fn test_heavy_asks_pull_toward_bid() {
        let book = OrderBook::new()
            .with_sell(px(dec!(102)), qty(dec!(-20)))
            .with_sell(px(dec!(103)), qty(dec!(-10)))
            .with_buy(px(dec!(100)), qty(dec!(2)))
            .with_buy(px(dec!(98)), qty(dec!(4)));

        let fair = estimate_fair_value(&book).unwrap().inner().to_f64().unwrap();
        let ask_w = 20.0 + 10.0 * (-1.0f64).exp();
        let bid_w = 2.0 + 4.0 * (-2.0f64).exp();
        assert!((fair - formula(100.0, bid_w, 102.0, ask_w)).abs() < 1e-9);
        assert!(fair < 101.0, "heavy offers should pull toward the bid");
    }

    #[test]
    fn test_swapping_concentration_swaps_direction() {
        let heavy_asks = OrderBook::new()
            .with_sell(px(dec!(102)), qty(dec!(-20)))
            .with_buy(px(dec!(100)), qty(dec!(2)));
        let heavy_bids = OrderBook::new()
            .with_sell(px(dec!(102)), qty(dec!(-2)))
            .with_buy(px(dec!(100)), qty(dec!(20)));

        let a = estimate_fair_value(&heavy_asks).unwrap().inner().to_f64().unwrap();
        let b = estimate_fair_value(&heavy_bids).unwrap().inner().to_f64().unwrap();

        assert!((a - formula(100.0, 2.0, 102.0, 20.0)).abs() < 1e-9);
        assert!((b - formula(100.0, 20.0, 102.0, 2.0)).abs() < 1e-9);
        assert!(a < 101.0 && b > 101.0);
        // Mirror images around the midpoint
        assert!(((a - 101.0) + (b - 101.0)).abs() < 1e-9);
    }

    #[test]
    fn test_fair_value_within_touch() {
        let books = [
            reference_book(),
            OrderBook::new()
                .with_sell(px(dec!(50.5)), qty(dec!(1)))
                .with_sell(px(dec!(51)), qty(dec!(400)))
                .with_buy(px(dec!(49)), qty(dec!(0.25))),
            // Crossed
            OrderBook::new()
                .with_sell(px(dec!(4995)), qty(dec!(8)))
                .with_buy(px(dec!(5010)), qty(dec!(3))),
        ];

        for book in &books {
            let fair = estimate_fair_value(book).unwrap();
            let bid = book.best_bid().unwrap().price;
            let ask = book.best_ask().unwrap().price;
            assert!(fair >= bid.min(ask) && fair <= bid.max(ask), "{fair} outside [{bid}, {ask}]");
        }
    }

    #[test]
    fn test_empty_side_retains_previous() {
        let previous = px(dec!(10000));
        let no_bids = OrderBook::new().with_sell(px(dec!(10001)), qty(dec!(-5)));

        assert!(estimate_fair_value(&no_bids).is_none());
        let update = update_fair_value(Some(&no_bids), previous);
        assert_eq!(
            update,
            FairValueUpdate::Retained(previous, RetainReason::OneSided(BookState::NoBid))
        );
        assert_eq!(update.value(), previous);

        let update = update_fair_value(Some(&OrderBook::new()), previous);
        assert_eq!(update.value(), previous);
        assert!(!update.is_updated());
    }

    #[test]
    fn test_missing_book_retains_previous() {
        let previous = px(dec!(123));
        assert_eq!(
            update_fair_value(None, previous),
            FairValueUpdate::Retained(previous, RetainReason::MissingBook)
        );
    }

    #[test]
    fn test_zero_volume_book_retains_previous() {
        let previous = px(dec!(10000));
        let book = OrderBook::new()
            .with_sell(px(dec!(10001)), Size::ZERO)
            .with_buy(px(dec!(9999)), Size::ZERO);

        assert_eq!(
            update_fair_value(Some(&book), previous),
            FairValueUpdate::Retained(previous, RetainReason::DegenerateWeights)
        );
    }

    #[test]
    fn test_update_reports_fresh_value() {
        let update = update_fair_value(Some(&reference_book()), px(dec!(1)));
        assert_eq!(update, FairValueUpdate::Updated(px(dec!(10000))));
    }
}
