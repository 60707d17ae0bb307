//! Core domain types for the pair market maker.
//!
//! This crate provides the types shared by the strategy and its host:
//! - `Price`, `Size`: Precision-safe numeric types
//! - `InstrumentId`: Tradable instrument identifier
//! - `OrderBook`, `PriceLevel`, `MarketSnapshot`: Per-tick market data
//! - `OrderRequest`, `TickResult`: Strategy output

pub mod book;
pub mod decimal;
pub mod error;
pub mod instrument;
pub mod order;

pub use book::{BookState, MarketSnapshot, OrderBook, PriceLevel};
pub use decimal::{Price, Size};
pub use error::{CoreError, Result};
pub use instrument::InstrumentId;
pub use order::{OrderRequest, OrderSide, TickResult};
