//! Prometheus metrics and structured logging for the pair market maker.
//!
//! - Structured logging with tracing (JSON in production)
//! - Prometheus counters for ticks, orders and skipped estimates
//! - `OrderEventSink` implementations that feed both

pub mod error;
pub mod logging;
pub mod metrics;
pub mod sink;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
pub use sink::{MetricsSink, TracingSink};
