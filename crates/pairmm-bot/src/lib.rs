//! Snapshot replay host for the pair market maker.
//!
//! Wires the strategy to its collaborators:
//! - TOML configuration
//! - JSON-lines snapshot reader
//! - Replay loop threading `EstimatorState` through ticks
//! - Order output as JSON lines, logging and metrics via telemetry sinks

pub mod config;
pub mod error;
pub mod replay;
pub mod snapshot;

pub use config::{AppConfig, TelemetryConfig};
pub use error::{AppError, AppResult};
pub use replay::{ReplaySummary, Replayer};
pub use snapshot::SnapshotReader;
