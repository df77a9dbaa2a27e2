//! Lorentzian Core: streaming k-nearest-neighbor signal engine.
//!
//! This crate turns a chronological stream of OHLCV bars into trading signals:
//! - Domain types (bars, directions, position flags)
//! - Streaming indicators (EMA/SMA/RMA, RSI, WaveTrend, CCI, ADX, ATR)
//! - Feature pipeline with bounded training history
//! - Approximate nearest-neighbor classifier over Lorentzian distance
//! - Kernel regression trend estimator
//! - Volatility / regime / ADX / moving-average filters
//! - Entry/exit signal state machine
//! - Per-stream engine and a keyed set of engines
//!
//! The core performs no I/O and installs no logging subscriber.

pub mod classifier;
pub mod components;
pub mod config;
pub mod domain;
pub mod engine;
pub mod features;
pub mod fingerprint;
pub mod indicators;
pub mod kernel;
pub mod synthetic;

pub use config::{ConfigError, LorentzianConfig};
pub use domain::{Bar, BarError, Direction, PositionState};
pub use engine::{BarResult, Engine, EngineError, EngineSet, StreamKey};
