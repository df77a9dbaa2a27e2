//! Streaming components fed one bar at a time.
//!
//! - `indicator`: the `Indicator` trait every composite indicator implements
//! - `filter`: boolean bar filters and the pipeline combining them
//! - `signal`: the entry/exit state machine

pub mod filter;
pub mod indicator;
pub mod signal;

pub use filter::{FilterOutcome, FilterPipeline, FilterReport, SignalFilter, TrendVerdict};
pub use indicator::Indicator;
pub use signal::{SignalEvents, SignalInputs, SignalStateMachine};
