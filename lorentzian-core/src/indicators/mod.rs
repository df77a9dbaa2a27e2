//! Streaming indicator implementations.
//!
//! Primitives (`Ema`, `Sma`, `Rma`, `true_range`) are scalar recurrences.
//! Composite indicators (RSI, WaveTrend, CCI, ADX, ATR) implement the
//! `Indicator` trait from `components::indicator` and are fed one bar per call.
//! `normalize` holds the scalers that map composite outputs into feature space.

pub mod adx;
pub mod atr;
pub mod cci;
pub mod ema;
pub mod normalize;
pub mod rsi;
pub mod sma;
pub mod wave_trend;

pub use adx::Adx;
pub use atr::{true_range, Atr, Rma};
pub use cci::Cci;
pub use ema::Ema;
pub use normalize::{rescale, Normalizer};
pub use rsi::Rsi;
pub use sma::Sma;
pub use wave_trend::WaveTrend;

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            Bar::new(open, high, low, close, 1000.0)
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
