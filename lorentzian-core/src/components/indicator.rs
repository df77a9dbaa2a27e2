//! Indicator trait for streaming per-bar indicators.
//!
//! Indicators carry their own recurrence state and are fed exactly one bar per
//! call, in chronological order. Each instance belongs to a single
//! (symbol, timeframe) stream; nothing is shared between instances.

use crate::domain::Bar;
use std::fmt::Debug;

/// Trait for streaming indicators.
///
/// # Look-ahead contamination guard
/// `update` sees only the current bar plus whatever the instance retained from
/// earlier calls. The output at bar t never depends on bar t+1 or later.
///
/// # Numeric guard
/// Implementations resolve degenerate arithmetic (zero denominators) to a
/// fixed fallback value. `update` never returns NaN or infinity for finite
/// input.
pub trait Indicator: Debug + Send + Sync {
    /// Human-readable name (e.g., "rsi_14", "adx_20").
    fn name(&self) -> &str;

    /// Consume the next bar and return the indicator value for it.
    fn update(&mut self, bar: &Bar) -> f64;

    /// Discard all state; the next `update` starts a fresh recurrence.
    fn reset(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{Adx, Atr, Cci, Rsi, WaveTrend};

    #[test]
    fn trait_objects_report_names() {
        let indicators: Vec<Box<dyn Indicator>> = vec![
            Box::new(Rsi::new(14)),
            Box::new(WaveTrend::new(10, 11)),
            Box::new(Cci::new(20)),
            Box::new(Adx::new(20)),
            Box::new(Atr::new(10)),
        ];
        let names: Vec<&str> = indicators.iter().map(|i| i.name()).collect();
        assert_eq!(names, ["rsi_14", "wt_10_11", "cci_20", "adx_20", "atr_10"]);
    }

    #[test]
    fn outputs_stay_finite_on_flat_bars() {
        let mut indicators: Vec<Box<dyn Indicator>> = vec![
            Box::new(Rsi::new(14)),
            Box::new(WaveTrend::new(10, 11)),
            Box::new(Cci::new(20)),
            Box::new(Adx::new(20)),
            Box::new(Atr::new(10)),
        ];
        let bar = Bar::flat(100.0, 1000.0);
        for _ in 0..100 {
            for ind in indicators.iter_mut() {
                assert!(ind.update(&bar).is_finite(), "{} not finite", ind.name());
            }
        }
    }
}
