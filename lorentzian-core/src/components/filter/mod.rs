//! Bar filters gating classification and entries.
//!
//! The classification gate is `volatility && regime && adx`. The EMA/SMA
//! trend filters do not gate classification; they only confirm entries.
//!
//! Every filter advances its internal state on every bar, enabled or not, so
//! toggling `enabled` never changes any other output.

pub mod adx_filter;
pub mod regime;
pub mod trend;
pub mod volatility;

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::config::FilterConfig;
use crate::domain::Bar;

pub use adx_filter::AdxFilter;
pub use regime::RegimeFilter;
pub use trend::{TrendFilter, TrendVerdict};
pub use volatility::VolatilityFilter;

/// Boolean filter over the bar stream.
///
/// A disabled filter still consumes bars but always passes.
pub trait SignalFilter: Debug + Send + Sync {
    fn name(&self) -> &str;

    fn enabled(&self) -> bool;

    /// Advance state with `bar` and return the raw condition, ignoring `enabled`.
    fn evaluate(&mut self, bar: &Bar) -> bool;

    fn reset(&mut self);

    /// Advance state with `bar` and return the gated verdict.
    fn update(&mut self, bar: &Bar) -> bool {
        let hit = self.evaluate(bar);
        !self.enabled() || hit
    }
}

/// Per-filter verdicts for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterReport {
    pub volatility: bool,
    pub regime: bool,
    pub adx: bool,
    pub all: bool,
}

impl FilterReport {
    pub fn new(volatility: bool, regime: bool, adx: bool) -> Self {
        Self {
            volatility,
            regime,
            adx,
            all: volatility && regime && adx,
        }
    }
}

impl Default for FilterReport {
    fn default() -> Self {
        Self::new(true, true, true)
    }
}

/// Everything the filter stage produces for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterOutcome {
    pub report: FilterReport,
    pub ema: TrendVerdict,
    pub sma: TrendVerdict,
}

impl FilterOutcome {
    /// Combined EMA and SMA entry confirmation.
    pub fn trend(&self) -> TrendVerdict {
        self.ema.and(self.sma)
    }
}

#[derive(Debug, Clone)]
pub struct FilterPipeline {
    volatility: VolatilityFilter,
    regime: RegimeFilter,
    adx: AdxFilter,
    ema: TrendFilter,
    sma: TrendFilter,
}

impl FilterPipeline {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            volatility: VolatilityFilter::new(&config.volatility),
            regime: RegimeFilter::new(&config.regime),
            adx: AdxFilter::new(&config.adx),
            ema: TrendFilter::ema(&config.ema),
            sma: TrendFilter::sma(&config.sma),
        }
    }

    pub fn update(&mut self, bar: &Bar) -> FilterOutcome {
        FilterOutcome {
            report: FilterReport::new(
                self.volatility.update(bar),
                self.regime.update(bar),
                self.adx.update(bar),
            ),
            ema: self.ema.update(bar),
            sma: self.sma.update(bar),
        }
    }

    pub fn regime(&self) -> &RegimeFilter {
        &self.regime
    }

    pub fn reset(&mut self) {
        self.volatility.reset();
        self.regime.reset();
        self.adx.reset();
        self.ema.reset();
        self.sma.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    fn all_disabled() -> FilterConfig {
        let mut config = FilterConfig::default();
        config.volatility.enabled = false;
        config.regime.enabled = false;
        config.adx.enabled = false;
        config.ema.enabled = false;
        config.sma.enabled = false;
        config
    }

    #[test]
    fn report_all_is_conjunction() {
        assert!(FilterReport::new(true, true, true).all);
        assert!(!FilterReport::new(true, false, true).all);
        assert!(!FilterReport::new(false, true, true).all);
        assert!(!FilterReport::new(true, true, false).all);
    }

    #[test]
    fn disabled_pipeline_passes_everything() {
        let mut pipeline = FilterPipeline::new(&all_disabled());
        for bar in make_bars(&[100.0, 90.0, 120.0, 80.0, 80.0]) {
            let outcome = pipeline.update(&bar);
            assert!(outcome.report.all);
            assert_eq!(outcome.trend(), TrendVerdict::BOTH);
        }
    }

    #[test]
    fn disabling_a_filter_only_loosens() {
        let closes: Vec<f64> = (0..120)
            .map(|i| 100.0 + (i as f64 * 0.15).sin() * 8.0)
            .collect();
        let bars = make_bars(&closes);
        let mut enabled_config = FilterConfig::default();
        enabled_config.adx.enabled = true;

        for which in 0..3 {
            let mut loosened = enabled_config.clone();
            match which {
                0 => loosened.volatility.enabled = false,
                1 => loosened.regime.enabled = false,
                _ => loosened.adx.enabled = false,
            }
            let mut strict = FilterPipeline::new(&enabled_config);
            let mut loose = FilterPipeline::new(&loosened);
            for bar in &bars {
                let s = strict.update(bar).report;
                let l = loose.update(bar).report;
                assert!(!s.all || l.all, "disabling filter {which} blocked a bar");
            }
        }
    }

    #[test]
    fn default_trend_filters_are_off() {
        let mut pipeline = FilterPipeline::new(&FilterConfig::default());
        let closes: Vec<f64> = (0..10).map(|i| 100.0 - i as f64).collect();
        for bar in make_bars(&closes) {
            assert_eq!(pipeline.update(&bar).trend(), TrendVerdict::BOTH);
        }
    }

    #[test]
    fn reset_replays_identically() {
        let bars = make_bars(&[100.0, 103.0, 99.0, 105.0, 101.0, 108.0]);
        let mut pipeline = FilterPipeline::new(&FilterConfig::default());
        let first: Vec<_> = bars.iter().map(|b| pipeline.update(b)).collect();
        pipeline.reset();
        let second: Vec<_> = bars.iter().map(|b| pipeline.update(b)).collect();
        assert_eq!(first, second);
    }
}
