//! ADX filter: gates on trend strength.
//!
//! Passes when ADX is strictly above the threshold.

use crate::components::indicator::Indicator;
use crate::config::AdxFilterConfig;
use crate::domain::Bar;
use crate::indicators::Adx;

use super::SignalFilter;

#[derive(Debug, Clone)]
pub struct AdxFilter {
    enabled: bool,
    threshold: f64,
    adx: Adx,
}

impl AdxFilter {
    pub fn new(config: &AdxFilterConfig) -> Self {
        Self {
            enabled: config.enabled,
            threshold: config.threshold,
            adx: Adx::new(config.period),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl SignalFilter for AdxFilter {
    fn name(&self) -> &str {
        "adx"
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn evaluate(&mut self, bar: &Bar) -> bool {
        self.adx.update(bar) > self.threshold
    }

    fn reset(&mut self) {
        self.adx.reset();
    }
}
