//! Volatility filter: recent true range expanding over its longer baseline.
//!
//! Passes when `atr(min_length) > atr(max_length)`.

use crate::components::indicator::Indicator;
use crate::config::VolatilityFilterConfig;
use crate::domain::Bar;
use crate::indicators::Atr;

use super::SignalFilter;

#[derive(Debug, Clone)]
pub struct VolatilityFilter {
    enabled: bool,
    recent: Atr,
    historical: Atr,
}

impl VolatilityFilter {
    pub fn new(config: &VolatilityFilterConfig) -> Self {
        Self {
            enabled: config.enabled,
            recent: Atr::new(config.min_length),
            historical: Atr::new(config.max_length),
        }
    }
}

impl SignalFilter for VolatilityFilter {
    fn name(&self) -> &str {
        "volatility"
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn evaluate(&mut self, bar: &Bar) -> bool {
        let recent = self.recent.update(bar);
        let historical = self.historical.update(bar);
        recent > historical
    }

    fn reset(&mut self) {
        self.recent.reset();
        self.historical.reset();
    }
}
