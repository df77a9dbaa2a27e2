//! Moving-average trend filters gating entries.
//!
//! Uptrend when close is above the average, downtrend when below. A disabled
//! filter reports both directions so it never blocks an entry.

use serde::Serialize;

use crate::config::TrendFilterConfig;
use crate::domain::Bar;
use crate::indicators::{Ema, Sma};

/// Which sides of the market a trend filter allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendVerdict {
    pub uptrend: bool,
    pub downtrend: bool,
}

impl TrendVerdict {
    pub const BOTH: Self = Self {
        uptrend: true,
        downtrend: true,
    };

    pub fn and(self, other: Self) -> Self {
        Self {
            uptrend: self.uptrend && other.uptrend,
            downtrend: self.downtrend && other.downtrend,
        }
    }
}

impl Default for TrendVerdict {
    fn default() -> Self {
        Self::BOTH
    }
}

#[derive(Debug, Clone)]
enum Average {
    Ema(Ema),
    Sma(Sma),
}

#[derive(Debug, Clone)]
pub struct TrendFilter {
    name: String,
    enabled: bool,
    average: Average,
}

impl TrendFilter {
    pub fn ema(config: &TrendFilterConfig) -> Self {
        Self {
            name: format!("ema_{}", config.period),
            enabled: config.enabled,
            average: Average::Ema(Ema::new(config.period)),
        }
    }

    pub fn sma(config: &TrendFilterConfig) -> Self {
        Self {
            name: format!("sma_{}", config.period),
            enabled: config.enabled,
            average: Average::Sma(Sma::new(config.period)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Advance the average with `bar.close`, enabled or not.
    pub fn update(&mut self, bar: &Bar) -> TrendVerdict {
        let ma = match &mut self.average {
            Average::Ema(ema) => ema.update(bar.close),
            Average::Sma(sma) => sma.update(bar.close),
        };
        if !self.enabled {
            return TrendVerdict::BOTH;
        }
        TrendVerdict {
            uptrend: bar.close > ma,
            downtrend: bar.close < ma,
        }
    }

    pub fn reset(&mut self) {
        match &mut self.average {
            Average::Ema(ema) => ema.reset(),
            Average::Sma(sma) => sma.reset(),
        }
    }
}
