//! Regime filter: rejects bars where the smoothed price curve is flattening.
//!
//! A Kalman-style adaptive smoother runs over ohlc4:
//!
//! ```text
//! v1    = 0.2 * (src - src[1]) + 0.8 * v1[1]
//! v2    = 0.1 * (high - low)   + 0.8 * v2[1]
//! ω     = |v1 / v2|                              (v2 == 0 → 0)
//! α     = (-ω² + sqrt(ω⁴ + 16ω²)) / 8
//! klmf  = α * src + (1 - α) * klmf[1]
//! slope = |klmf - klmf[1]|
//! norm  = (slope - ema(slope, 200)) / ema(slope, 200)   (ema == 0 → 0)
//! ```
//!
//! Passes when `norm >= threshold`. The first bar seeds `klmf` with `src`.

use crate::config::RegimeFilterConfig;
use crate::domain::Bar;
use crate::indicators::Ema;

use super::SignalFilter;

const SLOPE_AVERAGE_PERIOD: usize = 200;

#[derive(Debug, Clone)]
pub struct RegimeFilter {
    enabled: bool,
    threshold: f64,
    prev_src: Option<f64>,
    value1: f64,
    value2: f64,
    klmf: f64,
    slope_average: Ema,
    normalized_slope: f64,
}

impl RegimeFilter {
    pub fn new(config: &RegimeFilterConfig) -> Self {
        Self {
            enabled: config.enabled,
            threshold: config.threshold,
            prev_src: None,
            value1: 0.0,
            value2: 0.0,
            klmf: 0.0,
            slope_average: Ema::new(SLOPE_AVERAGE_PERIOD),
            normalized_slope: 0.0,
        }
    }

    /// Most recent normalized slope decline.
    pub fn normalized_slope(&self) -> f64 {
        self.normalized_slope
    }

    fn step(&mut self, bar: &Bar) -> f64 {
        let src = bar.ohlc4();
        let Some(prev_src) = self.prev_src.replace(src) else {
            self.value2 = 0.1 * (bar.high - bar.low);
            self.klmf = src;
            self.slope_average.update(0.0);
            return 0.0;
        };

        self.value1 = 0.2 * (src - prev_src) + 0.8 * self.value1;
        self.value2 = 0.1 * (bar.high - bar.low) + 0.8 * self.value2;
        let omega = if self.value2 != 0.0 {
            (self.value1 / self.value2).abs()
        } else {
            0.0
        };
        // (-w² + sqrt(w⁴ + 16w²)) / 8, rearranged to avoid overflow
        let alpha = if omega.is_finite() {
            2.0 * omega / (omega.hypot(4.0) + omega)
        } else {
            1.0
        };

        let prev_klmf = self.klmf;
        self.klmf = alpha * src + (1.0 - alpha) * prev_klmf;
        let slope = (self.klmf - prev_klmf).abs();
        let average = self.slope_average.update(slope);
        if average != 0.0 {
            (slope - average) / average
        } else {
            0.0
        }
    }
}

impl SignalFilter for RegimeFilter {
    fn name(&self) -> &str {
        "regime"
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn evaluate(&mut self, bar: &Bar) -> bool {
        self.normalized_slope = self.step(bar);
        self.normalized_slope >= self.threshold
    }

    fn reset(&mut self) {
        *self = Self::new(&RegimeFilterConfig {
            enabled: self.enabled,
            threshold: self.threshold,
        });
    }
}
