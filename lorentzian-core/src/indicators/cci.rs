//! Commodity Channel Index (CCI) on close.
//!
//! CCI = (src - SMA(src, n)) / (0.015 * mean_abs_dev(src, n))
//! Mean absolute deviation is measured against the window's own mean.
//! Edge case: mean_abs_dev == 0 → 0.

use crate::components::indicator::Indicator;
use crate::domain::Bar;
use crate::indicators::Sma;

#[derive(Debug, Clone)]
pub struct Cci {
    name: String,
    window: Sma,
}

impl Cci {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "CCI period must be >= 1");
        Self {
            name: format!("cci_{period}"),
            window: Sma::new(period),
        }
    }

    pub fn update_value(&mut self, src: f64) -> f64 {
        let mean = self.window.update(src);
        let samples = self.window.window();
        let dev = samples.iter().map(|v| (v - mean).abs()).sum::<f64>() / samples.len() as f64;
        if dev == 0.0 {
            0.0
        } else {
            (src - mean) / (0.015 * dev)
        }
    }
}

impl Indicator for Cci {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, bar: &Bar) -> f64 {
        self.update_value(bar.close)
    }

    fn reset(&mut self) {
        self.window.reset();
    }
}
