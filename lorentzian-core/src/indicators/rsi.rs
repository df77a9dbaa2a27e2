//! Relative Strength Index (RSI).
//!
//! Uses Wilder smoothing of average gains and average losses on close.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Edge cases: no movement → 50; avg_loss == 0 → 100; avg_gain == 0 → 0.
//! The first bar has no price change and reports 50 without touching the averages.

use crate::components::indicator::Indicator;
use crate::domain::Bar;
use crate::indicators::Rma;

#[derive(Debug, Clone)]
pub struct Rsi {
    name: String,
    avg_gain: Rma,
    avg_loss: Rma,
    prev_close: Option<f64>,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            name: format!("rsi_{period}"),
            avg_gain: Rma::new(period),
            avg_loss: Rma::new(period),
            prev_close: None,
        }
    }

    /// RSI of an arbitrary price series value (the close for bar updates).
    pub fn update_value(&mut self, price: f64) -> f64 {
        let Some(prev) = self.prev_close.replace(price) else {
            return 50.0;
        };
        let change = price - prev;
        let gain = self.avg_gain.update(change.max(0.0));
        let loss = self.avg_loss.update((-change).max(0.0));
        compute_rsi(gain, loss)
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, bar: &Bar) -> f64 {
        self.update_value(bar.close)
    }

    fn reset(&mut self) {
        self.avg_gain.reset();
        self.avg_loss.reset();
        self.prev_close = None;
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // no movement
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
