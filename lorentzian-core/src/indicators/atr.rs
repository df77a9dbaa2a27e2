//! Average True Range (ATR) and Wilder smoothing.
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|); the first
//! bar has no previous close and uses high-low.
//! ATR uses Wilder smoothing (RMA, EMA with alpha = 1/period).

use crate::components::indicator::Indicator;
use crate::domain::Bar;
use crate::indicators::Ema;

/// True range of a bar given the previous close, if any.
pub fn true_range(high: f64, low: f64, prev_close: Option<f64>) -> f64 {
    match prev_close {
        None => high - low,
        Some(pc) => (high - low).max((high - pc).abs()).max((low - pc).abs()),
    }
}

/// Wilder's running moving average (alpha = 1/period), SMA-seeded.
#[derive(Debug, Clone)]
pub struct Rma {
    inner: Ema,
}

impl Rma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RMA period must be >= 1");
        Self {
            inner: Ema::with_alpha(period, 1.0 / period as f64),
        }
    }

    pub fn update(&mut self, x: f64) -> f64 {
        self.inner.update(x)
    }

    pub fn value(&self) -> Option<f64> {
        self.inner.value()
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

#[derive(Debug, Clone)]
pub struct Atr {
    name: String,
    rma: Rma,
    prev_close: Option<f64>,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            name: format!("atr_{period}"),
            rma: Rma::new(period),
            prev_close: None,
        }
    }
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, bar: &Bar) -> f64 {
        let tr = true_range(bar.high, bar.low, self.prev_close);
        self.prev_close = Some(bar.close);
        self.rma.update(tr)
    }

    fn reset(&mut self) {
        self.rma.reset();
        self.prev_close = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn true_range_first_bar_is_range() {
        assert_approx(true_range(105.0, 95.0, None), 10.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        // prev close 90, bar 100..105 → |105-90| = 15
        assert_approx(true_range(105.0, 100.0, Some(90.0)), 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_gap_down() {
        // prev close 120, bar 100..105 → |100-120| = 20
        assert_approx(true_range(105.0, 100.0, Some(120.0)), 20.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rma_known_values() {
        // period 2, alpha 0.5: warmup mean 4, seed mean(4,6)=5, then 0.5*9+0.5*5=7
        let mut rma = Rma::new(2);
        assert_approx(rma.update(4.0), 4.0, DEFAULT_EPSILON);
        assert_approx(rma.update(6.0), 5.0, DEFAULT_EPSILON);
        assert_approx(rma.update(9.0), 7.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_1_equals_true_range() {
        // make_bars: high = max(open,close)+1, low = min(open,close)-1
        let bars = make_bars(&[100.0, 103.0, 101.0]);
        let mut atr = Atr::new(1);
        assert_approx(atr.update(&bars[0]), 2.0, DEFAULT_EPSILON);
        // bar1: open 100, close 103 → high 104, low 99, prev close 100 → TR 5
        assert_approx(atr.update(&bars[1]), 5.0, DEFAULT_EPSILON);
        // bar2: open 103, close 101 → high 104, low 100, prev close 103 → TR 4
        assert_approx(atr.update(&bars[2]), 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_flat_bars_is_zero() {
        let mut atr = Atr::new(10);
        for _ in 0..20 {
            assert_eq!(atr.update(&Bar::flat(50.0, 0.0)), 0.0);
        }
    }
}
