//! ADX: Average Directional Index.
//!
//! Steps:
//! 1. Compute +DM and -DM from consecutive bars
//! 2. Smooth TR, +DM and -DM with the running Wilder sum `s = s - s/n + x`
//! 3. +DI = 100 * s(+DM) / s(TR), -DI = 100 * s(-DM) / s(TR)   (s(TR) == 0 → 0)
//! 4. DX = 100 * |+DI - -DI| / (+DI + -DI)                    (sum == 0 → 0)
//! 5. ADX = RMA(DX, n)
//!
//! The first bar has no predecessor: TR = high - low and both DMs are zero.

use crate::components::indicator::Indicator;
use crate::domain::Bar;
use crate::indicators::atr::true_range;
use crate::indicators::Rma;

/// Running Wilder sum, starting from zero.
#[derive(Debug, Clone)]
struct WilderSum {
    period: f64,
    value: f64,
}

impl WilderSum {
    fn new(period: usize) -> Self {
        Self {
            period: period as f64,
            value: 0.0,
        }
    }

    fn update(&mut self, x: f64) -> f64 {
        self.value = self.value - self.value / self.period + x;
        self.value
    }
}

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    name: String,
    smooth_tr: WilderSum,
    smooth_plus_dm: WilderSum,
    smooth_minus_dm: WilderSum,
    adx: Rma,
    prev: Option<Bar>,
}

impl Adx {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        Self {
            period,
            name: format!("adx_{period}"),
            smooth_tr: WilderSum::new(period),
            smooth_plus_dm: WilderSum::new(period),
            smooth_minus_dm: WilderSum::new(period),
            adx: Rma::new(period),
            prev: None,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

fn directional_movement(bar: &Bar, prev: Option<&Bar>) -> (f64, f64) {
    let Some(prev) = prev else {
        return (0.0, 0.0);
    };
    let up = bar.high - prev.high;
    let down = prev.low - bar.low;
    let plus = if up > down { up.max(0.0) } else { 0.0 };
    let minus = if down > up { down.max(0.0) } else { 0.0 };
    (plus, minus)
}

impl Indicator for Adx {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, bar: &Bar) -> f64 {
        let tr = true_range(bar.high, bar.low, self.prev.map(|p| p.close));
        let (plus_dm, minus_dm) = directional_movement(bar, self.prev.as_ref());
        self.prev = Some(*bar);

        let s_tr = self.smooth_tr.update(tr);
        let s_plus = self.smooth_plus_dm.update(plus_dm);
        let s_minus = self.smooth_minus_dm.update(minus_dm);

        let (plus_di, minus_di) = if s_tr == 0.0 {
            (0.0, 0.0)
        } else {
            (100.0 * s_plus / s_tr, 100.0 * s_minus / s_tr)
        };
        let di_sum = plus_di + minus_di;
        let dx = if di_sum == 0.0 {
            0.0
        } else {
            100.0 * (plus_di - minus_di).abs() / di_sum
        };
        self.adx.update(dx)
    }

    fn reset(&mut self) {
        *self = Self::new(self.period);
    }
}
