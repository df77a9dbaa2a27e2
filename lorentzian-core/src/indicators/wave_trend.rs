//! WaveTrend oscillator (on hlc3).
//!
//! esa = EMA(src, n1)
//! d   = EMA(|src - esa|, n1)
//! ci  = (src - esa) / (0.015 * d)        (d == 0 → 0)
//! wt1 = EMA(ci, n2)
//! wt2 = SMA(wt1, 4)
//! out = wt1 - wt2

use crate::components::indicator::Indicator;
use crate::domain::Bar;
use crate::indicators::{Ema, Sma};

const SIGNAL_PERIOD: usize = 4;

#[derive(Debug, Clone)]
pub struct WaveTrend {
    name: String,
    esa: Ema,
    deviation: Ema,
    wt1: Ema,
    wt2: Sma,
}

impl WaveTrend {
    pub fn new(channel_period: usize, average_period: usize) -> Self {
        assert!(channel_period >= 1, "WaveTrend channel period must be >= 1");
        assert!(average_period >= 1, "WaveTrend average period must be >= 1");
        Self {
            name: format!("wt_{channel_period}_{average_period}"),
            esa: Ema::new(channel_period),
            deviation: Ema::new(channel_period),
            wt1: Ema::new(average_period),
            wt2: Sma::new(SIGNAL_PERIOD),
        }
    }
}

impl Indicator for WaveTrend {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, bar: &Bar) -> f64 {
        let src = bar.hlc3();
        let esa = self.esa.update(src);
        let d = self.deviation.update((src - esa).abs());
        let ci = if d == 0.0 { 0.0 } else { (src - esa) / (0.015 * d) };
        let wt1 = self.wt1.update(ci);
        let wt2 = self.wt2.update(wt1);
        wt1 - wt2
    }

    fn reset(&mut self) {
        self.esa.reset();
        self.deviation.reset();
        self.wt1.reset();
        self.wt2.reset();
    }
}
