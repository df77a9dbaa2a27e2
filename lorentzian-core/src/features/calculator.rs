//! Per-slot feature calculator: indicator → optional EMA smoothing → scaling.
//!
//! | kind | indicator        | smoothing     | scaling                  |
//! |------|------------------|---------------|--------------------------|
//! | RSI  | RSI(a) on close  | EMA(b)        | rescale 0..100 → 0..1    |
//! | WT   | WT(a, b) on hlc3 | -             | running min/max → 0..1   |
//! | CCI  | CCI(a) on close  | EMA(b)        | running min/max → 0..1   |
//! | ADX  | ADX(a)           | -             | rescale 0..100 → 0..1    |

use crate::components::indicator::Indicator;
use crate::config::{FeatureKind, FeatureSpec};
use crate::domain::Bar;
use crate::indicators::{rescale, Adx, Cci, Ema, Normalizer, Rsi, WaveTrend};

#[derive(Debug, Clone)]
enum Scaling {
    Bounded { min: f64, max: f64 },
    Running(Normalizer),
}

impl Scaling {
    fn apply(&mut self, value: f64) -> f64 {
        match self {
            Self::Bounded { min, max } => rescale(value, *min, *max, 0.0, 1.0),
            Self::Running(n) => n.update(value),
        }
    }

    fn reset(&mut self) {
        if let Self::Running(n) = self {
            n.reset();
        }
    }
}

#[derive(Debug)]
pub struct FeatureCalculator {
    spec: FeatureSpec,
    indicator: Box<dyn Indicator>,
    smoothing: Option<Ema>,
    scaling: Scaling,
}

impl FeatureCalculator {
    pub fn new(spec: FeatureSpec) -> Self {
        let FeatureSpec {
            kind,
            param_a,
            param_b,
        } = spec;
        let (indicator, smoothing, scaling): (Box<dyn Indicator>, _, _) = match kind {
            FeatureKind::Rsi => (
                Box::new(Rsi::new(param_a)),
                Some(Ema::new(param_b)),
                Scaling::Bounded { min: 0.0, max: 100.0 },
            ),
            FeatureKind::Wt => (
                Box::new(WaveTrend::new(param_a, param_b)),
                None,
                Scaling::Running(Normalizer::unit()),
            ),
            FeatureKind::Cci => (
                Box::new(Cci::new(param_a)),
                Some(Ema::new(param_b)),
                Scaling::Running(Normalizer::unit()),
            ),
            FeatureKind::Adx => (
                Box::new(Adx::new(param_a)),
                None,
                Scaling::Bounded { min: 0.0, max: 100.0 },
            ),
        };
        Self {
            spec,
            indicator,
            smoothing,
            scaling,
        }
    }

    pub fn spec(&self) -> FeatureSpec {
        self.spec
    }

    pub fn name(&self) -> &str {
        self.indicator.name()
    }

    pub fn update(&mut self, bar: &Bar) -> f64 {
        let raw = self.indicator.update(bar);
        let smoothed = match self.smoothing.as_mut() {
            Some(ema) => ema.update(raw),
            None => raw,
        };
        self.scaling.apply(smoothed)
    }

    pub fn reset(&mut self) {
        self.indicator.reset();
        if let Some(ema) = self.smoothing.as_mut() {
            ema.reset();
        }
        self.scaling.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    #[test]
    fn rsi_feature_is_rescaled() {
        let mut calc = FeatureCalculator::new(FeatureSpec::new(FeatureKind::Rsi, 3, 1));
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0]);
        let last = bars.iter().map(|b| calc.update(b)).last().unwrap();
        // All gains → RSI 100 → 1.0
        assert_approx(last, 1.0, 1e-9);
    }

    #[test]
    fn flat_series_gives_neutral_rsi_and_zero_oscillators() {
        let flat = Bar::flat(100.0, 1000.0);
        let mut rsi = FeatureCalculator::new(FeatureSpec::new(FeatureKind::Rsi, 14, 1));
        let mut wt = FeatureCalculator::new(FeatureSpec::new(FeatureKind::Wt, 10, 11));
        let mut cci = FeatureCalculator::new(FeatureSpec::new(FeatureKind::Cci, 20, 1));
        let mut adx = FeatureCalculator::new(FeatureSpec::new(FeatureKind::Adx, 20, 2));
        for _ in 0..50 {
            assert_approx(rsi.update(&flat), 0.5, 1e-12);
            assert_eq!(wt.update(&flat), 0.0);
            assert_eq!(cci.update(&flat), 0.0);
            assert_eq!(adx.update(&flat), 0.0);
        }
    }

    #[test]
    fn features_stay_in_unit_range() {
        let closes: Vec<f64> = (0..300)
            .map(|i| 100.0 + (i as f64 * 0.2).sin() * 15.0 + (i as f64 * 0.05).cos() * 5.0)
            .collect();
        let bars = make_bars(&closes);
        for spec in crate::config::default_features() {
            let mut calc = FeatureCalculator::new(spec);
            for bar in &bars {
                let v = calc.update(bar);
                assert!((0.0..=1.0).contains(&v), "{} out of range: {v}", calc.name());
            }
        }
    }

    #[test]
    fn reset_replays_identically() {
        let bars = make_bars(&[10.0, 11.0, 9.0, 12.0, 13.0, 8.0, 14.0]);
        let mut calc = FeatureCalculator::new(FeatureSpec::new(FeatureKind::Cci, 3, 2));
        let first: Vec<f64> = bars.iter().map(|b| calc.update(b)).collect();
        calc.reset();
        let second: Vec<f64> = bars.iter().map(|b| calc.update(b)).collect();
        assert_eq!(first, second);
    }
}
