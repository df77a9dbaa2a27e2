//! Nadaraya-Watson kernel regression over the configured price source.
//!
//! Two estimates are computed each bar over offsets `0 ..= regression_level + 1`:
//! - `estimate`: rational quadratic kernel, bandwidth `lookback`
//! - `lagged`: gaussian kernel, bandwidth `lookback - lag` (at least 1)
//!
//! `KernelMode::Rate` reads direction from the slope of `estimate`;
//! `KernelMode::Crossover` reads it from `lagged` relative to `estimate`.
//! With fewer bars than the window, the available prefix is used.

use std::collections::VecDeque;

use serde::Serialize;

use crate::config::{KernelConfig, KernelMode};

/// Kernel outputs and derived states for one bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct KernelSnapshot {
    pub estimate: f64,
    pub lagged: f64,
    /// `estimate` rose versus the previous bar.
    pub rising: bool,
    /// `estimate` fell versus the previous bar.
    pub falling: bool,
    pub bullish_change: bool,
    pub bearish_change: bool,
    pub cross_over: bool,
    pub cross_under: bool,
}

#[derive(Debug, Clone)]
pub struct KernelEstimator {
    config: KernelConfig,
    window: VecDeque<f64>,
    rq_weights: Vec<f64>,
    gaussian_weights: Vec<f64>,
    current: Option<KernelSnapshot>,
}

/// `(1 + i² / (2 r h²))^(-r)`
fn rational_quadratic_weight(i: usize, lookback: f64, relative_weight: f64) -> f64 {
    let i = i as f64;
    (1.0 + i * i / (2.0 * relative_weight * lookback * lookback)).powf(-relative_weight)
}

/// `exp(-i² / (2 h²))`
fn gaussian_weight(i: usize, lookback: f64) -> f64 {
    let i = i as f64;
    (-(i * i) / (2.0 * lookback * lookback)).exp()
}

/// Weighted mean of `window` (most recent last) with `weights[i]` applied at offset `i`.
///
/// Weights are normalized before summing, so the result stays within the
/// window's range even for prices near `f64::MAX`.
fn weighted_estimate(window: &VecDeque<f64>, weights: &[f64]) -> f64 {
    let den: f64 = weights.iter().take(window.len()).sum();
    if den <= 0.0 {
        return 0.0;
    }
    window
        .iter()
        .rev()
        .zip(weights)
        .map(|(y, w)| y * (w / den))
        .sum()
}

impl KernelEstimator {
    pub fn new(config: KernelConfig) -> Self {
        let size = config.regression_level.saturating_add(2);
        let h = config.lookback as f64;
        let lagged_h = (config.lookback.saturating_sub(config.lag)).max(1) as f64;
        Self {
            rq_weights: (0..size)
                .map(|i| rational_quadratic_weight(i, h, config.relative_weight))
                .collect(),
            gaussian_weights: (0..size).map(|i| gaussian_weight(i, lagged_h)).collect(),
            window: VecDeque::with_capacity(size.min(1024) + 1),
            current: None,
            config,
        }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Feed the next source price and return the updated snapshot.
    pub fn update(&mut self, price: f64) -> KernelSnapshot {
        self.window.push_back(price);
        if self.window.len() > self.rq_weights.len() {
            self.window.pop_front();
        }

        let estimate = weighted_estimate(&self.window, &self.rq_weights);
        let lagged = weighted_estimate(&self.window, &self.gaussian_weights);

        let next = match self.current {
            Some(prev) => {
                let rising = prev.estimate < estimate;
                let falling = prev.estimate > estimate;
                KernelSnapshot {
                    estimate,
                    lagged,
                    rising,
                    falling,
                    bullish_change: rising && prev.falling,
                    bearish_change: falling && prev.rising,
                    cross_over: lagged > estimate && prev.lagged <= prev.estimate,
                    cross_under: lagged < estimate && prev.lagged >= prev.estimate,
                }
            }
            None => KernelSnapshot {
                estimate,
                lagged,
                ..KernelSnapshot::default()
            },
        };
        self.current = Some(next);
        next
    }

    /// Latest snapshot; all-zero before the first update.
    pub fn snapshot(&self) -> KernelSnapshot {
        self.current.unwrap_or_default()
    }

    pub fn estimate(&self) -> f64 {
        self.snapshot().estimate
    }

    /// Trend agrees with a long entry. Always true when the kernel is disabled.
    pub fn is_bullish(&self) -> bool {
        if !self.config.enabled {
            return true;
        }
        let s = self.snapshot();
        match self.config.mode {
            KernelMode::Rate => s.rising,
            KernelMode::Crossover => s.lagged >= s.estimate,
        }
    }

    /// Trend agrees with a short entry. Always true when the kernel is disabled.
    pub fn is_bearish(&self) -> bool {
        if !self.config.enabled {
            return true;
        }
        let s = self.snapshot();
        match self.config.mode {
            KernelMode::Rate => s.falling,
            KernelMode::Crossover => s.lagged <= s.estimate,
        }
    }

    /// `(cross over, cross under)` of the lagged line through the estimate on this bar.
    pub fn crossovers(&self) -> (bool, bool) {
        let s = self.snapshot();
        (s.cross_over, s.cross_under)
    }

    /// Bullish exit alert: crossover in `Crossover` mode, rate flip in `Rate` mode.
    pub fn bullish_alert(&self) -> bool {
        let s = self.snapshot();
        match self.config.mode {
            KernelMode::Rate => s.bullish_change,
            KernelMode::Crossover => s.cross_over,
        }
    }

    pub fn bearish_alert(&self) -> bool {
        let s = self.snapshot();
        match self.config.mode {
            KernelMode::Rate => s.bearish_change,
            KernelMode::Crossover => s.cross_under,
        }
    }

    pub fn reset(&mut self) {
        self.window.clear();
        self.current = None;
    }
}
