//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (period + 1).
//! Seed: while fewer than `period` samples have arrived the output is the
//! arithmetic mean of the samples so far; the `period`-th output is therefore
//! the SMA of the first `period` samples, matching the charting reference.

/// Streaming exponential smoother.
///
/// Also backs Wilder's RMA (`alpha = 1 / period`), see [`crate::indicators::Rma`].
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    alpha: f64,
    count: usize,
    seed_sum: f64,
    value: Option<f64>,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self::with_alpha(period, 2.0 / (period as f64 + 1.0))
    }

    pub(crate) fn with_alpha(period: usize, alpha: f64) -> Self {
        Self {
            period,
            alpha,
            count: 0,
            seed_sum: 0.0,
            value: None,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Feed the next input and return the new smoothed value.
    pub fn update(&mut self, x: f64) -> f64 {
        let next = match self.value {
            Some(prev) if self.count >= self.period => {
                self.alpha * x + (1.0 - self.alpha) * prev
            }
            _ => {
                self.count += 1;
                self.seed_sum += x;
                self.seed_sum / self.count as f64
            }
        };
        self.value = Some(next);
        next
    }

    /// Most recent output, `None` before the first input.
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.seed_sum = 0.0;
        self.value = None;
    }
}
