//! Feature scaling into a common [0, 1] range.
//!
//! - `rescale` maps a value from a known bounded range (RSI, ADX: 0..100).
//! - `Normalizer` maps an unbounded value (CCI, WaveTrend) using the running
//!   min/max of everything it has seen since creation.

/// Floor for the denominator of both scalers.
pub const MIN_RANGE: f64 = 1e-9;

const HISTORIC_MIN_SEED: f64 = 1e11;
const HISTORIC_MAX_SEED: f64 = -1e11;

/// Rescale `value` from `[old_min, old_max]` to `[new_min, new_max]`.
pub fn rescale(value: f64, old_min: f64, old_max: f64, new_min: f64, new_max: f64) -> f64 {
    new_min + (new_max - new_min) * (value - old_min) / (old_max - old_min).max(MIN_RANGE)
}

/// Running min/max normalizer into `[new_min, new_max]`.
#[derive(Debug, Clone)]
pub struct Normalizer {
    new_min: f64,
    new_max: f64,
    historic_min: f64,
    historic_max: f64,
}

impl Normalizer {
    pub fn new(new_min: f64, new_max: f64) -> Self {
        Self {
            new_min,
            new_max,
            historic_min: HISTORIC_MIN_SEED,
            historic_max: HISTORIC_MAX_SEED,
        }
    }

    /// Unit range normalizer, the one every feature uses.
    pub fn unit() -> Self {
        Self::new(0.0, 1.0)
    }

    pub fn update(&mut self, value: f64) -> f64 {
        self.historic_min = self.historic_min.min(value);
        self.historic_max = self.historic_max.max(value);
        self.new_min
            + (self.new_max - self.new_min) * (value - self.historic_min)
                / (self.historic_max - self.historic_min).max(MIN_RANGE)
    }

    pub fn reset(&mut self) {
        self.historic_min = HISTORIC_MIN_SEED;
        self.historic_max = HISTORIC_MAX_SEED;
    }
}
