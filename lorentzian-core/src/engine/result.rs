//! Per-bar output record.

use serde::{Deserialize, Serialize};

use crate::components::FilterReport;
use crate::domain::Direction;
use crate::features::FeatureVector;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarResult {
    pub bar_index: usize,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub features: FeatureVector,
    /// Sum of neighbor labels, in `[-neighbors_count, neighbors_count]`.
    pub prediction: i32,
    pub signal: Direction,
    pub start_long: bool,
    pub start_short: bool,
    pub end_long: bool,
    pub end_short: bool,
    pub filters: FilterReport,
    pub early_signal_flip: bool,
    /// `prediction / neighbors_count`, in `[-1, 1]`.
    pub prediction_strength: f64,
    pub kernel_estimate: f64,
    pub kernel_bullish: bool,
    pub kernel_bearish: bool,
}

impl BarResult {
    pub fn has_event(&self) -> bool {
        self.start_long || self.start_short || self.end_long || self.end_short
    }
}
