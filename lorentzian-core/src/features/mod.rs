//! Feature engineering for the classifier.
//!
//! - `calculator`: one configured indicator slot, scaled into [0, 1]
//! - `pipeline`: all slots for a stream, with a lazy per-spec registry
//! - `history`: bounded feature arrays + label history + pending label window

pub mod calculator;
pub mod history;
pub mod pipeline;

pub use calculator::FeatureCalculator;
pub use history::{FeatureArrays, LabelHistory, TrainingSet, LABEL_HORIZON};
pub use pipeline::FeaturePipeline;

use serde::{Deserialize, Serialize};

/// Feature values for the current bar, in slot order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<f64> {
        self.0.get(slot).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}
