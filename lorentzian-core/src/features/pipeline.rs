//! Feature pipeline: configured slots → `FeatureVector` per bar.
//!
//! Calculators live in a private registry keyed by `FeatureSpec` and are
//! created the first time a spec is needed. Two slots with the same spec share
//! one calculator, which is stepped once per bar.

use std::collections::HashMap;

use crate::config::FeatureSpec;
use crate::domain::Bar;

use super::calculator::FeatureCalculator;
use super::FeatureVector;

#[derive(Debug)]
pub struct FeaturePipeline {
    slots: Vec<FeatureSpec>,
    registry: HashMap<FeatureSpec, FeatureCalculator>,
}

impl FeaturePipeline {
    pub fn new(slots: Vec<FeatureSpec>) -> Self {
        Self {
            slots,
            registry: HashMap::new(),
        }
    }

    pub fn slots(&self) -> &[FeatureSpec] {
        &self.slots
    }

    /// Number of distinct calculators created so far.
    pub fn calculator_count(&self) -> usize {
        self.registry.len()
    }

    /// Step every calculator with `bar` and assemble the feature vector in slot order.
    pub fn compute(&mut self, bar: &Bar) -> FeatureVector {
        let mut stepped: Vec<(FeatureSpec, f64)> = Vec::with_capacity(self.slots.len());
        let mut values = Vec::with_capacity(self.slots.len());
        for spec in &self.slots {
            let value = match stepped.iter().find(|(s, _)| s == spec) {
                Some(&(_, v)) => v,
                None => {
                    let v = self
                        .registry
                        .entry(*spec)
                        .or_insert_with(|| FeatureCalculator::new(*spec))
                        .update(bar);
                    stepped.push((*spec, v));
                    v
                }
            };
            values.push(value);
        }
        FeatureVector::new(values)
    }

    pub fn reset(&mut self) {
        self.registry.clear();
    }
}
