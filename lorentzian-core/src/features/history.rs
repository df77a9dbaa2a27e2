//! Bounded training history: feature arrays, label history, and the pending
//! window that pairs them.
//!
//! A bar's label is the sign of `price[t + 4] - price[t]`, so it is only
//! known four bars later. Feature vectors wait in the pending window until
//! their label matures, then enter `FeatureArrays` and `LabelHistory` in one
//! step. Both histories therefore always have the same length.

use std::collections::VecDeque;

use crate::domain::Label;

use super::FeatureVector;

/// Bars between a feature vector and the close that labels it.
pub const LABEL_HORIZON: usize = 4;

/// One bounded ring buffer per feature slot, oldest value first.
#[derive(Debug, Clone)]
pub struct FeatureArrays {
    slots: Vec<VecDeque<f64>>,
    capacity: usize,
}

impl FeatureArrays {
    pub fn new(feature_count: usize, capacity: usize) -> Self {
        Self {
            slots: (0..feature_count)
                .map(|_| VecDeque::with_capacity(capacity.min(4096) + 1))
                .collect(),
            capacity,
        }
    }

    pub fn feature_count(&self) -> usize {
        self.slots.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.first().map_or(0, VecDeque::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append one vector, evicting the oldest entry past capacity.
    ///
    /// # Panics
    /// If the vector length differs from the slot count.
    pub fn push(&mut self, vector: &FeatureVector) {
        assert_eq!(
            vector.len(),
            self.slots.len(),
            "feature vector length must match slot count"
        );
        for (slot, &value) in self.slots.iter_mut().zip(vector.as_slice()) {
            slot.push_back(value);
            if slot.len() > self.capacity {
                slot.pop_front();
            }
        }
    }

    /// Value of `slot` recorded `back` entries before the most recent one.
    pub fn value_back(&self, slot: usize, back: usize) -> f64 {
        let series = &self.slots[slot];
        series[series.len() - 1 - back]
    }

    /// Full series for one slot, oldest first.
    pub fn slot(&self, slot: usize) -> &VecDeque<f64> {
        &self.slots[slot]
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
    }
}

/// Bounded ring buffer of training labels, oldest first.
#[derive(Debug, Clone)]
pub struct LabelHistory {
    labels: VecDeque<Label>,
    capacity: usize,
}

impl LabelHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            labels: VecDeque::with_capacity(capacity.min(4096) + 1),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn push(&mut self, label: Label) {
        self.labels.push_back(label);
        if self.labels.len() > self.capacity {
            self.labels.pop_front();
        }
    }

    /// Label recorded `back` entries before the most recent one.
    pub fn label_back(&self, back: usize) -> Label {
        self.labels[self.labels.len() - 1 - back]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter()
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }
}

/// Feature arrays and labels kept in lockstep, fed through the pending window.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    arrays: FeatureArrays,
    labels: LabelHistory,
    pending: VecDeque<(FeatureVector, f64)>,
}

impl TrainingSet {
    pub fn new(feature_count: usize, capacity: usize) -> Self {
        Self {
            arrays: FeatureArrays::new(feature_count, capacity),
            labels: LabelHistory::new(capacity),
            pending: VecDeque::with_capacity(LABEL_HORIZON + 1),
        }
    }

    pub fn arrays(&self) -> &FeatureArrays {
        &self.arrays
    }

    pub fn labels(&self) -> &LabelHistory {
        &self.labels
    }

    /// Matured entries available as neighbor candidates.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Record the current bar's vector and label price. If the entry from
    /// `LABEL_HORIZON` bars ago has now matured, append it with its label and
    /// return that label.
    pub fn record(&mut self, vector: FeatureVector, price: f64) -> Option<Label> {
        self.pending.push_back((vector, price));
        if self.pending.len() <= LABEL_HORIZON {
            return None;
        }
        let (matured, then) = self.pending.pop_front()?;
        let label = Label::from_change(price - then);
        self.arrays.push(&matured);
        self.labels.push(label);
        debug_assert_eq!(self.arrays.len(), self.labels.len());
        Some(label)
    }

    pub fn clear(&mut self) {
        self.arrays.clear();
        self.labels.clear();
        self.pending.clear();
    }
}
