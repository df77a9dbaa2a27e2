//! Approximate nearest-neighbor classifier over Lorentzian distance.
//!
//! Not a top-k sort. The scan walks history from the most recent matured entry
//! backward and admits a candidate only when
//! - its offset is not a multiple of 4 (chronological downsampling), and
//! - its distance is at least the last admitted distance.
//!
//! When the set grows past `neighbors_count`, the admission threshold jumps to
//! the distance at index `round(3k/4)` of the current set and the oldest
//! admitted neighbor is dropped. The prediction is the sum of admitted labels.

pub mod distance;

pub use distance::lorentzian_distance;

use serde::Serialize;

use crate::domain::Label;
use crate::features::{FeatureArrays, FeatureVector, LabelHistory};

/// One admitted neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    /// Entries before the most recent matured entry.
    pub offset: usize,
    pub distance: f64,
    pub label: Label,
}

/// Neighbors admitted during one prediction, oldest admission first,
/// plus those evicted along the way.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NeighborSet {
    pub accepted: Vec<Neighbor>,
    pub evicted: Vec<Neighbor>,
}

impl NeighborSet {
    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    pub fn label_sum(&self) -> i32 {
        self.accepted.iter().map(|n| i32::from(n.label.value())).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Prediction {
    /// Sum of admitted labels, in `[-k, k]`.
    pub value: i32,
    pub neighbors: NeighborSet,
}

#[derive(Debug, Clone, Copy)]
pub struct LorentzianClassifier {
    neighbors_count: usize,
    max_bars_back: usize,
}

impl LorentzianClassifier {
    pub fn new(neighbors_count: usize, max_bars_back: usize) -> Self {
        assert!(neighbors_count >= 1, "neighbors_count must be >= 1");
        assert!(max_bars_back >= 1, "max_bars_back must be >= 1");
        Self {
            neighbors_count,
            max_bars_back,
        }
    }

    pub fn neighbors_count(&self) -> usize {
        self.neighbors_count
    }

    /// Index into the pre-eviction set whose distance becomes the new threshold.
    fn threshold_index(&self) -> usize {
        (self.neighbors_count as f64 * 3.0 / 4.0).round() as usize
    }

    /// Classify `current` against matured history.
    ///
    /// # Panics
    /// If `arrays` and `labels` differ in length.
    pub fn predict(
        &self,
        current: &FeatureVector,
        arrays: &FeatureArrays,
        labels: &LabelHistory,
    ) -> Prediction {
        assert_eq!(
            arrays.len(),
            labels.len(),
            "feature arrays and labels must stay paired"
        );
        let len = arrays.len();
        if len == 0 {
            return Prediction::default();
        }

        let slots = arrays.feature_count().min(current.len());
        let last = (self.max_bars_back - 1).min(len - 1);
        let mut set = NeighborSet::default();
        let mut last_distance = -1.0;
        let mut historical = Vec::with_capacity(slots);

        for offset in 0..=last {
            if offset % 4 == 0 {
                continue;
            }
            historical.clear();
            historical.extend((0..slots).map(|j| arrays.value_back(j, offset)));
            let d = lorentzian_distance(&current.as_slice()[..slots], &historical);
            if d < last_distance {
                continue;
            }
            last_distance = d;
            set.accepted.push(Neighbor {
                offset,
                distance: d,
                label: labels.label_back(offset),
            });
            if set.accepted.len() > self.neighbors_count {
                last_distance = set.accepted[self.threshold_index()].distance;
                set.evicted.push(set.accepted.remove(0));
            }
        }

        Prediction {
            value: set.label_sum(),
            neighbors: set,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;

    fn history(rows: &[(f64, Direction)]) -> (FeatureArrays, LabelHistory) {
        let mut arrays = FeatureArrays::new(2, 100);
        let mut labels = LabelHistory::new(100);
        for &(v, label) in rows {
            arrays.push(&FeatureVector::new(vec![v, 0.0]));
            labels.push(label);
        }
        (arrays, labels)
    }

    #[test]
    fn empty_history_predicts_zero() {
        let clf = LorentzianClassifier::new(8, 2000);
        let (arrays, labels) = history(&[]);
        let p = clf.predict(&FeatureVector::new(vec![0.5, 0.5]), &arrays, &labels);
        assert_eq!(p.value, 0);
        assert!(p.neighbors.is_empty());
    }

    #[test]
    fn every_fourth_offset_is_skipped() {
        let clf = LorentzianClassifier::new(100, 2000);
        // Constant history: every distance equal, so only the modulo rule rejects
        let rows = vec![(0.5, Direction::Long); 12];
        let (arrays, labels) = history(&rows);
        let p = clf.predict(&FeatureVector::new(vec![0.5, 0.0]), &arrays, &labels);
        let offsets: Vec<usize> = p.neighbors.accepted.iter().map(|n| n.offset).collect();
        assert_eq!(offsets, [1, 2, 3, 5, 6, 7, 9, 10, 11]);
        assert_eq!(p.value, 9);
    }

    #[test]
    fn closer_candidates_after_a_far_one_are_rejected() {
        let clf = LorentzianClassifier::new(8, 2000);
        // offsets (most recent first): 0 skip, 1 far, 2 near, 3 far
        let (arrays, labels) = history(&[
            (0.0, Direction::Short), // offset 3
            (0.5, Direction::Long),  // offset 2
            (0.0, Direction::Short), // offset 1
            (0.5, Direction::Long),  // offset 0
        ]);
        let p = clf.predict(&FeatureVector::new(vec![0.5, 0.0]), &arrays, &labels);
        let offsets: Vec<usize> = p.neighbors.accepted.iter().map(|n| n.offset).collect();
        assert_eq!(offsets, [1, 3]);
        assert_eq!(p.value, -2);
    }

    #[test]
    fn scan_is_bounded_by_max_bars_back() {
        let clf = LorentzianClassifier::new(100, 3);
        let rows = vec![(0.5, Direction::Long); 20];
        let (arrays, labels) = history(&rows);
        let p = clf.predict(&FeatureVector::new(vec![0.5, 0.0]), &arrays, &labels);
        // offsets 0..=2, 0 skipped
        assert_eq!(p.neighbors.len(), 2);
    }
}
