//! Lorentzian distance between two feature vectors.

/// `Σ ln(1 + |a_j - b_j|)` over the shorter of the two slices.
///
/// Grows logarithmically with each coordinate gap, so one outlier feature
/// cannot dominate the sum the way it would under Euclidean distance.
pub fn lorentzian_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs().ln_1p())
        .sum()
}
