use std::cmp::Ordering;

/// How many conditions a ranked answer carries by default.
pub const DEFAULT_TOP_K: usize = 5;

/// Indices of the `k` highest probabilities, descending.
///
/// The sort is stable, so labels with exactly equal probabilities keep their
/// original label-index order. The result length is `min(k, len)`.
pub fn top_k_indices(probabilities: &[f32], k: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..probabilities.len()).collect();
    indices.sort_by(|&a, &b| {
        probabilities[b]
            .partial_cmp(&probabilities[a])
            .unwrap_or(Ordering::Equal)
    });
    indices.truncate(k.min(probabilities.len()));
    indices
}
