use crate::reference::ReferenceData;

use super::normalize::normalize;

/// Build the model input row for a raw symptom selection.
///
/// One f32 slot per vocabulary entry, in vocabulary order — the column order
/// the classifier was trained on, which is the model-compatibility contract.
/// Each selected symptom is normalized and, when the weight table knows it,
/// contributes its trained weight to the matching slot; everything else stays
/// 0. Selections the weight table does not know are dropped here — rejecting
/// them (when configured) happens in validation before this runs.
///
/// Deterministic, no side effects, and idempotent over duplicates: setting
/// the same slot twice changes nothing.
pub fn encode(reference: &ReferenceData, selection: &[String]) -> Vec<f32> {
    let mut features = vec![0.0_f32; reference.vocabulary().len()];
    for raw in selection {
        let key = normalize(raw);
        if let (Some(weight), Some(idx)) = (
            reference.weight_for(&key),
            reference.vocabulary_index(&key),
        ) {
            features[idx] = weight;
        }
    }
    features
}
