//! One prediction request from raw selection to rendered result.
//!
//! The pass is synchronous and all-or-nothing: validate → encode → predict →
//! render. A validation failure short-circuits before the model is touched;
//! a model failure is fatal to the request and propagates to the caller —
//! there are no retries and no partial results.

use crate::model::ConditionModel;
use crate::reference::ReferenceData;

use super::encode::encode;
use super::enrich::{description_or_fallback, precautions_or_fallback};
use super::rank::top_k_indices;
use super::types::{RankedCondition, SelectionPolicy, SinglePrediction};
use super::validate::validate_selection;
use super::EngineError;

/// Predict the single most likely condition for a raw selection.
pub fn predict_single<M>(
    reference: &ReferenceData,
    model: &M,
    policy: &SelectionPolicy,
    selection: &[String],
) -> Result<SinglePrediction, EngineError>
where
    M: ConditionModel + ?Sized,
{
    validate_selection(policy, reference, selection)?;

    let features = encode(reference, selection);
    let label_id = model.predict(&features)?;
    let condition = reference
        .label_name(label_id)
        .ok_or(EngineError::UnknownLabel(label_id))?
        .to_string();

    tracing::debug!(%condition, "prediction rendered");

    Ok(SinglePrediction {
        description: description_or_fallback(reference, &condition),
        precautions: precautions_or_fallback(reference, &condition),
        condition,
    })
}

/// Predict the `k` most likely conditions for a raw selection, highest
/// probability first, each joined with its reference text.
pub fn predict_ranked<M>(
    reference: &ReferenceData,
    model: &M,
    policy: &SelectionPolicy,
    selection: &[String],
    k: usize,
) -> Result<Vec<RankedCondition>, EngineError>
where
    M: ConditionModel + ?Sized,
{
    validate_selection(policy, reference, selection)?;

    let features = encode(reference, selection);
    let probabilities = model.predict_proba(&features)?;
    if probabilities.len() != reference.label_count() {
        return Err(EngineError::LabelCount {
            expected: reference.label_count(),
            got: probabilities.len(),
        });
    }

    let ranked = top_k_indices(&probabilities, k)
        .into_iter()
        .map(|label_id| {
            let condition = reference
                .label_name(label_id)
                .ok_or(EngineError::UnknownLabel(label_id))?
                .to_string();
            Ok(RankedCondition {
                probability: probabilities[label_id],
                description: description_or_fallback(reference, &condition),
                precautions: precautions_or_fallback(reference, &condition),
                condition,
            })
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    tracing::debug!(count = ranked.len(), "ranked prediction rendered");

    Ok(ranked)
}
