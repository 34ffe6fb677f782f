use crate::reference::ReferenceData;

use super::normalize::normalize;
use super::types::{SelectionPolicy, UnknownSymptomPolicy};
use super::EngineError;

/// Check a raw selection against the active policy.
///
/// Runs before encoding; a failure here means the model is never invoked for
/// this request. Count bounds apply to the raw selection as submitted. In
/// strict mode every entry must also resolve to a weight-table key after
/// normalization.
pub fn validate_selection(
    policy: &SelectionPolicy,
    reference: &ReferenceData,
    selection: &[String],
) -> Result<(), EngineError> {
    let count = selection.len();
    if count < policy.min_symptoms {
        return Err(EngineError::Validation(format!(
            "Select at least {} symptom(s); got {count}",
            policy.min_symptoms
        )));
    }
    if count > policy.max_symptoms {
        return Err(EngineError::Validation(format!(
            "Select at most {} symptom(s); got {count}",
            policy.max_symptoms
        )));
    }

    if policy.unknown_symptoms == UnknownSymptomPolicy::Reject {
        for raw in selection {
            if reference.weight_for(&normalize(raw)).is_none() {
                return Err(EngineError::Validation(format!(
                    "Unrecognized symptom: {raw:?}"
                )));
            }
        }
    }

    Ok(())
}
