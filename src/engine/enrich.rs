use crate::reference::ReferenceData;

/// Shown when a condition has no description row.
pub const NO_DESCRIPTION: &str = "No description available.";

/// Shown for each precaution slot of a condition with no precaution row.
pub const NOT_AVAILABLE: &str = "Not available";

/// Precaution slots per condition.
pub const PRECAUTION_SLOTS: usize = 4;

/// Description text for a condition, with the fixed fallback on a miss.
/// A missing row is expected for conditions outside the reference tables and
/// is never an error.
pub fn description_or_fallback(reference: &ReferenceData, condition: &str) -> String {
    reference
        .description_for(condition)
        .unwrap_or(NO_DESCRIPTION)
        .to_string()
}

/// Exactly four precaution texts for a condition, in table order, with the
/// fixed per-slot fallback on a miss.
pub fn precautions_or_fallback(reference: &ReferenceData, condition: &str) -> Vec<String> {
    match reference.precautions_for(condition) {
        Some(precautions) => precautions.to_vec(),
        None => vec![NOT_AVAILABLE.to_string(); PRECAUTION_SLOTS],
    }
}
