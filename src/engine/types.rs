use serde::{Deserialize, Serialize};

/// What the pipeline does with a selected symptom that has no weight-table
/// entry after normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownSymptomPolicy {
    /// Drop it silently — unrecognized input is noise, not failure.
    #[default]
    Ignore,
    /// Fail validation with a message naming the offending input.
    Reject,
}

/// Bounds on how many symptoms one request may carry, checked before the
/// model is ever invoked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SelectionPolicy {
    #[serde(default = "default_min_symptoms")]
    pub min_symptoms: usize,
    #[serde(default = "default_max_symptoms")]
    pub max_symptoms: usize,
    #[serde(default)]
    pub unknown_symptoms: UnknownSymptomPolicy,
}

fn default_min_symptoms() -> usize {
    3
}

fn default_max_symptoms() -> usize {
    17
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            min_symptoms: default_min_symptoms(),
            max_symptoms: default_max_symptoms(),
            unknown_symptoms: UnknownSymptomPolicy::default(),
        }
    }
}

/// The single most likely condition, with its reference text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinglePrediction {
    pub condition: String,
    pub description: String,
    pub precautions: Vec<String>,
}

/// One entry of a ranked prediction list, highest probability first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCondition {
    pub condition: String,
    pub probability: f32,
    pub description: String,
    pub precautions: Vec<String>,
}
