//! Reference artifacts: symptom vocabulary, trained symptom weights, the
//! label table, and the condition description/precaution tables.
//!
//! Everything here is loaded once at startup, validated for internal
//! consistency, and treated as immutable for the process lifetime, so
//! request handlers share one instance without locking.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::enrich::{NOT_AVAILABLE, PRECAUTION_SLOTS};
use crate::engine::normalize::normalize;

#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Failed to read {0}: {1}")]
    Load(String, String),

    #[error("Failed to parse {0}: {1}")]
    Parse(String, String),

    #[error("Inconsistent reference data: {0}")]
    Inconsistent(String),
}

/// Free-text summary of one condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionDescription {
    pub condition: String,
    pub description: String,
}

/// Up to four precaution texts for one condition, in display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionPrecautions {
    pub condition: String,
    pub precautions: Vec<String>,
}

/// Loaded reference data backing every prediction request.
#[derive(Debug)]
pub struct ReferenceData {
    vocabulary: Vec<String>,
    vocabulary_index: HashMap<String, usize>,
    weights: HashMap<String, f32>,
    labels: Vec<String>,
    descriptions: Vec<ConditionDescription>,
    precautions: Vec<ConditionPrecautions>,
}

impl ReferenceData {
    /// Load all reference artifacts from JSON files in `dir`.
    pub fn load(dir: &Path) -> Result<Self, ReferenceError> {
        let vocabulary: Vec<String> = read_json(dir, "vocabulary.json")?;
        let weights: HashMap<String, f32> = read_json(dir, "symptom_weights.json")?;
        let labels: Vec<String> = read_json(dir, "condition_labels.json")?;
        let descriptions: Vec<ConditionDescription> =
            read_json(dir, "condition_descriptions.json")?;
        let precautions: Vec<ConditionPrecautions> =
            read_json(dir, "condition_precautions.json")?;

        Self::from_parts(vocabulary, weights, labels, descriptions, precautions)
    }

    /// Assemble and validate reference data from already-parsed tables.
    ///
    /// Fails fast on anything that would later produce a malformed feature
    /// vector: an empty or non-canonical vocabulary, duplicate vocabulary
    /// keys, weight-table keys outside the vocabulary, non-positive weights,
    /// or an empty label table.
    pub fn from_parts(
        vocabulary: Vec<String>,
        weights: HashMap<String, f32>,
        labels: Vec<String>,
        descriptions: Vec<ConditionDescription>,
        mut precautions: Vec<ConditionPrecautions>,
    ) -> Result<Self, ReferenceError> {
        if vocabulary.is_empty() {
            return Err(ReferenceError::Inconsistent(
                "vocabulary is empty".to_string(),
            ));
        }
        if labels.is_empty() {
            return Err(ReferenceError::Inconsistent(
                "label table is empty".to_string(),
            ));
        }

        let mut vocabulary_index = HashMap::with_capacity(vocabulary.len());
        for (idx, key) in vocabulary.iter().enumerate() {
            if normalize(key) != *key {
                return Err(ReferenceError::Inconsistent(format!(
                    "vocabulary entry {key:?} is not in canonical form"
                )));
            }
            if vocabulary_index.insert(key.clone(), idx).is_some() {
                return Err(ReferenceError::Inconsistent(format!(
                    "vocabulary entry {key:?} appears more than once"
                )));
            }
        }

        for (key, weight) in &weights {
            if !vocabulary_index.contains_key(key) {
                return Err(ReferenceError::Inconsistent(format!(
                    "weight table key {key:?} is not in the vocabulary"
                )));
            }
            if *weight <= 0.0 {
                return Err(ReferenceError::Inconsistent(format!(
                    "weight for {key:?} must be positive, got {weight}"
                )));
            }
        }

        let mut seen_labels = HashSet::with_capacity(labels.len());
        for label in &labels {
            if !seen_labels.insert(label.to_lowercase()) {
                return Err(ReferenceError::Inconsistent(format!(
                    "label {label:?} appears more than once"
                )));
            }
        }

        // Every precaution row carries exactly PRECAUTION_SLOTS entries so
        // display order 1..4 is stable even for sparse source rows.
        for row in &mut precautions {
            row.precautions.truncate(PRECAUTION_SLOTS);
            while row.precautions.len() < PRECAUTION_SLOTS {
                row.precautions.push(NOT_AVAILABLE.to_string());
            }
        }

        Ok(Self {
            vocabulary,
            vocabulary_index,
            weights,
            labels,
            descriptions,
            precautions,
        })
    }

    /// Canonical symptom keys in training column order.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Column index of a canonical symptom key.
    pub fn vocabulary_index(&self, key: &str) -> Option<usize> {
        self.vocabulary_index.get(key).copied()
    }

    /// Trained weight of a canonical symptom key.
    pub fn weight_for(&self, key: &str) -> Option<f32> {
        self.weights.get(key).copied()
    }

    /// Keys a client may select, sorted for display.
    pub fn selectable_symptoms(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.weights.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Condition name for a model label index.
    pub fn label_name(&self, label_id: usize) -> Option<&str> {
        self.labels.get(label_id).map(String::as_str)
    }

    /// Number of conditions the label table knows.
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Description text for a condition name (case-insensitive match).
    pub fn description_for(&self, condition: &str) -> Option<&str> {
        let lower = condition.to_lowercase();
        self.descriptions
            .iter()
            .find(|d| d.condition.to_lowercase() == lower)
            .map(|d| d.description.as_str())
    }

    /// Precaution texts for a condition name (case-insensitive match).
    pub fn precautions_for(&self, condition: &str) -> Option<&[String]> {
        let lower = condition.to_lowercase();
        self.precautions
            .iter()
            .find(|p| p.condition.to_lowercase() == lower)
            .map(|p| p.precautions.as_slice())
    }

    /// Create reference data for tests (no file I/O).
    pub fn load_test() -> Self {
        let vocabulary: Vec<String> = ["itching", "chills", "fatigue", "highfever", "headache", "vomiting"]
            .into_iter()
            .map(String::from)
            .collect();
        let weights = HashMap::from([
            ("itching".to_string(), 1.0),
            ("chills".to_string(), 3.0),
            ("fatigue".to_string(), 4.0),
            ("highfever".to_string(), 7.0),
            ("headache".to_string(), 3.0),
            ("vomiting".to_string(), 5.0),
        ]);
        let labels = vec![
            "Allergy".to_string(),
            "Common Cold".to_string(),
            "Malaria".to_string(),
        ];
        let descriptions = vec![
            ConditionDescription {
                condition: "Allergy".into(),
                description: "An immune response to a substance that is harmless to most people."
                    .into(),
            },
            ConditionDescription {
                condition: "Malaria".into(),
                description: "A mosquito-borne infectious disease caused by Plasmodium parasites."
                    .into(),
            },
        ];
        let precautions = vec![
            ConditionPrecautions {
                condition: "Allergy".into(),
                precautions: vec![
                    "apply calamine".into(),
                    "cover area with bandage".into(),
                    "use ice to compress itching".into(),
                ],
            },
            ConditionPrecautions {
                condition: "Malaria".into(),
                precautions: vec![
                    "consult nearest hospital".into(),
                    "avoid oily food".into(),
                    "avoid non veg food".into(),
                    "keep mosquitos out".into(),
                ],
            },
        ];

        Self::from_parts(vocabulary, weights, labels, descriptions, precautions)
            .expect("test reference data must be consistent")
    }
}

fn read_json<T: serde::de::DeserializeOwned>(dir: &Path, file: &str) -> Result<T, ReferenceError> {
    let path = dir.join(file);
    let text = std::fs::read_to_string(&path)
        .map_err(|e| ReferenceError::Load(path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| ReferenceError::Parse(file.to_string(), e.to_string()))
}
