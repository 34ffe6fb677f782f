use std::sync::atomic::{AtomicUsize, Ordering};

use super::ModelError;

/// Pre-trained classifier abstraction.
///
/// Implementations consume one vocabulary-ordered feature row and expose the
/// trained label space as opaque indices; the reference label table maps an
/// index back to a condition name.
pub trait ConditionModel {
    /// Index of the most likely label for one feature row.
    fn predict(&self, features: &[f32]) -> Result<usize, ModelError>;
    /// Per-label probability distribution for one feature row.
    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, ModelError>;
    /// Number of labels the artifact was trained on.
    fn label_count(&self) -> usize;
}

/// Allow `Box<dyn ConditionModel>` to be used as `&impl ConditionModel`.
impl ConditionModel for Box<dyn ConditionModel + Send + Sync> {
    fn predict(&self, features: &[f32]) -> Result<usize, ModelError> {
        (**self).predict(features)
    }

    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, ModelError> {
        (**self).predict_proba(features)
    }

    fn label_count(&self) -> usize {
        (**self).label_count()
    }
}

/// First index holding the maximum probability (exact ties resolve to the
/// lowest label index, matching the distribution's native order).
fn argmax(probabilities: &[f32]) -> Result<usize, ModelError> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &p) in probabilities.iter().enumerate() {
        match best {
            Some((_, bp)) if p <= bp => {}
            _ => best = Some((idx, p)),
        }
    }
    best.map(|(idx, _)| idx)
        .ok_or_else(|| ModelError::Inference("empty probability distribution".to_string()))
}

// ═══════════════════════════════════════════════════════════
// ONNX classifier — behind `onnx-model` feature
// ═══════════════════════════════════════════════════════════

#[cfg(feature = "onnx-model")]
mod onnx {
    use std::path::Path;
    use std::sync::Mutex;

    use super::{argmax, ConditionModel, ModelError};
    use ort::session::Session;

    /// Real classifier backed by ONNX Runtime.
    ///
    /// Expects an exported classifier taking one `[1, feature_width]` f32 row
    /// and producing a `[1, label_count]` probability tensor as output 0 —
    /// export with zipmap disabled and the label output stripped.
    ///
    /// Uses interior mutability (Mutex) because ort::Session::run requires
    /// `&mut self` but our ConditionModel trait exposes `&self` for ergonomic
    /// shared usage.
    pub struct OnnxModel {
        session: Mutex<Session>,
        input_width: usize,
        label_count: usize,
    }

    impl OnnxModel {
        /// Load the ONNX classifier artifact.
        ///
        /// `input_width` and `label_count` come from the reference artifacts
        /// (vocabulary size and label table size); a model disagreeing with
        /// them is caught per-call via shape validation.
        pub fn load(
            model_path: &Path,
            input_width: usize,
            label_count: usize,
        ) -> Result<Self, ModelError> {
            if !model_path.exists() {
                return Err(ModelError::NotFound(model_path.to_path_buf()));
            }

            let session = Session::builder()
                .map_err(|e: ort::Error| ModelError::Init(e.to_string()))?
                .with_intra_threads(2)
                .map_err(|e: ort::Error| ModelError::Init(e.to_string()))?
                .commit_from_file(model_path)
                .map_err(|e: ort::Error| ModelError::Init(format!("ONNX load failed: {e}")))?;

            tracing::info!("ONNX classifier loaded from {}", model_path.display());

            Ok(Self {
                session: Mutex::new(session),
                input_width,
                label_count,
            })
        }

        fn infer(&self, features: &[f32]) -> Result<Vec<f32>, ModelError> {
            use ort::value::TensorRef;

            if features.len() != self.input_width {
                return Err(ModelError::InputWidth {
                    expected: self.input_width,
                    got: features.len(),
                });
            }

            let row = ndarray::Array2::from_shape_vec((1, features.len()), features.to_vec())
                .map_err(|e| ModelError::Inference(e.to_string()))?;
            let tensor = TensorRef::from_array_view(&row)
                .map_err(|e| ModelError::Inference(e.to_string()))?;

            let mut session = self
                .session
                .lock()
                .map_err(|_| ModelError::Inference("Session lock poisoned".to_string()))?;

            let outputs = session
                .run(ort::inputs![tensor])
                .map_err(|e| ModelError::Inference(format!("ONNX inference failed: {e}")))?;

            // Probabilities are output 0 per the export contract above.
            let (shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| ModelError::Inference(format!("Output extraction: {e}")))?;

            let flat_len: usize = shape.iter().map(|&d| d as usize).product();
            if flat_len != self.label_count {
                return Err(ModelError::Inference(format!(
                    "Unexpected output shape: {shape:?}, expected [1, {}]",
                    self.label_count
                )));
            }

            Ok(data[..self.label_count].to_vec())
        }
    }

    impl ConditionModel for OnnxModel {
        fn predict(&self, features: &[f32]) -> Result<usize, ModelError> {
            argmax(&self.infer(features)?)
        }

        fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, ModelError> {
            self.infer(features)
        }

        fn label_count(&self) -> usize {
            self.label_count
        }
    }
}

#[cfg(feature = "onnx-model")]
pub use onnx::OnnxModel;

/// Mock classifier — deterministic, no artifact on disk.
///
/// Doubles as the fallback model when the crate is built without the
/// `onnx-model` feature, and as the test double that records how often it
/// was invoked.
pub struct MockModel {
    label_count: usize,
    fixed: Option<Vec<f32>>,
    calls: AtomicUsize,
}

impl MockModel {
    /// Always answer with the given distribution.
    pub fn with_probabilities(probabilities: Vec<f32>) -> Self {
        Self {
            label_count: probabilities.len(),
            fixed: Some(probabilities),
            calls: AtomicUsize::new(0),
        }
    }

    /// Derive a distribution deterministically from the feature row, so the
    /// demo server answers differently for different selections.
    pub fn derived(label_count: usize) -> Self {
        Self {
            label_count,
            fixed: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times predict/predict_proba ran.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn distribution(&self, features: &[f32]) -> Vec<f32> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fixed {
            Some(probabilities) => probabilities.clone(),
            None => derived_distribution(features, self.label_count),
        }
    }
}

impl ConditionModel for MockModel {
    fn predict(&self, features: &[f32]) -> Result<usize, ModelError> {
        argmax(&self.distribution(features))
    }

    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, ModelError> {
        Ok(self.distribution(features))
    }

    fn label_count(&self) -> usize {
        self.label_count
    }
}

/// Deterministic pseudo-distribution over `label_count` labels.
/// Each label scores the feature row through a fixed cyclic weighting, then
/// the scores are normalized to sum to 1. An all-zero row yields uniform.
fn derived_distribution(features: &[f32], label_count: usize) -> Vec<f32> {
    let mut scores = vec![0.0_f32; label_count];
    for (idx, score) in scores.iter_mut().enumerate() {
        for (col, &value) in features.iter().enumerate() {
            *score += value * ((idx + col) % 7 + 1) as f32;
        }
    }

    let total: f32 = scores.iter().sum();
    if total > 0.0 {
        for score in &mut scores {
            *score /= total;
        }
        scores
    } else {
        vec![1.0 / label_count.max(1) as f32; label_count]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_distribution_is_returned_verbatim() {
        let model = MockModel::with_probabilities(vec![0.1, 0.7, 0.2]);
        assert_eq!(model.predict_proba(&[1.0]).unwrap(), vec![0.1, 0.7, 0.2]);
        assert_eq!(model.label_count(), 3);
    }

    #[test]
    fn predict_returns_argmax() {
        let model = MockModel::with_probabilities(vec![0.1, 0.7, 0.2]);
        assert_eq!(model.predict(&[1.0]).unwrap(), 1);
    }

    #[test]
    fn argmax_tie_resolves_to_lowest_index() {
        let model = MockModel::with_probabilities(vec![0.2, 0.4, 0.4]);
        assert_eq!(model.predict(&[]).unwrap(), 1);
    }

    #[test]
    fn argmax_rejects_empty_distribution() {
        let model = MockModel::with_probabilities(vec![]);
        assert!(model.predict(&[]).is_err());
    }

    #[test]
    fn call_count_tracks_invocations() {
        let model = MockModel::with_probabilities(vec![0.5, 0.5]);
        assert_eq!(model.call_count(), 0);
        let _ = model.predict(&[1.0]);
        let _ = model.predict_proba(&[1.0]);
        assert_eq!(model.call_count(), 2);
    }

    #[test]
    fn derived_distribution_is_deterministic() {
        let model = MockModel::derived(4);
        let a = model.predict_proba(&[1.0, 0.0, 3.0]).unwrap();
        let b = model.predict_proba(&[1.0, 0.0, 3.0]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn derived_distribution_sums_to_one() {
        let model = MockModel::derived(5);
        let probabilities = model.predict_proba(&[2.0, 1.0, 0.0, 4.0]).unwrap();
        let sum: f32 = probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5, "Expected sum ~1.0, got {sum}");
        assert!(probabilities.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn derived_distribution_uniform_on_zero_row() {
        let model = MockModel::derived(4);
        let probabilities = model.predict_proba(&[0.0, 0.0]).unwrap();
        assert_eq!(probabilities, vec![0.25; 4]);
    }

    #[test]
    fn derived_distribution_varies_with_input() {
        let model = MockModel::derived(4);
        let a = model.predict_proba(&[1.0, 0.0, 0.0]).unwrap();
        let b = model.predict_proba(&[0.0, 0.0, 1.0]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn boxed_model_delegates() {
        let boxed: Box<dyn ConditionModel + Send + Sync> =
            Box::new(MockModel::with_probabilities(vec![0.9, 0.1]));
        assert_eq!(boxed.predict(&[1.0]).unwrap(), 0);
        assert_eq!(boxed.label_count(), 2);
    }
}
