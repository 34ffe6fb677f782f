pub mod classifier;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Classifier artifact not found: {0}")]
    NotFound(PathBuf),

    #[error("Classifier initialization: {0}")]
    Init(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Input width {got} does not match trained feature width {expected}")]
    InputWidth { expected: usize, got: usize },
}

pub use classifier::{ConditionModel, MockModel};

#[cfg(feature = "onnx-model")]
pub use classifier::OnnxModel;
