pub mod types;
pub mod normalize;
pub mod encode;
pub mod validate;
pub mod rank;
pub mod enrich;
pub mod orchestrator;

use thiserror::Error;

use crate::model::ModelError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Model returned {got} probabilities for {expected} known conditions")]
    LabelCount { expected: usize, got: usize },

    #[error("Model returned unknown label id {0}")]
    UnknownLabel(usize),
}
