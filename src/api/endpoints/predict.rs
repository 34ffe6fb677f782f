//! Prediction endpoint.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::engine::orchestrator;
use crate::engine::types::{RankedCondition, SinglePrediction};

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub symptoms: Vec<String>,
    /// Absent: answer with the single most likely condition.
    /// Present: answer with a ranked list of up to `top_k` conditions.
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PredictResponse {
    Single { prediction: SinglePrediction },
    Ranked { predictions: Vec<RankedCondition> },
}

/// `POST /api/predict` — one encode→predict→render pass.
///
/// The model call is synchronous, so it runs on the blocking pool under the
/// configured time budget; requests are never cancelled mid-inference, they
/// just stop being waited for.
pub async fn predict(
    State(ctx): State<ApiContext>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    if request.top_k == Some(0) {
        return Err(ApiError::BadRequest("top_k must be at least 1".to_string()));
    }

    let ApiContext {
        reference,
        model,
        policy,
        model_timeout,
    } = ctx;
    let selection = request.symptoms;
    let top_k = request.top_k;

    let task = tokio::task::spawn_blocking(move || match top_k {
        None => orchestrator::predict_single(&reference, model.as_ref(), &policy, &selection)
            .map(|prediction| PredictResponse::Single { prediction }),
        Some(k) => {
            orchestrator::predict_ranked(&reference, model.as_ref(), &policy, &selection, k)
                .map(|predictions| PredictResponse::Ranked { predictions })
        }
    });

    let outcome = tokio::time::timeout(model_timeout, task)
        .await
        .map_err(|_| ApiError::ModelTimeout)?
        .map_err(|e| ApiError::Internal(format!("prediction task failed: {e}")))?;

    let response = outcome?;
    tracing::info!(
        ranked = top_k.is_some(),
        "prediction request served"
    );
    Ok(Json(response))
}
