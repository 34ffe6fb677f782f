//! Symptom vocabulary endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct SymptomsResponse {
    /// Selectable canonical symptom keys, sorted for display.
    pub symptoms: Vec<String>,
    /// Policy bounds so the form can validate client-side before submitting.
    pub min_symptoms: usize,
    pub max_symptoms: usize,
}

/// `GET /api/symptoms` — choices for the selection widget.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<SymptomsResponse>, ApiError> {
    Ok(Json(SymptomsResponse {
        symptoms: ctx.reference.selectable_symptoms(),
        min_symptoms: ctx.policy.min_symptoms,
        max_symptoms: ctx.policy.max_symptoms,
    }))
}
