//! Shared types for the API layer.

use std::sync::Arc;
use std::time::Duration;

use crate::config;
use crate::engine::types::SelectionPolicy;
use crate::model::ConditionModel;
use crate::reference::ReferenceData;

/// Shared context for all API routes.
///
/// Reference tables and the model are loaded once at startup and never
/// mutated afterwards, so handlers share them across concurrent requests
/// without locking.
#[derive(Clone)]
pub struct ApiContext {
    pub reference: Arc<ReferenceData>,
    pub model: Arc<dyn ConditionModel + Send + Sync>,
    pub policy: SelectionPolicy,
    pub model_timeout: Duration,
}

impl ApiContext {
    pub fn new(
        reference: Arc<ReferenceData>,
        model: Arc<dyn ConditionModel + Send + Sync>,
        policy: SelectionPolicy,
    ) -> Self {
        Self {
            reference,
            model,
            policy,
            model_timeout: config::model_timeout(),
        }
    }
}
