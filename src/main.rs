use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use symptra::api::{triage_api_router, ApiContext};
use symptra::config;
use symptra::engine::types::SelectionPolicy;
use symptra::model::ConditionModel;
use symptra::reference::ReferenceData;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Symptra starting v{}", config::APP_VERSION);

    if let Err(err) = run().await {
        tracing::error!("Fatal: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let reference_dir = config::reference_dir();
    tracing::info!("Loading reference artifacts from {}", reference_dir.display());
    let reference = Arc::new(ReferenceData::load(&reference_dir)?);
    tracing::info!(
        symptoms = reference.vocabulary().len(),
        conditions = reference.label_count(),
        "Reference artifacts loaded"
    );

    let model = load_model(&reference)?;
    let policy = load_policy(&reference_dir)?;
    tracing::info!(
        min = policy.min_symptoms,
        max = policy.max_symptoms,
        strictness = ?policy.unknown_symptoms,
        "Selection policy active"
    );

    let app = triage_api_router(ApiContext::new(reference, model, policy));

    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], config::api_port()));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(feature = "onnx-model")]
fn load_model(
    reference: &Arc<ReferenceData>,
) -> Result<Arc<dyn ConditionModel + Send + Sync>, Box<dyn std::error::Error>> {
    let model_path = config::models_dir().join("model.onnx");
    let model = symptra::model::OnnxModel::load(
        &model_path,
        reference.vocabulary().len(),
        reference.label_count(),
    )?;
    Ok(Arc::new(model))
}

#[cfg(not(feature = "onnx-model"))]
fn load_model(
    reference: &Arc<ReferenceData>,
) -> Result<Arc<dyn ConditionModel + Send + Sync>, Box<dyn std::error::Error>> {
    tracing::warn!(
        "Built without the onnx-model feature; answering with the deterministic fallback model"
    );
    Ok(Arc::new(symptra::model::MockModel::derived(
        reference.label_count(),
    )))
}

/// Optional `policy.json` next to the reference artifacts overrides the
/// default selection policy.
fn load_policy(reference_dir: &Path) -> Result<SelectionPolicy, Box<dyn std::error::Error>> {
    let path = reference_dir.join("policy.json");
    if !path.exists() {
        return Ok(SelectionPolicy::default());
    }
    let text = std::fs::read_to_string(&path)?;
    let policy: SelectionPolicy = serde_json::from_str(&text)?;
    Ok(policy)
}
