use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Symptra";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default port the local API binds to.
pub const DEFAULT_PORT: u16 = 8422;

/// Default wall-clock bound on a single model invocation.
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 10;

/// Get the application data directory
/// ~/Symptra/ on all platforms (user-visible, by design)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Symptra")
}

/// Get the reference artifact directory (vocabulary, weights, labels, tables).
///
/// Resolution order: `SYMPTRA_DATA_DIR`, then `./data` when it exists (the
/// repository ships sample artifacts there), then `~/Symptra/reference`.
pub fn reference_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SYMPTRA_DATA_DIR") {
        return PathBuf::from(dir);
    }
    let local = PathBuf::from("data");
    if local.is_dir() {
        return local;
    }
    app_data_dir().join("reference")
}

/// Get the models directory (for the ONNX classifier artifact).
pub fn models_dir() -> PathBuf {
    app_data_dir().join("models")
}

/// Port the API binds to (`SYMPTRA_PORT` override).
pub fn api_port() -> u16 {
    std::env::var("SYMPTRA_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Bound on a single model invocation (`SYMPTRA_MODEL_TIMEOUT_SECS` override).
pub fn model_timeout() -> Duration {
    let secs = std::env::var("SYMPTRA_MODEL_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MODEL_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    format!("{}=info,tower_http=warn", env!("CARGO_PKG_NAME"))
}
