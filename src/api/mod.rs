//! Local triage API.
//!
//! Exposes the prediction engine as HTTP endpoints for the form front-end.
//! Routes are nested under `/api/` with CORS open for local origins.
//!
//! The router is composable — `triage_api_router()` returns a `Router`
//! that can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod types;

pub use router::triage_api_router;
pub use types::ApiContext;
