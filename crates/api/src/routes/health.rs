//! Liveness endpoint. Answers on any host, outside tenant resolution.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

/// Liveness response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `"healthy"` while the process serves requests.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Crate version.
    pub version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "mizan",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /health`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
