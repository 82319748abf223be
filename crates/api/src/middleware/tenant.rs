//! Host-based tenant resolution.

use axum::{
    extract::{Request, State},
    http::header::HOST,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::AppState;
use crate::error::ApiError;

/// Resolves the request's `Host` into a
/// [`RequestContext`](mizan_core::tenant::RequestContext) and stores it in the
/// request extensions.
///
/// Unknown hosts fall back to the public context or fail with 404, depending
/// on configuration.
pub async fn tenant_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let host = request
        .headers()
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| request.uri().authority().map(|a| a.as_str()))
        .unwrap_or_default()
        .to_string();

    match state.resolver.resolve(&host).await {
        Ok(context) => {
            request.extensions_mut().insert(context);
            next.run(request).await
        }
        Err(e) => {
            warn!(%host, error = %e, "Tenant resolution failed");
            ApiError::from(e).into_response()
        }
    }
}
