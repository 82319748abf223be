//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::tenant_middleware};

pub mod accounts;
pub mod health;
pub mod journal;
pub mod reports;
pub mod tenant;
pub mod workspaces;

/// Creates the `/api/v1` router. Every route runs behind tenant resolution;
/// handlers pick public or tenant context through their extractors.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(tenant::routes())
        .merge(workspaces::routes())
        .merge(accounts::routes())
        .merge(journal::routes())
        .merge(reports::routes())
        .layer(middleware::from_fn_with_state(state, tenant_middleware))
}
