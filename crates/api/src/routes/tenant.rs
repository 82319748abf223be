//! Current tenant info.

use axum::{Json, Router, extract::State, routing::get};
use mizan_core::tenant::RequestContext;
use serde_json::{Value, json};

use crate::{AppState, extractors::Context};

/// Creates the tenant info route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/tenant", get(current_tenant))
}

/// GET `/tenant` - The workspace (or public site) serving this host.
async fn current_tenant(State(state): State<AppState>, Context(context): Context) -> Json<Value> {
    match context {
        RequestContext::Public => Json(json!({
            "name": state.config.tenancy.platform_name,
            "is_public": true,
        })),
        RequestContext::Tenant(tenant) => Json(json!({
            "id": tenant.tenant_id,
            "name": tenant.name,
            "schema_name": tenant.schema.as_str(),
            "is_public": false,
        })),
    }
}
