//! Workspace registration and lookup on the public site.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use mizan_core::tenant::ProvisionRequest;
use mizan_db::TenantRepository;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError, extractors::PublicSite};

/// Creates the workspace routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/workspaces", post(create_workspace))
        .route("/workspaces/lookup", get(lookup_workspaces))
        .route("/workspaces/verify-email", post(verify_email))
}

/// Query parameters for workspace lookup.
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    /// Owner e-mail.
    pub email: String,
}

/// Request body for e-mail verification.
#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    /// Token issued at registration.
    pub token: Uuid,
}

/// POST `/workspaces` - Provision a new workspace.
async fn create_workspace(
    State(state): State<AppState>,
    _public: PublicSite,
    Json(request): Json<ProvisionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let plan = request.plan(&state.config.tenancy.base_domain)?;
    let repo = TenantRepository::new((*state.db).clone());
    let created = repo.provision(&plan, &request.admin_password).await?;

    state.mailer.send_verification(&plan.verification_notice());
    info!(
        tenant_id = %created.tenant_id,
        domain = %created.domain,
        "Workspace registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "tenant": created,
            "domain": created.domain,
            "url": format!("http://{}", created.domain),
            "admin_username": created.admin_username,
        })),
    ))
}

/// GET `/workspaces/lookup?email=` - Workspaces owned by an e-mail address.
async fn lookup_workspaces(
    State(state): State<AppState>,
    _public: PublicSite,
    Query(query): Query<LookupQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if query.email.trim().is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    let repo = TenantRepository::new((*state.db).clone());
    let workspaces = repo.find_by_owner_email(&query.email).await?;

    let data: Vec<_> = workspaces
        .into_iter()
        .map(|w| {
            json!({
                "name": w.name,
                "domain": w.domain,
                "url": format!("http://{}", w.domain),
                "is_email_verified": w.is_email_verified,
            })
        })
        .collect();
    Ok(Json(json!({ "workspaces": data })))
}

/// POST `/workspaces/verify-email` - Confirm the owner's e-mail.
async fn verify_email(
    State(state): State<AppState>,
    _public: PublicSite,
    Json(request): Json<VerifyEmailRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TenantRepository::new((*state.db).clone());
    let tenant = repo.verify_email(request.token).await?;
    Ok(Json(json!({
        "message": "Email verified",
        "workspace": tenant.name,
    })))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header::HOST},
    };
    use http_body_util::BodyExt;
    use mizan_core::tenant::VerificationNotice;
    use mizan_db::migration::Migrator;
    use mizan_shared::AppConfig;
    use mizan_shared::config::{DatabaseConfig, ServerConfig};
    use mizan_shared::{ComplianceConfig, TenancyConfig};
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::mail::Mailer;
    use crate::{AppState, create_router};

    #[derive(Default)]
    struct RecordingMailer(Mutex<Vec<VerificationNotice>>);

    impl Mailer for RecordingMailer {
        fn send_verification(&self, notice: &VerificationNotice) {
            self.0.lock().unwrap().push(notice.clone());
        }
    }

    async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(HOST, "localhost")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_registration_mails_a_usable_verification_link() {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping");
            return;
        };
        let db = Database::connect(&url).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let config = AppConfig {
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url,
                max_connections: 2,
                min_connections: 0,
                connect_timeout_secs: 5,
            },
            tenancy: TenancyConfig::default(),
            compliance: ComplianceConfig::default(),
        };
        let mailer = Arc::new(RecordingMailer::default());
        let app = create_router(AppState::new(db, config).with_mailer(mailer.clone()));

        let slug = format!("mail-{}", &Uuid::new_v4().simple().to_string()[..10]);
        let (status, body) = post(
            &app,
            "/api/v1/workspaces",
            json!({
                "name": "Masjid Al Falah",
                "domain": slug,
                "admin_email": "Falah@Example.org",
                "admin_password": "bismillah-123",
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["tenant"].get("verification_token").is_none());

        let notice = mailer.0.lock().unwrap().pop().unwrap();
        assert_eq!(notice.to, "falah@example.org");
        assert!(notice.url.starts_with(&format!("http://{slug}.localhost/auth/verify-email?token=")));
        let token = notice.url.rsplit('=').next().unwrap().to_string();

        let (status, body) = post(&app, "/api/v1/workspaces/verify-email", json!({ "token": token })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["workspace"], "Masjid Al Falah");

        let (status, _) = post(&app, "/api/v1/workspaces/verify-email", json!({ "token": token })).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
