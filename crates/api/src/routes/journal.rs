//! Voucher routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use mizan_core::ledger::{JournalEntryInput, VoucherType};
use mizan_db::JournalRepository;
use mizan_db::repositories::JournalFilter;
use mizan_shared::types::{JournalEntryId, PageRequest, UserId};
use serde::Deserialize;

use crate::{AppState, audit, error::ApiError, extractors::Workspace};

/// Creates the voucher routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/journal-entries", get(list_entries).post(create_entry))
        .route("/journal-entries/{id}", get(get_entry).put(update_entry))
        .route("/journal-entries/{id}/finalize", post(finalize_entry))
        .route("/journal-entries/{id}/reverse", post(reverse_entry))
}

/// Query parameters for listing vouchers.
#[derive(Debug, Deserialize)]
pub struct ListEntriesQuery {
    /// Earliest date, inclusive.
    pub from: Option<NaiveDate>,
    /// Latest date, inclusive.
    pub to: Option<NaiveDate>,
    /// Only this voucher type.
    pub voucher_type: Option<VoucherType>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Request body for a reversal.
#[derive(Debug, Default, Deserialize)]
pub struct ReverseRequest {
    /// Date of the contra voucher; today when absent.
    pub date: Option<NaiveDate>,
    /// Author of the contra voucher.
    pub created_by: Option<UserId>,
}

/// GET `/journal-entries` - Paginated voucher list, newest first.
async fn list_entries(
    State(state): State<AppState>,
    Workspace(tenant): Workspace,
    Query(query): Query<ListEntriesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if let (Some(from), Some(to)) = (query.from, query.to) {
        if from > to {
            return Err(ApiError::validation("'from' must not be after 'to'"));
        }
    }
    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };
    let filter = JournalFilter {
        from: query.from,
        to: query.to,
        voucher_type: query.voucher_type,
    };

    let repo = JournalRepository::new((*state.db).clone(), state.rules.clone());
    Ok(Json(repo.list(&tenant, filter, &page).await?))
}

/// POST `/journal-entries` - Post a draft voucher.
async fn create_entry(
    State(state): State<AppState>,
    Workspace(tenant): Workspace,
    Json(input): Json<JournalEntryInput>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = JournalRepository::new((*state.db).clone(), state.rules.clone());
    let committed = repo.create(&tenant, input).await?;
    audit::record(&tenant, &committed.events);
    Ok((StatusCode::CREATED, Json(committed.value)))
}

/// GET `/journal-entries/{id}` - One voucher with lines and totals.
async fn get_entry(
    State(state): State<AppState>,
    Workspace(tenant): Workspace,
    Path(id): Path<JournalEntryId>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = JournalRepository::new((*state.db).clone(), state.rules.clone());
    Ok(Json(repo.get(&tenant, id).await?))
}

/// PUT `/journal-entries/{id}` - Replace a draft voucher.
async fn update_entry(
    State(state): State<AppState>,
    Workspace(tenant): Workspace,
    Path(id): Path<JournalEntryId>,
    Json(input): Json<JournalEntryInput>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = JournalRepository::new((*state.db).clone(), state.rules.clone());
    let committed = repo.update(&tenant, id, input).await?;
    audit::record(&tenant, &committed.events);
    Ok(Json(committed.value))
}

/// POST `/journal-entries/{id}/finalize` - Lock a voucher.
async fn finalize_entry(
    State(state): State<AppState>,
    Workspace(tenant): Workspace,
    Path(id): Path<JournalEntryId>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = JournalRepository::new((*state.db).clone(), state.rules.clone());
    let committed = repo.finalize(&tenant, id).await?;
    audit::record(&tenant, &committed.events);
    Ok(Json(committed.value))
}

/// POST `/journal-entries/{id}/reverse` - Post a contra voucher.
async fn reverse_entry(
    State(state): State<AppState>,
    Workspace(tenant): Workspace,
    Path(id): Path<JournalEntryId>,
    body: Option<Json<ReverseRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let repo = JournalRepository::new((*state.db).clone(), state.rules.clone());
    let committed = repo
        .reverse(&tenant, id, request.date, request.created_by)
        .await?;
    audit::record(&tenant, &committed.events);
    Ok((StatusCode::CREATED, Json(committed.value)))
}
