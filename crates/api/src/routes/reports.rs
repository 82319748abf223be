//! Report routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::{NaiveDate, Utc};
use mizan_db::ReportRepository;
use serde::Deserialize;

use crate::{AppState, error::ApiError, extractors::Workspace};

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/day-book", get(day_book))
        .route("/reports/trial-balance", get(trial_balance))
}

/// Query parameters for the day book.
#[derive(Debug, Deserialize)]
pub struct DayBookQuery {
    /// Day to report; today when absent.
    pub date: Option<NaiveDate>,
}

/// Query parameters for the trial balance.
#[derive(Debug, Deserialize)]
pub struct TrialBalanceQuery {
    /// Cut-off date; every posting counts when absent.
    pub as_of: Option<NaiveDate>,
}

/// GET `/reports/day-book?date=` - Vouchers of one day with totals.
async fn day_book(
    State(state): State<AppState>,
    Workspace(tenant): Workspace,
    Query(query): Query<DayBookQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let repo = ReportRepository::new((*state.db).clone());
    Ok(Json(repo.day_book(&tenant, date).await?))
}

/// GET `/reports/trial-balance` - Debit and credit columns over all ledgers.
async fn trial_balance(
    State(state): State<AppState>,
    Workspace(tenant): Workspace,
    Query(query): Query<TrialBalanceQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ReportRepository::new((*state.db).clone());
    Ok(Json(repo.trial_balance(&tenant, query.as_of).await?))
}
