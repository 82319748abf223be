//! Chart of accounts routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{Datelike, NaiveDate, Utc};
use mizan_core::ledger::{AccountType, FundType};
use mizan_db::repositories::{AccountFilter, CreateAccountInput, UpdateAccountInput};
use mizan_db::{LedgerRepository, ReportRepository};
use mizan_shared::types::LedgerId;
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, audit, error::ApiError, extractors::Workspace};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/accounts/{id}", get(get_account).put(update_account))
        .route("/accounts/{id}/deactivate", post(deactivate_account))
        .route("/accounts/{id}/statement", get(account_statement))
}

/// Query parameters for listing accounts.
#[derive(Debug, Default, Deserialize)]
pub struct ListAccountsQuery {
    /// Filter by account type.
    pub account_type: Option<AccountType>,
    /// Return a flat list instead of a tree.
    #[serde(default)]
    pub flat: bool,
    /// Include deactivated accounts.
    #[serde(default)]
    pub include_inactive: bool,
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Unique code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Fund tag.
    #[serde(default)]
    pub fund_type: Option<FundType>,
    /// Parent account.
    #[serde(default)]
    pub parent_id: Option<LedgerId>,
}

/// Request body for updating an account. Absent fields are left unchanged;
/// an explicit `null` clears `parent_id` / `fund_type`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAccountRequest {
    /// New code.
    pub code: Option<String>,
    /// New name.
    pub name: Option<String>,
    /// New parent.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub parent_id: Option<Option<LedgerId>>,
    /// New fund tag.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub fund_type: Option<Option<FundType>>,
}

/// Query parameters for an account statement.
#[derive(Debug, Deserialize)]
pub struct StatementQuery {
    /// First day, inclusive. Defaults to the start of the current year.
    pub from: Option<NaiveDate>,
    /// Last day, inclusive. Defaults to today.
    pub to: Option<NaiveDate>,
}

/// GET `/accounts` - Tree (default) or flat list with balances.
async fn list_accounts(
    State(state): State<AppState>,
    Workspace(tenant): Workspace,
    Query(query): Query<ListAccountsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = LedgerRepository::new((*state.db).clone());
    let filter = AccountFilter {
        account_type: query.account_type,
        include_inactive: query.include_inactive,
    };

    if query.flat {
        let accounts = repo.list(&tenant, filter).await?;
        Ok(Json(json!({ "accounts": accounts })))
    } else {
        let tree = repo.tree(&tenant, filter).await?;
        Ok(Json(json!({ "accounts": tree })))
    }
}

/// POST `/accounts` - Create a custom account.
async fn create_account(
    State(state): State<AppState>,
    Workspace(tenant): Workspace,
    Json(request): Json<CreateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = LedgerRepository::new((*state.db).clone());
    let account = repo
        .create(
            &tenant,
            CreateAccountInput {
                code: request.code,
                name: request.name,
                account_type: request.account_type,
                fund_type: request.fund_type,
                parent_id: request.parent_id,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// GET `/accounts/{id}` - One account with its balance.
async fn get_account(
    State(state): State<AppState>,
    Workspace(tenant): Workspace,
    Path(id): Path<LedgerId>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = LedgerRepository::new((*state.db).clone());
    Ok(Json(repo.get(&tenant, id).await?))
}

/// PUT `/accounts/{id}` - Update a custom account.
async fn update_account(
    State(state): State<AppState>,
    Workspace(tenant): Workspace,
    Path(id): Path<LedgerId>,
    Json(request): Json<UpdateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = LedgerRepository::new((*state.db).clone());
    let account = repo
        .update(
            &tenant,
            id,
            UpdateAccountInput {
                code: request.code,
                name: request.name,
                parent_id: request.parent_id,
                fund_type: request.fund_type,
            },
        )
        .await?;
    Ok(Json(account))
}

/// POST `/accounts/{id}/deactivate` - Soft-delete a custom account.
async fn deactivate_account(
    State(state): State<AppState>,
    Workspace(tenant): Workspace,
    Path(id): Path<LedgerId>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = LedgerRepository::new((*state.db).clone());
    let committed = repo.deactivate(&tenant, id).await?;
    audit::record(&tenant, &committed.events);
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/accounts/{id}/statement?from=&to=` - Postings with running balance.
async fn account_statement(
    State(state): State<AppState>,
    Workspace(tenant): Workspace,
    Path(id): Path<LedgerId>,
    Query(query): Query<StatementQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let today = Utc::now().date_naive();
    let to = query.to.unwrap_or(today);
    let from = query
        .from
        .or_else(|| NaiveDate::from_ymd_opt(to.year(), 1, 1))
        .unwrap_or(to);

    let repo = ReportRepository::new((*state.db).clone());
    Ok(Json(repo.account_statement(&tenant, id, from, to).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_distinguishes_null_from_absent() {
        let absent: UpdateAccountRequest = serde_json::from_str(r#"{"name":"Carpets"}"#).unwrap();
        assert_eq!(absent.parent_id, None);
        assert_eq!(absent.fund_type, None);

        let cleared: UpdateAccountRequest =
            serde_json::from_str(r#"{"parent_id":null,"fund_type":null}"#).unwrap();
        assert_eq!(cleared.parent_id, Some(None));
        assert_eq!(cleared.fund_type, Some(None));

        let set: UpdateAccountRequest = serde_json::from_str(r#"{"fund_type":"ZAKAT"}"#).unwrap();
        assert_eq!(set.fund_type, Some(Some(FundType::Zakat)));
    }

    #[test]
    fn test_list_query_defaults_to_tree() {
        let query: ListAccountsQuery = serde_json::from_str("{}").unwrap();
        assert!(!query.flat);
        assert!(!query.include_inactive);
        assert!(query.account_type.is_none());
    }
}
