//! Chart of accounts repository.
//!
//! Balances are never stored: they are summed from `journal_items` and rolled
//! up the hierarchy by [`ChartBalances`] on every read.

use std::collections::HashMap;

use chrono::NaiveDate;
use mizan_core::ledger::{
    Account, AccountNode, AccountType, ChartBalances, Committed, FundType, LedgerError,
    LedgerEvent, PostingTotals, build_tree, validate_parent,
};
use mizan_core::tenant::TenantContext;
use mizan_shared::types::LedgerId;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::entities::{journal_entries, journal_items, ledgers};
use crate::error::{RepositoryError, unique_violation};
use crate::schema::TenantConnection;

/// Account with computed balances.
#[derive(Debug, Clone, Serialize)]
pub struct AccountWithBalance {
    /// The account.
    #[serde(flatten)]
    pub account: Account,
    /// Balance including descendants.
    pub balance: Decimal,
    /// Balance of direct postings only.
    pub own_balance: Decimal,
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountFilter {
    /// Filter by account type.
    pub account_type: Option<AccountType>,
    /// Include deactivated accounts.
    pub include_inactive: bool,
}

impl AccountFilter {
    fn matches(&self, account: &Account) -> bool {
        (self.include_inactive || account.is_active)
            && self.account_type.is_none_or(|t| t == account.account_type)
    }
}

/// Input for creating a custom account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Unique code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Classification.
    pub account_type: AccountType,
    /// Fund tag.
    pub fund_type: Option<FundType>,
    /// Parent account.
    pub parent_id: Option<LedgerId>,
}

/// Input for updating an account. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// New code.
    pub code: Option<String>,
    /// New name.
    pub name: Option<String>,
    /// New parent; `Some(None)` detaches the account.
    pub parent_id: Option<Option<LedgerId>>,
    /// New fund tag; `Some(None)` clears it.
    pub fund_type: Option<Option<FundType>>,
}

/// Chart of accounts repository.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists accounts in code order with balances.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the hierarchy is corrupt.
    pub async fn list(
        &self,
        tenant: &TenantContext,
        filter: AccountFilter,
    ) -> Result<Vec<AccountWithBalance>, RepositoryError> {
        let conn = TenantConnection::begin(&self.db, &tenant.schema).await?;
        let (accounts, balances) = load_balances(conn.transaction(), None).await?;
        conn.commit().await?;

        Ok(accounts
            .into_iter()
            .filter(|a| filter.matches(a))
            .map(|account| with_balance(account, &balances))
            .collect())
    }

    /// Lists accounts as a tree of roots with nested children.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the hierarchy is corrupt.
    pub async fn tree(
        &self,
        tenant: &TenantContext,
        filter: AccountFilter,
    ) -> Result<Vec<AccountNode>, RepositoryError> {
        let conn = TenantConnection::begin(&self.db, &tenant.schema).await?;
        let (accounts, balances) = load_balances(conn.transaction(), None).await?;
        conn.commit().await?;

        let visible: Vec<Account> = accounts.into_iter().filter(|a| filter.matches(a)).collect();
        Ok(build_tree(&visible, &balances))
    }

    /// Gets one account with its balance.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist.
    pub async fn get(
        &self,
        tenant: &TenantContext,
        id: LedgerId,
    ) -> Result<AccountWithBalance, RepositoryError> {
        let conn = TenantConnection::begin(&self.db, &tenant.schema).await?;
        let (accounts, balances) = load_balances(conn.transaction(), None).await?;
        conn.commit().await?;

        let account = accounts
            .into_iter()
            .find(|a| a.id == id)
            .ok_or(LedgerError::AccountNotFound(id))?;
        Ok(with_balance(account, &balances))
    }

    /// Creates a custom (non-system) account.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCode` if the code is taken, `AccountNotFound` /
    /// `AccountInactive` for a bad parent, and `Validation` if the parent has
    /// a different account type.
    pub async fn create(
        &self,
        tenant: &TenantContext,
        input: CreateAccountInput,
    ) -> Result<Account, RepositoryError> {
        let code = required("code", &input.code)?;
        let name = required("name", &input.name)?;

        let conn = TenantConnection::begin(&self.db, &tenant.schema).await?;
        let txn = conn.transaction();

        if code_taken(txn, &code, None).await? {
            return Err(LedgerError::DuplicateCode(code).into());
        }

        if let Some(parent_id) = input.parent_id {
            let accounts = load_chart(txn).await?;
            validate_parent(&accounts, None, parent_id)?;
            check_parent_type(&accounts, parent_id, input.account_type)?;
        }

        let now = chrono::Utc::now().into();
        let model = ledgers::ActiveModel {
            id: Set(LedgerId::new().into_inner()),
            code: Set(code.clone()),
            name: Set(name),
            account_type: Set(input.account_type.into()),
            fund_type: Set(input.fund_type.map(Into::into)),
            parent_id: Set(input.parent_id.map(LedgerId::into_inner)),
            is_system: Set(false),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await
        .map_err(|e| duplicate_code(e, &code))?;

        conn.commit().await?;
        info!(schema = %tenant.schema, code = %model.code, "Account created");
        Ok(model.into())
    }

    /// Updates a custom account.
    ///
    /// # Errors
    ///
    /// Returns `SystemAccount` for seeded accounts, `DuplicateCode` for a
    /// taken code and `HierarchyCycle` for a parent below the account.
    pub async fn update(
        &self,
        tenant: &TenantContext,
        id: LedgerId,
        input: UpdateAccountInput,
    ) -> Result<Account, RepositoryError> {
        let conn = TenantConnection::begin(&self.db, &tenant.schema).await?;
        let txn = conn.transaction();

        let model = ledgers::Entity::find_by_id(id.into_inner())
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(LedgerError::AccountNotFound(id))?;
        if model.is_system {
            return Err(LedgerError::SystemAccount(id).into());
        }

        let code = match &input.code {
            Some(code) => {
                let code = required("code", code)?;
                if code != model.code && code_taken(txn, &code, Some(id)).await? {
                    return Err(LedgerError::DuplicateCode(code).into());
                }
                Some(code)
            }
            None => None,
        };
        let name = input.name.as_deref().map(|n| required("name", n)).transpose()?;

        if let Some(Some(parent_id)) = input.parent_id {
            let accounts = load_chart(txn).await?;
            validate_parent(&accounts, Some(id), parent_id)?;
            check_parent_type(&accounts, parent_id, model.account_type.into())?;
        }

        let mut active: ledgers::ActiveModel = model.into();
        if let Some(code) = code.clone() {
            active.code = Set(code);
        }
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(parent_id) = input.parent_id {
            active.parent_id = Set(parent_id.map(LedgerId::into_inner));
        }
        if let Some(fund_type) = input.fund_type {
            active.fund_type = Set(fund_type.map(Into::into));
        }
        active.updated_at = Set(chrono::Utc::now().into());

        let updated = active
            .update(txn)
            .await
            .map_err(|e| duplicate_code(e, code.as_deref().unwrap_or_default()))?;
        conn.commit().await?;
        Ok(updated.into())
    }

    /// Deactivates a custom account without postings.
    ///
    /// # Errors
    ///
    /// Returns `SystemAccount` for seeded accounts and `AccountHasPostings`
    /// if any voucher line references the account.
    pub async fn deactivate(
        &self,
        tenant: &TenantContext,
        id: LedgerId,
    ) -> Result<Committed<Account>, RepositoryError> {
        let conn = TenantConnection::begin(&self.db, &tenant.schema).await?;
        let txn = conn.transaction();

        let model = ledgers::Entity::find_by_id(id.into_inner())
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(LedgerError::AccountNotFound(id))?;
        if model.is_system {
            return Err(LedgerError::SystemAccount(id).into());
        }

        let count = journal_items::Entity::find()
            .filter(journal_items::Column::LedgerId.eq(id.into_inner()))
            .count(txn)
            .await?;
        if count > 0 {
            return Err(LedgerError::AccountHasPostings { id, count }.into());
        }

        let mut active: ledgers::ActiveModel = model.into();
        active.is_active = Set(false);
        active.updated_at = Set(chrono::Utc::now().into());
        let updated = active.update(txn).await?;
        conn.commit().await?;

        info!(schema = %tenant.schema, ledger_id = %id, "Account deactivated");
        Ok(Committed::new(
            updated.into(),
            vec![LedgerEvent::AccountDeactivated { ledger_id: id }],
        ))
    }
}

impl From<ledgers::Model> for Account {
    fn from(model: ledgers::Model) -> Self {
        Self {
            id: LedgerId::from_uuid(model.id),
            code: model.code,
            name: model.name,
            account_type: model.account_type.into(),
            fund_type: model.fund_type.map(Into::into),
            parent_id: model.parent_id.map(LedgerId::from_uuid),
            is_system: model.is_system,
            is_active: model.is_active,
        }
    }
}

/// Loads the whole chart in code order.
pub(crate) async fn load_chart<C>(conn: &C) -> Result<Vec<Account>, DbErr>
where
    C: ConnectionTrait,
{
    let rows = ledgers::Entity::find()
        .order_by_asc(ledgers::Column::Code)
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(Account::from).collect())
}

/// Sums debit and credit per ledger, optionally up to and including `as_of`.
pub(crate) async fn posting_totals<C>(
    conn: &C,
    as_of: Option<NaiveDate>,
) -> Result<HashMap<LedgerId, PostingTotals>, DbErr>
where
    C: ConnectionTrait,
{
    let mut query = journal_items::Entity::find()
        .select_only()
        .column(journal_items::Column::LedgerId)
        .column_as(journal_items::Column::DebitAmount.sum(), "debit")
        .column_as(journal_items::Column::CreditAmount.sum(), "credit")
        .join(JoinType::InnerJoin, journal_items::Relation::JournalEntries.def())
        .group_by(journal_items::Column::LedgerId);
    if let Some(date) = as_of {
        query = query.filter(journal_entries::Column::Date.lte(date));
    }

    let rows: Vec<(Uuid, Decimal, Decimal)> = query.into_tuple().all(conn).await?;
    Ok(rows
        .into_iter()
        .map(|(id, debit, credit)| (LedgerId::from_uuid(id), PostingTotals::new(debit, credit)))
        .collect())
}

/// Loads the chart with computed balances.
pub(crate) async fn load_balances<C>(
    conn: &C,
    as_of: Option<NaiveDate>,
) -> Result<(Vec<Account>, ChartBalances), RepositoryError>
where
    C: ConnectionTrait,
{
    let accounts = load_chart(conn).await?;
    let totals = posting_totals(conn, as_of).await?;
    let balances = ChartBalances::compute(&accounts, &totals)?;
    Ok((accounts, balances))
}

fn with_balance(account: Account, balances: &ChartBalances) -> AccountWithBalance {
    let (balance, own_balance) = balances
        .get(account.id)
        .map_or((Decimal::ZERO, Decimal::ZERO), |b| (b.balance, b.own_balance));
    AccountWithBalance {
        account,
        balance,
        own_balance,
    }
}

async fn code_taken<C>(conn: &C, code: &str, except: Option<LedgerId>) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
{
    let mut query = ledgers::Entity::find().filter(ledgers::Column::Code.eq(code));
    if let Some(id) = except {
        query = query.filter(ledgers::Column::Id.ne(id.into_inner()));
    }
    Ok(query.count(conn).await? > 0)
}

fn check_parent_type(
    accounts: &[Account],
    parent_id: LedgerId,
    account_type: AccountType,
) -> Result<(), LedgerError> {
    match accounts.iter().find(|a| a.id == parent_id) {
        Some(parent) if parent.account_type != account_type => Err(LedgerError::Validation(format!(
            "Parent account '{}' is {}, not {}",
            parent.code, parent.account_type, account_type
        ))),
        Some(_) => Ok(()),
        None => Err(LedgerError::AccountNotFound(parent_id)),
    }
}

fn required(field: &str, value: &str) -> Result<String, LedgerError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(LedgerError::Validation(format!("Account {field} is required")))
    } else {
        Ok(trimmed.to_string())
    }
}

fn duplicate_code(err: DbErr, code: &str) -> RepositoryError {
    if unique_violation(&err).is_some() {
        LedgerError::DuplicateCode(code.to_string()).into()
    } else {
        err.into()
    }
}
