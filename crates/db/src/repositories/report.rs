//! Report repository.
//!
//! Loads postings for one tenant and hands them to [`ReportService`].

use chrono::NaiveDate;
use mizan_core::ledger::{LedgerError, PostingTotals};
use mizan_core::reports::{
    AccountStatement, DayBook, ReportService, StatementPosting, TrialBalanceReport,
};
use mizan_core::tenant::TenantContext;
use mizan_shared::types::{JournalEntryId, LedgerId};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use super::journal::{build_view, ledger_names};
use super::ledger::{load_balances, load_chart};
use crate::entities::{journal_entries, journal_items};
use crate::error::RepositoryError;
use crate::schema::TenantConnection;

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All vouchers dated `date`, drafts included.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn day_book(
        &self,
        tenant: &TenantContext,
        date: NaiveDate,
    ) -> Result<DayBook, RepositoryError> {
        let conn = TenantConnection::begin(&self.db, &tenant.schema).await?;
        let txn = conn.transaction();

        let entries = journal_entries::Entity::find()
            .filter(journal_entries::Column::Date.eq(date))
            .order_by_asc(journal_entries::Column::VoucherNumber)
            .all(txn)
            .await?;
        let ids: Vec<_> = entries.iter().map(|e| e.id).collect();
        let items = if ids.is_empty() {
            Vec::new()
        } else {
            journal_items::Entity::find()
                .filter(journal_items::Column::JournalEntryId.is_in(ids))
                .order_by_asc(journal_items::Column::LineNo)
                .all(txn)
                .await?
        };
        let names = ledger_names(txn, items.iter().map(|i| i.ledger_id)).await?;
        conn.commit().await?;

        let posted = entries
            .into_iter()
            .map(|entry| {
                let lines = items
                    .iter()
                    .filter(|i| i.journal_entry_id == entry.id)
                    .cloned()
                    .collect();
                build_view(entry, lines, &names).to_posted()
            })
            .collect();
        Ok(ReportService::day_book(date, posted))
    }

    /// Trial balance over every active ledger.
    ///
    /// With `as_of` only vouchers dated on or before it count; without it
    /// every posting does, matching the account balances.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the hierarchy is corrupt.
    pub async fn trial_balance(
        &self,
        tenant: &TenantContext,
        as_of: Option<NaiveDate>,
    ) -> Result<TrialBalanceReport, RepositoryError> {
        let conn = TenantConnection::begin(&self.db, &tenant.schema).await?;
        let (accounts, balances) = load_balances(conn.transaction(), as_of).await?;
        conn.commit().await?;

        Ok(ReportService::trial_balance(&accounts, &balances, as_of))
    }

    /// Postings to one ledger between `from` and `to` with running balance.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for an unknown ledger and
    /// `InvalidDateRange` if `from` is after `to`.
    pub async fn account_statement(
        &self,
        tenant: &TenantContext,
        ledger_id: LedgerId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<AccountStatement, RepositoryError> {
        let conn = TenantConnection::begin(&self.db, &tenant.schema).await?;
        let txn = conn.transaction();

        let account = load_chart(txn)
            .await?
            .into_iter()
            .find(|a| a.id == ledger_id)
            .ok_or(LedgerError::AccountNotFound(ledger_id))?;

        let rows: Vec<(journal_items::Model, Option<journal_entries::Model>)> =
            journal_items::Entity::find()
                .filter(journal_items::Column::LedgerId.eq(ledger_id.into_inner()))
                .find_also_related(journal_entries::Entity)
                .filter(journal_entries::Column::Date.lte(to))
                .all(txn)
                .await?;
        conn.commit().await?;

        let mut opening = PostingTotals::default();
        let mut postings = Vec::new();
        for (item, entry) in rows {
            let Some(entry) = entry else { continue };
            if entry.date < from {
                opening.add(item.debit_amount, item.credit_amount);
                continue;
            }
            postings.push(StatementPosting {
                entry_id: JournalEntryId::from_uuid(entry.id),
                voucher_number: entry.voucher_number,
                date: entry.date,
                narration: entry.narration,
                particulars: item.particulars,
                debit: item.debit_amount,
                credit: item.credit_amount,
            });
        }

        Ok(ReportService::account_statement(&account, opening, postings, from, to)?)
    }
}
