//! Report generation service.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::ReportError;
use super::types::{
    AccountStatement, DayBook, DayBookEntry, StatementLine, StatementPosting, TrialBalanceReport,
    TrialBalanceRow,
};
use crate::ledger::{Account, ChartBalances, NormalBalance, PostedEntry, PostingTotals, VoucherType};

/// Service for generating reports.
pub struct ReportService;

impl ReportService {
    /// Builds the day book for `date`.
    ///
    /// Vouchers dated on any other day are ignored. Receipts total the credit
    /// lines of RECEIPT vouchers; payments total the debit lines of PAYMENT
    /// vouchers.
    #[must_use]
    pub fn day_book(date: NaiveDate, entries: Vec<PostedEntry>) -> DayBook {
        let mut total_receipts = Decimal::ZERO;
        let mut total_payments = Decimal::ZERO;

        let mut rows: Vec<DayBookEntry> = entries
            .into_iter()
            .filter(|e| e.date == date)
            .map(|entry| {
                match entry.voucher_type {
                    VoucherType::Receipt => {
                        total_receipts += entry.items.iter().map(|i| i.credit_amount).sum::<Decimal>();
                    }
                    VoucherType::Payment => {
                        total_payments += entry.items.iter().map(|i| i.debit_amount).sum::<Decimal>();
                    }
                    VoucherType::Journal => {}
                }
                DayBookEntry {
                    total_amount: entry.totals().amount(),
                    id: entry.id,
                    voucher_number: entry.voucher_number,
                    voucher_type: entry.voucher_type,
                    narration: entry.narration,
                    is_finalized: entry.is_finalized,
                    items: entry.items,
                }
            })
            .collect();
        rows.sort_by(|a, b| a.voucher_number.cmp(&b.voucher_number));

        DayBook {
            report_type: "day_book".to_string(),
            date,
            entries: rows,
            total_receipts,
            total_payments,
        }
    }

    /// Builds the trial balance over every active ledger.
    ///
    /// `balances` must already be restricted to `as_of` when one is given.
    /// Each row uses the ledger's own postings so a parent never repeats its
    /// children's amounts. A balance on the natural side lands in that
    /// column; a negative balance flips to the other column.
    #[must_use]
    pub fn trial_balance(
        accounts: &[Account],
        balances: &ChartBalances,
        as_of: Option<NaiveDate>,
    ) -> TrialBalanceReport {
        let mut active: Vec<&Account> = accounts.iter().filter(|a| a.is_active).collect();
        active.sort_by(|a, b| a.code.cmp(&b.code));

        let rows: Vec<TrialBalanceRow> = active
            .into_iter()
            .map(|account| {
                let (own, own_balance) = balances
                    .get(account.id)
                    .map_or((PostingTotals::default(), Decimal::ZERO), |b| (b.own, b.own_balance));
                let (debit, credit) = Self::place(account.account_type.normal_balance(), own_balance);
                TrialBalanceRow {
                    ledger_id: account.id,
                    code: account.code.clone(),
                    name: account.name.clone(),
                    account_type: account.account_type,
                    fund_type: account.fund_type,
                    debit,
                    credit,
                    turnover_debit: own.debit,
                    turnover_credit: own.credit,
                }
            })
            .collect();

        let total_debit: Decimal = rows.iter().map(|r| r.debit).sum();
        let total_credit: Decimal = rows.iter().map(|r| r.credit).sum();
        let turnover_debit: Decimal = rows.iter().map(|r| r.turnover_debit).sum();
        let turnover_credit: Decimal = rows.iter().map(|r| r.turnover_credit).sum();

        TrialBalanceReport {
            report_type: "trial_balance".to_string(),
            as_of,
            rows,
            total_debit,
            total_credit,
            turnover_debit,
            turnover_credit,
            is_balanced: total_debit == total_credit,
        }
    }

    /// Puts a signed balance into the (debit, credit) columns.
    #[must_use]
    pub fn place(side: NormalBalance, balance: Decimal) -> (Decimal, Decimal) {
        let natural = balance >= Decimal::ZERO;
        match (side, natural) {
            (NormalBalance::Debit, true) | (NormalBalance::Credit, false) => (balance.abs(), Decimal::ZERO),
            (NormalBalance::Credit, true) | (NormalBalance::Debit, false) => (Decimal::ZERO, balance.abs()),
        }
    }

    /// Builds a statement for one ledger.
    ///
    /// `opening` holds the totals posted before `from`; `postings` may arrive
    /// in any order and are sorted by date then voucher number.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if `from` is after `to`.
    pub fn account_statement(
        account: &Account,
        opening: PostingTotals,
        mut postings: Vec<StatementPosting>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<AccountStatement, ReportError> {
        if from > to {
            return Err(ReportError::InvalidDateRange { start: from, end: to });
        }
        postings.retain(|p| p.date >= from && p.date <= to);
        postings.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.voucher_number.cmp(&b.voucher_number)));

        let opening_balance = opening.signed(account.account_type);
        let mut running = opening_balance;
        let mut period = PostingTotals::default();
        let lines = postings
            .into_iter()
            .map(|posting| {
                period.add(posting.debit, posting.credit);
                running += PostingTotals::new(posting.debit, posting.credit).signed(account.account_type);
                StatementLine {
                    posting,
                    running_balance: running,
                }
            })
            .collect();

        Ok(AccountStatement {
            report_type: "account_statement".to_string(),
            ledger_id: account.id,
            code: account.code.clone(),
            name: account.name.clone(),
            account_type: account.account_type,
            from,
            to,
            opening_balance,
            lines,
            total_debit: period.debit,
            total_credit: period.credit,
            closing_balance: running,
        })
    }
}
