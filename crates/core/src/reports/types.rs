//! Report data types.

use chrono::NaiveDate;
use mizan_shared::types::{JournalEntryId, LedgerId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{AccountType, FundType, PostedItem, VoucherType};

/// One voucher in the day book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayBookEntry {
    /// Voucher ID.
    pub id: JournalEntryId,
    /// Voucher number.
    pub voucher_number: String,
    /// Voucher type.
    pub voucher_type: VoucherType,
    /// Narration.
    pub narration: String,
    /// Lock flag.
    pub is_finalized: bool,
    /// Voucher amount (debit side).
    pub total_amount: Decimal,
    /// Lines.
    pub items: Vec<PostedItem>,
}

/// Day book report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayBook {
    /// Report type identifier.
    pub report_type: String,
    /// The day reported.
    pub date: NaiveDate,
    /// Vouchers dated that day, by voucher number.
    pub entries: Vec<DayBookEntry>,
    /// Σ credit amounts of RECEIPT lines.
    pub total_receipts: Decimal,
    /// Σ debit amounts of PAYMENT lines.
    pub total_payments: Decimal,
}

/// One ledger in the trial balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Ledger ID.
    pub ledger_id: LedgerId,
    /// Ledger code.
    pub code: String,
    /// Ledger name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Fund tag.
    pub fund_type: Option<FundType>,
    /// Net balance when it falls on the debit side.
    pub debit: Decimal,
    /// Net balance when it falls on the credit side.
    pub credit: Decimal,
    /// Gross debits posted to the ledger.
    pub turnover_debit: Decimal,
    /// Gross credits posted to the ledger.
    pub turnover_credit: Decimal,
}

/// Trial balance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// Report type identifier.
    pub report_type: String,
    /// Cut-off date; `None` when every posting is included.
    pub as_of: Option<NaiveDate>,
    /// One row per active ledger, by code.
    pub rows: Vec<TrialBalanceRow>,
    /// Σ debit column.
    pub total_debit: Decimal,
    /// Σ credit column.
    pub total_credit: Decimal,
    /// Σ gross debits.
    pub turnover_debit: Decimal,
    /// Σ gross credits.
    pub turnover_credit: Decimal,
    /// Whether the debit and credit columns agree.
    pub is_balanced: bool,
}

/// A posting as loaded for an account statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementPosting {
    /// Voucher ID.
    pub entry_id: JournalEntryId,
    /// Voucher number.
    pub voucher_number: String,
    /// Voucher date.
    pub date: NaiveDate,
    /// Voucher narration.
    pub narration: String,
    /// Line particulars.
    pub particulars: Option<String>,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// A statement line with its running balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementLine {
    /// The posting.
    #[serde(flatten)]
    pub posting: StatementPosting,
    /// Balance after this line.
    pub running_balance: Decimal,
}

/// Chronological postings of one ledger over a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountStatement {
    /// Report type identifier.
    pub report_type: String,
    /// Ledger ID.
    pub ledger_id: LedgerId,
    /// Ledger code.
    pub code: String,
    /// Ledger name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// First day included.
    pub from: NaiveDate,
    /// Last day included.
    pub to: NaiveDate,
    /// Balance before `from`.
    pub opening_balance: Decimal,
    /// Lines in date then voucher order.
    pub lines: Vec<StatementLine>,
    /// Σ debits in range.
    pub total_debit: Decimal,
    /// Σ credits in range.
    pub total_credit: Decimal,
    /// Balance after `to`.
    pub closing_balance: Decimal,
}
