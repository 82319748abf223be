//! Domain types for the chart of accounts and vouchers.

use chrono::NaiveDate;
use mizan_shared::types::{JournalEntryId, LedgerId, MemberId, SupplierId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;

/// Which side of the ledger increases an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalBalance {
    /// Debits increase the balance (assets, expenses).
    Debit,
    /// Credits increase the balance (liabilities, equity, income).
    Credit,
}

/// Classification of a ledger account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// Cash, bank, receivables.
    Asset,
    /// Payables and other obligations.
    Liability,
    /// Funds and accumulated surplus.
    Equity,
    /// Donations, fees.
    Income,
    /// Operational and welfare spending.
    Expense,
}

impl AccountType {
    /// All account types in chart order.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Income,
        Self::Expense,
    ];

    /// The side on which this account type naturally carries its balance.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Income => NormalBalance::Credit,
        }
    }

    /// Wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "ASSET",
            Self::Liability => "LIABILITY",
            Self::Equity => "EQUITY",
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASSET" => Ok(Self::Asset),
            "LIABILITY" => Ok(Self::Liability),
            "EQUITY" => Ok(Self::Equity),
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            _ => Err(LedgerError::Validation(format!("Unknown account type: {s}"))),
        }
    }
}

/// Fund tag restricting how money in an account may be spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FundType {
    /// Obligatory alms; restricted to eligible recipients.
    Zakat,
    /// Voluntary charity; restricted to welfare.
    Sadaqah,
    /// Earmarked for building works.
    Construction,
    /// Unrestricted.
    General,
}

impl FundType {
    /// Restricted funds must never pay operational expenses.
    #[must_use]
    pub const fn is_restricted(self) -> bool {
        matches!(self, Self::Zakat | Self::Sadaqah)
    }

    /// Wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zakat => "ZAKAT",
            Self::Sadaqah => "SADAQAH",
            Self::Construction => "CONSTRUCTION",
            Self::General => "GENERAL",
        }
    }
}

impl std::fmt::Display for FundType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FundType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ZAKAT" => Ok(Self::Zakat),
            "SADAQAH" => Ok(Self::Sadaqah),
            "CONSTRUCTION" => Ok(Self::Construction),
            "GENERAL" => Ok(Self::General),
            _ => Err(LedgerError::Validation(format!("Unknown fund type: {s}"))),
        }
    }
}

/// Kind of voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoucherType {
    /// Money received (donations, fees).
    Receipt,
    /// Money paid out (expenses).
    Payment,
    /// Adjustments and transfers.
    Journal,
}

impl VoucherType {
    /// Wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Receipt => "RECEIPT",
            Self::Payment => "PAYMENT",
            Self::Journal => "JOURNAL",
        }
    }
}

impl std::fmt::Display for VoucherType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VoucherType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RECEIPT" => Ok(Self::Receipt),
            "PAYMENT" => Ok(Self::Payment),
            "JOURNAL" => Ok(Self::Journal),
            _ => Err(LedgerError::Validation(format!("Unknown voucher type: {s}"))),
        }
    }
}

/// How money moved for a receipt or payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMode {
    /// Cash.
    Cash,
    /// Bank transfer.
    Bank,
    /// UPI.
    Upi,
    /// Cheque.
    Cheque,
}

impl PaymentMode {
    /// Wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Bank => "BANK",
            Self::Upi => "UPI",
            Self::Cheque => "CHEQUE",
        }
    }
}

impl std::str::FromStr for PaymentMode {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CASH" => Ok(Self::Cash),
            "BANK" => Ok(Self::Bank),
            "UPI" => Ok(Self::Upi),
            "CHEQUE" => Ok(Self::Cheque),
            _ => Err(LedgerError::Validation(format!("Unknown payment mode: {s}"))),
        }
    }
}

/// Lifecycle state of a voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Editable.
    Draft,
    /// Locked, terminal.
    Finalized,
}

impl EntryStatus {
    /// Maps the stored lock flag to a status.
    #[must_use]
    pub const fn from_finalized(is_finalized: bool) -> Self {
        if is_finalized {
            Self::Finalized
        } else {
            Self::Draft
        }
    }
}

/// Ledger account as seen by the posting engine and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account ID.
    pub id: LedgerId,
    /// Sortable unique code, e.g. `4100`.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Optional fund tag.
    pub fund_type: Option<FundType>,
    /// Parent account, if any.
    pub parent_id: Option<LedgerId>,
    /// Protected from edit and deactivation.
    pub is_system: bool,
    /// Soft-delete flag.
    pub is_active: bool,
}

/// A single posting line as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalItemInput {
    /// Ledger the line posts to.
    pub ledger_id: LedgerId,
    /// Debit amount, zero when the line is a credit.
    #[serde(default)]
    pub debit_amount: Decimal,
    /// Credit amount, zero when the line is a debit.
    #[serde(default)]
    pub credit_amount: Decimal,
    /// Line description.
    #[serde(default)]
    pub particulars: Option<String>,
}

impl JournalItemInput {
    /// Debit line.
    #[must_use]
    pub fn debit(ledger_id: LedgerId, amount: Decimal) -> Self {
        Self {
            ledger_id,
            debit_amount: amount,
            credit_amount: Decimal::ZERO,
            particulars: None,
        }
    }

    /// Credit line.
    #[must_use]
    pub fn credit(ledger_id: LedgerId, amount: Decimal) -> Self {
        Self {
            ledger_id,
            debit_amount: Decimal::ZERO,
            credit_amount: amount,
            particulars: None,
        }
    }
}

/// Header fields of a voucher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntryHeader {
    /// Voucher type.
    pub voucher_type: VoucherType,
    /// Accounting date.
    pub date: NaiveDate,
    /// Free-text narration.
    #[serde(default)]
    pub narration: String,
    /// Donor when the donor is a registered member.
    #[serde(default)]
    pub donor_member_id: Option<MemberId>,
    /// Donor name when the donor is not a member.
    #[serde(default)]
    pub donor_name: Option<String>,
    /// Donor's PAN (Indian tax ID).
    #[serde(default)]
    pub donor_pan: Option<String>,
    /// Donor's stated purpose.
    #[serde(default)]
    pub donor_intent: Option<String>,
    /// Supplier for payments.
    #[serde(default)]
    pub supplier_id: Option<SupplierId>,
    /// Supplier's invoice number.
    #[serde(default)]
    pub vendor_invoice_no: Option<String>,
    /// Supplier's invoice date.
    #[serde(default)]
    pub vendor_invoice_date: Option<NaiveDate>,
    /// Payment mode.
    #[serde(default)]
    pub payment_mode: Option<PaymentMode>,
}

impl JournalEntryHeader {
    /// Minimal header with only the required fields.
    #[must_use]
    pub fn new(voucher_type: VoucherType, date: NaiveDate, narration: impl Into<String>) -> Self {
        Self {
            voucher_type,
            date,
            narration: narration.into(),
            donor_member_id: None,
            donor_name: None,
            donor_pan: None,
            donor_intent: None,
            supplier_id: None,
            vendor_invoice_no: None,
            vendor_invoice_date: None,
            payment_mode: None,
        }
    }
}

/// Input for creating or replacing a voucher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntryInput {
    /// Header fields.
    #[serde(flatten)]
    pub header: JournalEntryHeader,
    /// Posting lines in order.
    pub items: Vec<JournalItemInput>,
    /// User creating the voucher.
    #[serde(default)]
    pub created_by: Option<UserId>,
}

/// A posting line after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedItem {
    /// Ledger the line posts to.
    pub ledger_id: LedgerId,
    /// Debit amount.
    pub debit_amount: Decimal,
    /// Credit amount.
    pub credit_amount: Decimal,
    /// Line description.
    pub particulars: Option<String>,
    /// Position within the voucher.
    pub line_no: u32,
}

/// Debit and credit totals of a voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryTotals {
    /// Sum of debit amounts.
    pub total_debit: Decimal,
    /// Sum of credit amounts.
    pub total_credit: Decimal,
    /// Whether debits equal credits exactly.
    pub is_balanced: bool,
}

impl EntryTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(total_debit: Decimal, total_credit: Decimal) -> Self {
        Self {
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        }
    }

    /// Sums a set of lines.
    #[must_use]
    pub fn from_lines<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = (&'a Decimal, &'a Decimal)>,
    {
        let (debit, credit) = lines
            .into_iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(d, c), (ld, lc)| {
                (d + *ld, c + *lc)
            });
        Self::new(debit, credit)
    }

    /// Voucher amount, i.e. the debit side of a balanced voucher.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.total_debit
    }
}

/// A voucher after validation, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEntry {
    /// Header with normalized donor fields.
    pub header: JournalEntryHeader,
    /// Lines in submission order.
    pub items: Vec<ValidatedItem>,
    /// Totals, always balanced.
    pub totals: EntryTotals,
}

/// A persisted posting line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedItem {
    /// Ledger the line posts to.
    pub ledger_id: LedgerId,
    /// Debit amount.
    pub debit_amount: Decimal,
    /// Credit amount.
    pub credit_amount: Decimal,
    /// Line description.
    pub particulars: Option<String>,
}

/// A persisted voucher with its lines, as read by reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedEntry {
    /// Voucher ID.
    pub id: JournalEntryId,
    /// System-generated voucher number.
    pub voucher_number: String,
    /// Voucher type.
    pub voucher_type: VoucherType,
    /// Accounting date.
    pub date: NaiveDate,
    /// Narration.
    pub narration: String,
    /// Lock flag.
    pub is_finalized: bool,
    /// Lines in order.
    pub items: Vec<PostedItem>,
}

impl PostedEntry {
    /// Totals across all lines.
    #[must_use]
    pub fn totals(&self) -> EntryTotals {
        EntryTotals::from_lines(
            self.items
                .iter()
                .map(|i| (&i.debit_amount, &i.credit_amount)),
        )
    }
}
