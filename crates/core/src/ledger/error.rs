//! Ledger error types for validation and state errors.
//!
//! Covers voucher validation, fund compliance, finalization state, and
//! chart-of-accounts maintenance.

use mizan_shared::types::{JournalEntryId, LedgerId};
use rust_decimal::Decimal;
use thiserror::Error;

use super::compliance::ComplianceViolation;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// A voucher needs at least one line.
    #[error("Journal entry must have at least one item")]
    EmptyEntry,

    /// A line carries a negative amount.
    #[error("Item {line}: amounts cannot be negative")]
    NegativeAmount {
        /// 1-based line number.
        line: u32,
    },

    /// A line carries both a debit and a credit.
    #[error("Item {line}: an item must have either a debit or a credit amount, not both")]
    BothSidesSet {
        /// 1-based line number.
        line: u32,
    },

    /// A line carries neither a debit nor a credit.
    #[error("Item {line}: an item must have a debit or a credit amount")]
    NoSideSet {
        /// 1-based line number.
        line: u32,
    },

    /// A line has more precision than paise.
    #[error("Item {line}: amounts cannot have more than 2 decimal places")]
    ExcessPrecision {
        /// 1-based line number.
        line: u32,
    },

    /// Other malformed input.
    #[error("{0}")]
    Validation(String),

    /// Debits and credits differ.
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntry {
        /// Total debit.
        debit: Decimal,
        /// Total credit.
        credit: Decimal,
    },

    // ========== Compliance Errors ==========
    /// A fund-compliance rule rejected the voucher.
    #[error(transparent)]
    Compliance(#[from] ComplianceViolation),

    // ========== Finalization Errors ==========
    /// The voucher is locked.
    #[error("Journal entry {0} is finalized and cannot be modified")]
    CannotModifyFinalized(JournalEntryId),

    /// Finalize called twice.
    #[error("Journal entry {0} is already finalized")]
    AlreadyFinalized(JournalEntryId),

    /// Voucher not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(JournalEntryId),

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(LedgerId),

    /// Account is inactive and cannot be used.
    #[error("Account {0} is inactive")]
    AccountInactive(LedgerId),

    /// System accounts cannot be edited or deactivated.
    #[error("Account {0} is a system account and cannot be modified")]
    SystemAccount(LedgerId),

    /// Accounts with postings cannot be deactivated.
    #[error("Account {id} has {count} posting(s) and cannot be deactivated")]
    AccountHasPostings {
        /// The account.
        id: LedgerId,
        /// Number of lines referencing it.
        count: u64,
    },

    /// Account code already used.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Reparenting would create a cycle.
    #[error("Account {0} cannot be placed under its own descendant")]
    HierarchyCycle(LedgerId),

    /// The chart would nest deeper than allowed.
    #[error("Accounts may be nested at most {max} levels deep")]
    HierarchyTooDeep {
        /// Deepest allowed level.
        max: usize,
    },

    // ========== Concurrency Errors ==========
    /// Concurrent modification detected.
    #[error("Concurrent modification detected, please retry")]
    ConcurrentModification,

    // ========== Database Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyEntry => "EMPTY_ENTRY",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::BothSidesSet { .. } => "BOTH_SIDES_SET",
            Self::NoSideSet { .. } => "NO_SIDE_SET",
            Self::ExcessPrecision { .. } => "EXCESS_PRECISION",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::Compliance(v) => v.error_code(),
            Self::CannotModifyFinalized(_) => "ENTRY_FINALIZED",
            Self::AlreadyFinalized(_) => "ALREADY_FINALIZED",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::SystemAccount(_) => "SYSTEM_ACCOUNT",
            Self::AccountHasPostings { .. } => "ACCOUNT_HAS_POSTINGS",
            Self::DuplicateCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::HierarchyCycle(_) => "HIERARCHY_CYCLE",
            Self::HierarchyTooDeep { .. } => "HIERARCHY_TOO_DEEP",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation, compliance and lock errors
            Self::EmptyEntry
            | Self::NegativeAmount { .. }
            | Self::BothSidesSet { .. }
            | Self::NoSideSet { .. }
            | Self::ExcessPrecision { .. }
            | Self::Validation(_)
            | Self::UnbalancedEntry { .. }
            | Self::Compliance(_)
            | Self::CannotModifyFinalized(_)
            | Self::AlreadyFinalized(_)
            | Self::AccountInactive(_)
            | Self::SystemAccount(_)
            | Self::AccountHasPostings { .. }
            | Self::HierarchyCycle(_)
            | Self::HierarchyTooDeep { .. } => 400,

            // 404 Not Found
            Self::AccountNotFound(_) | Self::EntryNotFound(_) => 404,

            // 409 Conflict
            Self::DuplicateCode(_) | Self::ConcurrentModification => 409,

            // 500 Internal Server Error
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification)
    }

    /// Errors raised by the finalization lock.
    #[must_use]
    pub fn is_finalization(&self) -> bool {
        matches!(
            self,
            Self::CannotModifyFinalized(_) | Self::AlreadyFinalized(_)
        )
    }

    /// Errors raised for malformed voucher lines or input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyEntry
                | Self::NegativeAmount { .. }
                | Self::BothSidesSet { .. }
                | Self::NoSideSet { .. }
                | Self::ExcessPrecision { .. }
                | Self::Validation(_)
                | Self::AccountInactive(_)
                | Self::HierarchyCycle(_)
                | Self::HierarchyTooDeep { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::EmptyEntry.error_code(), "EMPTY_ENTRY");
        assert_eq!(
            LedgerError::UnbalancedEntry {
                debit: dec!(100),
                credit: dec!(50),
            }
            .error_code(),
            "UNBALANCED_ENTRY"
        );
        assert_eq!(
            LedgerError::AlreadyFinalized(JournalEntryId::new()).error_code(),
            "ALREADY_FINALIZED"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerError::EmptyEntry.http_status_code(), 400);
        assert_eq!(
            LedgerError::CannotModifyFinalized(JournalEntryId::new()).http_status_code(),
            400
        );
        assert_eq!(
            LedgerError::AccountHasPostings {
                id: LedgerId::new(),
                count: 3
            }
            .http_status_code(),
            400
        );
        assert_eq!(
            LedgerError::AccountNotFound(LedgerId::new()).http_status_code(),
            404
        );
        assert_eq!(
            LedgerError::DuplicateCode("4100".into()).http_status_code(),
            409
        );
        assert_eq!(LedgerError::Database("x".into()).http_status_code(), 500);
    }

    #[test]
    fn test_classification() {
        assert!(LedgerError::ConcurrentModification.is_retryable());
        assert!(!LedgerError::EmptyEntry.is_retryable());
        assert!(LedgerError::AlreadyFinalized(JournalEntryId::new()).is_finalization());
        assert!(LedgerError::NoSideSet { line: 1 }.is_validation());
        assert!(
            !LedgerError::UnbalancedEntry {
                debit: dec!(1),
                credit: dec!(2)
            }
            .is_validation()
        );
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::UnbalancedEntry {
            debit: dec!(100.00),
            credit: dec!(50.00),
        };
        assert_eq!(
            err.to_string(),
            "Journal entry is not balanced. Debit: 100.00, Credit: 50.00"
        );
        assert_eq!(
            LedgerError::BothSidesSet { line: 2 }.to_string(),
            "Item 2: an item must have either a debit or a credit amount, not both"
        );
    }
}
