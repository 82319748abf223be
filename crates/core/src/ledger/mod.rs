//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Domain types for accounts and vouchers
//! - Posting validation and the finalization lock
//! - Fund-compliance rules
//! - Balance computation with hierarchical rollup
//! - Default chart of accounts and voucher numbering
//! - Post-commit ledger events

pub mod balance;
pub mod chart;
pub mod compliance;
pub mod error;
pub mod events;
pub mod hierarchy;
pub mod service;
pub mod types;
pub mod voucher;

#[cfg(test)]
mod service_props;

pub use balance::{AccountBalance, ChartBalances, PostingTotals};
pub use chart::{DEFAULT_CHART, SeedAccount};
pub use compliance::{ComplianceRules, ComplianceViolation};
pub use error::LedgerError;
pub use events::{Committed, LedgerEvent};
pub use hierarchy::{AccountNode, build_tree, validate_parent};
pub use service::{AccountInfo, PostingService};
pub use types::{
    Account, AccountType, EntryStatus, EntryTotals, FundType, JournalEntryHeader,
    JournalEntryInput, JournalItemInput, NormalBalance, PaymentMode, PostedEntry, PostedItem,
    ValidatedEntry, ValidatedItem, VoucherType,
};
