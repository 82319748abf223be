//! Repository abstractions for data access.
//!
//! Tenant-scoped repositories take a [`TenantContext`](mizan_core::tenant::TenantContext)
//! on every call and open a [`TenantConnection`](crate::schema::TenantConnection)
//! for it. [`TenantRepository`] works on the public registry only.

pub mod journal;
pub mod ledger;
pub mod report;
pub mod tenant;

pub use journal::{
    JournalEntrySummary, JournalEntryView, JournalFilter, JournalItemView, JournalRepository,
};
pub use ledger::{
    AccountFilter, AccountWithBalance, CreateAccountInput, LedgerRepository, UpdateAccountInput,
};
pub use report::ReportRepository;
pub use tenant::{ProvisionedTenant, TenantRepository, WorkspaceSummary};
