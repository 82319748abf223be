//! Ledger events emitted after a successful commit.
//!
//! Write operations return their events alongside the result instead of
//! dispatching them implicitly. The caller decides what to do with them
//! (audit log, background jobs).

use chrono::NaiveDate;
use mizan_shared::types::{JournalEntryId, LedgerId};
use rust_decimal::Decimal;
use serde::Serialize;

use super::types::VoucherType;

/// Something that happened to the books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A new voucher was posted.
    EntryPosted {
        /// Voucher ID.
        entry_id: JournalEntryId,
        /// Voucher number.
        voucher_number: String,
        /// Voucher type.
        voucher_type: VoucherType,
        /// Accounting date.
        date: NaiveDate,
        /// Voucher amount.
        amount: Decimal,
    },
    /// A draft voucher's header or lines were replaced.
    EntryUpdated {
        /// Voucher ID.
        entry_id: JournalEntryId,
        /// Voucher number.
        voucher_number: String,
        /// New voucher amount.
        amount: Decimal,
    },
    /// A voucher was locked.
    EntryFinalized {
        /// Voucher ID.
        entry_id: JournalEntryId,
        /// Voucher number.
        voucher_number: String,
    },
    /// A contra voucher was posted against an existing one.
    EntryReversed {
        /// The reversed voucher.
        original_id: JournalEntryId,
        /// The contra voucher.
        reversal_id: JournalEntryId,
        /// Number of the contra voucher.
        reversal_voucher: String,
    },
    /// A custom account was deactivated.
    AccountDeactivated {
        /// The account.
        ledger_id: LedgerId,
    },
}

impl LedgerEvent {
    /// Short event name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::EntryPosted { .. } => "entry_posted",
            Self::EntryUpdated { .. } => "entry_updated",
            Self::EntryFinalized { .. } => "entry_finalized",
            Self::EntryReversed { .. } => "entry_reversed",
            Self::AccountDeactivated { .. } => "account_deactivated",
        }
    }

    /// The voucher the event is about, if any.
    #[must_use]
    pub const fn entry_id(&self) -> Option<JournalEntryId> {
        match self {
            Self::EntryPosted { entry_id, .. }
            | Self::EntryUpdated { entry_id, .. }
            | Self::EntryFinalized { entry_id, .. } => Some(*entry_id),
            Self::EntryReversed { reversal_id, .. } => Some(*reversal_id),
            Self::AccountDeactivated { .. } => None,
        }
    }
}

/// Result of a write together with the events it produced.
#[derive(Debug, Clone)]
pub struct Committed<T> {
    /// The written value.
    pub value: T,
    /// Events to hand to post-commit consumers.
    pub events: Vec<LedgerEvent>,
}

impl<T> Committed<T> {
    /// Wraps a value with its events.
    #[must_use]
    pub fn new(value: T, events: Vec<LedgerEvent>) -> Self {
        Self { value, events }
    }

    /// Splits into value and events.
    pub fn into_parts(self) -> (T, Vec<LedgerEvent>) {
        (self.value, self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_tag() {
        let id = JournalEntryId::new();
        let event = LedgerEvent::EntryFinalized {
            entry_id: id,
            voucher_number: "JV-00003".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "entry_finalized");
        assert_eq!(json["voucher_number"], "JV-00003");
        assert_eq!(event.name(), "entry_finalized");
        assert_eq!(event.entry_id(), Some(id));
    }

    #[test]
    fn test_committed_parts() {
        let committed = Committed::new(7, vec![LedgerEvent::AccountDeactivated {
            ledger_id: LedgerId::new(),
        }]);
        let (value, events) = committed.into_parts();
        assert_eq!(value, 7);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].entry_id(), None);
    }
}
