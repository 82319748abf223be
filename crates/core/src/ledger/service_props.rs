//! Property-based tests for PostingService.
//!
//! - Balance integrity: accepted vouchers always have Σdebit == Σcredit
//! - Reversal symmetry: a voucher plus its reversal nets every ledger to zero

use std::collections::HashMap;

use chrono::NaiveDate;
use mizan_shared::types::{JournalEntryId, LedgerId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance::PostingTotals;
use super::compliance::ComplianceRules;
use super::error::LedgerError;
use super::service::{AccountInfo, PostingService};
use super::types::{
    AccountType, JournalEntryHeader, JournalEntryInput, JournalItemInput, PostedEntry, PostedItem,
    VoucherType,
};

/// Positive amounts from 0.01 to 100,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|paise| Decimal::new(paise, 2))
}

fn active(id: LedgerId) -> Result<AccountInfo, LedgerError> {
    Ok(AccountInfo {
        id,
        is_active: true,
        fund_type: None,
    })
}

/// Splits each debit into one credit line so the voucher balances.
fn balanced_input(debits: &[Decimal]) -> JournalEntryInput {
    let total: Decimal = debits.iter().copied().sum();
    let mut items: Vec<JournalItemInput> = debits
        .iter()
        .map(|d| JournalItemInput::debit(LedgerId::new(), *d))
        .collect();
    items.push(JournalItemInput::credit(LedgerId::new(), total));
    JournalEntryInput {
        header: JournalEntryHeader::new(
            VoucherType::Journal,
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            "Transfer",
        ),
        items,
        created_by: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every accepted voucher balances exactly.
    #[test]
    fn prop_accepted_entries_balance(debits in prop::collection::vec(positive_amount(), 1..10)) {
        let input = balanced_input(&debits);
        let validated = PostingService::validate_entry(&input, &ComplianceRules::default(), active).unwrap();
        prop_assert_eq!(validated.totals.total_debit, validated.totals.total_credit);
        prop_assert_eq!(validated.items.len(), debits.len() + 1);
    }

    /// Any drift between the sides is rejected as unbalanced.
    #[test]
    fn prop_drift_is_rejected(
        debits in prop::collection::vec(positive_amount(), 1..10),
        drift in positive_amount(),
    ) {
        let mut input = balanced_input(&debits);
        if let Some(last) = input.items.last_mut() {
            last.credit_amount += drift;
        }
        let result = PostingService::validate_entry(&input, &ComplianceRules::default(), active);
        let is_unbalanced = matches!(result, Err(LedgerError::UnbalancedEntry { .. }));
        prop_assert!(is_unbalanced);
    }

    /// A voucher and its reversal leave every ledger at zero.
    #[test]
    fn prop_reversal_nets_to_zero(debits in prop::collection::vec(positive_amount(), 1..6)) {
        let input = balanced_input(&debits);
        let original = PostedEntry {
            id: JournalEntryId::new(),
            voucher_number: "JV-00001".to_string(),
            voucher_type: VoucherType::Journal,
            date: input.header.date,
            narration: input.header.narration.clone(),
            is_finalized: false,
            items: input
                .items
                .iter()
                .map(|i| PostedItem {
                    ledger_id: i.ledger_id,
                    debit_amount: i.debit_amount,
                    credit_amount: i.credit_amount,
                    particulars: None,
                })
                .collect(),
        };
        let reversal = PostingService::reversal_of(&original, original.date, None);

        let mut per_ledger: HashMap<LedgerId, PostingTotals> = HashMap::new();
        for item in input.items.iter().chain(reversal.items.iter()) {
            per_ledger.entry(item.ledger_id).or_default().add(item.debit_amount, item.credit_amount);
        }
        for totals in per_ledger.values() {
            prop_assert_eq!(totals.signed(AccountType::Asset), Decimal::ZERO);
        }
    }
}
