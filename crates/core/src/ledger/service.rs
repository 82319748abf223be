//! Posting service: voucher validation and state transitions.
//!
//! Pure business logic. The database layer supplies account lookups as
//! closures and persists the [`ValidatedEntry`] this service returns.

use chrono::NaiveDate;
use mizan_shared::types::{JournalEntryId, LedgerId, UserId, has_minor_unit_precision};
use rust_decimal::Decimal;

use super::compliance::{ComplianceRules, normalize_pan};
use super::error::LedgerError;
use super::types::{
    EntryStatus, EntryTotals, FundType, JournalEntryHeader, JournalEntryInput, JournalItemInput,
    PostedEntry, ValidatedEntry, ValidatedItem, VoucherType,
};

/// Information about an account needed for validation.
#[derive(Debug, Clone)]
pub struct AccountInfo {
    /// The account ID.
    pub id: LedgerId,
    /// Whether the account is active.
    pub is_active: bool,
    /// The account's fund tag.
    pub fund_type: Option<FundType>,
}

/// Posting service for voucher validation.
pub struct PostingService;

impl PostingService {
    /// Validates a voucher before persisting.
    ///
    /// Steps, in order:
    /// 1. At least one item
    /// 2. Σdebit == Σcredit, compared exactly
    /// 3. Each item: non-negative, exactly one side non-zero, paise precision
    /// 4. Every ledger exists and is active
    /// 5. Fund-compliance rules
    ///
    /// # Errors
    ///
    /// Returns the first `LedgerError` encountered.
    pub fn validate_entry<A>(
        input: &JournalEntryInput,
        rules: &ComplianceRules,
        account_lookup: A,
    ) -> Result<ValidatedEntry, LedgerError>
    where
        A: Fn(LedgerId) -> Result<AccountInfo, LedgerError>,
    {
        // 1. Non-empty
        if input.items.is_empty() {
            return Err(LedgerError::EmptyEntry);
        }

        // 2. Balance
        let totals = Self::calculate_totals(&input.items);
        if !totals.is_balanced {
            return Err(LedgerError::UnbalancedEntry {
                debit: totals.total_debit,
                credit: totals.total_credit,
            });
        }

        // 3. Line shape
        let mut items = Vec::with_capacity(input.items.len());
        for (index, item) in input.items.iter().enumerate() {
            let line = u32::try_from(index + 1).unwrap_or(u32::MAX);
            Self::validate_item(item, line)?;
            items.push(ValidatedItem {
                ledger_id: item.ledger_id,
                debit_amount: item.debit_amount,
                credit_amount: item.credit_amount,
                particulars: clean(item.particulars.as_deref()),
                line_no: line,
            });
        }

        // 4. Accounts
        let mut funds = Vec::with_capacity(items.len());
        for item in &items {
            let info = account_lookup(item.ledger_id)?;
            if !info.is_active {
                return Err(LedgerError::AccountInactive(item.ledger_id));
            }
            funds.push(info.fund_type);
        }

        // 5. Compliance
        let header = Self::normalize_header(&input.header)?;
        rules.check(
            &header,
            totals.amount(),
            &funds,
            items.iter().filter_map(|i| i.particulars.as_deref()),
        )?;

        Ok(ValidatedEntry {
            header,
            items,
            totals,
        })
    }

    /// Checks one line: non-negative, exactly one side, paise precision.
    ///
    /// # Errors
    ///
    /// Returns the corresponding line-level validation error.
    pub fn validate_item(item: &JournalItemInput, line: u32) -> Result<(), LedgerError> {
        let debit = item.debit_amount;
        let credit = item.credit_amount;
        if debit < Decimal::ZERO || credit < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount { line });
        }
        match (debit.is_zero(), credit.is_zero()) {
            (false, false) => return Err(LedgerError::BothSidesSet { line }),
            (true, true) => return Err(LedgerError::NoSideSet { line }),
            _ => {}
        }
        if !has_minor_unit_precision(debit) || !has_minor_unit_precision(credit) {
            return Err(LedgerError::ExcessPrecision { line });
        }
        Ok(())
    }

    /// Calculate totals across input lines.
    #[must_use]
    pub fn calculate_totals(items: &[JournalItemInput]) -> EntryTotals {
        EntryTotals::from_lines(items.iter().map(|i| (&i.debit_amount, &i.credit_amount)))
    }

    /// Trims free text and normalizes the PAN.
    fn normalize_header(header: &JournalEntryHeader) -> Result<JournalEntryHeader, LedgerError> {
        let mut header = header.clone();
        header.narration = header.narration.trim().to_string();
        header.donor_pan = normalize_pan(header.donor_pan.as_deref())?;
        header.donor_name = clean(header.donor_name.as_deref());
        header.donor_intent = clean(header.donor_intent.as_deref());
        header.vendor_invoice_no = clean(header.vendor_invoice_no.as_deref());
        Ok(header)
    }

    /// Validate that a voucher can be modified.
    ///
    /// # Errors
    ///
    /// Returns `CannotModifyFinalized` once the voucher is locked.
    pub fn validate_can_modify(id: JournalEntryId, status: EntryStatus) -> Result<(), LedgerError> {
        match status {
            EntryStatus::Draft => Ok(()),
            EntryStatus::Finalized => Err(LedgerError::CannotModifyFinalized(id)),
        }
    }

    /// `DRAFT --finalize()--> FINALIZED`; no other transition exists.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyFinalized` if the voucher is already locked.
    pub fn finalize(id: JournalEntryId, status: EntryStatus) -> Result<EntryStatus, LedgerError> {
        match status {
            EntryStatus::Draft => Ok(EntryStatus::Finalized),
            EntryStatus::Finalized => Err(LedgerError::AlreadyFinalized(id)),
        }
    }

    /// Builds the contra voucher that cancels `original`.
    ///
    /// Every line keeps its ledger and swaps debit and credit. The result is a
    /// JOURNAL voucher and goes through normal validation when posted.
    #[must_use]
    pub fn reversal_of(
        original: &PostedEntry,
        date: NaiveDate,
        created_by: Option<UserId>,
    ) -> JournalEntryInput {
        let items = original
            .items
            .iter()
            .map(|item| JournalItemInput {
                ledger_id: item.ledger_id,
                debit_amount: item.credit_amount,
                credit_amount: item.debit_amount,
                particulars: item.particulars.clone(),
            })
            .collect();

        JournalEntryInput {
            header: JournalEntryHeader::new(
                VoucherType::Journal,
                date,
                format!("Reversal of {}", original.voucher_number),
            ),
            items,
            created_by,
        }
    }
}

fn clean(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::compliance::ComplianceViolation;
    use crate::ledger::types::PostedItem;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn input(voucher_type: VoucherType, narration: &str, items: Vec<JournalItemInput>) -> JournalEntryInput {
        JournalEntryInput {
            header: JournalEntryHeader::new(voucher_type, date(), narration),
            items,
            created_by: None,
        }
    }

    fn active(id: LedgerId) -> Result<AccountInfo, LedgerError> {
        Ok(AccountInfo {
            id,
            is_active: true,
            fund_type: None,
        })
    }

    #[test]
    fn test_validate_balanced_entry() {
        let cash = LedgerId::new();
        let donation = LedgerId::new();
        let entry = input(
            VoucherType::Receipt,
            "  Friday collection ",
            vec![
                JournalItemInput::debit(cash, dec!(1000)),
                JournalItemInput::credit(donation, dec!(1000)),
            ],
        );

        let validated = PostingService::validate_entry(&entry, &ComplianceRules::default(), active).unwrap();
        assert_eq!(validated.items.len(), 2);
        assert_eq!(validated.items[1].line_no, 2);
        assert!(validated.totals.is_balanced);
        assert_eq!(validated.totals.amount(), dec!(1000));
        assert_eq!(validated.header.narration, "Friday collection");
    }

    #[test]
    fn test_empty_entry_rejected() {
        let entry = input(VoucherType::Journal, "", vec![]);
        let result = PostingService::validate_entry(&entry, &ComplianceRules::default(), active);
        assert!(matches!(result, Err(LedgerError::EmptyEntry)));
    }

    #[test]
    fn test_unbalanced_entry_rejected() {
        let entry = input(
            VoucherType::Journal,
            "",
            vec![
                JournalItemInput::debit(LedgerId::new(), dec!(100)),
                JournalItemInput::credit(LedgerId::new(), dec!(99.99)),
            ],
        );
        let result = PostingService::validate_entry(&entry, &ComplianceRules::default(), active);
        assert!(matches!(
            result,
            Err(LedgerError::UnbalancedEntry { debit, credit }) if debit == dec!(100) && credit == dec!(99.99)
        ));
    }

    #[test]
    fn test_item_with_both_sides_rejected() {
        let ledger = LedgerId::new();
        let entry = input(
            VoucherType::Journal,
            "",
            vec![JournalItemInput {
                ledger_id: ledger,
                debit_amount: dec!(50),
                credit_amount: dec!(50),
                particulars: None,
            }],
        );
        let result = PostingService::validate_entry(&entry, &ComplianceRules::default(), active);
        assert!(matches!(result, Err(LedgerError::BothSidesSet { line: 1 })));
    }

    #[test]
    fn test_item_with_no_side_rejected() {
        let entry = input(
            VoucherType::Journal,
            "",
            vec![
                JournalItemInput::debit(LedgerId::new(), dec!(10)),
                JournalItemInput::credit(LedgerId::new(), dec!(10)),
                JournalItemInput::debit(LedgerId::new(), dec!(0)),
            ],
        );
        let result = PostingService::validate_entry(&entry, &ComplianceRules::default(), active);
        assert!(matches!(result, Err(LedgerError::NoSideSet { line: 3 })));
    }

    #[test]
    fn test_negative_and_precision_rejected() {
        let item = JournalItemInput::debit(LedgerId::new(), dec!(-5));
        assert!(matches!(
            PostingService::validate_item(&item, 1),
            Err(LedgerError::NegativeAmount { line: 1 })
        ));
        let item = JournalItemInput::debit(LedgerId::new(), dec!(5.005));
        assert!(matches!(
            PostingService::validate_item(&item, 4),
            Err(LedgerError::ExcessPrecision { line: 4 })
        ));
    }

    #[test]
    fn test_inactive_or_missing_account_rejected() {
        let entry = input(
            VoucherType::Journal,
            "",
            vec![
                JournalItemInput::debit(LedgerId::new(), dec!(10)),
                JournalItemInput::credit(LedgerId::new(), dec!(10)),
            ],
        );
        let inactive = |id| {
            Ok(AccountInfo {
                id,
                is_active: false,
                fund_type: None,
            })
        };
        let result = PostingService::validate_entry(&entry, &ComplianceRules::default(), inactive);
        assert!(matches!(result, Err(LedgerError::AccountInactive(_))));

        let missing = |id| Err(LedgerError::AccountNotFound(id));
        let result = PostingService::validate_entry(&entry, &ComplianceRules::default(), missing);
        assert!(matches!(result, Err(LedgerError::AccountNotFound(_))));
    }

    #[test]
    fn test_zakat_electricity_payment_rejected() {
        let zakat = LedgerId::new();
        let electricity = LedgerId::new();
        let entry = input(
            VoucherType::Payment,
            "Electricity Bill",
            vec![
                JournalItemInput::debit(electricity, dec!(1000)),
                JournalItemInput::credit(zakat, dec!(1000)),
            ],
        );
        let lookup = move |id| {
            Ok(AccountInfo {
                id,
                is_active: true,
                fund_type: (id == zakat).then_some(FundType::Zakat),
            })
        };
        let result = PostingService::validate_entry(&entry, &ComplianceRules::default(), lookup);
        assert!(matches!(
            result,
            Err(LedgerError::Compliance(ComplianceViolation::RestrictedFundMisuse { .. }))
        ));
    }

    #[test]
    fn test_pan_threshold_receipt() {
        let items = vec![
            JournalItemInput::debit(LedgerId::new(), dec!(5000)),
            JournalItemInput::credit(LedgerId::new(), dec!(5000)),
        ];
        let mut entry = input(VoucherType::Receipt, "Donation", items);
        entry.header.donor_pan = Some(String::new());
        let result = PostingService::validate_entry(&entry, &ComplianceRules::default(), active);
        assert!(matches!(
            result,
            Err(LedgerError::Compliance(ComplianceViolation::PanRequired { .. }))
        ));

        entry.header.donor_pan = Some("abcde1234f".to_string());
        let validated = PostingService::validate_entry(&entry, &ComplianceRules::default(), active).unwrap();
        assert_eq!(validated.header.donor_pan.as_deref(), Some("ABCDE1234F"));
    }

    #[test]
    fn test_finalization_is_one_way() {
        let id = JournalEntryId::new();
        assert!(PostingService::validate_can_modify(id, EntryStatus::Draft).is_ok());
        assert_eq!(
            PostingService::finalize(id, EntryStatus::Draft).unwrap(),
            EntryStatus::Finalized
        );
        assert!(matches!(
            PostingService::finalize(id, EntryStatus::Finalized),
            Err(LedgerError::AlreadyFinalized(_))
        ));
        assert!(matches!(
            PostingService::validate_can_modify(id, EntryStatus::Finalized),
            Err(LedgerError::CannotModifyFinalized(_))
        ));
    }

    #[test]
    fn test_reversal_swaps_sides() {
        let cash = LedgerId::new();
        let donation = LedgerId::new();
        let original = PostedEntry {
            id: JournalEntryId::new(),
            voucher_number: "RCP-00007".to_string(),
            voucher_type: VoucherType::Receipt,
            date: date(),
            narration: "Donation".to_string(),
            is_finalized: true,
            items: vec![
                PostedItem {
                    ledger_id: cash,
                    debit_amount: dec!(250),
                    credit_amount: dec!(0),
                    particulars: None,
                },
                PostedItem {
                    ledger_id: donation,
                    debit_amount: dec!(0),
                    credit_amount: dec!(250),
                    particulars: Some("Friday".into()),
                },
            ],
        };

        let reversal = PostingService::reversal_of(&original, date(), None);
        assert_eq!(reversal.header.voucher_type, VoucherType::Journal);
        assert_eq!(reversal.header.narration, "Reversal of RCP-00007");
        assert_eq!(reversal.items[0].credit_amount, dec!(250));
        assert_eq!(reversal.items[1].debit_amount, dec!(250));
        assert!(PostingService::validate_entry(&reversal, &ComplianceRules::default(), active).is_ok());
    }
}
