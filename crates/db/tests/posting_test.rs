//! Voucher posting, finalization and reports against a real database.

mod common;

use chrono::NaiveDate;
use futures::future::join_all;
use mizan_core::ledger::{
    JournalEntryHeader, JournalEntryInput, JournalItemInput, LedgerError, VoucherType,
};
use mizan_core::tenant::TenantContext;
use mizan_db::repositories::{CreateAccountInput, JournalFilter};
use mizan_db::{JournalRepository, LedgerRepository, ReportRepository, RepositoryError};
use mizan_shared::types::{LedgerId, PageRequest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use common::{connect, ledger, provision, rules};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
}

fn entry(
    voucher_type: VoucherType,
    date: NaiveDate,
    narration: &str,
    debit: LedgerId,
    credit: LedgerId,
    amount: Decimal,
) -> JournalEntryInput {
    JournalEntryInput {
        header: JournalEntryHeader::new(voucher_type, date, narration),
        items: vec![
            JournalItemInput::debit(debit, amount),
            JournalItemInput::credit(credit, amount),
        ],
        created_by: None,
    }
}

async fn voucher_count(journal: &JournalRepository, tenant: &TenantContext) -> u64 {
    journal
        .list(tenant, JournalFilter::default(), &PageRequest::default())
        .await
        .unwrap()
        .meta
        .total
}

#[tokio::test]
async fn test_rejected_vouchers_write_nothing() {
    let Some(db) = connect().await else { return };
    let tenant = provision(&db, "atomic").await;
    let journal = JournalRepository::new(db.clone(), rules());
    let cash = ledger(&db, &tenant, "1100").await;
    let income = ledger(&db, &tenant, "4100").await;
    let zakat = ledger(&db, &tenant, "3200").await;
    let electricity = ledger(&db, &tenant, "5200").await;

    let mut unbalanced = entry(VoucherType::Receipt, day(1), "Collection", cash, income, dec!(100));
    unbalanced.items[1].credit_amount = dec!(90);
    let err = journal.create(&tenant, unbalanced).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Ledger(LedgerError::UnbalancedEntry { .. })));

    let misuse = entry(VoucherType::Payment, day(1), "Electricity Bill", electricity, zakat, dec!(1000));
    let err = journal.create(&tenant, misuse).await.unwrap_err();
    assert_eq!(err.error_code(), "RESTRICTED_FUND_MISUSE");

    let no_pan = entry(VoucherType::Receipt, day(1), "Donation", cash, income, dec!(5000));
    assert!(journal.create(&tenant, no_pan.clone()).await.is_err());

    assert_eq!(voucher_count(&journal, &tenant).await, 0);
    let cash_balance = LedgerRepository::new(db.clone()).get(&tenant, cash).await.unwrap();
    assert_eq!(cash_balance.balance, Decimal::ZERO);

    let mut with_pan = no_pan;
    with_pan.header.donor_pan = Some("abcde1234f".into());
    let posted = journal.create(&tenant, with_pan).await.unwrap().value;
    assert_eq!(posted.donor_pan.as_deref(), Some("ABCDE1234F"));
    assert_eq!(posted.voucher_number, "RCP-00001");
    assert_eq!(posted.items.len(), 2);
    assert_eq!(voucher_count(&journal, &tenant).await, 1);
}

#[tokio::test]
async fn test_voucher_numbers_are_sequential_per_type() {
    let Some(db) = connect().await else { return };
    let tenant = provision(&db, "numbers").await;
    let journal = JournalRepository::new(db.clone(), rules());
    let cash = ledger(&db, &tenant, "1100").await;
    let income = ledger(&db, &tenant, "4100").await;
    let salary = ledger(&db, &tenant, "5100").await;

    let tasks = (0..8).map(|_| {
        let journal = journal.clone();
        let tenant = tenant.clone();
        async move {
            journal
                .create(&tenant, entry(VoucherType::Receipt, day(2), "Sadaqah box", cash, income, dec!(10)))
                .await
        }
    });
    let mut numbers: Vec<String> = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap().value.voucher_number)
        .collect();
    numbers.sort();
    let expected: Vec<String> = (1..=8).map(|n| format!("RCP-{n:05}")).collect();
    assert_eq!(numbers, expected);

    let payment = journal
        .create(&tenant, entry(VoucherType::Payment, day(2), "Imam stipend", salary, cash, dec!(5)))
        .await
        .unwrap();
    assert_eq!(payment.value.voucher_number, "PAY-00001");
}

#[tokio::test]
async fn test_concurrent_finalize_has_one_winner() {
    let Some(db) = connect().await else { return };
    let tenant = provision(&db, "finalize").await;
    let journal = JournalRepository::new(db.clone(), rules());
    let cash = ledger(&db, &tenant, "1100").await;
    let income = ledger(&db, &tenant, "4100").await;
    let posted = journal
        .create(&tenant, entry(VoucherType::Receipt, day(3), "Collection", cash, income, dec!(100)))
        .await
        .unwrap()
        .value;

    let attempts = (0..5).map(|_| {
        let journal = journal.clone();
        let tenant = tenant.clone();
        async move { journal.finalize(&tenant, posted.id).await }
    });
    let results = join_all(attempts).await;
    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for err in results.into_iter().filter_map(Result::err) {
        assert!(matches!(err, RepositoryError::Ledger(LedgerError::AlreadyFinalized(_))));
    }

    let edit = entry(VoucherType::Receipt, day(3), "Edited", cash, income, dec!(200));
    let err = journal.update(&tenant, posted.id, edit).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Ledger(LedgerError::CannotModifyFinalized(_))));
    assert_eq!(err.http_status_code(), 400);

    let reversal = journal.reverse(&tenant, posted.id, Some(day(4)), None).await.unwrap();
    assert_eq!(reversal.value.voucher_number, "JV-00001");
    assert_eq!(reversal.value.reversal_of, Some(posted.id));
    assert!(!reversal.value.is_finalized);
    assert_eq!(reversal.events.len(), 2);
    assert_eq!(
        LedgerRepository::new(db.clone()).get(&tenant, cash).await.unwrap().balance,
        Decimal::ZERO
    );
}

#[tokio::test]
async fn test_draft_update_replaces_lines() {
    let Some(db) = connect().await else { return };
    let tenant = provision(&db, "update").await;
    let journal = JournalRepository::new(db.clone(), rules());
    let cash = ledger(&db, &tenant, "1100").await;
    let bank = ledger(&db, &tenant, "1200").await;
    let income = ledger(&db, &tenant, "4100").await;
    let posted = journal
        .create(&tenant, entry(VoucherType::Receipt, day(5), "Collection", cash, income, dec!(100)))
        .await
        .unwrap()
        .value;

    let edit = entry(VoucherType::Receipt, day(5), "Collection (bank)", bank, income, dec!(150));
    let updated = journal.update(&tenant, posted.id, edit).await.unwrap().value;
    assert_eq!(updated.voucher_number, posted.voucher_number);
    assert_eq!(updated.totals.total_debit, dec!(150));
    assert_eq!(updated.items[0].ledger_id, bank);

    let ledgers = LedgerRepository::new(db.clone());
    assert_eq!(ledgers.get(&tenant, cash).await.unwrap().balance, Decimal::ZERO);
    assert_eq!(ledgers.get(&tenant, bank).await.unwrap().balance, dec!(150));

    let retyped = entry(VoucherType::Journal, day(5), "Retyped", bank, income, dec!(150));
    assert!(journal.update(&tenant, posted.id, retyped).await.is_err());
}

#[tokio::test]
async fn test_trial_balance_and_day_book() {
    let Some(db) = connect().await else { return };
    let tenant = provision(&db, "trial").await;
    let journal = JournalRepository::new(db.clone(), rules());
    let cash = ledger(&db, &tenant, "1100").await;
    let donation = ledger(&db, &tenant, "4100").await;
    let salary = ledger(&db, &tenant, "5100").await;

    journal
        .create(&tenant, entry(VoucherType::Receipt, day(6), "Donation", cash, donation, dec!(1000)))
        .await
        .unwrap();
    journal
        .create(&tenant, entry(VoucherType::Payment, day(6), "Muezzin wages", salary, cash, dec!(500)))
        .await
        .unwrap();

    let reports = ReportRepository::new(db.clone());
    let tb = reports.trial_balance(&tenant, Some(day(30))).await.unwrap();
    assert!(tb.is_balanced);
    assert_eq!(tb.total_debit, dec!(1000));
    assert_eq!(tb.total_credit, dec!(1000));
    assert_eq!(tb.turnover_debit, dec!(1500));
    assert_eq!(tb.turnover_credit, dec!(1500));

    let earlier = reports.trial_balance(&tenant, Some(day(5))).await.unwrap();
    assert_eq!(earlier.total_debit, Decimal::ZERO);

    let assets = ledger(&db, &tenant, "1000").await;
    let ledgers = LedgerRepository::new(db.clone());
    assert_eq!(ledgers.get(&tenant, cash).await.unwrap().balance, dec!(500));
    assert_eq!(ledgers.get(&tenant, assets).await.unwrap().balance, dec!(500));

    let book = reports.day_book(&tenant, day(6)).await.unwrap();
    assert_eq!(book.entries.len(), 2);
    assert_eq!(book.total_receipts, dec!(1000));
    assert_eq!(book.total_payments, dec!(500));

    let statement = reports.account_statement(&tenant, cash, day(6), day(6)).await.unwrap();
    assert_eq!(statement.closing_balance, dec!(500));
}

#[tokio::test]
async fn test_deactivation_rules() {
    let Some(db) = connect().await else { return };
    let tenant = provision(&db, "deact").await;
    let ledgers = LedgerRepository::new(db.clone());
    let journal = JournalRepository::new(db.clone(), rules());
    let expenses = ledger(&db, &tenant, "5000").await;
    let cash = ledger(&db, &tenant, "1100").await;

    let system = ledgers.deactivate(&tenant, cash).await.unwrap_err();
    assert!(matches!(system, RepositoryError::Ledger(LedgerError::SystemAccount(_))));

    let custom = |code: &str| CreateAccountInput {
        code: code.into(),
        name: format!("Custom {code}"),
        account_type: mizan_core::ledger::AccountType::Expense,
        fund_type: None,
        parent_id: Some(expenses),
    };
    let unused = ledgers.create(&tenant, custom("5901")).await.unwrap();
    let used = ledgers.create(&tenant, custom("5902")).await.unwrap();
    assert!(ledgers.create(&tenant, custom("5901")).await.is_err());

    journal
        .create(&tenant, entry(VoucherType::Payment, day(7), "Carpets", used.id, cash, dec!(40)))
        .await
        .unwrap();

    let done = ledgers.deactivate(&tenant, unused.id).await.unwrap();
    assert!(!done.value.is_active);
    let refused = ledgers.deactivate(&tenant, used.id).await.unwrap_err();
    assert!(matches!(refused, RepositoryError::Ledger(LedgerError::AccountHasPostings { .. })));
}

#[tokio::test]
async fn test_undated_trial_balance_includes_post_dated_vouchers() {
    let Some(db) = connect().await else { return };
    let tenant = provision(&db, "postdated").await;
    let journal = JournalRepository::new(db.clone(), rules());
    let cash = ledger(&db, &tenant, "1100").await;
    let donation = ledger(&db, &tenant, "4100").await;

    let next_month = chrono::Utc::now().date_naive() + chrono::Days::new(30);
    journal
        .create(&tenant, entry(VoucherType::Journal, next_month, "Pledged grant", cash, donation, dec!(700)))
        .await
        .unwrap();

    let balance = LedgerRepository::new(db.clone()).get(&tenant, cash).await.unwrap().balance;
    assert_eq!(balance, dec!(700));

    let reports = ReportRepository::new(db.clone());
    let all = reports.trial_balance(&tenant, None).await.unwrap();
    assert_eq!(all.as_of, None);
    assert_eq!(all.total_debit, balance);
    assert!(all.is_balanced);

    let today = chrono::Utc::now().date_naive();
    let cut = reports.trial_balance(&tenant, Some(today)).await.unwrap();
    assert_eq!(cut.total_debit, Decimal::ZERO);
}
