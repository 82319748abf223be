//! Journal entry (voucher) repository.
//!
//! Posting, editing, finalizing and reversing all run inside one
//! schema-scoped transaction each: the header, every line and the voucher
//! number become visible together or not at all.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use mizan_core::ledger::{
    AccountInfo, Committed, ComplianceRules, EntryStatus, EntryTotals, JournalEntryHeader,
    JournalEntryInput, LedgerError, LedgerEvent, PaymentMode, PostedEntry, PostedItem,
    PostingService, ValidatedEntry, VoucherType, voucher::format_voucher_number,
};
use mizan_core::tenant::TenantContext;
use mizan_shared::types::{
    JournalEntryId, JournalItemId, LedgerId, MemberId, PageRequest, PageResponse, SupplierId,
    UserId,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbBackend, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    Statement,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::entities::{journal_entries, journal_items, ledgers};
use crate::error::RepositoryError;
use crate::schema::TenantConnection;

/// Allocates the next number for a voucher type. The row lock taken by the
/// upsert is held until the posting transaction ends.
const NEXT_SEQUENCE_SQL: &str = r"
INSERT INTO voucher_sequences (voucher_type, last_value)
VALUES ($1, 1)
ON CONFLICT (voucher_type)
DO UPDATE SET last_value = voucher_sequences.last_value + 1
RETURNING last_value
";

/// One voucher line as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct JournalItemView {
    /// Line ID.
    pub id: JournalItemId,
    /// 1-based position.
    pub line_no: i32,
    /// Ledger posted to.
    pub ledger_id: LedgerId,
    /// Ledger code.
    pub ledger_code: String,
    /// Ledger name.
    pub ledger_name: String,
    /// Debit side.
    pub debit_amount: Decimal,
    /// Credit side.
    pub credit_amount: Decimal,
    /// Line description.
    pub particulars: Option<String>,
}

/// A voucher with its lines and totals.
#[derive(Debug, Clone, Serialize)]
pub struct JournalEntryView {
    /// Voucher ID.
    pub id: JournalEntryId,
    /// `RCP-00001` etc.
    pub voucher_number: String,
    /// Voucher type.
    pub voucher_type: VoucherType,
    /// Accounting date.
    pub date: NaiveDate,
    /// Narration.
    pub narration: String,
    /// Donor member.
    pub donor_member_id: Option<MemberId>,
    /// Free-text donor.
    pub donor_name: Option<String>,
    /// Donor PAN.
    pub donor_pan: Option<String>,
    /// Donor's stated intent.
    pub donor_intent: Option<String>,
    /// Supplier.
    pub supplier_id: Option<SupplierId>,
    /// Vendor invoice number.
    pub vendor_invoice_no: Option<String>,
    /// Vendor invoice date.
    pub vendor_invoice_date: Option<NaiveDate>,
    /// Payment mode.
    pub payment_mode: Option<PaymentMode>,
    /// Draft or finalized.
    pub status: EntryStatus,
    /// Lock flag.
    pub is_finalized: bool,
    /// When the voucher was finalized.
    pub finalized_at: Option<DateTime<FixedOffset>>,
    /// Voucher this one reverses.
    pub reversal_of: Option<JournalEntryId>,
    /// Author.
    pub created_by: Option<UserId>,
    /// Lines in order.
    pub items: Vec<JournalItemView>,
    /// Debit and credit totals.
    pub totals: EntryTotals,
}

impl JournalEntryView {
    /// The voucher as the posting engine sees it.
    #[must_use]
    pub fn to_posted(&self) -> PostedEntry {
        PostedEntry {
            id: self.id,
            voucher_number: self.voucher_number.clone(),
            voucher_type: self.voucher_type,
            date: self.date,
            narration: self.narration.clone(),
            is_finalized: self.is_finalized,
            items: self
                .items
                .iter()
                .map(|item| PostedItem {
                    ledger_id: item.ledger_id,
                    debit_amount: item.debit_amount,
                    credit_amount: item.credit_amount,
                    particulars: item.particulars.clone(),
                })
                .collect(),
        }
    }
}

/// A row in the voucher list.
#[derive(Debug, Clone, Serialize)]
pub struct JournalEntrySummary {
    /// Voucher ID.
    pub id: JournalEntryId,
    /// Voucher number.
    pub voucher_number: String,
    /// Voucher type.
    pub voucher_type: VoucherType,
    /// Accounting date.
    pub date: NaiveDate,
    /// Narration.
    pub narration: String,
    /// Voucher amount.
    pub total_amount: Decimal,
    /// Donor, if any.
    pub donor_name: Option<String>,
    /// Draft or finalized.
    pub status: EntryStatus,
}

/// Filter options for listing vouchers.
#[derive(Debug, Clone, Copy, Default)]
pub struct JournalFilter {
    /// Earliest date, inclusive.
    pub from: Option<NaiveDate>,
    /// Latest date, inclusive.
    pub to: Option<NaiveDate>,
    /// Only this voucher type.
    pub voucher_type: Option<VoucherType>,
}

/// Voucher repository.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
    rules: Arc<ComplianceRules>,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, rules: Arc<ComplianceRules>) -> Self {
        Self { db, rules }
    }

    /// Validates and posts a voucher as a draft.
    ///
    /// # Errors
    ///
    /// Returns the first validation or compliance failure; nothing is
    /// written in that case.
    pub async fn create(
        &self,
        tenant: &TenantContext,
        input: JournalEntryInput,
    ) -> Result<Committed<JournalEntryView>, RepositoryError> {
        let conn = TenantConnection::begin(&self.db, &tenant.schema).await?;
        let view = self.post(conn.transaction(), tenant, &input, None).await?;
        conn.commit().await?;

        info!(
            schema = %tenant.schema,
            voucher = %view.voucher_number,
            amount = %view.totals.total_debit,
            "Journal entry posted"
        );
        let events = vec![posted_event(&view)];
        Ok(Committed::new(view, events))
    }

    /// Gets a voucher with its lines.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the voucher does not exist.
    pub async fn get(
        &self,
        tenant: &TenantContext,
        id: JournalEntryId,
    ) -> Result<JournalEntryView, RepositoryError> {
        let conn = TenantConnection::begin(&self.db, &tenant.schema).await?;
        let view = load_view(conn.transaction(), id).await?;
        conn.commit().await?;
        Ok(view)
    }

    /// Lists vouchers, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        tenant: &TenantContext,
        filter: JournalFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<JournalEntrySummary>, RepositoryError> {
        let conn = TenantConnection::begin(&self.db, &tenant.schema).await?;
        let txn = conn.transaction();

        let mut query = journal_entries::Entity::find();
        if let Some(from) = filter.from {
            query = query.filter(journal_entries::Column::Date.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(journal_entries::Column::Date.lte(to));
        }
        if let Some(voucher_type) = filter.voucher_type {
            query = query.filter(
                journal_entries::Column::VoucherType
                    .eq(crate::entities::sea_orm_active_enums::VoucherType::from(voucher_type)),
            );
        }

        let total = query.clone().count(txn).await?;
        let rows = query
            .order_by_desc(journal_entries::Column::Date)
            .order_by_desc(journal_entries::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(txn)
            .await?;
        conn.commit().await?;

        let data = rows
            .into_iter()
            .map(|row| JournalEntrySummary {
                id: JournalEntryId::from_uuid(row.id),
                voucher_number: row.voucher_number,
                voucher_type: row.voucher_type.into(),
                date: row.date,
                narration: row.narration,
                total_amount: row.total_amount,
                donor_name: row.donor_name,
                status: EntryStatus::from_finalized(row.is_finalized),
            })
            .collect();
        let per_page = u32::try_from(page.limit()).unwrap_or(u32::MAX);
        Ok(PageResponse::new(data, page.page.max(1), per_page, total))
    }

    /// Replaces the header and lines of a draft voucher.
    ///
    /// The voucher number and type are kept.
    ///
    /// # Errors
    ///
    /// Returns `CannotModifyFinalized` for a locked voucher, or the first
    /// validation failure of the new content.
    pub async fn update(
        &self,
        tenant: &TenantContext,
        id: JournalEntryId,
        input: JournalEntryInput,
    ) -> Result<Committed<JournalEntryView>, RepositoryError> {
        let conn = TenantConnection::begin(&self.db, &tenant.schema).await?;
        let txn = conn.transaction();

        let existing = lock_entry(txn, id).await?;
        PostingService::validate_can_modify(id, EntryStatus::from_finalized(existing.is_finalized))?;
        let voucher_type: VoucherType = existing.voucher_type.into();
        if input.header.voucher_type != voucher_type {
            return Err(LedgerError::Validation(format!(
                "Voucher type of {} cannot be changed",
                existing.voucher_number
            ))
            .into());
        }

        let validated = self.validate(txn, tenant, &input).await?;

        journal_items::Entity::delete_many()
            .filter(journal_items::Column::JournalEntryId.eq(id.into_inner()))
            .exec(txn)
            .await?;

        let mut active: journal_entries::ActiveModel = existing.into();
        apply_header(&mut active, &validated.header);
        active.total_amount = Set(validated.totals.total_debit);
        active.updated_at = Set(Utc::now().into());
        active.update(txn).await?;
        insert_items(txn, id, &validated).await?;

        let view = load_view(txn, id).await?;
        conn.commit().await?;

        info!(schema = %tenant.schema, voucher = %view.voucher_number, "Journal entry updated");
        let event = LedgerEvent::EntryUpdated {
            entry_id: view.id,
            voucher_number: view.voucher_number.clone(),
            amount: view.totals.total_debit,
        };
        Ok(Committed::new(view, vec![event]))
    }

    /// Locks a voucher against further edits.
    ///
    /// The row is read `FOR UPDATE`, so of two concurrent calls exactly one
    /// succeeds and the other sees `AlreadyFinalized`.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` or `AlreadyFinalized`.
    pub async fn finalize(
        &self,
        tenant: &TenantContext,
        id: JournalEntryId,
    ) -> Result<Committed<JournalEntryView>, RepositoryError> {
        let conn = TenantConnection::begin(&self.db, &tenant.schema).await?;
        let txn = conn.transaction();

        let existing = lock_entry(txn, id).await?;
        let status = PostingService::finalize(id, EntryStatus::from_finalized(existing.is_finalized))?;

        let mut active: journal_entries::ActiveModel = existing.into();
        active.is_finalized = Set(status == EntryStatus::Finalized);
        active.finalized_at = Set(Some(Utc::now().into()));
        active.updated_at = Set(Utc::now().into());
        active.update(txn).await?;

        let view = load_view(txn, id).await?;
        conn.commit().await?;

        info!(schema = %tenant.schema, voucher = %view.voucher_number, "Journal entry finalized");
        let event = LedgerEvent::EntryFinalized {
            entry_id: view.id,
            voucher_number: view.voucher_number.clone(),
        };
        Ok(Committed::new(view, vec![event]))
    }

    /// Posts a contra voucher that cancels `id`.
    ///
    /// The original is untouched and may be finalized. The reversal is a
    /// draft JOURNAL voucher dated `date` (today if `None`).
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, or any posting failure of the contra voucher.
    pub async fn reverse(
        &self,
        tenant: &TenantContext,
        id: JournalEntryId,
        date: Option<NaiveDate>,
        created_by: Option<UserId>,
    ) -> Result<Committed<JournalEntryView>, RepositoryError> {
        let conn = TenantConnection::begin(&self.db, &tenant.schema).await?;
        let txn = conn.transaction();

        let original = load_view(txn, id).await?;
        let date = date.unwrap_or_else(|| Utc::now().date_naive());
        let input = PostingService::reversal_of(&original.to_posted(), date, created_by);
        let view = self.post(txn, tenant, &input, Some(id)).await?;
        conn.commit().await?;

        info!(
            schema = %tenant.schema,
            original = %original.voucher_number,
            reversal = %view.voucher_number,
            "Journal entry reversed"
        );
        let events = vec![
            posted_event(&view),
            LedgerEvent::EntryReversed {
                original_id: id,
                reversal_id: view.id,
                reversal_voucher: view.voucher_number.clone(),
            },
        ];
        Ok(Committed::new(view, events))
    }

    async fn validate(
        &self,
        txn: &DatabaseTransaction,
        tenant: &TenantContext,
        input: &JournalEntryInput,
    ) -> Result<ValidatedEntry, RepositoryError> {
        let ids: Vec<Uuid> = input.items.iter().map(|i| i.ledger_id.into_inner()).collect();
        let accounts: HashMap<LedgerId, AccountInfo> = ledgers::Entity::find()
            .filter(ledgers::Column::Id.is_in(ids))
            .all(txn)
            .await?
            .into_iter()
            .map(|l| {
                let id = LedgerId::from_uuid(l.id);
                (
                    id,
                    AccountInfo {
                        id,
                        is_active: l.is_active,
                        fund_type: l.fund_type.map(Into::into),
                    },
                )
            })
            .collect();

        PostingService::validate_entry(input, &self.rules, |id| {
            accounts
                .get(&id)
                .cloned()
                .ok_or(LedgerError::AccountNotFound(id))
        })
        .map_err(|e| {
            if let LedgerError::Compliance(violation) = &e {
                warn!(
                    schema = %tenant.schema,
                    code = violation.error_code(),
                    reason = %violation,
                    "Voucher rejected by compliance rules"
                );
            }
            RepositoryError::from(e)
        })
    }

    async fn post(
        &self,
        txn: &DatabaseTransaction,
        tenant: &TenantContext,
        input: &JournalEntryInput,
        reversal_of: Option<JournalEntryId>,
    ) -> Result<JournalEntryView, RepositoryError> {
        let validated = self.validate(txn, tenant, input).await?;

        let sequence = next_sequence(txn, validated.header.voucher_type).await?;
        let voucher_number = format_voucher_number(validated.header.voucher_type, sequence);
        let id = JournalEntryId::new();
        let now = Utc::now().into();

        let mut header = journal_entries::ActiveModel {
            id: Set(id.into_inner()),
            voucher_number: Set(voucher_number),
            total_amount: Set(validated.totals.total_debit),
            is_finalized: Set(false),
            finalized_at: Set(None),
            reversal_of: Set(reversal_of.map(JournalEntryId::into_inner)),
            created_by: Set(input.created_by.map(UserId::into_inner)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_header(&mut header, &validated.header);
        header.insert(txn).await?;
        insert_items(txn, id, &validated).await?;

        load_view(txn, id).await
    }
}

fn posted_event(view: &JournalEntryView) -> LedgerEvent {
    LedgerEvent::EntryPosted {
        entry_id: view.id,
        voucher_number: view.voucher_number.clone(),
        voucher_type: view.voucher_type,
        date: view.date,
        amount: view.totals.total_debit,
    }
}

fn apply_header(active: &mut journal_entries::ActiveModel, header: &JournalEntryHeader) {
    active.voucher_type = Set(header.voucher_type.into());
    active.date = Set(header.date);
    active.narration = Set(header.narration.clone());
    active.donor_member_id = Set(header.donor_member_id.map(MemberId::into_inner));
    active.donor_name = Set(header.donor_name.clone());
    active.donor_pan = Set(header.donor_pan.clone());
    active.donor_intent = Set(header.donor_intent.clone());
    active.supplier_id = Set(header.supplier_id.map(SupplierId::into_inner));
    active.vendor_invoice_no = Set(header.vendor_invoice_no.clone());
    active.vendor_invoice_date = Set(header.vendor_invoice_date);
    active.payment_mode = Set(header.payment_mode.map(Into::into));
}

async fn insert_items(
    txn: &DatabaseTransaction,
    entry_id: JournalEntryId,
    validated: &ValidatedEntry,
) -> Result<(), DbErr> {
    if validated.items.is_empty() {
        return Ok(());
    }
    let rows = validated.items.iter().map(|item| journal_items::ActiveModel {
        id: Set(JournalItemId::new().into_inner()),
        journal_entry_id: Set(entry_id.into_inner()),
        ledger_id: Set(item.ledger_id.into_inner()),
        line_no: Set(i32::try_from(item.line_no).unwrap_or(i32::MAX)),
        debit_amount: Set(item.debit_amount),
        credit_amount: Set(item.credit_amount),
        particulars: Set(item.particulars.clone()),
    });
    journal_items::Entity::insert_many(rows).exec(txn).await?;
    Ok(())
}

async fn next_sequence(txn: &DatabaseTransaction, voucher_type: VoucherType) -> Result<u64, DbErr> {
    let statement = Statement::from_sql_and_values(
        DbBackend::Postgres,
        NEXT_SEQUENCE_SQL,
        [voucher_type.as_str().into()],
    );
    let row = txn
        .query_one(statement)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("voucher_sequences".to_string()))?;
    let value: i64 = row.try_get("", "last_value")?;
    u64::try_from(value).map_err(|_| DbErr::Custom(format!("invalid voucher sequence {value}")))
}

async fn lock_entry(
    txn: &DatabaseTransaction,
    id: JournalEntryId,
) -> Result<journal_entries::Model, RepositoryError> {
    journal_entries::Entity::find_by_id(id.into_inner())
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or_else(|| LedgerError::EntryNotFound(id).into())
}

/// Loads a voucher with lines and ledger names.
pub(crate) async fn load_view<C>(conn: &C, id: JournalEntryId) -> Result<JournalEntryView, RepositoryError>
where
    C: ConnectionTrait,
{
    let entry = journal_entries::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .ok_or(LedgerError::EntryNotFound(id))?;
    let items = journal_items::Entity::find()
        .filter(journal_items::Column::JournalEntryId.eq(entry.id))
        .order_by_asc(journal_items::Column::LineNo)
        .all(conn)
        .await?;
    let names = ledger_names(conn, items.iter().map(|i| i.ledger_id)).await?;
    Ok(build_view(entry, items, &names))
}

/// Code and name per ledger.
pub(crate) async fn ledger_names<C, I>(conn: &C, ids: I) -> Result<HashMap<Uuid, (String, String)>, DbErr>
where
    C: ConnectionTrait,
    I: IntoIterator<Item = Uuid>,
{
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(ledgers::Entity::find()
        .filter(ledgers::Column::Id.is_in(ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|l| (l.id, (l.code, l.name)))
        .collect())
}

/// Assembles a view from stored rows.
pub(crate) fn build_view(
    entry: journal_entries::Model,
    items: Vec<journal_items::Model>,
    names: &HashMap<Uuid, (String, String)>,
) -> JournalEntryView {
    let items: Vec<JournalItemView> = items
        .into_iter()
        .map(|item| {
            let (code, name) = names.get(&item.ledger_id).cloned().unwrap_or_default();
            JournalItemView {
                id: JournalItemId::from_uuid(item.id),
                line_no: item.line_no,
                ledger_id: LedgerId::from_uuid(item.ledger_id),
                ledger_code: code,
                ledger_name: name,
                debit_amount: item.debit_amount,
                credit_amount: item.credit_amount,
                particulars: item.particulars,
            }
        })
        .collect();
    let totals = EntryTotals::from_lines(items.iter().map(|i| (&i.debit_amount, &i.credit_amount)));

    JournalEntryView {
        id: JournalEntryId::from_uuid(entry.id),
        voucher_number: entry.voucher_number,
        voucher_type: entry.voucher_type.into(),
        date: entry.date,
        narration: entry.narration,
        donor_member_id: entry.donor_member_id.map(MemberId::from_uuid),
        donor_name: entry.donor_name,
        donor_pan: entry.donor_pan,
        donor_intent: entry.donor_intent,
        supplier_id: entry.supplier_id.map(SupplierId::from_uuid),
        vendor_invoice_no: entry.vendor_invoice_no,
        vendor_invoice_date: entry.vendor_invoice_date,
        payment_mode: entry.payment_mode.map(Into::into),
        status: EntryStatus::from_finalized(entry.is_finalized),
        is_finalized: entry.is_finalized,
        finalized_at: entry.finalized_at,
        reversal_of: entry.reversal_of.map(JournalEntryId::from_uuid),
        created_by: entry.created_by.map(UserId::from_uuid),
        items,
        totals,
    }
}
