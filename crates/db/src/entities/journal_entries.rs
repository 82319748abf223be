//! `SeaORM` Entity for voucher headers.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{PaymentMode, VoucherType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub voucher_number: String,
    pub voucher_type: VoucherType,
    pub date: Date,
    #[sea_orm(column_type = "Text")]
    pub narration: String,
    pub donor_member_id: Option<Uuid>,
    pub donor_name: Option<String>,
    pub donor_pan: Option<String>,
    pub donor_intent: Option<String>,
    pub supplier_id: Option<Uuid>,
    pub vendor_invoice_no: Option<String>,
    pub vendor_invoice_date: Option<Date>,
    pub payment_mode: Option<PaymentMode>,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub total_amount: Decimal,
    pub is_finalized: bool,
    pub finalized_at: Option<DateTimeWithTimeZone>,
    pub reversal_of: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::journal_items::Entity")]
    JournalItems,
}

impl Related<super::journal_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
