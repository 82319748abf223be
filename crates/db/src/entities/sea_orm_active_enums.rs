//! String-backed enums shared by the tenant entities.
//!
//! Stored as `VARCHAR` with `CHECK` constraints so each tenant schema stays
//! self-contained. Conversions to the `mizan-core` types are lossless.

use mizan_core::auth::UserRole as CoreUserRole;
use mizan_core::ledger::{
    AccountType as CoreAccountType, FundType as CoreFundType, PaymentMode as CorePaymentMode,
    VoucherType as CoreVoucherType,
};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum AccountType {
    #[sea_orm(string_value = "ASSET")]
    Asset,
    #[sea_orm(string_value = "LIABILITY")]
    Liability,
    #[sea_orm(string_value = "EQUITY")]
    Equity,
    #[sea_orm(string_value = "INCOME")]
    Income,
    #[sea_orm(string_value = "EXPENSE")]
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum FundType {
    #[sea_orm(string_value = "ZAKAT")]
    Zakat,
    #[sea_orm(string_value = "SADAQAH")]
    Sadaqah,
    #[sea_orm(string_value = "CONSTRUCTION")]
    Construction,
    #[sea_orm(string_value = "GENERAL")]
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum VoucherType {
    #[sea_orm(string_value = "RECEIPT")]
    Receipt,
    #[sea_orm(string_value = "PAYMENT")]
    Payment,
    #[sea_orm(string_value = "JOURNAL")]
    Journal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum PaymentMode {
    #[sea_orm(string_value = "CASH")]
    Cash,
    #[sea_orm(string_value = "BANK")]
    Bank,
    #[sea_orm(string_value = "UPI")]
    Upi,
    #[sea_orm(string_value = "CHEQUE")]
    Cheque,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum UserRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "accountant")]
    Accountant,
    #[sea_orm(string_value = "viewer")]
    Viewer,
}

macro_rules! mirror_enum {
    ($db:ident, $core:ident, [$($variant:ident),+ $(,)?]) => {
        impl From<$core> for $db {
            fn from(value: $core) -> Self {
                match value {
                    $($core::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$db> for $core {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant,)+
                }
            }
        }
    };
}

mirror_enum!(AccountType, CoreAccountType, [Asset, Liability, Equity, Income, Expense]);
mirror_enum!(FundType, CoreFundType, [Zakat, Sadaqah, Construction, General]);
mirror_enum!(VoucherType, CoreVoucherType, [Receipt, Payment, Journal]);
mirror_enum!(PaymentMode, CorePaymentMode, [Cash, Bank, Upi, Cheque]);
mirror_enum!(UserRole, CoreUserRole, [Admin, Accountant, Viewer]);

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ActiveEnum, Iterable};

    #[test]
    fn test_values_match_core_storage_names() {
        for db in AccountType::iter() {
            let core: CoreAccountType = db.into();
            assert_eq!(db.to_value(), core.as_str());
        }
        for db in FundType::iter() {
            let core: CoreFundType = db.into();
            assert_eq!(db.to_value(), core.as_str());
        }
        for db in VoucherType::iter() {
            let core: CoreVoucherType = db.into();
            assert_eq!(db.to_value(), core.as_str());
        }
        for db in UserRole::iter() {
            let core: CoreUserRole = db.into();
            assert_eq!(db.to_value(), core.as_str());
        }
    }

    #[test]
    fn test_round_trip_through_core() {
        assert_eq!(PaymentMode::from(CorePaymentMode::from(PaymentMode::Upi)), PaymentMode::Upi);
    }
}
