//! Default chart of accounts seeded into every new workspace.

use super::types::{AccountType, FundType};

/// One system ledger of the default chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedAccount {
    /// Sortable code.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Account type.
    pub account_type: AccountType,
    /// Fund tag.
    pub fund_type: Option<FundType>,
    /// Code of the parent ledger; parents precede children.
    pub parent_code: Option<&'static str>,
}

const fn root(code: &'static str, name: &'static str, account_type: AccountType) -> SeedAccount {
    SeedAccount {
        code,
        name,
        account_type,
        fund_type: None,
        parent_code: None,
    }
}

const fn leaf(
    code: &'static str,
    name: &'static str,
    account_type: AccountType,
    fund_type: Option<FundType>,
    parent_code: &'static str,
) -> SeedAccount {
    SeedAccount {
        code,
        name,
        account_type,
        fund_type,
        parent_code: Some(parent_code),
    }
}

/// System ledgers, parents first.
pub const DEFAULT_CHART: &[SeedAccount] = &[
    root("1000", "Assets", AccountType::Asset),
    leaf("1100", "Cash in Hand", AccountType::Asset, None, "1000"),
    leaf("1200", "Bank Account", AccountType::Asset, None, "1000"),
    root("2000", "Liabilities", AccountType::Liability),
    leaf("2100", "Payables", AccountType::Liability, None, "2000"),
    root("3000", "Funds", AccountType::Equity),
    leaf("3100", "General Fund", AccountType::Equity, Some(FundType::General), "3000"),
    leaf("3200", "Zakat Fund", AccountType::Equity, Some(FundType::Zakat), "3000"),
    leaf("3300", "Construction Fund", AccountType::Equity, Some(FundType::Construction), "3000"),
    root("4000", "Income", AccountType::Income),
    leaf("4100", "Donation - General", AccountType::Income, Some(FundType::General), "4000"),
    leaf("4200", "Donation - Zakat", AccountType::Income, Some(FundType::Zakat), "4000"),
    leaf("4300", "Donation - Sadaqah", AccountType::Income, Some(FundType::Sadaqah), "4000"),
    leaf("4400", "Construction Donations", AccountType::Income, Some(FundType::Construction), "4000"),
    leaf("4500", "Membership Fees", AccountType::Income, None, "4000"),
    root("5000", "Expenses", AccountType::Expense),
    leaf("5100", "Salaries", AccountType::Expense, None, "5000"),
    leaf("5200", "Electricity", AccountType::Expense, None, "5000"),
    leaf("5300", "Repairs & Maintenance", AccountType::Expense, None, "5000"),
    leaf("5400", "Rent", AccountType::Expense, None, "5000"),
    leaf("5500", "Miscellaneous Expense", AccountType::Expense, None, "5000"),
    leaf("5600", "Zakat Disbursement", AccountType::Expense, Some(FundType::Zakat), "5000"),
];

/// Looks up a seed ledger by code.
#[must_use]
pub fn seed_account(code: &str) -> Option<&'static SeedAccount> {
    DEFAULT_CHART.iter().find(|a| a.code == code)
}
