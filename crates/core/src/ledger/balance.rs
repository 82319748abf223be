//! Account balance calculations.
//!
//! Balances are derived, never stored:
//! - Asset/Expense: balance = Σdebit − Σcredit (debit-normal)
//! - Liability/Equity/Income: balance = Σcredit − Σdebit (credit-normal)
//!
//! A parent's balance is its own direct postings plus the rolled-up balances
//! of its children.

use std::collections::{HashMap, HashSet};

use mizan_shared::types::LedgerId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use super::types::{Account, AccountType, NormalBalance};

impl NormalBalance {
    /// Signed effect of a debit/credit pair on an account of this side.
    #[must_use]
    pub fn balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// Raw debit and credit sums of the lines posted directly to one ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PostingTotals {
    /// Σ debit_amount.
    pub debit: Decimal,
    /// Σ credit_amount.
    pub credit: Decimal,
}

impl PostingTotals {
    /// Creates totals.
    #[must_use]
    pub const fn new(debit: Decimal, credit: Decimal) -> Self {
        Self { debit, credit }
    }

    /// Adds one line.
    pub fn add(&mut self, debit: Decimal, credit: Decimal) {
        self.debit += debit;
        self.credit += credit;
    }

    /// Signed balance under the convention of `account_type`.
    #[must_use]
    pub fn signed(&self, account_type: AccountType) -> Decimal {
        account_type
            .normal_balance()
            .balance_change(self.debit, self.credit)
    }
}

/// Computed balance of one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account.
    pub ledger_id: LedgerId,
    /// Lines posted directly to this account.
    pub own: PostingTotals,
    /// Signed balance of the direct postings only.
    pub own_balance: Decimal,
    /// Own balance plus the rolled-up balance of every child.
    pub balance: Decimal,
}

/// Balances for a whole chart of accounts.
#[derive(Debug, Clone, Default)]
pub struct ChartBalances {
    balances: HashMap<LedgerId, AccountBalance>,
}

impl ChartBalances {
    /// Computes every account's balance from per-ledger posting totals.
    ///
    /// Accounts whose parent is not in `accounts` are treated as roots.
    /// Accounts without postings get exactly zero.
    ///
    /// # Errors
    ///
    /// Returns `HierarchyCycle` if the parent links contain a cycle.
    pub fn compute(
        accounts: &[Account],
        postings: &HashMap<LedgerId, PostingTotals>,
    ) -> Result<Self, LedgerError> {
        let by_id: HashMap<LedgerId, &Account> = accounts.iter().map(|a| (a.id, a)).collect();
        let children = children_index(accounts);

        let mut balances: HashMap<LedgerId, AccountBalance> = HashMap::with_capacity(accounts.len());
        let mut in_progress: HashSet<LedgerId> = HashSet::new();

        for account in accounts {
            if balances.contains_key(&account.id) {
                continue;
            }
            // Iterative post-order walk so deep charts cannot overflow the stack.
            let mut stack: Vec<(LedgerId, bool)> = vec![(account.id, false)];
            while let Some((id, expanded)) = stack.pop() {
                if balances.contains_key(&id) {
                    continue;
                }
                if expanded {
                    let node = by_id[&id];
                    let own = postings.get(&id).copied().unwrap_or_default();
                    let own_balance = own.signed(node.account_type);
                    let child_sum: Decimal = children
                        .get(&id)
                        .into_iter()
                        .flatten()
                        .filter_map(|c| balances.get(c))
                        .map(|b| b.balance)
                        .sum();
                    in_progress.remove(&id);
                    balances.insert(
                        id,
                        AccountBalance {
                            ledger_id: id,
                            own,
                            own_balance,
                            balance: own_balance + child_sum,
                        },
                    );
                    continue;
                }
                if !in_progress.insert(id) {
                    return Err(LedgerError::HierarchyCycle(id));
                }
                stack.push((id, true));
                for child in children.get(&id).into_iter().flatten() {
                    if in_progress.contains(child) {
                        return Err(LedgerError::HierarchyCycle(*child));
                    }
                    if !balances.contains_key(child) {
                        stack.push((*child, false));
                    }
                }
            }
        }

        // A cycle with no entry point from a root is never reached above.
        if balances.len() < accounts.len() {
            if let Some(stuck) = accounts.iter().find(|a| !balances.contains_key(&a.id)) {
                return Err(LedgerError::HierarchyCycle(stuck.id));
            }
        }

        Ok(Self { balances })
    }

    /// Balance of one account; zero for unknown accounts.
    #[must_use]
    pub fn balance(&self, id: LedgerId) -> Decimal {
        self.balances.get(&id).map_or(Decimal::ZERO, |b| b.balance)
    }

    /// Full balance record of one account.
    #[must_use]
    pub fn get(&self, id: LedgerId) -> Option<&AccountBalance> {
        self.balances.get(&id)
    }

    /// Number of accounts covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// True when no accounts were given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

/// parent id → child ids, in input order.
pub(crate) fn children_index(accounts: &[Account]) -> HashMap<LedgerId, Vec<LedgerId>> {
    let known: HashSet<LedgerId> = accounts.iter().map(|a| a.id).collect();
    let mut children: HashMap<LedgerId, Vec<LedgerId>> = HashMap::new();
    for account in accounts {
        if let Some(parent) = account.parent_id.filter(|p| known.contains(p)) {
            children.entry(parent).or_default().push(account.id);
        }
    }
    children
}
