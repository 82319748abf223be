//! Chart-of-accounts tree helpers.

use std::collections::{HashMap, HashSet};

use mizan_shared::types::LedgerId;
use rust_decimal::Decimal;
use serde::Serialize;

use super::balance::{ChartBalances, children_index};
use super::error::LedgerError;
use super::types::Account;

/// An account with its computed balance and children, for hierarchical listings.
#[derive(Debug, Clone, Serialize)]
pub struct AccountNode {
    /// The account.
    #[serde(flatten)]
    pub account: Account,
    /// Rolled-up balance.
    pub balance: Decimal,
    /// Child accounts ordered by code.
    pub children: Vec<AccountNode>,
}

/// Builds the account forest ordered by code.
///
/// Accounts whose parent is absent from `accounts` (e.g. filtered out) become roots.
/// The walk uses an explicit stack, so chart depth is bounded by memory only.
#[must_use]
pub fn build_tree(accounts: &[Account], balances: &ChartBalances) -> Vec<AccountNode> {
    let by_id: HashMap<LedgerId, &Account> = accounts.iter().map(|a| (a.id, a)).collect();
    let children = children_index(accounts);

    let mut roots: Vec<&Account> = accounts
        .iter()
        .filter(|a| a.parent_id.is_none_or(|p| !by_id.contains_key(&p)))
        .collect();
    roots.sort_by(|a, b| b.code.cmp(&a.code));

    // Pre-order, smallest code first.
    let mut order: Vec<(&Account, Option<LedgerId>)> = Vec::with_capacity(accounts.len());
    let mut visited = HashSet::new();
    let mut stack: Vec<(&Account, Option<LedgerId>)> = roots.into_iter().map(|r| (r, None)).collect();
    while let Some((account, parent)) = stack.pop() {
        if !visited.insert(account.id) {
            continue;
        }
        order.push((account, parent));
        let mut kids: Vec<&Account> = children
            .get(&account.id)
            .into_iter()
            .flatten()
            .filter_map(|id| by_id.get(id).copied())
            .collect();
        kids.sort_by(|a, b| b.code.cmp(&a.code));
        stack.extend(kids.into_iter().map(|kid| (kid, Some(account.id))));
    }

    // Reverse pre-order sees every child before its parent.
    let mut pending: HashMap<LedgerId, Vec<AccountNode>> = HashMap::new();
    let mut forest = Vec::new();
    for (account, parent) in order.into_iter().rev() {
        let mut kids = pending.remove(&account.id).unwrap_or_default();
        kids.reverse();
        let node = AccountNode {
            account: account.clone(),
            balance: balances.balance(account.id),
            children: kids,
        };
        match parent {
            Some(parent) => pending.entry(parent).or_default().push(node),
            None => forest.push(node),
        }
    }
    forest.reverse();
    forest
}

/// Deepest level an account may sit at; roots are level 1.
const MAX_ACCOUNT_DEPTH: usize = 32;

/// Checks that `account_id` may be placed under `new_parent`.
///
/// # Errors
///
/// Returns `AccountNotFound` if the parent does not exist, `AccountInactive`
/// if it is deactivated, `HierarchyCycle` if the parent is the account
/// itself or one of its descendants, and `HierarchyTooDeep` if the account
/// or its subtree would sit deeper than 32 levels.
pub fn validate_parent(
    accounts: &[Account],
    account_id: Option<LedgerId>,
    new_parent: LedgerId,
) -> Result<(), LedgerError> {
    let by_id: HashMap<LedgerId, &Account> = accounts.iter().map(|a| (a.id, a)).collect();
    let parent = by_id
        .get(&new_parent)
        .ok_or(LedgerError::AccountNotFound(new_parent))?;
    if !parent.is_active {
        return Err(LedgerError::AccountInactive(new_parent));
    }

    // Walk up from the proposed parent; meeting the account means a cycle.
    let mut seen = HashSet::new();
    let mut cursor = Some(new_parent);
    while let Some(id) = cursor {
        if Some(id) == account_id || !seen.insert(id) {
            return Err(LedgerError::HierarchyCycle(account_id.unwrap_or(id)));
        }
        cursor = by_id.get(&id).and_then(|a| a.parent_id);
    }

    let parent_level = seen.len();
    let height = account_id.map_or(1, |id| subtree_height(accounts, id));
    if parent_level + height > MAX_ACCOUNT_DEPTH {
        return Err(LedgerError::HierarchyTooDeep {
            max: MAX_ACCOUNT_DEPTH,
        });
    }
    Ok(())
}

/// Levels in the subtree rooted at `root`, counting `root` itself.
fn subtree_height(accounts: &[Account], root: LedgerId) -> usize {
    let children = children_index(accounts);
    let mut seen = HashSet::from([root]);
    let mut level = vec![root];
    let mut height = 0;
    while !level.is_empty() {
        height += 1;
        level = level
            .iter()
            .filter_map(|id| children.get(id))
            .flatten()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();
    }
    height
}

/// True if the account has at least one child (active or not).
#[must_use]
pub fn has_children(accounts: &[Account], account_id: LedgerId) -> bool {
    accounts.iter().any(|a| a.parent_id == Some(account_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::balance::PostingTotals;
    use crate::ledger::types::AccountType;
    use rust_decimal_macros::dec;

    fn account(code: &str, parent: Option<LedgerId>) -> Account {
        Account {
            id: LedgerId::new(),
            code: code.to_string(),
            name: code.to_string(),
            account_type: AccountType::Asset,
            fund_type: None,
            parent_id: parent,
            is_system: false,
            is_active: true,
        }
    }

    #[test]
    fn test_build_tree_orders_by_code() {
        let root = account("1000", None);
        let bank = account("1200", Some(root.id));
        let cash = account("1100", Some(root.id));
        let other = account("0500", None);
        let accounts = vec![bank.clone(), root.clone(), cash.clone(), other.clone()];

        let mut postings = HashMap::new();
        postings.insert(cash.id, PostingTotals::new(dec!(300), dec!(0)));
        let balances = ChartBalances::compute(&accounts, &postings).unwrap();
        let tree = build_tree(&accounts, &balances);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].account.code, "0500");
        assert_eq!(tree[1].account.code, "1000");
        assert_eq!(tree[1].balance, dec!(300));
        let codes: Vec<_> = tree[1].children.iter().map(|c| c.account.code.as_str()).collect();
        assert_eq!(codes, vec!["1100", "1200"]);
    }

    #[test]
    fn test_orphans_become_roots() {
        let orphan = account("1100", Some(LedgerId::new()));
        let balances = ChartBalances::compute(std::slice::from_ref(&orphan), &HashMap::new()).unwrap();
        let tree = build_tree(&[orphan], &balances);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_build_tree_handles_deep_chains() {
        let mut accounts = vec![account("1", None)];
        for i in 0..1_000 {
            let parent = accounts[i].id;
            accounts.push(account(&format!("1.{i}"), Some(parent)));
        }
        let leaf = accounts[1_000].id;
        let mut postings = HashMap::new();
        postings.insert(leaf, PostingTotals::new(dec!(10), dec!(0)));
        let balances = ChartBalances::compute(&accounts, &postings).unwrap();

        let tree = build_tree(&accounts, &balances);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].balance, dec!(10));

        let mut depth = 0;
        let mut cursor = &tree[0];
        while let Some(next) = cursor.children.first() {
            assert_eq!(cursor.children.len(), 1);
            depth += 1;
            cursor = next;
        }
        assert_eq!(depth, 1_000);
        assert_eq!(cursor.account.id, leaf);
    }

    #[test]
    fn test_validate_parent_rejects_descendant() {
        let root = account("1000", None);
        let child = account("1100", Some(root.id));
        let grandchild = account("1110", Some(child.id));
        let accounts = vec![root.clone(), child.clone(), grandchild.clone()];

        assert!(matches!(
            validate_parent(&accounts, Some(root.id), grandchild.id),
            Err(LedgerError::HierarchyCycle(_))
        ));
        assert!(matches!(
            validate_parent(&accounts, Some(root.id), root.id),
            Err(LedgerError::HierarchyCycle(_))
        ));
        assert!(validate_parent(&accounts, Some(grandchild.id), root.id).is_ok());
        assert!(validate_parent(&accounts, None, child.id).is_ok());
    }

    #[test]
    fn test_validate_parent_caps_depth() {
        let mut chain = vec![account("1", None)];
        for i in 1..MAX_ACCOUNT_DEPTH {
            let parent = chain[i - 1].id;
            chain.push(account(&format!("1.{i}"), Some(parent)));
        }
        let deepest = chain[MAX_ACCOUNT_DEPTH - 1].id;
        let above = chain[MAX_ACCOUNT_DEPTH - 2].id;

        assert!(validate_parent(&chain, None, above).is_ok());
        assert!(matches!(
            validate_parent(&chain, None, deepest),
            Err(LedgerError::HierarchyTooDeep { max: MAX_ACCOUNT_DEPTH })
        ));

        // A two-level subtree moved under the second-deepest level overflows.
        let top = account("2000", None);
        let below = account("2100", Some(top.id));
        let mut accounts = chain.clone();
        accounts.extend([top.clone(), below]);
        assert!(matches!(
            validate_parent(&accounts, Some(top.id), above),
            Err(LedgerError::HierarchyTooDeep { .. })
        ));
        assert!(validate_parent(&accounts, Some(top.id), chain[0].id).is_ok());
    }

    #[test]
    fn test_validate_parent_requires_active_existing_parent() {
        let mut inactive = account("2000", None);
        inactive.is_active = false;
        let accounts = vec![inactive.clone()];
        assert!(matches!(
            validate_parent(&accounts, None, inactive.id),
            Err(LedgerError::AccountInactive(_))
        ));
        assert!(matches!(
            validate_parent(&accounts, None, LedgerId::new()),
            Err(LedgerError::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_has_children() {
        let root = account("1000", None);
        let child = account("1100", Some(root.id));
        let accounts = vec![root.clone(), child.clone()];
        assert!(has_children(&accounts, root.id));
        assert!(!has_children(&accounts, child.id));
    }
}
