//! Balance projections
//!
//! Pure folds over snapshots: projected per-account balances, liquid
//! balance, and net worth.

use serde::{Deserialize, Serialize};

use crate::models::{Account, AccountId, CreditCard, Money, PendingTransaction};

/// One account's projection row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedBalance {
    pub account_id: AccountId,
    pub current: Money,
    /// Signed sum of the account's pending transactions
    pub pending_total: Money,
    pub projected: Money,
}

/// Current balance plus the signed sum of the account's pending rows
pub fn projected_balance(account: &Account, pending: &[PendingTransaction]) -> Money {
    let pending_total: Money = pending
        .iter()
        .filter(|p| p.account_id == account.id)
        .map(|p| p.amount)
        .sum();
    account.current_balance + pending_total
}

/// Projection rows for every account
pub fn project_all(accounts: &[Account], pending: &[PendingTransaction]) -> Vec<ProjectedBalance> {
    accounts
        .iter()
        .map(|account| {
            let pending_total: Money = pending
                .iter()
                .filter(|p| p.account_id == account.id)
                .map(|p| p.amount)
                .sum();
            ProjectedBalance {
                account_id: account.id,
                current: account.current_balance,
                pending_total,
                projected: account.current_balance + pending_total,
            }
        })
        .collect()
}

/// Sum of all account balances
pub fn liquid_balance(accounts: &[Account]) -> Money {
    accounts.iter().map(|a| a.current_balance).sum()
}

/// Account balances minus card debt
pub fn net_worth(accounts: &[Account], cards: &[CreditCard]) -> Money {
    let debt: Money = cards.iter().map(|c| c.balance).sum();
    liquid_balance(accounts) - debt
}
