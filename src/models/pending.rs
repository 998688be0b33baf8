//! Pending transaction model
//!
//! A pending transaction is an expected movement on an account that has not
//! settled yet. Settling removes the row and applies the signed amount to
//! the account balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, PendingTransactionId};
use super::money::Money;

/// An unsettled transaction against an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingTransaction {
    /// Unique identifier
    pub id: PendingTransactionId,

    /// Account the transaction will settle against
    pub account_id: AccountId,

    /// Signed amount; negative is an outflow
    pub amount: Money,

    /// Category name
    pub category: String,

    /// Free-form description
    pub description: String,

    /// When the row was created
    pub created_at: DateTime<Utc>,
}

impl PendingTransaction {
    /// Create a new pending transaction
    pub fn new(
        id: PendingTransactionId,
        account_id: AccountId,
        amount: Money,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            account_id,
            amount,
            category: category.into(),
            description: description.into(),
            created_at: Utc::now(),
        }
    }

    /// Whether the transaction takes money out of the account
    pub fn is_outflow(&self) -> bool {
        self.amount.is_negative()
    }
}

impl fmt::Display for PendingTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.description, self.amount)
    }
}
