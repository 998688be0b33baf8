//! Account model
//!
//! A checking or savings account with a signed current balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AccountId;
use super::money::Money;

/// Type of bank account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Checking account
    Checking,
    /// Savings account
    Savings,
}

impl AccountType {
    /// Parse an account type from a user-supplied string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "checking" => Some(Self::Checking),
            "savings" => Some(Self::Savings),
            _ => None,
        }
    }
}

impl Default for AccountType {
    fn default() -> Self {
        Self::Checking
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checking => write!(f, "Checking"),
            Self::Savings => write!(f, "Savings"),
        }
    }
}

/// A bank account
///
/// `current_balance` may go negative (overdraft); savings accounts are
/// expected to stay non-negative but this is not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,

    /// Account name (e.g., "Chase Checking")
    pub name: String,

    /// Type of account
    #[serde(rename = "type")]
    pub account_type: AccountType,

    /// Current balance, signed
    pub current_balance: Money,

    /// Whether this is the default account; exactly one account is the
    /// default whenever at least one account exists
    pub is_default: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account
    pub fn new(
        id: AccountId,
        name: impl Into<String>,
        account_type: AccountType,
        current_balance: Money,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            account_type,
            current_balance,
            is_default: false,
            created_at: Utc::now(),
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.account_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account() {
        let account = Account::new(
            AccountId::new(1),
            "Checking",
            AccountType::Checking,
            Money::from_major(500),
        );
        assert_eq!(account.name, "Checking");
        assert_eq!(account.current_balance.cents(), 50_000);
        assert!(!account.is_default);
    }

    #[test]
    fn test_account_type_parsing() {
        assert_eq!(AccountType::parse("checking"), Some(AccountType::Checking));
        assert_eq!(AccountType::parse(" SAVINGS "), Some(AccountType::Savings));
        assert_eq!(AccountType::parse("credit"), None);
    }

    #[test]
    fn test_display() {
        let account = Account::new(
            AccountId::new(2),
            "My Savings",
            AccountType::Savings,
            Money::zero(),
        );
        assert_eq!(format!("{}", account), "My Savings (Savings)");
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let account = Account::new(
            AccountId::new(3),
            "Test",
            AccountType::Checking,
            Money::from_cents(-250),
        );
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["type"], "checking");
        assert_eq!(json["currentBalance"], -250);
        assert_eq!(json["isDefault"], false);

        let back: Account = serde_json::from_value(json).unwrap();
        assert_eq!(back, account);
    }
}
