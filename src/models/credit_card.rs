//! Credit card model
//!
//! Tracks outstanding debt against a credit limit, the billing dates, and
//! the minimum payment used for auto-created payment reminders.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CreditCardId;
use super::money::Money;

/// A credit card
///
/// `balance` is the outstanding debt and normally stays within
/// `0..=credit_limit`. Over-limit balances are tolerated (reported as a
/// warning by callers), and credit balances from overpayment are kept
/// negative rather than clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCard {
    /// Unique identifier
    pub id: CreditCardId,

    /// Card name (e.g., "Sapphire")
    pub name: String,

    /// Outstanding debt
    pub balance: Money,

    /// Credit limit, strictly positive
    pub credit_limit: Money,

    /// Annual interest rate as a percentage (e.g., 24.99)
    pub interest_rate: f64,

    /// Day the payment is due
    pub due_date: Option<NaiveDate>,

    /// Statement closing date, if tracked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement_closing_date: Option<NaiveDate>,

    /// Minimum payment required by the issuer
    pub minimum_payment: Money,

    /// When the card was created
    pub created_at: DateTime<Utc>,
}

impl CreditCard {
    /// Create a new credit card with a zero balance
    pub fn new(id: CreditCardId, name: impl Into<String>, credit_limit: Money) -> Self {
        Self {
            id,
            name: name.into(),
            balance: Money::zero(),
            credit_limit,
            interest_rate: 0.0,
            due_date: None,
            statement_closing_date: None,
            minimum_payment: Money::zero(),
            created_at: Utc::now(),
        }
    }

    /// Remaining credit before the limit is hit; zero when over limit
    pub fn available_credit(&self) -> Money {
        (self.credit_limit - self.balance).max_zero()
    }

    /// Balance as a fraction of the limit, in percent
    pub fn utilization(&self) -> f64 {
        if self.credit_limit.is_zero() {
            return 0.0;
        }
        self.balance.to_f64() / self.credit_limit.to_f64() * 100.0
    }

    /// Whether the debt exceeds the credit limit
    pub fn is_over_limit(&self) -> bool {
        self.balance > self.credit_limit
    }
}

impl fmt::Display for CreditCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} of {})", self.name, self.balance, self.credit_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> CreditCard {
        let mut c = CreditCard::new(CreditCardId::new(1), "Visa", Money::from_major(5000));
        c.balance = Money::from_major(1250);
        c.interest_rate = 19.99;
        c.minimum_payment = Money::from_major(35);
        c
    }

    #[test]
    fn test_available_credit() {
        let c = card();
        assert_eq!(c.available_credit(), Money::from_major(3750));
    }

    #[test]
    fn test_available_credit_floors_at_zero() {
        let mut c = card();
        c.balance = Money::from_major(6000);
        assert_eq!(c.available_credit(), Money::zero());
        assert!(c.is_over_limit());
    }

    #[test]
    fn test_utilization() {
        let c = card();
        assert!((c.utilization() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut c = card();
        c.due_date = NaiveDate::from_ymd_opt(2026, 8, 15);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["creditLimit"], 500_000);
        assert_eq!(json["minimumPayment"], 3500);
        assert_eq!(json["dueDate"], "2026-08-15");

        let back: CreditCard = serde_json::from_value(json).unwrap();
        assert_eq!(back, c);
    }
}
