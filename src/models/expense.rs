//! Fixed expense model and the payment-source union
//!
//! A fixed expense is a recurring line item with a budgeted `amount` and a
//! running `paid_amount`. Its `PaymentSource` names the balances a payment
//! mutates: an account, a credit card, or the (account, card) pair used to
//! pay a card down.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::CREDIT_CARD_PAYMENT;
use super::ids::{AccountId, CreditCardId, ExpenseId};
use super::money::Money;

/// Where the money for an expense comes from (or goes to)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PaymentSource {
    /// Regular expense paid from a checking/savings account
    #[serde(rename_all = "camelCase")]
    Account { account_id: AccountId },

    /// Regular expense charged to a credit card
    #[serde(rename_all = "camelCase")]
    CreditCard { credit_card_id: CreditCardId },

    /// Credit-card payment: funds leave the account and pay down the card.
    /// Only valid for expenses in the "Credit Card Payment" category.
    #[serde(rename_all = "camelCase")]
    CreditCardPayment {
        account_id: AccountId,
        target_credit_card_id: CreditCardId,
    },
}

impl PaymentSource {
    /// The funding account, when one participates
    pub fn funding_account(&self) -> Option<AccountId> {
        match self {
            Self::Account { account_id } => Some(*account_id),
            Self::CreditCard { .. } => None,
            Self::CreditCardPayment { account_id, .. } => Some(*account_id),
        }
    }

    /// The credit card whose balance a payment mutates, when one participates
    pub fn card(&self) -> Option<CreditCardId> {
        match self {
            Self::Account { .. } => None,
            Self::CreditCard { credit_card_id } => Some(*credit_card_id),
            Self::CreditCardPayment {
                target_credit_card_id,
                ..
            } => Some(*target_credit_card_id),
        }
    }

    /// Whether this is the two-sided card-payment shape
    pub fn is_card_payment(&self) -> bool {
        matches!(self, Self::CreditCardPayment { .. })
    }
}

/// Payment progress of an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    /// Not yet fully paid
    Pending,
    /// `paid_amount` covers `amount`
    Paid,
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Paid => write!(f, "paid"),
        }
    }
}

/// A recurring ("fixed") expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedExpense {
    /// Unique identifier
    pub id: ExpenseId,

    /// Expense name (e.g., "Rent")
    pub name: String,

    /// Calendar due date; expenses without one sort last
    pub due_date: Option<NaiveDate>,

    /// Budgeted amount, strictly positive
    pub amount: Money,

    /// Amount paid so far
    pub paid_amount: Money,

    /// Derived payment status; kept in sync with `paid_amount`
    pub status: ExpenseStatus,

    /// Category name
    pub category: String,

    /// Where payments against this expense are drawn from
    pub payment_source: PaymentSource,

    /// True for the minimum-payment expenses generated from credit cards
    #[serde(default)]
    pub is_auto_created: bool,

    /// When the expense was created
    pub created_at: DateTime<Utc>,
}

impl FixedExpense {
    /// Create a new unpaid expense
    pub fn new(
        id: ExpenseId,
        name: impl Into<String>,
        amount: Money,
        category: impl Into<String>,
        payment_source: PaymentSource,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            due_date: None,
            amount,
            paid_amount: Money::zero(),
            status: ExpenseStatus::Pending,
            category: category.into(),
            payment_source,
            is_auto_created: false,
            created_at: Utc::now(),
        }
    }

    /// Amount still owed; never negative
    pub fn remaining(&self) -> Money {
        (self.amount - self.paid_amount).max_zero()
    }

    /// Whether the expense is fully paid
    pub fn is_paid(&self) -> bool {
        self.paid_amount >= self.amount
    }

    /// Recompute `status` from `paid_amount`
    pub fn refresh_status(&mut self) {
        self.status = if self.is_paid() {
            ExpenseStatus::Paid
        } else {
            ExpenseStatus::Pending
        };
    }

    /// Whether this expense's category designates a credit-card payment
    pub fn is_card_payment_category(&self) -> bool {
        self.category == CREDIT_CARD_PAYMENT
    }
}

impl fmt::Display for FixedExpense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} of {})", self.name, self.paid_amount, self.amount)
    }
}
