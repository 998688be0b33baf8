//! Debt-payoff amortization
//!
//! Iterates monthly interest and principal until the balance clears, the
//! payment proves too small to cover interest, or the 50-year ceiling is
//! hit.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::Money;

/// Iteration ceiling: 50 years of monthly payments
pub const MAX_MONTHS: u32 = 600;

/// Balance below which the debt counts as cleared
const SETTLED_EPSILON: f64 = 0.01;

/// A successful amortization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffPlan {
    /// Months until the balance clears
    pub months: u32,
    /// Interest paid over the whole schedule
    pub total_interest: Money,
    /// Initial balance plus total interest
    pub total_cost: Money,
    /// Today plus `months`
    pub payoff_date: NaiveDate,
}

/// Why an amortization cannot complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PayoffFailure {
    /// The monthly payment does not even cover the interest
    PaymentBelowInterest,
    /// The balance survives 600 months of payments
    HorizonExceeded,
}

impl std::fmt::Display for PayoffFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PaymentBelowInterest => {
                write!(f, "Monthly payment does not cover the interest")
            }
            Self::HorizonExceeded => write!(f, "Debt is not paid off within 50 years"),
        }
    }
}

/// Amortize `balance` at `annual_rate` percent with a fixed monthly payment
pub fn calculate_debt_payoff(
    balance: Money,
    monthly_payment: Money,
    annual_rate: f64,
    today: NaiveDate,
) -> Result<PayoffPlan, PayoffFailure> {
    let initial = balance.to_f64();
    if initial <= 0.0 {
        return Ok(PayoffPlan {
            months: 0,
            total_interest: Money::zero(),
            total_cost: balance.max_zero(),
            payoff_date: today,
        });
    }

    let monthly_rate = annual_rate / 100.0 / 12.0;
    let payment = monthly_payment.to_f64();

    let mut remaining = initial;
    let mut total_interest = 0.0;
    let mut months: u32 = 0;

    while remaining > SETTLED_EPSILON {
        if months >= MAX_MONTHS {
            return Err(PayoffFailure::HorizonExceeded);
        }

        let interest = remaining * monthly_rate;
        let principal = (payment - interest).min(remaining);
        if principal <= 0.0 {
            return Err(PayoffFailure::PaymentBelowInterest);
        }

        remaining -= principal;
        total_interest += interest;
        months += 1;
    }

    let total_interest = Money::from_f64(total_interest).unwrap_or_default();
    Ok(PayoffPlan {
        months,
        total_interest,
        total_cost: balance + total_interest,
        payoff_date: today
            .checked_add_months(Months::new(months))
            .unwrap_or(today),
    })
}
