//! Credit-card payment amount assessment
//!
//! Checks a proposed payment amount against the funding account and the
//! target card, producing errors that block the payment, warnings the
//! caller may override, and an ordered list of suggested amounts.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{CreditCard, Money};

/// Findings that block a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "camelCase")]
pub enum PaymentError {
    /// The amount must be strictly positive
    AmountNotPositive,
    /// The amount exceeds the funding account's balance
    #[serde(rename_all = "camelCase")]
    InsufficientFunds { requested: Money, available: Money },
}

impl fmt::Display for PaymentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmountNotPositive => write!(f, "Payment amount must be positive"),
            Self::InsufficientFunds {
                requested,
                available,
            } => write!(
                f,
                "Insufficient funds: requested {}, available {}",
                requested, available
            ),
        }
    }
}

/// Findings the caller may proceed past
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "camelCase")]
pub enum PaymentWarning {
    /// The amount exceeds the card's outstanding debt
    #[serde(rename_all = "camelCase")]
    Overpayment { surplus: Money },
    /// The card carries no debt to pay down
    AlreadyZero,
}

impl fmt::Display for PaymentWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overpayment { surplus } => {
                write!(f, "Payment exceeds the card balance by {}", surplus)
            }
            Self::AlreadyZero => write!(f, "The card balance is already zero"),
        }
    }
}

/// Which rule produced a suggested amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SuggestionKind {
    /// The issuer's minimum payment
    Minimum,
    /// Twice the minimum, capped by debt and available funds
    Suggested,
    /// The full outstanding debt
    Full,
    /// Everything the funding account can afford
    Affordable,
}

/// A suggested payment amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSuggestion {
    pub kind: SuggestionKind,
    pub amount: Money,
}

/// Full assessment of a proposed credit-card payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentAssessment {
    pub errors: Vec<PaymentError>,
    pub warnings: Vec<PaymentWarning>,
    pub suggestions: Vec<PaymentSuggestion>,
    /// One-line summary of the situation for the presentation layer
    pub info: String,
}

impl PaymentAssessment {
    /// Whether the payment may proceed
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Assess a proposed payment of `amount` from an account holding
/// `funding_balance` against `card`
///
/// Suggestions are ordered Minimum, Suggested, Full, Affordable; each is
/// omitted when it is not strictly useful (unaffordable, redundant with an
/// earlier suggestion, or pointless because the debt is smaller).
pub fn assess_credit_card_payment(
    amount: Money,
    funding_balance: Money,
    card: &CreditCard,
) -> PaymentAssessment {
    let debt = card.balance;
    let available = funding_balance;

    let mut errors = Vec::new();
    if !amount.is_positive() {
        errors.push(PaymentError::AmountNotPositive);
    }
    if amount > available {
        errors.push(PaymentError::InsufficientFunds {
            requested: amount,
            available,
        });
    }

    let mut warnings = Vec::new();
    if !debt.is_positive() {
        warnings.push(PaymentWarning::AlreadyZero);
    } else if amount > debt {
        warnings.push(PaymentWarning::Overpayment {
            surplus: amount - debt,
        });
    }

    let suggestions = suggest_amounts(card.minimum_payment, debt, available);

    let info = format!(
        "Card {} owes {}; funding account holds {}",
        card.name, debt, available
    );

    PaymentAssessment {
        errors,
        warnings,
        suggestions,
        info,
    }
}

fn suggest_amounts(minimum: Money, debt: Money, available: Money) -> Vec<PaymentSuggestion> {
    let mut suggestions: Vec<PaymentSuggestion> = Vec::new();

    if !debt.is_positive() || !available.is_positive() {
        return suggestions;
    }

    let mut push_unique = |kind: SuggestionKind, amount: Money| {
        if amount.is_positive() && !suggestions.iter().any(|s| s.amount == amount) {
            suggestions.push(PaymentSuggestion { kind, amount });
        }
    };

    // Minimum: only when affordable and not larger than the debt itself
    if minimum.is_positive() && minimum <= available && minimum <= debt {
        push_unique(SuggestionKind::Minimum, minimum);
    }

    // Suggested: twice the minimum, capped by debt and available funds
    if minimum.is_positive() {
        let suggested = (minimum * 2).min(debt).min(available);
        push_unique(SuggestionKind::Suggested, suggested);
    }

    // Full payoff, when affordable
    if debt <= available {
        push_unique(SuggestionKind::Full, debt);
    }

    // Affordable: everything on hand, only useful when the debt cannot be
    // cleared outright
    if available < debt {
        push_unique(SuggestionKind::Affordable, available);
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreditCardId;

    fn card(balance_cents: i64, minimum_cents: i64) -> CreditCard {
        let mut c = CreditCard::new(CreditCardId::new(1), "Visa", Money::from_major(5000));
        c.balance = Money::from_cents(balance_cents);
        c.minimum_payment = Money::from_cents(minimum_cents);
        c
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let a = assess_credit_card_payment(Money::zero(), Money::from_major(100), &card(5000, 0));
        assert!(!a.ok());
        assert!(a.errors.contains(&PaymentError::AmountNotPositive));
    }

    #[test]
    fn test_insufficient_funds_blocks() {
        let a = assess_credit_card_payment(
            Money::from_major(100),
            Money::from_major(50),
            &card(10_000, 0),
        );
        assert!(!a.ok());
        assert!(matches!(
            a.errors[0],
            PaymentError::InsufficientFunds { .. }
        ));
    }

    #[test]
    fn test_overpayment_warns_but_allows() {
        // Card owes 100, paying 150 from an account holding 500
        let a = assess_credit_card_payment(
            Money::from_major(150),
            Money::from_major(500),
            &card(10_000, 0),
        );
        assert!(a.ok());
        assert_eq!(
            a.warnings,
            vec![PaymentWarning::Overpayment {
                surplus: Money::from_major(50)
            }]
        );
    }

    #[test]
    fn test_already_zero_warning() {
        let a = assess_credit_card_payment(
            Money::from_major(25),
            Money::from_major(500),
            &card(0, 0),
        );
        assert!(a.ok());
        assert_eq!(a.warnings, vec![PaymentWarning::AlreadyZero]);
        assert!(a.suggestions.is_empty());
    }

    #[test]
    fn test_suggestions_full_spread() {
        // debt 600, minimum 35, available 1000
        let a = assess_credit_card_payment(
            Money::from_major(100),
            Money::from_major(1000),
            &card(60_000, 3500),
        );
        let kinds: Vec<_> = a.suggestions.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SuggestionKind::Minimum,
                SuggestionKind::Suggested,
                SuggestionKind::Full
            ]
        );
        assert_eq!(a.suggestions[0].amount, Money::from_major(35));
        assert_eq!(a.suggestions[1].amount, Money::from_major(70));
        assert_eq!(a.suggestions[2].amount, Money::from_major(600));
        // Affordable is omitted because the full debt is affordable
        assert!(!kinds.contains(&SuggestionKind::Affordable));
    }

    #[test]
    fn test_minimum_omitted_when_unaffordable() {
        // minimum 35 but only 20 available
        let a = assess_credit_card_payment(
            Money::from_major(10),
            Money::from_major(20),
            &card(60_000, 3500),
        );
        let kinds: Vec<_> = a.suggestions.iter().map(|s| s.kind).collect();
        assert!(!kinds.contains(&SuggestionKind::Minimum));
        // Suggested collapses to the affordable cap; Affordable would then
        // duplicate it and is dropped
        assert_eq!(
            a.suggestions,
            vec![PaymentSuggestion {
                kind: SuggestionKind::Suggested,
                amount: Money::from_major(20)
            }]
        );
    }

    #[test]
    fn test_full_omitted_when_equal_to_minimum() {
        // minimum 50 == debt 50: the minimum already clears the debt, so
        // Suggested and Full collapse into it
        let a = assess_credit_card_payment(
            Money::from_major(50),
            Money::from_major(500),
            &card(5000, 5000),
        );
        assert_eq!(
            a.suggestions,
            vec![PaymentSuggestion {
                kind: SuggestionKind::Minimum,
                amount: Money::from_major(50)
            }]
        );
    }

    #[test]
    fn test_affordable_when_debt_unreachable() {
        // debt 600, available 200, no minimum on file
        let a = assess_credit_card_payment(
            Money::from_major(100),
            Money::from_major(200),
            &card(60_000, 0),
        );
        assert_eq!(
            a.suggestions,
            vec![PaymentSuggestion {
                kind: SuggestionKind::Affordable,
                amount: Money::from_major(200)
            }]
        );
    }

    #[test]
    fn test_assessment_is_pure() {
        let c = card(60_000, 3500);
        let a1 = assess_credit_card_payment(Money::from_major(100), Money::from_major(1000), &c);
        let a2 = assess_credit_card_payment(Money::from_major(100), Money::from_major(1000), &c);
        assert_eq!(a1, a2);
    }
}
