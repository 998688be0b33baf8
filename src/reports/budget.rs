//! Budget-vs-actual and overpayment analytics
//!
//! Pure folds over the expense list: overall totals, per-expense
//! overpayment percentages, and the per-category overpayment rollup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{FixedExpense, Money};

/// Overpayments above this share of the budget are significant
pub const SIGNIFICANT_OVERPAYMENT_PERCENT: f64 = 20.0;

/// Whole-ledger budget summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub total_budget: Money,
    pub total_actual: Money,
    pub total_overpayment: Money,
    /// `total_actual / total_budget * 100`; zero when nothing is budgeted
    pub budget_accuracy: f64,
}

/// Per-category overpayment rollup row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOverpayment {
    pub category: String,
    pub count: usize,
    pub significant_count: usize,
    pub total_budget: Money,
    pub total_actual: Money,
    pub total_overpayment: Money,
    /// Overpayment as a share of the category budget, in percent
    pub overpayment_percentage: f64,
}

/// Amount paid beyond the budget; zero when under budget
pub fn overpayment(expense: &FixedExpense) -> Money {
    (expense.paid_amount - expense.amount).max_zero()
}

/// Overpayment as a percentage of the budgeted amount
pub fn overpayment_percentage(expense: &FixedExpense) -> f64 {
    if !expense.amount.is_positive() {
        return 0.0;
    }
    (expense.paid_amount - expense.amount).to_f64() / expense.amount.to_f64() * 100.0
}

/// Whether the expense is overpaid by more than 20%
pub fn significant_overpayment(expense: &FixedExpense) -> bool {
    overpayment_percentage(expense) > SIGNIFICANT_OVERPAYMENT_PERCENT
}

/// Fold the whole expense list into the budget summary
pub fn budget_summary(expenses: &[FixedExpense]) -> BudgetSummary {
    let total_budget: Money = expenses.iter().map(|e| e.amount).sum();
    let total_actual: Money = expenses.iter().map(|e| e.paid_amount).sum();
    let total_overpayment: Money = expenses.iter().map(overpayment).sum();

    let budget_accuracy = if total_budget.is_positive() {
        total_actual.to_f64() / total_budget.to_f64() * 100.0
    } else {
        0.0
    };

    BudgetSummary {
        total_budget,
        total_actual,
        total_overpayment,
        budget_accuracy,
    }
}

/// Group the per-expense overpayments by category
///
/// Rows come back ordered by total overpayment, largest first.
pub fn overpayment_by_category(expenses: &[FixedExpense]) -> Vec<CategoryOverpayment> {
    let mut groups: BTreeMap<String, Vec<&FixedExpense>> = BTreeMap::new();
    for expense in expenses {
        groups
            .entry(expense.category.clone())
            .or_default()
            .push(expense);
    }

    let mut rows: Vec<CategoryOverpayment> = groups
        .into_iter()
        .map(|(category, members)| {
            let total_budget: Money = members.iter().map(|e| e.amount).sum();
            let total_actual: Money = members.iter().map(|e| e.paid_amount).sum();
            let total_overpayment: Money = members.iter().map(|e| overpayment(e)).sum();
            let overpayment_percentage = if total_budget.is_positive() {
                total_overpayment.to_f64() / total_budget.to_f64() * 100.0
            } else {
                0.0
            };
            CategoryOverpayment {
                category,
                count: members.len(),
                significant_count: members
                    .iter()
                    .filter(|e| significant_overpayment(e))
                    .count(),
                total_budget,
                total_actual,
                total_overpayment,
                overpayment_percentage,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.total_overpayment.cmp(&a.total_overpayment));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, ExpenseId, PaymentSource};

    fn expense(id: u64, category: &str, amount_cents: i64, paid_cents: i64) -> FixedExpense {
        let mut e = FixedExpense::new(
            ExpenseId::new(id),
            format!("E{}", id),
            Money::from_cents(amount_cents),
            category,
            PaymentSource::Account {
                account_id: AccountId::new(1),
            },
        );
        e.paid_amount = Money::from_cents(paid_cents);
        e.refresh_status();
        e
    }

    #[test]
    fn test_overpayment_clamps_at_zero() {
        assert_eq!(
            overpayment(&expense(1, "Housing", 10_000, 12_000)),
            Money::from_cents(2000)
        );
        assert_eq!(
            overpayment(&expense(2, "Housing", 10_000, 8000)),
            Money::zero()
        );
    }

    #[test]
    fn test_overpayment_percentage_and_significance() {
        // 25% over
        let over = expense(1, "Housing", 10_000, 12_500);
        assert!((overpayment_percentage(&over) - 25.0).abs() < 1e-9);
        assert!(significant_overpayment(&over));

        // Exactly 20% is not significant
        let edge = expense(2, "Housing", 10_000, 12_000);
        assert!(!significant_overpayment(&edge));

        // Underpaid reads negative
        let under = expense(3, "Housing", 10_000, 5000);
        assert!(overpayment_percentage(&under) < 0.0);
    }

    #[test]
    fn test_budget_summary() {
        let expenses = vec![
            expense(1, "Housing", 100_000, 100_000),
            expense(2, "Utilities", 20_000, 25_000),
            expense(3, "Debt", 30_000, 0),
        ];
        let summary = budget_summary(&expenses);
        assert_eq!(summary.total_budget, Money::from_cents(150_000));
        assert_eq!(summary.total_actual, Money::from_cents(125_000));
        assert_eq!(summary.total_overpayment, Money::from_cents(5000));
        assert!((summary.budget_accuracy - 125_000.0 / 150_000.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_budget_summary_empty() {
        let summary = budget_summary(&[]);
        assert_eq!(summary.total_budget, Money::zero());
        assert_eq!(summary.budget_accuracy, 0.0);
    }

    #[test]
    fn test_overpayment_by_category() {
        let expenses = vec![
            expense(1, "Housing", 100_000, 130_000),
            expense(2, "Housing", 50_000, 50_000),
            expense(3, "Utilities", 20_000, 21_000),
        ];
        let rows = overpayment_by_category(&expenses);

        assert_eq!(rows.len(), 2);
        // Housing has the larger overpayment and sorts first
        assert_eq!(rows[0].category, "Housing");
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[0].significant_count, 1);
        assert_eq!(rows[0].total_overpayment, Money::from_cents(30_000));
        assert!((rows[0].overpayment_percentage - 20.0).abs() < 1e-9);

        assert_eq!(rows[1].category, "Utilities");
        assert_eq!(rows[1].total_overpayment, Money::from_cents(1000));
    }

    #[test]
    fn test_determinism() {
        let expenses = vec![
            expense(1, "Housing", 100_000, 130_000),
            expense(2, "Utilities", 20_000, 21_000),
        ];
        assert_eq!(budget_summary(&expenses), budget_summary(&expenses));
        assert_eq!(
            overpayment_by_category(&expenses),
            overpayment_by_category(&expenses)
        );
    }
}
