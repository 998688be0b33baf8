//! Derivations over ledger snapshots
//!
//! Every function here is a pure function of its inputs: identical
//! snapshots yield identical results, which is what makes the derived
//! values cacheable by input identity.

pub mod budget;
pub mod payoff;
pub mod projection;
pub mod schedule;

pub use budget::{
    budget_summary, overpayment, overpayment_by_category, overpayment_percentage,
    significant_overpayment, BudgetSummary, CategoryOverpayment,
    SIGNIFICANT_OVERPAYMENT_PERCENT,
};
pub use payoff::{calculate_debt_payoff, PayoffFailure, PayoffPlan, MAX_MONTHS};
pub use projection::{
    liquid_balance, net_worth, project_all, projected_balance, ProjectedBalance,
};
pub use schedule::{classify, ExpenseUrgency, PaycheckSchedule};
