//! Fixed-expense service
//!
//! Expense CRUD with payment-source validation, the sorted/filtered
//! listing used by the expense table, and generation of the auto-created
//! minimum-payment expenses for credit cards.

use chrono::NaiveDate;

use crate::audit::AuditEntry;
use crate::error::{DigibookError, DigibookResult};
use crate::models::{
    normalize_name, AccountId, CreditCardId, ExpenseId, FixedExpense, Money, PaymentSource,
    CREDIT_CARD_PAYMENT,
};
use crate::storage::Store;
use crate::validation::{validate_payment_source, PaymentSourceInput};

/// Input for creating a fixed expense
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    pub name: String,
    pub amount: Money,
    pub category: String,
    pub due_date: Option<NaiveDate>,
    pub source: PaymentSourceInput,
}

/// Status facet of the expense listing filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Paid,
    Unpaid,
    /// Unpaid and due before today
    Overdue,
}

/// Composable filter for the expense listing
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Case-insensitive category match
    pub category: Option<String>,
    /// Paid / unpaid / overdue facet
    pub status: Option<StatusFilter>,
    /// Match expenses whose source references this account
    pub account_id: Option<AccountId>,
    /// Case-insensitive substring over name and category
    pub search: Option<String>,
}

impl ExpenseFilter {
    /// Create an empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by category
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Filter by payment status
    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter by funding account
    pub fn account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// Substring search over name and category
    pub fn search(mut self, needle: impl Into<String>) -> Self {
        self.search = Some(needle.into());
        self
    }

    fn matches(&self, expense: &FixedExpense, today: NaiveDate) -> bool {
        if let Some(category) = &self.category {
            if normalize_name(&expense.category) != normalize_name(category) {
                return false;
            }
        }
        if let Some(status) = self.status {
            let keep = match status {
                StatusFilter::Paid => expense.is_paid(),
                StatusFilter::Unpaid => !expense.is_paid(),
                StatusFilter::Overdue => {
                    !expense.is_paid() && expense.due_date.is_some_and(|d| d < today)
                }
            };
            if !keep {
                return false;
            }
        }
        if let Some(account_id) = self.account_id {
            if expense.payment_source.funding_account() != Some(account_id) {
                return false;
            }
        }
        if let Some(needle) = &self.search {
            let needle = needle.to_lowercase();
            let in_name = expense.name.to_lowercase().contains(&needle);
            let in_category = expense.category.to_lowercase().contains(&needle);
            if !in_name && !in_category {
                return false;
            }
        }
        true
    }
}

/// Service for fixed-expense management
pub struct ExpenseService<'a> {
    store: &'a Store,
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Create an expense
    ///
    /// The payment source is assembled and checked against the category,
    /// every referenced entity must resolve, and the category must exist.
    pub fn create(&self, input: CreateExpenseInput) -> DigibookResult<FixedExpense> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(DigibookError::Validation("Expense name cannot be empty".into()));
        }
        if !input.amount.is_positive() {
            return Err(DigibookError::Validation(
                "Expense amount must be positive".into(),
            ));
        }

        let source = validate_payment_source(&input.category, &input.source)
            .map_err(|e| DigibookError::InvalidPaymentSource(e.to_string()))?;

        self.store.transaction(|db| {
            if db.category_by_name(&input.category).is_none() {
                return Err(DigibookError::category_not_found(input.category.clone()));
            }
            if let Some(account_id) = source.funding_account() {
                if db.account(account_id).is_none() {
                    return Err(DigibookError::account_not_found(account_id.to_string()));
                }
            }
            if let Some(card_id) = source.card() {
                if db.credit_card(card_id).is_none() {
                    return Err(DigibookError::credit_card_not_found(card_id.to_string()));
                }
            }

            let id = db.next_expense_id();
            let mut expense =
                FixedExpense::new(id, name.clone(), input.amount, input.category.clone(), source);
            expense.due_date = input.due_date;
            db.fixed_expenses.push(expense.clone());

            db.append_audit(AuditEntry::created(id.to_string(), &expense).with_description(name.clone()));
            Ok(expense)
        })
    }

    /// Get an expense by id
    pub fn get(&self, id: ExpenseId) -> DigibookResult<Option<FixedExpense>> {
        self.store.read(|db| db.expense(id).cloned())
    }

    /// Delete an expense
    pub fn delete(&self, id: ExpenseId) -> DigibookResult<FixedExpense> {
        self.store.transaction(|db| {
            let removed = db
                .remove_expense(id)
                .ok_or_else(|| DigibookError::expense_not_found(id.to_string()))?;
            db.append_audit(
                AuditEntry::deleted(id.to_string(), &removed)
                    .with_description(removed.name.clone()),
            );
            Ok(removed)
        })
    }

    /// List expenses matching `filter`, sorted by due date ascending with
    /// missing due dates last, ties broken by name
    pub fn list(&self, filter: &ExpenseFilter, today: NaiveDate) -> DigibookResult<Vec<FixedExpense>> {
        self.store.read(|db| {
            let mut expenses: Vec<FixedExpense> = db
                .fixed_expenses
                .iter()
                .filter(|e| filter.matches(e, today))
                .cloned()
                .collect();
            sort_expenses(&mut expenses);
            expenses
        })
    }

    /// Create the missing auto-generated minimum-payment expenses
    ///
    /// For every card with a positive minimum payment, when no unpaid
    /// auto-created expense targets the card, an expense
    /// "<card> Minimum Payment" is created in the Credit Card Payment
    /// category, funded from the default account and due on the card's due
    /// date. Returns the expenses created by this pass.
    pub fn ensure_minimum_payment_expenses(&self) -> DigibookResult<Vec<FixedExpense>> {
        self.store.transaction(|db| {
            let Some(default_account) = db.default_account().map(|a| a.id) else {
                // Nothing to fund the payments from yet
                return Ok(Vec::new());
            };

            let covered: Vec<CreditCardId> = db
                .fixed_expenses
                .iter()
                .filter(|e| e.is_auto_created && !e.is_paid())
                .filter_map(|e| e.payment_source.card())
                .collect();

            let wanted: Vec<(CreditCardId, String, Money, Option<NaiveDate>)> = db
                .credit_cards
                .iter()
                .filter(|card| card.minimum_payment.is_positive())
                .filter(|card| !covered.contains(&card.id))
                .map(|card| {
                    (
                        card.id,
                        card.name.clone(),
                        card.minimum_payment,
                        card.due_date,
                    )
                })
                .collect();

            let mut created = Vec::new();
            for (card_id, card_name, minimum, due_date) in wanted {
                let id = db.next_expense_id();
                let mut expense = FixedExpense::new(
                    id,
                    format!("{} Minimum Payment", card_name),
                    minimum,
                    CREDIT_CARD_PAYMENT,
                    PaymentSource::CreditCardPayment {
                        account_id: default_account,
                        target_credit_card_id: card_id,
                    },
                );
                expense.due_date = due_date;
                expense.is_auto_created = true;
                db.fixed_expenses.push(expense.clone());
                db.append_audit(
                    AuditEntry::created(id.to_string(), &expense)
                        .with_description(expense.name.clone()),
                );
                created.push(expense);
            }
            Ok(created)
        })
    }
}

/// Sort for the expense listing: due date ascending, missing dates last,
/// name breaks ties
pub fn sort_expenses(expenses: &mut [FixedExpense]) {
    expenses.sort_by(|a, b| match (a.due_date, b.due_date) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.name.cmp(&b.name)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.name.cmp(&b.name),
    });
}
