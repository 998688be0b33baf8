//! The payment engine
//!
//! Applies a payment delta against a fixed expense, mutating the balances
//! its payment source names, inside one store transaction. A credit-card
//! payment touches two balances; the funding account is always written
//! first so audit sequencing is reproducible, and the transaction boundary
//! makes the pair observationally atomic.

use crate::audit::{AuditEntry, AuditParticipant};
use crate::error::{DigibookError, DigibookResult};
use crate::models::{ExpenseId, Money, PaymentSource};
use crate::storage::Store;

/// Service that applies payments against fixed expenses
pub struct PaymentService<'a> {
    store: &'a Store,
}

impl<'a> PaymentService<'a> {
    /// Create a new payment service
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Set an expense's paid amount to `new_paid_amount`, applying the
    /// delta to the balances its payment source names
    ///
    /// The whole mutation is one store transaction: on any error nothing
    /// changes. A second call for the same expense while one is in flight
    /// is rejected with `Busy`. A zero delta is a no-op and emits no audit
    /// record.
    pub fn apply_payment(
        &self,
        expense_id: ExpenseId,
        new_paid_amount: Money,
    ) -> DigibookResult<()> {
        let _guard = self.store.begin_payment(expense_id)?;

        self.store.transaction(|db| {
            let expense = db
                .expense(expense_id)
                .ok_or_else(|| DigibookError::expense_not_found(expense_id.to_string()))?;

            let before_paid = expense.paid_amount;
            let delta = new_paid_amount - before_paid;
            if delta.is_zero() {
                return Ok(());
            }
            let source = expense.payment_source;

            let mut participants = Vec::new();
            match source {
                PaymentSource::Account { account_id } => {
                    let account = db.account_mut(account_id).ok_or_else(|| {
                        DigibookError::dangling_account(account_id.to_string())
                    })?;
                    let before = account.current_balance;
                    account.current_balance -= delta;
                    participants.push(AuditParticipant::account(
                        account_id,
                        before,
                        account.current_balance,
                    ));
                }
                PaymentSource::CreditCard { credit_card_id } => {
                    let card = db.credit_card_mut(credit_card_id).ok_or_else(|| {
                        DigibookError::dangling_credit_card(credit_card_id.to_string())
                    })?;
                    let before = card.balance;
                    // Charging the card increases debt; reversing a prior
                    // payment decreases it
                    card.balance += delta;
                    participants.push(AuditParticipant::credit_card(
                        credit_card_id,
                        before,
                        card.balance,
                    ));
                }
                PaymentSource::CreditCardPayment {
                    account_id,
                    target_credit_card_id,
                } => {
                    // Resolve both sides before writing either so a partial
                    // reference fails the transaction untouched
                    if db.credit_card(target_credit_card_id).is_none() {
                        return Err(DigibookError::dangling_credit_card(
                            target_credit_card_id.to_string(),
                        ));
                    }
                    let account = db.account_mut(account_id).ok_or_else(|| {
                        DigibookError::dangling_account(account_id.to_string())
                    })?;
                    let account_before = account.current_balance;
                    account.current_balance -= delta;
                    let account_after = account.current_balance;

                    let card = db.credit_card_mut(target_credit_card_id).ok_or_else(|| {
                        DigibookError::dangling_credit_card(target_credit_card_id.to_string())
                    })?;
                    let card_before = card.balance;
                    card.balance -= delta;

                    participants.push(AuditParticipant::account(
                        account_id,
                        account_before,
                        account_after,
                    ));
                    participants.push(AuditParticipant::credit_card(
                        target_credit_card_id,
                        card_before,
                        card.balance,
                    ));
                }
            }

            let expense = db
                .expense_mut(expense_id)
                .ok_or_else(|| DigibookError::expense_not_found(expense_id.to_string()))?;
            expense.paid_amount = new_paid_amount;
            expense.refresh_status();
            let name = expense.name.clone();

            db.append_audit(
                AuditEntry::payment(expense_id, before_paid, new_paid_amount, participants)
                    .with_description(name),
            );
            Ok(())
        })
    }

    /// Pay an expense in full: sugar for `apply_payment(id, expense.amount)`
    pub fn mark_paid(&self, expense_id: ExpenseId) -> DigibookResult<()> {
        let amount = self.store.read(|db| {
            db.expense(expense_id)
                .map(|e| e.amount)
                .ok_or_else(|| DigibookError::expense_not_found(expense_id.to_string()))
        })??;
        self.apply_payment(expense_id, amount)
    }
}
