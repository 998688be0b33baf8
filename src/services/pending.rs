//! Pending-transaction service
//!
//! CRUD for pending rows; settlement itself is the store's atomic
//! `settle`, which removes the row and applies the signed amount to the
//! account.

use crate::audit::AuditEntry;
use crate::error::{DigibookError, DigibookResult};
use crate::models::{AccountId, Money, PendingTransaction, PendingTransactionId};
use crate::storage::Store;

/// Input for creating a pending transaction
#[derive(Debug, Clone)]
pub struct CreatePendingInput {
    pub account_id: AccountId,
    pub amount: Money,
    pub category: String,
    pub description: String,
}

/// Service for pending-transaction management
pub struct PendingService<'a> {
    store: &'a Store,
}

impl<'a> PendingService<'a> {
    /// Create a new pending-transaction service
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Create a pending transaction against an existing account
    pub fn create(&self, input: CreatePendingInput) -> DigibookResult<PendingTransaction> {
        if input.amount.is_zero() {
            return Err(DigibookError::Validation(
                "Pending amount must be non-zero".into(),
            ));
        }

        self.store.transaction(|db| {
            if db.account(input.account_id).is_none() {
                return Err(DigibookError::account_not_found(input.account_id.to_string()));
            }

            let id = db.next_pending_id();
            let pending = PendingTransaction::new(
                id,
                input.account_id,
                input.amount,
                input.category.clone(),
                input.description.trim(),
            );
            db.pending_transactions.push(pending.clone());
            db.append_audit(
                AuditEntry::created(id.to_string(), &pending)
                    .with_description(pending.description.clone()),
            );
            Ok(pending)
        })
    }

    /// Get a pending transaction by id
    pub fn get(&self, id: PendingTransactionId) -> DigibookResult<Option<PendingTransaction>> {
        self.store.read(|db| db.pending(id).cloned())
    }

    /// All pending transactions, optionally narrowed to one account
    pub fn list(&self, account_id: Option<AccountId>) -> DigibookResult<Vec<PendingTransaction>> {
        self.store.read(|db| {
            db.pending_transactions
                .iter()
                .filter(|p| account_id.is_none_or(|id| p.account_id == id))
                .cloned()
                .collect()
        })
    }

    /// Delete a pending transaction without settling it
    pub fn delete(&self, id: PendingTransactionId) -> DigibookResult<PendingTransaction> {
        self.store.transaction(|db| {
            let removed = db
                .remove_pending(id)
                .ok_or_else(|| DigibookError::pending_not_found(id.to_string()))?;
            db.append_audit(
                AuditEntry::deleted(id.to_string(), &removed)
                    .with_description(removed.description.clone()),
            );
            Ok(removed)
        })
    }

    /// Settle a pending transaction into its account
    pub fn settle(&self, id: PendingTransactionId) -> DigibookResult<()> {
        self.store.settle(id)
    }
}
