//! Transactional store
//!
//! `Store` owns the in-memory `Database` and its on-disk JSON file. A
//! transaction runs against a working copy; on success the copy is
//! persisted with an atomic rename and swapped in, on failure it is
//! dropped, so callers always observe either all of a transaction's writes
//! or none of them.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::audit::{AuditEntry, AuditParticipant};
use crate::error::{DigibookError, DigibookResult};
use crate::models::{ExpenseId, PendingTransactionId};

use super::database::{Database, SCHEMA_VERSION};
use super::file_io::{read_json, write_json_atomic};

/// Transactional ledger store backed by a single JSON file
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    db: RwLock<Database>,
    /// Expenses with a payment currently in flight
    in_flight: RwLock<HashSet<ExpenseId>>,
}

impl Store {
    /// Open the store at `path`, creating a seeded database if the file
    /// does not exist yet
    ///
    /// Fails with `SchemaTooNew` when the file was written by a newer
    /// build; there is no silent downgrade.
    pub fn open(path: impl Into<PathBuf>) -> DigibookResult<Self> {
        let path = path.into();
        let db = match read_json::<Database, _>(&path)? {
            Some(db) => {
                if db.schema_version > SCHEMA_VERSION {
                    return Err(DigibookError::SchemaTooNew {
                        found: db.schema_version,
                        supported: SCHEMA_VERSION,
                    });
                }
                db
            }
            None => Database::seeded(),
        };

        Ok(Self {
            path,
            db: RwLock::new(db),
            in_flight: RwLock::new(HashSet::new()),
        })
    }

    /// Build a store around an already-validated database, persisting it
    /// immediately; used by restore and the emergency path
    pub fn from_database(path: impl Into<PathBuf>, db: Database) -> DigibookResult<Self> {
        let path = path.into();
        write_json_atomic(&path, &db)?;
        Ok(Self {
            path,
            db: RwLock::new(db),
            in_flight: RwLock::new(HashSet::new()),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run a read-only closure against the current state
    pub fn read<T>(&self, f: impl FnOnce(&Database) -> T) -> DigibookResult<T> {
        let db = self
            .db
            .read()
            .map_err(|e| DigibookError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(f(&db))
    }

    /// Owned copy of the current state for derivations, export, and backup
    pub fn snapshot(&self) -> DigibookResult<Database> {
        self.read(|db| db.clone())
    }

    /// Run `body` against a working copy of the database and commit
    /// atomically
    ///
    /// A `Err` from the body surfaces unchanged and nothing is written. A
    /// persist failure after a successful body maps to `TransactionFailed`
    /// and the in-memory state also stays unchanged.
    pub fn transaction<T>(
        &self,
        body: impl FnOnce(&mut Database) -> DigibookResult<T>,
    ) -> DigibookResult<T> {
        let mut guard = self
            .db
            .write()
            .map_err(|e| DigibookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let mut working = guard.clone();
        let value = body(&mut working)?;

        write_json_atomic(&self.path, &working)
            .map_err(|e| DigibookError::TransactionFailed(e.to_string()))?;

        *guard = working;
        Ok(value)
    }

    /// Settle a pending transaction: remove the row and apply its signed
    /// amount to the referenced account, atomically
    pub fn settle(&self, pending_id: PendingTransactionId) -> DigibookResult<()> {
        self.transaction(|db| {
            let pending = db
                .remove_pending(pending_id)
                .ok_or_else(|| DigibookError::pending_not_found(pending_id.to_string()))?;

            let account = db
                .account_mut(pending.account_id)
                .ok_or_else(|| DigibookError::dangling_account(pending.account_id.to_string()))?;

            let before = account.current_balance;
            account.current_balance += pending.amount;
            let after = account.current_balance;
            let account_id = account.id;

            db.append_audit(
                AuditEntry::settlement(
                    pending_id.to_string(),
                    pending.amount,
                    AuditParticipant::account(account_id, before, after),
                )
                .with_description(pending.description.clone()),
            );
            Ok(())
        })
    }

    // ---- user preferences ----

    /// Read one component's preference value
    pub fn preference(&self, component: &str) -> DigibookResult<Option<serde_json::Value>> {
        self.read(|db| db.user_preferences.get(component).cloned())
    }

    /// Write one component's preference value atomically
    pub fn set_preference(
        &self,
        component: impl Into<String>,
        value: serde_json::Value,
    ) -> DigibookResult<()> {
        let component = component.into();
        self.transaction(|db| {
            db.user_preferences.insert(component.clone(), value.clone());
            Ok(())
        })
    }

    // ---- per-expense payment guard ----

    /// Mark an expense as having a payment in flight
    ///
    /// Returns a guard that releases the slot on drop; a second call for
    /// the same expense while the guard lives is rejected with `Busy`.
    pub fn begin_payment(&self, expense_id: ExpenseId) -> DigibookResult<PaymentGuard<'_>> {
        let mut in_flight = self
            .in_flight
            .write()
            .map_err(|e| DigibookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if !in_flight.insert(expense_id) {
            return Err(DigibookError::Busy {
                identifier: expense_id.to_string(),
            });
        }

        Ok(PaymentGuard {
            store: self,
            expense_id,
        })
    }
}

/// Releases an expense's in-flight slot on drop
#[derive(Debug)]
pub struct PaymentGuard<'a> {
    store: &'a Store,
    expense_id: ExpenseId,
}

impl Drop for PaymentGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut in_flight) = self.store.in_flight.write() {
            in_flight.remove(&self.expense_id);
        }
    }
}
