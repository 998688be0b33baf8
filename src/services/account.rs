//! Account service
//!
//! Create, list, and delete accounts, and keep the default-account
//! invariant: whenever at least one account exists, exactly one is the
//! default.

use crate::audit::AuditEntry;
use crate::error::{DigibookError, DigibookResult};
use crate::models::{Account, AccountId};
use crate::storage::Store;
use crate::validation::{validate_account, AccountInput};

/// Service for account management
pub struct AccountService<'a> {
    store: &'a Store,
}

impl<'a> AccountService<'a> {
    /// Create a new account service
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Create an account from raw input
    ///
    /// The first account ever created becomes the default.
    pub fn create(&self, input: AccountInput) -> DigibookResult<Account> {
        let check = validate_account(&input);
        let Some(sanitized) = check.sanitized else {
            let reasons: Vec<String> = check.errors.iter().map(|e| e.to_string()).collect();
            return Err(DigibookError::Validation(reasons.join("; ")));
        };

        self.store.transaction(|db| {
            let id = db.next_account_id();
            let mut account = Account::new(
                id,
                sanitized.name.clone(),
                sanitized.account_type,
                sanitized.balance,
            );
            account.is_default = db.accounts.is_empty();
            db.accounts.push(account.clone());

            db.append_audit(
                AuditEntry::created(id.to_string(), &account).with_description(account.name.clone()),
            );
            Ok(account)
        })
    }

    /// Get an account by id
    pub fn get(&self, id: AccountId) -> DigibookResult<Option<Account>> {
        self.store.read(|db| db.account(id).cloned())
    }

    /// All accounts, ordered by creation time
    pub fn list(&self) -> DigibookResult<Vec<Account>> {
        self.store.read(|db| {
            let mut accounts = db.accounts.clone();
            accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            accounts
        })
    }

    /// Make `id` the default account, clearing the flag everywhere else
    pub fn set_default(&self, id: AccountId) -> DigibookResult<()> {
        self.store.transaction(|db| {
            if db.account(id).is_none() {
                return Err(DigibookError::account_not_found(id.to_string()));
            }
            for account in &mut db.accounts {
                account.is_default = account.id == id;
            }
            Ok(())
        })
    }

    /// Delete an account
    ///
    /// Refused while any pending transaction references the account. When
    /// the deleted account was the default, the oldest remaining account
    /// (by `created_at`) becomes the new default.
    pub fn delete(&self, id: AccountId) -> DigibookResult<Account> {
        self.store.transaction(|db| {
            if db.account(id).is_none() {
                return Err(DigibookError::account_not_found(id.to_string()));
            }
            if !db.pending_for_account(id).is_empty() {
                return Err(DigibookError::InUse {
                    entity_type: "Account",
                    identifier: id.to_string(),
                });
            }

            let removed = db
                .remove_account(id)
                .ok_or_else(|| DigibookError::account_not_found(id.to_string()))?;

            if removed.is_default {
                if let Some(next) = db
                    .accounts
                    .iter_mut()
                    .min_by_key(|a| (a.created_at, a.id))
                {
                    next.is_default = true;
                }
            }

            db.append_audit(
                AuditEntry::deleted(id.to_string(), &removed)
                    .with_description(removed.name.clone()),
            );
            Ok(removed)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, PendingTransaction};
    use tempfile::TempDir;

    fn open_store() -> (TempDir, Store) {
        let temp = TempDir::new().unwrap();
        let store = Store::open(temp.path().join("ledger.json")).unwrap();
        (temp, store)
    }

    fn input(name: &str, balance: f64) -> AccountInput {
        AccountInput {
            name: name.into(),
            account_type: "checking".into(),
            balance,
        }
    }

    #[test]
    fn test_first_account_becomes_default() {
        let (_temp, store) = open_store();
        let service = AccountService::new(&store);

        let first = service.create(input("First", 100.0)).unwrap();
        let second = service.create(input("Second", 50.0)).unwrap();

        assert!(first.is_default);
        assert!(!second.is_default);

        let defaults = service
            .list()
            .unwrap()
            .into_iter()
            .filter(|a| a.is_default)
            .count();
        assert_eq!(defaults, 1);
    }

    #[test]
    fn test_invalid_input_rejected() {
        let (_temp, store) = open_store();
        let service = AccountService::new(&store);
        let err = service.create(input("   ", 10.0)).unwrap_err();
        assert!(err.is_validation());
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_set_default_moves_the_flag() {
        let (_temp, store) = open_store();
        let service = AccountService::new(&store);
        let a = service.create(input("A", 0.0)).unwrap();
        let b = service.create(input("B", 0.0)).unwrap();

        service.set_default(b.id).unwrap();

        let accounts = service.list().unwrap();
        assert!(!accounts.iter().find(|x| x.id == a.id).unwrap().is_default);
        assert!(accounts.iter().find(|x| x.id == b.id).unwrap().is_default);
    }

    #[test]
    fn test_delete_default_promotes_oldest_remaining() {
        let (_temp, store) = open_store();
        let service = AccountService::new(&store);
        let a = service.create(input("A", 0.0)).unwrap();
        let b = service.create(input("B", 0.0)).unwrap();
        let c = service.create(input("C", 0.0)).unwrap();

        service.delete(a.id).unwrap();

        let accounts = service.list().unwrap();
        assert_eq!(accounts.len(), 2);
        // B was created before C, so B inherits the default flag
        assert!(accounts.iter().find(|x| x.id == b.id).unwrap().is_default);
        assert!(!accounts.iter().find(|x| x.id == c.id).unwrap().is_default);
    }

    #[test]
    fn test_delete_refused_while_referenced() {
        let (_temp, store) = open_store();
        let service = AccountService::new(&store);
        let a = service.create(input("A", 0.0)).unwrap();

        store
            .transaction(|db| {
                let id = db.next_pending_id();
                db.pending_transactions.push(PendingTransaction::new(
                    id,
                    a.id,
                    Money::from_cents(-100),
                    "Other",
                    "hold",
                ));
                Ok(())
            })
            .unwrap();

        let err = service.delete(a.id).unwrap_err();
        assert!(matches!(err, DigibookError::InUse { .. }));
        assert_eq!(service.list().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_missing_account() {
        let (_temp, store) = open_store();
        let err = AccountService::new(&store)
            .delete(AccountId::new(404))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_create_emits_audit() {
        let (_temp, store) = open_store();
        AccountService::new(&store)
            .create(input("Audited", 25.0))
            .unwrap();
        let entries = store.read(|db| db.audit_logs.len()).unwrap();
        assert_eq!(entries, 1);
    }
}
