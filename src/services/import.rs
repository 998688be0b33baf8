//! Import service
//!
//! Replaces the whole ledger state from a validated export archive. A
//! safety backup is taken first, so a bad import is always one restore
//! away from undone.

use crate::audit::{AuditEntry, AuditKind};
use crate::backup::{BackupManager, BackupReason};
use crate::cache::CategoryCache;
use crate::error::{DigibookError, DigibookResult};
use crate::export::ExportArchive;
use crate::storage::Store;
use crate::validation::validate_import;

/// Service for importing export archives
pub struct ImportService<'a> {
    store: &'a Store,
    backups: &'a BackupManager,
    cache: &'a CategoryCache,
}

impl<'a> ImportService<'a> {
    /// Create a new import service
    pub fn new(store: &'a Store, backups: &'a BackupManager, cache: &'a CategoryCache) -> Self {
        Self {
            store,
            backups,
            cache,
        }
    }

    /// Validate `payload` and replace the ledger state with it
    ///
    /// Validation findings reject the import as `Malformed` before
    /// anything is touched. The pre-import backup is written before the
    /// replacing transaction commits.
    pub fn import(&self, payload: &serde_json::Value) -> DigibookResult<()> {
        let check = validate_import(payload);
        if !check.ok() {
            return Err(DigibookError::Malformed(check.describe()));
        }

        let archive: ExportArchive = serde_json::from_value(payload.clone())
            .map_err(|e| DigibookError::Malformed(format!("Not a valid export archive: {}", e)))?;

        let snapshot = self.store.snapshot()?;
        self.backups
            .create_backup(&snapshot, BackupReason::BeforeImport)?;

        let mut incoming = archive.into_database();
        incoming.append_audit(AuditEntry::state_replaced(
            AuditKind::ImportApplied,
            format!(
                "Imported {} accounts, {} cards, {} expenses",
                incoming.accounts.len(),
                incoming.credit_cards.len(),
                incoming.fixed_expenses.len()
            ),
        ));

        self.store.transaction(|db| {
            *db = incoming.clone();
            Ok(())
        })?;

        // The categories collection was just replaced wholesale
        self.cache.invalidate();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountType, Money};
    use tempfile::TempDir;

    fn fixture() -> (TempDir, Store, BackupManager, CategoryCache) {
        let temp = TempDir::new().unwrap();
        let store = Store::open(temp.path().join("ledger.json")).unwrap();
        let backups = BackupManager::new(temp.path().join("backups"));
        let cache = CategoryCache::with_default_ttl();
        (temp, store, backups, cache)
    }

    fn exported_state() -> serde_json::Value {
        let mut db = crate::storage::Database::seeded();
        let id = db.next_account_id();
        let mut account =
            Account::new(id, "Imported", AccountType::Savings, Money::from_major(77));
        account.is_default = true;
        db.accounts.push(account);
        serde_json::to_value(ExportArchive::from_database(&db)).unwrap()
    }

    #[test]
    fn test_import_replaces_state() {
        let (_temp, store, backups, cache) = fixture();
        ImportService::new(&store, &backups, &cache)
            .import(&exported_state())
            .unwrap();

        store
            .read(|db| {
                assert_eq!(db.accounts.len(), 1);
                assert_eq!(db.accounts[0].name, "Imported");
                assert!(db
                    .audit_logs
                    .iter()
                    .any(|a| a.kind == AuditKind::ImportApplied));
            })
            .unwrap();
    }

    #[test]
    fn test_import_takes_safety_backup_first() {
        let (_temp, store, backups, cache) = fixture();
        ImportService::new(&store, &backups, &cache)
            .import(&exported_state())
            .unwrap();

        let latest = backups.latest().unwrap().unwrap();
        assert!(latest.key.contains("before_import"));
    }

    #[test]
    fn test_invalid_payload_rejected_untouched() {
        let (_temp, store, backups, cache) = fixture();
        let before = store.snapshot().unwrap();

        let err = ImportService::new(&store, &backups, &cache)
            .import(&serde_json::json!({"version": 99}))
            .unwrap_err();
        assert!(matches!(err, DigibookError::Malformed(_)));

        assert_eq!(store.snapshot().unwrap(), before);
        assert!(backups.latest().unwrap().is_none());
    }

    #[test]
    fn test_export_import_round_trip() {
        let (_temp, store, backups, cache) = fixture();
        let payload = exported_state();
        ImportService::new(&store, &backups, &cache).import(&payload).unwrap();

        // Exporting again yields the same collections (ids included)
        let re_exported = ExportArchive::from_database(&store.snapshot().unwrap());
        let original: ExportArchive = serde_json::from_value(payload).unwrap();
        assert_eq!(re_exported.accounts, original.accounts);
        assert_eq!(re_exported.categories, original.categories);
        assert_eq!(re_exported.fixed_expenses, original.fixed_expenses);
        assert_eq!(re_exported.pending_transactions, original.pending_transactions);
    }
}
