//! Store initialization and emergency recovery
//!
//! Opening normally is `Store::open`. When the database file is damaged,
//! the emergency path moves it aside, restores the newest backup that
//! passes checksum verification, and falls back to a freshly seeded
//! database when no valid backup exists. A `SchemaTooNew` failure always
//! surfaces; downgrading silently would lose data written by a newer
//! build.

use std::fs;
use std::path::Path;

use crate::audit::{AuditEntry, AuditKind};
use crate::backup::{restore_latest, BackupManager};
use crate::error::{DigibookError, DigibookResult};
use crate::storage::{Database, Store};

/// Open the store, falling back to backup restore or seeded defaults when
/// the database file is unreadable
pub fn open_or_recover(path: &Path, backups: &BackupManager) -> DigibookResult<Store> {
    match Store::open(path) {
        Ok(store) => Ok(store),
        Err(DigibookError::SchemaTooNew { found, supported }) => {
            Err(DigibookError::SchemaTooNew { found, supported })
        }
        Err(_) => emergency_reset(path, backups),
    }
}

/// Delete the damaged database and rebuild from the newest valid backup,
/// else from seeded defaults
pub fn emergency_reset(path: &Path, backups: &BackupManager) -> DigibookResult<Store> {
    if path.exists() {
        // Keep the damaged bytes around for manual inspection
        let quarantine = path.with_extension("json.damaged");
        let _ = fs::rename(path, &quarantine);
        let _ = fs::remove_file(path);
    }

    let db = match restore_latest(backups)? {
        Some(mut restored) => {
            restored.append_audit(AuditEntry::state_replaced(
                AuditKind::BackupRestored,
                "Emergency reset restored the newest valid backup",
            ));
            restored
        }
        None => Database::seeded(),
    };

    Store::from_database(path, db)
}
