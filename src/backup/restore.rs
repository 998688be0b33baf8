//! Backup restore
//!
//! Loads snapshot records and verifies their checksum before any byte of
//! them reaches the store. A checksum mismatch is a hard failure; the
//! emergency path simply moves on to the next-newest record.

use std::fs;
use std::path::Path;

use crate::error::{DigibookError, DigibookResult};
use crate::storage::Database;

use super::manager::{BackupManager, BackupRecord};
use super::checksum_of;

/// Load a backup record and verify its checksum
pub fn load_verified(path: &Path) -> DigibookResult<BackupRecord> {
    let text = fs::read_to_string(path)
        .map_err(|e| DigibookError::Backup(format!("Failed to read {}: {}", path.display(), e)))?;

    let record: BackupRecord = serde_json::from_str(&text)
        .map_err(|e| DigibookError::Malformed(format!("Not a backup record: {}", e)))?;

    let actual = checksum_of(&record.data)?;
    if actual != record.checksum {
        return Err(DigibookError::Backup(format!(
            "Checksum mismatch for {}: expected {}, computed {}",
            path.display(),
            record.checksum,
            actual
        )));
    }

    Ok(record)
}

/// Restore the newest backup that passes verification
///
/// Walks the records newest-first, skipping any that fail to parse or
/// verify; `None` when no valid backup exists.
pub fn restore_latest(manager: &BackupManager) -> DigibookResult<Option<Database>> {
    for info in manager.list_backups()? {
        match load_verified(&info.path) {
            Ok(record) => return Ok(Some(record.data)),
            Err(_) => continue,
        }
    }
    Ok(None)
}
