//! Checksum-verified ledger snapshots
//!
//! Backups are keyed records `digibook_backup_<reason>_<timestamp>` whose
//! checksum is the SHA-256 of the canonical JSON of the snapshot data.
//! Retention keeps the newest five; restore refuses any record whose
//! checksum does not verify.

pub mod manager;
pub mod restore;

pub use manager::{BackupInfo, BackupManager, BackupReason, BackupRecord, RETAIN_COUNT};
pub use restore::{load_verified, restore_latest};

use sha2::{Digest, Sha256};

use crate::error::{DigibookError, DigibookResult};
use crate::storage::Database;

/// SHA-256 of the canonical JSON of a snapshot, as lowercase hex
pub fn checksum_of(data: &Database) -> DigibookResult<String> {
    let canonical = serde_json::to_string(data)
        .map_err(|e| DigibookError::Json(format!("Failed to canonicalize snapshot: {}", e)))?;
    let digest = Sha256::digest(canonical.as_bytes());
    Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
}
