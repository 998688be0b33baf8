//! Backup manager
//!
//! Creates snapshot records and enforces the newest-N retention policy.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DigibookError, DigibookResult};
use crate::storage::{file_io::write_json_atomic, Database, SCHEMA_VERSION};

use super::checksum_of;

/// How many backups retention keeps, newest first by timestamp
pub const RETAIN_COUNT: usize = 5;

/// Why a backup was taken; part of the record key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupReason {
    /// Explicit user command
    Manual,
    /// Periodic background snapshot
    Scheduled,
    /// Safety snapshot before an import replaces state
    BeforeImport,
    /// Safety snapshot before a restore replaces state
    BeforeRestore,
    /// Snapshot taken by the emergency reset path
    EmergencyReset,
}

impl std::fmt::Display for BackupReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manual => write!(f, "manual"),
            Self::Scheduled => write!(f, "scheduled"),
            Self::BeforeImport => write!(f, "before_import"),
            Self::BeforeRestore => write!(f, "before_restore"),
            Self::EmergencyReset => write!(f, "emergency_reset"),
        }
    }
}

/// A stored snapshot record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupRecord {
    /// The snapshot itself
    pub data: Database,
    /// SHA-256 hex of the canonical JSON of `data`
    pub checksum: String,
    /// Why the backup was taken
    pub reason: BackupReason,
    /// When the backup was taken
    pub timestamp: DateTime<Utc>,
    /// Schema version of the snapshot
    pub version: u32,
    /// Whether `data` is compressed; always false, kept for contract
    /// compatibility
    pub compressed: bool,
    /// Serialized size of `data` in bytes
    pub size: u64,
    /// Pre-compression size; equals `size` while `compressed` is false
    pub original_size: u64,
}

/// Metadata about a backup on disk
#[derive(Debug, Clone)]
pub struct BackupInfo {
    /// Record key (the file stem)
    pub key: String,
    /// Full path to the record
    pub path: PathBuf,
    /// When the backup was taken, parsed from the key
    pub timestamp: DateTime<Utc>,
}

/// Manages backup creation and retention
pub struct BackupManager {
    backup_dir: PathBuf,
    retain: usize,
}

impl BackupManager {
    /// Create a manager writing into `backup_dir`
    pub fn new(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            backup_dir: backup_dir.into(),
            retain: RETAIN_COUNT,
        }
    }

    /// Override the retention count
    pub fn with_retention(mut self, retain: usize) -> Self {
        self.retain = retain;
        self
    }

    /// The backup directory
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Snapshot `db` into a new keyed record and sweep old ones
    pub fn create_backup(&self, db: &Database, reason: BackupReason) -> DigibookResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir).map_err(|e| {
            DigibookError::Backup(format!("Failed to create backup directory: {}", e))
        })?;

        let timestamp = Utc::now();
        let key = format!(
            "digibook_backup_{}_{}",
            reason,
            timestamp.format("%Y%m%d-%H%M%S-%3f")
        );
        let path = self.backup_dir.join(format!("{}.json", key));

        let checksum = checksum_of(db)?;
        let size = serde_json::to_string(db)
            .map_err(|e| DigibookError::Json(e.to_string()))?
            .len() as u64;

        let record = BackupRecord {
            data: db.clone(),
            checksum,
            reason,
            timestamp,
            version: SCHEMA_VERSION,
            compressed: false,
            size,
            original_size: size,
        };

        write_json_atomic(&path, &record)
            .map_err(|e| DigibookError::Backup(format!("Failed to write backup: {}", e)))?;

        self.enforce_retention()?;
        Ok(path)
    }

    /// List backups on disk, newest first
    pub fn list_backups(&self) -> DigibookResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        let entries = fs::read_dir(&self.backup_dir).map_err(|e| {
            DigibookError::Backup(format!("Failed to read backup directory: {}", e))
        })?;

        for entry in entries {
            let entry = entry
                .map_err(|e| DigibookError::Backup(format!("Failed to read entry: {}", e)))?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(info) = parse_backup_info(&path) {
                    backups.push(info);
                }
            }
        }

        backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(backups)
    }

    /// Delete everything beyond the newest `retain` records
    pub fn enforce_retention(&self) -> DigibookResult<Vec<PathBuf>> {
        let backups = self.list_backups()?;
        let mut deleted = Vec::new();

        for backup in backups.into_iter().skip(self.retain) {
            fs::remove_file(&backup.path)
                .map_err(|e| DigibookError::Backup(format!("Failed to delete backup: {}", e)))?;
            deleted.push(backup.path);
        }

        Ok(deleted)
    }

    /// The most recent backup, if any exist
    pub fn latest(&self) -> DigibookResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }
}

/// Parse key and timestamp out of a backup filename
fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let key = path.file_stem()?.to_string_lossy().to_string();
    let rest = key.strip_prefix("digibook_backup_")?;

    // <reason>_<YYYYmmdd-HHMMSS-mmm>; the reason itself may contain
    // underscores, so take the timestamp from the end
    let timestamp_part = rest.rsplit('_').next()?;
    let timestamp = parse_backup_timestamp(timestamp_part)?;

    Some(BackupInfo {
        key,
        path: path.to_path_buf(),
        timestamp,
    })
}

fn parse_backup_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let mut parts = s.split('-');
    let date_part = parts.next()?;
    let time_part = parts.next()?;
    let millis: u32 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);

    if date_part.len() != 8 || time_part.len() != 6 {
        return None;
    }

    let year: i32 = date_part[0..4].parse().ok()?;
    let month: u32 = date_part[4..6].parse().ok()?;
    let day: u32 = date_part[6..8].parse().ok()?;
    let hour: u32 = time_part[0..2].parse().ok()?;
    let minute: u32 = time_part[2..4].parse().ok()?;
    let second: u32 = time_part[4..6].parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_milli_opt(hour, minute, second, millis)?;
    Some(DateTime::from_naive_utc_and_offset(
        NaiveDateTime::new(date, time),
        Utc,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager() -> (BackupManager, TempDir) {
        let temp = TempDir::new().unwrap();
        (BackupManager::new(temp.path().join("backups")), temp)
    }

    #[test]
    fn test_create_backup_writes_keyed_record() {
        let (manager, _temp) = manager();
        let path = manager
            .create_backup(&Database::seeded(), BackupReason::Manual)
            .unwrap();

        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("digibook_backup_manual_"));
    }

    #[test]
    fn test_record_fields() {
        let (manager, _temp) = manager();
        let db = Database::seeded();
        let path = manager
            .create_backup(&db, BackupReason::BeforeImport)
            .unwrap();

        let text = fs::read_to_string(path).unwrap();
        let record: BackupRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(record.reason, BackupReason::BeforeImport);
        assert_eq!(record.version, SCHEMA_VERSION);
        assert!(!record.compressed);
        assert_eq!(record.size, record.original_size);
        assert_eq!(record.checksum, checksum_of(&db).unwrap());
    }

    #[test]
    fn test_list_newest_first() {
        let (manager, _temp) = manager();
        let db = Database::seeded();

        manager.create_backup(&db, BackupReason::Manual).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        manager.create_backup(&db, BackupReason::Scheduled).unwrap();

        let backups = manager.list_backups().unwrap();
        assert_eq!(backups.len(), 2);
        assert!(backups[0].timestamp >= backups[1].timestamp);
        assert!(backups[0].key.contains("scheduled"));
    }

    #[test]
    fn test_retention_keeps_newest_five() {
        let (manager, _temp) = manager();
        let db = Database::seeded();

        for _ in 0..7 {
            manager.create_backup(&db, BackupReason::Scheduled).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        let backups = manager.list_backups().unwrap();
        assert_eq!(backups.len(), RETAIN_COUNT);
    }

    #[test]
    fn test_custom_retention() {
        let (manager, _temp) = manager();
        let manager = manager.with_retention(2);
        let db = Database::seeded();

        for _ in 0..4 {
            manager.create_backup(&db, BackupReason::Manual).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        assert_eq!(manager.list_backups().unwrap().len(), 2);
    }

    #[test]
    fn test_empty_directory() {
        let (manager, _temp) = manager();
        assert!(manager.list_backups().unwrap().is_empty());
        assert!(manager.latest().unwrap().is_none());
    }

    #[test]
    fn test_timestamp_parsing() {
        let ts = parse_backup_timestamp("20260807-143022-456").unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-08-07T14:30:22.456+00:00");
        assert!(parse_backup_timestamp("garbage").is_none());
    }
}
