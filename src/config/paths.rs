//! Path management
//!
//! Resolves where the ledger file and backups live.
//!
//! ## Path Resolution Order
//!
//! 1. `DIGIBOOK_DATA_DIR` environment variable (if set)
//! 2. The platform data directory via `directories`
//!    (e.g. `~/.local/share/digibook` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::DigibookError;

/// Manages all paths used by Digibook
#[derive(Debug, Clone)]
pub struct DigibookPaths {
    base_dir: PathBuf,
}

impl DigibookPaths {
    /// Resolve the default paths
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, DigibookError> {
        let base_dir = if let Ok(custom) = std::env::var("DIGIBOOK_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            ProjectDirs::from("", "", "digibook")
                .ok_or_else(|| {
                    DigibookError::Config("Could not determine a data directory".into())
                })?
                .data_dir()
                .to_path_buf()
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Base directory for all Digibook data
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// The ledger database file
    pub fn database_file(&self) -> PathBuf {
        self.base_dir.join("ledger.json")
    }

    /// Directory holding backup records
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// The settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure the base and backup directories exist
    pub fn ensure_directories(&self) -> Result<(), DigibookError> {
        for dir in [self.base_dir.clone(), self.backup_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                DigibookError::Io(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_layout() {
        let temp = TempDir::new().unwrap();
        let paths = DigibookPaths::with_base_dir(temp.path().to_path_buf());

        assert_eq!(paths.database_file(), temp.path().join("ledger.json"));
        assert_eq!(paths.backup_dir(), temp.path().join("backups"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp = TempDir::new().unwrap();
        let paths = DigibookPaths::with_base_dir(temp.path().join("nested"));

        paths.ensure_directories().unwrap();
        assert!(paths.base_dir().exists());
        assert!(paths.backup_dir().exists());
    }
}
