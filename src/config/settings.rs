//! Application settings
//!
//! Small JSON settings file next to the ledger: backup retention and the
//! category-cache freshness window. Everything the user edits through the
//! app itself lives in the store's preference map instead.

use serde::{Deserialize, Serialize};

use crate::error::DigibookResult;
use crate::storage::file_io::{read_json, write_json_atomic};

use super::paths::DigibookPaths;

fn default_backup_retention() -> usize {
    5
}

fn default_cache_ttl_seconds() -> u64 {
    30
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// How many backups retention keeps
    #[serde(default = "default_backup_retention")]
    pub backup_retention: usize,

    /// Category cache freshness window, in seconds
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backup_retention: default_backup_retention(),
            cache_ttl_seconds: default_cache_ttl_seconds(),
        }
    }
}

impl Settings {
    /// Load settings, writing defaults on first run
    pub fn load_or_create(paths: &DigibookPaths) -> DigibookResult<Self> {
        let path = paths.settings_file();
        match read_json::<Settings, _>(&path)? {
            Some(settings) => Ok(settings),
            None => {
                let settings = Settings::default();
                write_json_atomic(&path, &settings)?;
                Ok(settings)
            }
        }
    }

    /// Persist the settings
    pub fn save(&self, paths: &DigibookPaths) -> DigibookResult<()> {
        write_json_atomic(paths.settings_file(), self)
    }
}
