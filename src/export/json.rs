//! JSON export
//!
//! The versioned full-state archive used by export, import, and the
//! encrypted envelope. Entity ids and field values round-trip exactly.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audit::AuditEntry;
use crate::error::{DigibookError, DigibookResult};
use crate::models::{
    Account, Category, CreditCard, FixedExpense, PaycheckSettings, PendingTransaction,
};
use crate::storage::{Database, SCHEMA_VERSION};

/// Current export format version
pub const EXPORT_VERSION: u32 = SCHEMA_VERSION;

/// Full-state export archive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportArchive {
    /// Export format version
    pub version: u32,

    /// When the export was produced
    pub exported_at: DateTime<Utc>,

    pub accounts: Vec<Account>,
    pub credit_cards: Vec<CreditCard>,
    pub fixed_expenses: Vec<FixedExpense>,
    pub pending_transactions: Vec<PendingTransaction>,
    pub categories: Vec<Category>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paycheck_settings: Option<PaycheckSettings>,

    #[serde(default)]
    pub user_preferences: BTreeMap<String, serde_json::Value>,

    #[serde(default)]
    pub audit_logs: Vec<AuditEntry>,
}

impl ExportArchive {
    /// Build an archive from a database snapshot
    pub fn from_database(db: &Database) -> Self {
        Self {
            version: EXPORT_VERSION,
            exported_at: Utc::now(),
            accounts: db.accounts.clone(),
            credit_cards: db.credit_cards.clone(),
            fixed_expenses: db.fixed_expenses.clone(),
            pending_transactions: db.pending_transactions.clone(),
            categories: db.categories.clone(),
            paycheck_settings: db.paycheck_settings.clone(),
            user_preferences: db.user_preferences.clone(),
            audit_logs: db.audit_logs.clone(),
        }
    }

    /// Turn the archive back into a database, re-deriving the id sequences
    /// from the highest ids present
    pub fn into_database(self) -> Database {
        let mut db = Database {
            schema_version: SCHEMA_VERSION,
            accounts: self.accounts,
            credit_cards: self.credit_cards,
            fixed_expenses: self.fixed_expenses,
            pending_transactions: self.pending_transactions,
            categories: self.categories,
            paycheck_settings: self.paycheck_settings,
            user_preferences: self.user_preferences,
            audit_logs: self.audit_logs,
            ..Database::default()
        };
        db.rebuild_sequences();
        db
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> DigibookResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DigibookError::Json(format!("Failed to serialize export: {}", e)))
    }

    /// Parse an archive from JSON text
    pub fn from_json(text: &str) -> DigibookResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| DigibookError::Malformed(format!("Not a valid export archive: {}", e)))
    }
}
