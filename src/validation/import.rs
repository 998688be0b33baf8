//! Import payload validation
//!
//! Checks an export archive structurally (collections are arrays, elements
//! carry typed fields, the version is supported) and referentially (every
//! payment source and pending transaction resolves) without touching the
//! store. Findings come back as indexed issues so the presentation layer
//! can point at the offending rows.

use std::collections::HashSet;
use std::fmt;

use serde::de::DeserializeOwned;

use crate::models::{
    Account, Category, CreditCard, FixedExpense, PendingTransaction, PaycheckSettings,
};
use crate::storage::SCHEMA_VERSION;

use super::entity::check_source_category;

/// A single import finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportIssue {
    /// The payload is not a JSON object
    NotAnObject,
    /// The payload version is newer than this build understands
    SchemaTooNew { found: u32, supported: u32 },
    /// The version field is absent or not an integer
    MissingVersion,
    /// A required collection is absent
    MissingCollection { collection: &'static str },
    /// A collection is present but not an array
    NotAnArray { collection: &'static str },
    /// An element failed typed deserialization
    InvalidElement {
        collection: &'static str,
        index: usize,
        reason: String,
    },
    /// An id is referenced but no entity carries it
    UnresolvedReference {
        collection: &'static str,
        index: usize,
        reference: String,
    },
    /// An expense's source kind contradicts its category
    SourceCategoryMismatch { index: usize, reason: String },
    /// Two entities in one collection share an id
    DuplicateId { collection: &'static str, id: u64 },
}

impl fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "Payload is not a JSON object"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "Payload version {} is newer than supported version {}",
                found, supported
            ),
            Self::MissingVersion => write!(f, "Payload has no integer 'version' field"),
            Self::MissingCollection { collection } => {
                write!(f, "Missing collection '{}'", collection)
            }
            Self::NotAnArray { collection } => {
                write!(f, "Collection '{}' is not an array", collection)
            }
            Self::InvalidElement {
                collection,
                index,
                reason,
            } => write!(f, "{}[{}]: {}", collection, index, reason),
            Self::UnresolvedReference {
                collection,
                index,
                reference,
            } => write!(
                f,
                "{}[{}] references missing {}",
                collection, index, reference
            ),
            Self::SourceCategoryMismatch { index, reason } => {
                write!(f, "fixedExpenses[{}]: {}", index, reason)
            }
            Self::DuplicateId { collection, id } => {
                write!(f, "Collection '{}' has duplicate id {}", collection, id)
            }
        }
    }
}

/// Result of validating an import payload
#[derive(Debug, Clone, Default)]
pub struct ImportCheck {
    pub issues: Vec<ImportIssue>,
}

impl ImportCheck {
    /// Whether the payload may be imported
    pub fn ok(&self) -> bool {
        self.issues.is_empty()
    }

    /// Render the findings for an error message
    pub fn describe(&self) -> String {
        self.issues
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn check_elements<T: DeserializeOwned>(
    payload: &serde_json::Value,
    collection: &'static str,
    issues: &mut Vec<ImportIssue>,
) -> Vec<T> {
    let mut parsed = Vec::new();
    match payload.get(collection) {
        None => issues.push(ImportIssue::MissingCollection { collection }),
        Some(serde_json::Value::Array(items)) => {
            for (index, item) in items.iter().enumerate() {
                match serde_json::from_value::<T>(item.clone()) {
                    Ok(value) => parsed.push(value),
                    Err(e) => issues.push(ImportIssue::InvalidElement {
                        collection,
                        index,
                        reason: e.to_string(),
                    }),
                }
            }
        }
        Some(_) => issues.push(ImportIssue::NotAnArray { collection }),
    }
    parsed
}

fn check_unique_ids<I: Iterator<Item = u64>>(
    ids: I,
    collection: &'static str,
    issues: &mut Vec<ImportIssue>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            issues.push(ImportIssue::DuplicateId { collection, id });
        }
    }
}

/// Validate an import payload
///
/// Pure function of the payload; returns every finding rather than
/// stopping at the first.
pub fn validate_import(payload: &serde_json::Value) -> ImportCheck {
    let mut issues = Vec::new();

    if !payload.is_object() {
        return ImportCheck {
            issues: vec![ImportIssue::NotAnObject],
        };
    }

    match payload.get("version").and_then(|v| v.as_u64()) {
        Some(version) => {
            if version > SCHEMA_VERSION as u64 {
                issues.push(ImportIssue::SchemaTooNew {
                    found: version as u32,
                    supported: SCHEMA_VERSION,
                });
            }
        }
        None => issues.push(ImportIssue::MissingVersion),
    }

    let accounts: Vec<Account> = check_elements(payload, "accounts", &mut issues);
    let cards: Vec<CreditCard> = check_elements(payload, "creditCards", &mut issues);
    let expenses: Vec<FixedExpense> = check_elements(payload, "fixedExpenses", &mut issues);
    let pending: Vec<PendingTransaction> =
        check_elements(payload, "pendingTransactions", &mut issues);
    let _categories: Vec<Category> = check_elements(payload, "categories", &mut issues);

    if let Some(value) = payload.get("paycheckSettings") {
        if !value.is_null() {
            if let Err(e) = serde_json::from_value::<PaycheckSettings>(value.clone()) {
                issues.push(ImportIssue::InvalidElement {
                    collection: "paycheckSettings",
                    index: 0,
                    reason: e.to_string(),
                });
            }
        }
    }

    check_unique_ids(accounts.iter().map(|a| a.id.raw()), "accounts", &mut issues);
    check_unique_ids(cards.iter().map(|c| c.id.raw()), "creditCards", &mut issues);
    check_unique_ids(
        expenses.iter().map(|e| e.id.raw()),
        "fixedExpenses",
        &mut issues,
    );
    check_unique_ids(
        pending.iter().map(|p| p.id.raw()),
        "pendingTransactions",
        &mut issues,
    );

    let account_ids: HashSet<_> = accounts.iter().map(|a| a.id).collect();
    let card_ids: HashSet<_> = cards.iter().map(|c| c.id).collect();

    for (index, expense) in expenses.iter().enumerate() {
        if let Err(e) = check_source_category(&expense.category, &expense.payment_source) {
            issues.push(ImportIssue::SourceCategoryMismatch {
                index,
                reason: e.to_string(),
            });
        }
        if let Some(account_id) = expense.payment_source.funding_account() {
            if !account_ids.contains(&account_id) {
                issues.push(ImportIssue::UnresolvedReference {
                    collection: "fixedExpenses",
                    index,
                    reference: account_id.to_string(),
                });
            }
        }
        if let Some(card_id) = expense.payment_source.card() {
            if !card_ids.contains(&card_id) {
                issues.push(ImportIssue::UnresolvedReference {
                    collection: "fixedExpenses",
                    index,
                    reference: card_id.to_string(),
                });
            }
        }
    }

    for (index, row) in pending.iter().enumerate() {
        if !account_ids.contains(&row.account_id) {
            issues.push(ImportIssue::UnresolvedReference {
                collection: "pendingTransactions",
                index,
                reference: row.account_id.to_string(),
            });
        }
    }

    ImportCheck { issues }
}
