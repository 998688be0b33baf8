//! Custom error types for Digibook
//!
//! This module defines the error hierarchy for the ledger using thiserror
//! for ergonomic error definitions. Expected validation findings are
//! returned as data by the validation layer; the variants here are the
//! failures that abort an operation.

use thiserror::Error;

/// The main error type for Digibook operations
#[derive(Error, Debug)]
pub enum DigibookError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// A payment source resolves only partially: the expense exists but a
    /// referenced account or card does not
    #[error("{entity_type} referenced by payment source is missing: {identifier}")]
    DanglingReference {
        entity_type: &'static str,
        identifier: String,
    },

    /// Structural violation of the payment-source union
    #[error("Invalid payment source: {0}")]
    InvalidPaymentSource(String),

    /// Payment exceeds the funding account balance
    #[error("Insufficient funds: requested {requested} cents, available {available} cents")]
    InsufficientFunds { requested: i64, available: i64 },

    /// A concurrent update on the same expense is already in flight
    #[error("Expense {identifier} has an update in progress")]
    Busy { identifier: String },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Entity cannot be deleted while something still references it
    #[error("{entity_type} {identifier} is still referenced and cannot be deleted")]
    InUse {
        entity_type: &'static str,
        identifier: String,
    },

    /// The on-disk schema was written by a newer version of the application
    #[error("Database schema version {found} is newer than supported version {supported}")]
    SchemaTooNew { found: u32, supported: u32 },

    /// Import/backup payload is structurally broken
    #[error("Malformed payload: {0}")]
    Malformed(String),

    /// Decryption failed because the password is wrong
    #[error("Incorrect password")]
    BadPassword,

    /// The persistence layer failed to commit; the caller sees unchanged state
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Encryption errors
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Backup creation or restore errors
    #[error("Backup error: {0}")]
    Backup(String),
}

impl DigibookError {
    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for credit cards
    pub fn credit_card_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "CreditCard",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for fixed expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "FixedExpense",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for pending transactions
    pub fn pending_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "PendingTransaction",
            identifier: identifier.into(),
        }
    }

    /// Create a dangling-reference error for accounts
    pub fn dangling_account(identifier: impl Into<String>) -> Self {
        Self::DanglingReference {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Create a dangling-reference error for credit cards
    pub fn dangling_credit_card(identifier: impl Into<String>) -> Self {
        Self::DanglingReference {
            entity_type: "CreditCard",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidPaymentSource(_))
    }

    /// Check if this is a busy rejection
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for DigibookError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DigibookError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Digibook operations
pub type DigibookResult<T> = Result<T, DigibookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DigibookError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = DigibookError::expense_not_found("exp-10");
        assert_eq!(err.to_string(), "FixedExpense not found: exp-10");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_busy_error() {
        let err = DigibookError::Busy {
            identifier: "exp-3".into(),
        };
        assert!(err.is_busy());
        assert_eq!(err.to_string(), "Expense exp-3 has an update in progress");
    }

    #[test]
    fn test_schema_too_new_display() {
        let err = DigibookError::SchemaTooNew {
            found: 7,
            supported: 1,
        };
        assert_eq!(
            err.to_string(),
            "Database schema version 7 is newer than supported version 1"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DigibookError = io_err.into();
        assert!(matches!(err, DigibookError::Io(_)));
    }
}
