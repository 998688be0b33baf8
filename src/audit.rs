//! Audit log entries
//!
//! An append-only description of state-changing events, kept in the
//! `auditLogs` store. Entries exist for explainability, not for state
//! reconstruction, and writing them never affects control flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{AccountId, AuditEntryId, CreditCardId, ExpenseId, Money};

/// Kinds of audited events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    /// A payment delta was applied against a fixed expense
    ExpensePayment,
    /// A pending transaction settled into its account
    PendingSettlement,
    /// An entity was created
    EntityCreated,
    /// An entity was deleted
    EntityDeleted,
    /// An import replaced the ledger state
    ImportApplied,
    /// A backup was restored over the ledger state
    BackupRestored,
}

impl std::fmt::Display for AuditKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditKind::ExpensePayment => write!(f, "expense_payment"),
            AuditKind::PendingSettlement => write!(f, "pending_settlement"),
            AuditKind::EntityCreated => write!(f, "entity_created"),
            AuditKind::EntityDeleted => write!(f, "entity_deleted"),
            AuditKind::ImportApplied => write!(f, "import_applied"),
            AuditKind::BackupRestored => write!(f, "backup_restored"),
        }
    }
}

/// A balance that an audited event touched, with its before/after values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entity", rename_all = "camelCase")]
pub enum AuditParticipant {
    #[serde(rename_all = "camelCase")]
    Account {
        account_id: AccountId,
        before: Money,
        after: Money,
    },
    #[serde(rename_all = "camelCase")]
    CreditCard {
        credit_card_id: CreditCardId,
        before: Money,
        after: Money,
    },
}

impl AuditParticipant {
    /// Participant row for an account balance change
    pub fn account(account_id: AccountId, before: Money, after: Money) -> Self {
        Self::Account {
            account_id,
            before,
            after,
        }
    }

    /// Participant row for a card balance change
    pub fn credit_card(credit_card_id: CreditCardId, before: Money, after: Money) -> Self {
        Self::CreditCard {
            credit_card_id,
            before,
            after,
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Unique identifier, assigned on append
    pub id: AuditEntryId,

    /// When the event occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// What happened
    pub kind: AuditKind,

    /// The expense involved, for payment events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_id: Option<ExpenseId>,

    /// Id of the affected entity, as a display string, for entity events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,

    /// Human-readable description of the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Paid amount (or entity snapshot) before the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// Paid amount (or entity snapshot) after the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Signed monetary delta applied by the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<Money>,

    /// Balances the event touched
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participants: Vec<AuditParticipant>,
}

impl AuditEntry {
    /// Entry for a payment applied against an expense
    pub fn payment(
        expense_id: ExpenseId,
        before_paid: Money,
        after_paid: Money,
        participants: Vec<AuditParticipant>,
    ) -> Self {
        Self {
            id: AuditEntryId::new(0),
            timestamp: Utc::now(),
            kind: AuditKind::ExpensePayment,
            expense_id: Some(expense_id),
            entity_id: None,
            description: None,
            before: serde_json::to_value(before_paid).ok(),
            after: serde_json::to_value(after_paid).ok(),
            delta: Some(after_paid - before_paid),
            participants,
        }
    }

    /// Entry for a settled pending transaction
    pub fn settlement(
        pending_id: impl Into<String>,
        amount: Money,
        participant: AuditParticipant,
    ) -> Self {
        Self {
            id: AuditEntryId::new(0),
            timestamp: Utc::now(),
            kind: AuditKind::PendingSettlement,
            expense_id: None,
            entity_id: Some(pending_id.into()),
            description: None,
            before: None,
            after: None,
            delta: Some(amount),
            participants: vec![participant],
        }
    }

    /// Entry for a created entity
    pub fn created<T: Serialize>(entity_id: impl Into<String>, entity: &T) -> Self {
        Self {
            id: AuditEntryId::new(0),
            timestamp: Utc::now(),
            kind: AuditKind::EntityCreated,
            expense_id: None,
            entity_id: Some(entity_id.into()),
            description: None,
            before: None,
            after: serde_json::to_value(entity).ok(),
            delta: None,
            participants: Vec::new(),
        }
    }

    /// Entry for a deleted entity
    pub fn deleted<T: Serialize>(entity_id: impl Into<String>, entity: &T) -> Self {
        Self {
            id: AuditEntryId::new(0),
            timestamp: Utc::now(),
            kind: AuditKind::EntityDeleted,
            expense_id: None,
            entity_id: Some(entity_id.into()),
            description: None,
            before: serde_json::to_value(entity).ok(),
            after: None,
            delta: None,
            participants: Vec::new(),
        }
    }

    /// Entry for a wholesale state replacement (import or restore)
    pub fn state_replaced(kind: AuditKind, description: impl Into<String>) -> Self {
        Self {
            id: AuditEntryId::new(0),
            timestamp: Utc::now(),
            kind,
            expense_id: None,
            entity_id: None,
            description: Some(description.into()),
            before: None,
            after: None,
            delta: None,
            participants: Vec::new(),
        }
    }

    /// Attach a human-readable description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
