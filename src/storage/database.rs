//! The single ledger document
//!
//! All object stores live in one serializable `Database` value: accounts,
//! credit cards, fixed expenses, pending transactions, categories, the
//! paycheck-settings singleton, user preferences, and the audit log, plus
//! the id sequences and schema version. A transaction clones the document,
//! mutates the clone, and commits it wholesale, which is what makes
//! multi-store mutations atomic.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::audit::AuditEntry;
use crate::models::{
    Account, AccountId, AuditEntryId, Category, CategoryId, CreditCard, CreditCardId, ExpenseId,
    FixedExpense, PaycheckSettings, PendingTransaction, PendingTransactionId, DEFAULT_CATEGORIES,
};

/// Schema version written by this build
pub const SCHEMA_VERSION: u32 = 1;

/// Monotonic id sequences, one per collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sequences {
    pub accounts: u64,
    pub credit_cards: u64,
    pub categories: u64,
    pub fixed_expenses: u64,
    pub pending_transactions: u64,
    pub audit_logs: u64,
}

impl Default for Sequences {
    fn default() -> Self {
        Self {
            accounts: 1,
            credit_cards: 1,
            categories: 1,
            fixed_expenses: 1,
            pending_transactions: 1,
            audit_logs: 1,
        }
    }
}

impl Sequences {
    fn next(counter: &mut u64) -> u64 {
        let id = *counter;
        *counter += 1;
        id
    }
}

/// The full ledger state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    /// Store schema version; opening a newer version fails
    pub schema_version: u32,

    /// Id sequences for all collections
    #[serde(default)]
    pub sequences: Sequences,

    #[serde(default)]
    pub accounts: Vec<Account>,

    #[serde(default)]
    pub credit_cards: Vec<CreditCard>,

    #[serde(default)]
    pub fixed_expenses: Vec<FixedExpense>,

    #[serde(default)]
    pub pending_transactions: Vec<PendingTransaction>,

    #[serde(default)]
    pub categories: Vec<Category>,

    /// Lazily-created singleton
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paycheck_settings: Option<PaycheckSettings>,

    /// Component-keyed preference map, written atomically with the rest
    #[serde(default)]
    pub user_preferences: BTreeMap<String, serde_json::Value>,

    #[serde(default)]
    pub audit_logs: Vec<AuditEntry>,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            sequences: Sequences::default(),
            accounts: Vec::new(),
            credit_cards: Vec::new(),
            fixed_expenses: Vec::new(),
            pending_transactions: Vec::new(),
            categories: Vec::new(),
            paycheck_settings: None,
            user_preferences: BTreeMap::new(),
            audit_logs: Vec::new(),
        }
    }
}

impl Database {
    /// Fresh database seeded with the default categories
    pub fn seeded() -> Self {
        let mut db = Self::default();
        db.seed_default_categories();
        db
    }

    /// Insert any missing default categories
    pub fn seed_default_categories(&mut self) {
        for (name, color, icon) in DEFAULT_CATEGORIES {
            if self.category_by_name(name).is_none() {
                let id = self.next_category_id();
                let mut category = Category::new(id, *name, *color, *icon);
                category.is_default = true;
                self.categories.push(category);
            }
        }
    }

    // ---- id allocation ----

    pub fn next_account_id(&mut self) -> AccountId {
        AccountId::new(Sequences::next(&mut self.sequences.accounts))
    }

    pub fn next_credit_card_id(&mut self) -> CreditCardId {
        CreditCardId::new(Sequences::next(&mut self.sequences.credit_cards))
    }

    pub fn next_category_id(&mut self) -> CategoryId {
        CategoryId::new(Sequences::next(&mut self.sequences.categories))
    }

    pub fn next_expense_id(&mut self) -> ExpenseId {
        ExpenseId::new(Sequences::next(&mut self.sequences.fixed_expenses))
    }

    pub fn next_pending_id(&mut self) -> PendingTransactionId {
        PendingTransactionId::new(Sequences::next(&mut self.sequences.pending_transactions))
    }

    /// Recompute sequences from the highest id in each collection; used
    /// after an import or restore replaces the collections wholesale
    pub fn rebuild_sequences(&mut self) {
        fn beyond<I: Iterator<Item = u64>>(ids: I) -> u64 {
            ids.max().map_or(1, |m| m + 1)
        }
        self.sequences = Sequences {
            accounts: beyond(self.accounts.iter().map(|a| a.id.raw())),
            credit_cards: beyond(self.credit_cards.iter().map(|c| c.id.raw())),
            categories: beyond(self.categories.iter().map(|c| c.id.raw())),
            fixed_expenses: beyond(self.fixed_expenses.iter().map(|e| e.id.raw())),
            pending_transactions: beyond(self.pending_transactions.iter().map(|p| p.id.raw())),
            audit_logs: beyond(self.audit_logs.iter().map(|a| a.id.raw())),
        };
    }

    // ---- accounts ----

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn account_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.id == id)
    }

    pub fn remove_account(&mut self, id: AccountId) -> Option<Account> {
        let idx = self.accounts.iter().position(|a| a.id == id)?;
        Some(self.accounts.remove(idx))
    }

    /// The default account, when any account exists
    pub fn default_account(&self) -> Option<&Account> {
        self.accounts.iter().find(|a| a.is_default)
    }

    // ---- credit cards ----

    pub fn credit_card(&self, id: CreditCardId) -> Option<&CreditCard> {
        self.credit_cards.iter().find(|c| c.id == id)
    }

    pub fn credit_card_mut(&mut self, id: CreditCardId) -> Option<&mut CreditCard> {
        self.credit_cards.iter_mut().find(|c| c.id == id)
    }

    pub fn remove_credit_card(&mut self, id: CreditCardId) -> Option<CreditCard> {
        let idx = self.credit_cards.iter().position(|c| c.id == id)?;
        Some(self.credit_cards.remove(idx))
    }

    // ---- categories ----

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Case-insensitive lookup by name
    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        let needle = crate::models::normalize_name(name);
        self.categories
            .iter()
            .find(|c| c.normalized_name() == needle)
    }

    pub fn remove_category(&mut self, id: CategoryId) -> Option<Category> {
        let idx = self.categories.iter().position(|c| c.id == id)?;
        Some(self.categories.remove(idx))
    }

    // ---- fixed expenses ----

    pub fn expense(&self, id: ExpenseId) -> Option<&FixedExpense> {
        self.fixed_expenses.iter().find(|e| e.id == id)
    }

    pub fn expense_mut(&mut self, id: ExpenseId) -> Option<&mut FixedExpense> {
        self.fixed_expenses.iter_mut().find(|e| e.id == id)
    }

    pub fn remove_expense(&mut self, id: ExpenseId) -> Option<FixedExpense> {
        let idx = self.fixed_expenses.iter().position(|e| e.id == id)?;
        Some(self.fixed_expenses.remove(idx))
    }

    // ---- pending transactions ----

    pub fn pending(&self, id: PendingTransactionId) -> Option<&PendingTransaction> {
        self.pending_transactions.iter().find(|p| p.id == id)
    }

    pub fn remove_pending(&mut self, id: PendingTransactionId) -> Option<PendingTransaction> {
        let idx = self.pending_transactions.iter().position(|p| p.id == id)?;
        Some(self.pending_transactions.remove(idx))
    }

    /// Pending transactions targeting an account
    pub fn pending_for_account(&self, account_id: AccountId) -> Vec<&PendingTransaction> {
        self.pending_transactions
            .iter()
            .filter(|p| p.account_id == account_id)
            .collect()
    }

    // ---- paycheck settings ----

    /// The singleton, lazily created with empty defaults
    pub fn paycheck_settings_mut(&mut self) -> &mut PaycheckSettings {
        self.paycheck_settings
            .get_or_insert_with(PaycheckSettings::default)
    }

    // ---- audit ----

    /// Append an audit entry, assigning its id and timestamp order
    pub fn append_audit(&mut self, mut entry: AuditEntry) {
        entry.id = AuditEntryId::new(Sequences::next(&mut self.sequences.audit_logs));
        entry.timestamp = Utc::now();
        self.audit_logs.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountType, Money, PaymentSource};

    #[test]
    fn test_seeded_database_has_default_categories() {
        let db = Database::seeded();
        assert_eq!(db.categories.len(), DEFAULT_CATEGORIES.len());
        assert!(db.categories.iter().all(|c| c.is_default));
        assert!(db.category_by_name("credit card payment").is_some());
    }

    #[test]
    fn test_seeding_twice_does_not_duplicate() {
        let mut db = Database::seeded();
        db.seed_default_categories();
        assert_eq!(db.categories.len(), DEFAULT_CATEGORIES.len());
    }

    #[test]
    fn test_id_allocation_is_monotonic() {
        let mut db = Database::default();
        let a = db.next_account_id();
        let b = db.next_account_id();
        assert_eq!(a, AccountId::new(1));
        assert_eq!(b, AccountId::new(2));
        // Other collections have independent sequences
        assert_eq!(db.next_expense_id(), ExpenseId::new(1));
    }

    #[test]
    fn test_rebuild_sequences() {
        let mut db = Database::default();
        db.accounts.push(Account::new(
            AccountId::new(9),
            "A",
            AccountType::Checking,
            Money::zero(),
        ));
        db.rebuild_sequences();
        assert_eq!(db.next_account_id(), AccountId::new(10));
        assert_eq!(db.next_credit_card_id(), CreditCardId::new(1));
    }

    #[test]
    fn test_lookup_and_remove() {
        let mut db = Database::default();
        let id = db.next_account_id();
        db.accounts
            .push(Account::new(id, "A", AccountType::Checking, Money::zero()));

        assert!(db.account(id).is_some());
        assert!(db.remove_account(id).is_some());
        assert!(db.account(id).is_none());
        assert!(db.remove_account(id).is_none());
    }

    #[test]
    fn test_paycheck_settings_lazily_created() {
        let mut db = Database::default();
        assert!(db.paycheck_settings.is_none());
        db.paycheck_settings_mut();
        assert_eq!(db.paycheck_settings, Some(PaycheckSettings::default()));
    }

    #[test]
    fn test_append_audit_assigns_ids() {
        let mut db = Database::default();
        let expense = FixedExpense::new(
            ExpenseId::new(1),
            "Rent",
            Money::from_major(100),
            "Housing",
            PaymentSource::Account {
                account_id: AccountId::new(1),
            },
        );
        db.append_audit(AuditEntry::created(expense.id.to_string(), &expense));
        db.append_audit(AuditEntry::deleted(expense.id.to_string(), &expense));
        assert_eq!(db.audit_logs[0].id, AuditEntryId::new(1));
        assert_eq!(db.audit_logs[1].id, AuditEntryId::new(2));
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut db = Database::seeded();
        db.user_preferences
            .insert("dashboard".into(), serde_json::json!({"collapsed": true}));
        let json = serde_json::to_string(&db).unwrap();
        let back: Database = serde_json::from_str(&json).unwrap();
        assert_eq!(back, db);
    }
}
