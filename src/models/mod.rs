//! Core data models for Digibook
//!
//! Entities are plain serde structs; all invariants that span entities are
//! enforced by the validation layer and the services.

pub mod account;
pub mod category;
pub mod credit_card;
pub mod expense;
pub mod ids;
pub mod money;
pub mod paycheck;
pub mod pending;

pub use account::{Account, AccountType};
pub use category::{normalize_name, Category, CREDIT_CARD_PAYMENT, DEFAULT_CATEGORIES};
pub use credit_card::CreditCard;
pub use expense::{ExpenseStatus, FixedExpense, PaymentSource};
pub use ids::{
    AccountId, AuditEntryId, CategoryId, CreditCardId, ExpenseId, PendingTransactionId,
};
pub use money::{Money, MoneyParseError};
pub use paycheck::{PayFrequency, PaycheckSettings};
pub use pending::PendingTransaction;
