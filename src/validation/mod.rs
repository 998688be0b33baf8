//! Validation layer
//!
//! Pure, store-free checks that run before any write reaches persistence.
//! Validators report expected findings as data; only programming errors
//! would panic here.

pub mod entity;
pub mod import;
pub mod payment;

pub use entity::{
    check_source_category, validate_account, validate_category, validate_payment_source,
    AccountCheck, AccountInput, CategoryCheck, CategoryInput, PaymentSourceInput,
    SanitizedAccount, SanitizedCategory, ValidationError,
};
pub use import::{validate_import, ImportCheck, ImportIssue};
pub use payment::{
    assess_credit_card_payment, PaymentAssessment, PaymentError, PaymentSuggestion,
    PaymentWarning, SuggestionKind,
};
