//! Business logic layer
//!
//! Services validate inputs, read through the store's transactional API,
//! and emit audit entries. The payment engine lives here too; it is the
//! only code path allowed to mutate balances.

pub mod account;
pub mod category;
pub mod expense;
pub mod import;
pub mod payment;
pub mod pending;

pub use account::AccountService;
pub use category::CategoryService;
pub use expense::{
    sort_expenses, CreateExpenseInput, ExpenseFilter, ExpenseService, StatusFilter,
};
pub use import::ImportService;
pub use payment::PaymentService;
pub use pending::{CreatePendingInput, PendingService};
