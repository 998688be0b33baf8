//! Digibook - single-user personal-finance ledger
//!
//! Digibook tracks bank accounts, credit cards, pending transactions, and
//! recurring ("fixed") expenses, and derives projected balances, payment
//! schedules, and budget-vs-actual insight. The heart of the crate is the
//! payment engine: the rules for how a payment against an expense mutates
//! account and card balances, how credit-card payments route funds between
//! two balances atomically, and how derived values stay consistent.
//!
//! # Architecture
//!
//! The crate is organized into the following modules, leaves first:
//!
//! - `config`: path resolution and application settings
//! - `error`: the crate-wide error type
//! - `models`: entity model, including the `PaymentSource` union
//! - `validation`: pure structural and semantic validators
//! - `storage`: the single-file transactional store
//! - `audit`: append-only audit entries
//! - `services`: the command layer, including the payment engine
//! - `reports`: pure derivations (projections, schedule, budget, payoff)
//! - `cache`: TTL cache between derivations and the store
//! - `crypto`, `export`, `backup`: encrypted export and checksum-verified
//!   snapshots
//!
//! # Example
//!
//! ```rust,ignore
//! use digibook::config::DigibookPaths;
//! use digibook::services::PaymentService;
//! use digibook::storage::Store;
//!
//! let paths = DigibookPaths::new()?;
//! paths.ensure_directories()?;
//! let store = Store::open(paths.database_file())?;
//! PaymentService::new(&store).mark_paid(expense_id)?;
//! ```

pub mod audit;
pub mod backup;
pub mod cache;
pub mod config;
pub mod crypto;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;
pub mod validation;

pub use error::{DigibookError, DigibookResult};
pub use models::{Money, PaymentSource};
pub use storage::Store;
