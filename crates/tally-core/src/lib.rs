//! Tally Core Library
//!
//! Shared functionality for the tally expense ledger:
//! - Database access and migrations
//! - Session guard for the authenticated identity
//! - Query, report, and budget tool implementations
//! - Quick-add free-text parsing

pub mod budget;
pub mod db;
pub mod error;
pub mod models;
pub mod quick_add;
pub mod session;
pub mod tools;

pub use budget::{BudgetPeriod, BudgetStatus};
pub use db::Database;
pub use error::{Error, Result};
pub use models::{Expense, Identity, User};
pub use session::SessionGuard;
