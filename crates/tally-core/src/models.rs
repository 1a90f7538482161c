//! Domain models for tally

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// SHA-256 hex digest of the password
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// The authenticated identity a ledger operation runs under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
}

/// An expense record
///
/// `date` carries a time of day: structured adds store midnight, quick-add
/// and default-dated duplicates store the wall-clock moment of creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub category: String,
    pub amount: f64,
    pub date: NaiveDateTime,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting a new expense
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub category: String,
    pub amount: f64,
    pub date: NaiveDateTime,
    pub description: String,
}

/// Partial update for an expense; only supplied fields change
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<NaiveDateTime>,
    pub description: Option<String>,
}

impl ExpenseUpdate {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.description.is_none()
    }
}
