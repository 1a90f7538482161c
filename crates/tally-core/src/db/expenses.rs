//! Owner-scoped expense operations
//!
//! Every statement here carries a `user_id = ?` predicate; there is no way
//! to reach another user's records through this API.

use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Row};

use super::{format_expense_date, parse_created_at, parse_expense_date, Database};
use crate::error::Result;
use crate::models::{Expense, ExpenseUpdate, NewExpense};

/// Search criteria for `search_expenses`; all present criteria must match
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Case-insensitive substring matched against description OR category
    pub search_term: Option<String>,
    /// Inclusive lower bound on amount
    pub min_amount: Option<f64>,
    /// Inclusive upper bound on amount
    pub max_amount: Option<f64>,
    /// Only expenses dated on or after this moment
    pub since: Option<NaiveDateTime>,
}

fn row_to_expense(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let date: String = row.get(4)?;
    let created_at: String = row.get(6)?;
    Ok(Expense {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category: row.get(2)?,
        amount: row.get(3)?,
        date: parse_expense_date(&date),
        description: row.get(5)?,
        created_at: parse_created_at(&created_at),
    })
}

const EXPENSE_COLUMNS: &str = "id, user_id, category, amount, date, description, created_at";

impl Database {
    /// Insert an expense owned by `user_id`, returning the new id
    pub fn insert_expense(&self, user_id: i64, expense: &NewExpense) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO expenses (user_id, category, amount, date, description) VALUES (?, ?, ?, ?, ?)",
            params![
                user_id,
                expense.category,
                expense.amount,
                format_expense_date(&expense.date),
                expense.description,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Fetch one of the user's expenses by id
    pub fn get_expense(&self, user_id: i64, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;

        let expense = conn
            .query_row(
                &format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ? AND user_id = ?"),
                params![id, user_id],
                row_to_expense,
            )
            .optional()?;

        Ok(expense)
    }

    /// Apply a partial update; returns false when no matching record exists.
    /// Callers are expected to reject an empty update before reaching here.
    pub fn update_expense(&self, user_id: i64, id: i64, update: &ExpenseUpdate) -> Result<bool> {
        let conn = self.conn()?;

        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref category) = update.category {
            sets.push("category = ?");
            values.push(Box::new(category.clone()));
        }
        if let Some(amount) = update.amount {
            sets.push("amount = ?");
            values.push(Box::new(amount));
        }
        if let Some(ref date) = update.date {
            sets.push("date = ?");
            values.push(Box::new(format_expense_date(date)));
        }
        if let Some(ref description) = update.description {
            sets.push("description = ?");
            values.push(Box::new(description.clone()));
        }

        if sets.is_empty() {
            return Ok(false);
        }

        values.push(Box::new(id));
        values.push(Box::new(user_id));

        let sql = format!(
            "UPDATE expenses SET {} WHERE id = ? AND user_id = ?",
            sets.join(", ")
        );
        let value_refs: Vec<&dyn rusqlite::ToSql> = values.iter().map(|v| v.as_ref()).collect();
        let changed = conn.execute(&sql, value_refs.as_slice())?;

        Ok(changed > 0)
    }

    /// Delete one of the user's expenses; returns false when nothing matched
    pub fn delete_expense(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM expenses WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    /// All of the user's expenses, newest first
    pub fn list_expenses(&self, user_id: i64) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE user_id = ? ORDER BY date DESC"
        ))?;
        let expenses = stmt
            .query_map(params![user_id], row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(expenses)
    }

    /// The user's expenses in one category (exact match), newest first
    pub fn list_expenses_by_category(&self, user_id: i64, category: &str) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE user_id = ? AND category = ? ORDER BY date DESC"
        ))?;
        let expenses = stmt
            .query_map(params![user_id, category], row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(expenses)
    }

    /// The user's most recent expenses, newest first
    pub fn list_recent_expenses(&self, user_id: i64, limit: i64) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE user_id = ? ORDER BY date DESC LIMIT ?"
        ))?;
        let expenses = stmt
            .query_map(params![user_id, limit], row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(expenses)
    }

    /// The user's expenses with date in `[from, to)`, newest first
    pub fn expenses_in_range(
        &self,
        user_id: i64,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE user_id = ? AND date >= ? AND date < ? ORDER BY date DESC"
        ))?;
        let expenses = stmt
            .query_map(
                params![user_id, format_expense_date(&from), format_expense_date(&to)],
                row_to_expense,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(expenses)
    }

    /// The user's expenses dated on or after `since`, newest first
    pub fn expenses_since(&self, user_id: i64, since: NaiveDateTime) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE user_id = ? AND date >= ? ORDER BY date DESC"
        ))?;
        let expenses = stmt
            .query_map(params![user_id, format_expense_date(&since)], row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(expenses)
    }

    /// Search the user's expenses; filter criteria combine with AND
    pub fn search_expenses(&self, user_id: i64, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        let conn = self.conn()?;

        // Build dynamic WHERE clause
        let mut conditions = vec!["user_id = ?".to_string()];
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

        if let Some(ref term) = filter.search_term {
            if !term.trim().is_empty() {
                conditions.push(
                    "(description LIKE ? COLLATE NOCASE OR category LIKE ? COLLATE NOCASE)"
                        .to_string(),
                );
                let pattern = format!("%{}%", term.trim());
                values.push(Box::new(pattern.clone()));
                values.push(Box::new(pattern));
            }
        }

        if let Some(min) = filter.min_amount {
            conditions.push("amount >= ?".to_string());
            values.push(Box::new(min));
        }

        if let Some(max) = filter.max_amount {
            conditions.push("amount <= ?".to_string());
            values.push(Box::new(max));
        }

        if let Some(ref since) = filter.since {
            conditions.push("date >= ?".to_string());
            values.push(Box::new(format_expense_date(since)));
        }

        let sql = format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE {} ORDER BY date DESC",
            conditions.join(" AND ")
        );

        let mut stmt = conn.prepare(&sql)?;
        let value_refs: Vec<&dyn rusqlite::ToSql> = values.iter().map(|v| v.as_ref()).collect();
        let expenses = stmt
            .query_map(value_refs.as_slice(), row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// Count all of the user's expenses
    pub fn count_expenses(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM expenses WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Count every expense in the store (CLI status)
    pub fn count_all_expenses(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?;
        Ok(count)
    }
}
