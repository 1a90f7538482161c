//! Group-aggregate queries for summaries and budget checks

use chrono::NaiveDateTime;
use rusqlite::params;

use super::{format_expense_date, Database};
use crate::error::Result;

/// Per-category aggregate row
#[derive(Debug, Clone)]
pub struct CategoryTotal {
    pub category: String,
    pub total_amount: f64,
    pub count: i64,
}

impl Database {
    /// Per-category totals over all of the user's expenses, largest first
    pub fn category_totals(&self, user_id: i64) -> Result<Vec<CategoryTotal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT category, COALESCE(SUM(amount), 0), COUNT(*)
            FROM expenses
            WHERE user_id = ?
            GROUP BY category
            ORDER BY SUM(amount) DESC
            "#,
        )?;
        let totals = stmt
            .query_map(params![user_id], |row| {
                Ok(CategoryTotal {
                    category: row.get(0)?,
                    total_amount: row.get(1)?,
                    count: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(totals)
    }

    /// Sum and count of one category's expenses dated on or after `since`
    pub fn category_spend_since(
        &self,
        user_id: i64,
        category: &str,
        since: NaiveDateTime,
    ) -> Result<(f64, i64)> {
        let conn = self.conn()?;
        let (total, count): (f64, i64) = conn.query_row(
            r#"
            SELECT COALESCE(SUM(amount), 0), COUNT(*)
            FROM expenses
            WHERE user_id = ? AND category = ? AND date >= ?
            "#,
            params![user_id, category, format_expense_date(&since)],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok((total, count))
    }
}
