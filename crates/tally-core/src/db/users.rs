//! User record operations

use rusqlite::{params, OptionalExtension};

use super::{parse_created_at, Database};
use crate::error::{Error, Result};
use crate::models::User;

impl Database {
    /// Create a user; fails with `DuplicateUser` when the username is taken
    pub fn create_user(&self, username: &str, password_hash: &str) -> Result<i64> {
        let conn = self.conn()?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM users WHERE username = ?",
                params![username],
                |row| row.get(0),
            )
            .optional()?;

        if existing.is_some() {
            return Err(Error::DuplicateUser);
        }

        conn.execute(
            "INSERT INTO users (username, password_hash) VALUES (?, ?)",
            params![username, password_hash],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Look up a user by username
    pub fn find_user(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn()?;

        let user = conn
            .query_row(
                "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
                params![username],
                |row| {
                    let created_at: String = row.get(3)?;
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password_hash: row.get(2)?,
                        created_at: parse_created_at(&created_at),
                    })
                },
            )
            .optional()?;

        Ok(user)
    }

    /// Count registered users
    pub fn count_users(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }
}
