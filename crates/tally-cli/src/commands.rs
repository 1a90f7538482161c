//! Command implementations

use anyhow::{Context, Result};
use tracing::info;

use tally_core::Database;

/// Open (and migrate) the database at the given path
pub fn open_db(path: &str) -> Result<Database> {
    Database::new(path).with_context(|| format!("Failed to open database at {}", path))
}

pub fn cmd_init(db_path: &str) -> Result<()> {
    let db = open_db(db_path)?;
    info!("Database initialized at {}", db.path());
    println!("Database initialized at {}", db.path());
    Ok(())
}

pub fn cmd_status(db_path: &str) -> Result<()> {
    let db = open_db(db_path)?;
    let users = db.count_users()?;
    let expenses = db.count_all_expenses()?;
    println!("Database: {}", db.path());
    println!("Users:    {}", users);
    println!("Expenses: {}", expenses);
    Ok(())
}

pub async fn cmd_serve(db_path: &str, host: &str, port: u16) -> Result<()> {
    let db = open_db(db_path)?;
    tally_server::start_mcp_server(db, host, port).await
}
