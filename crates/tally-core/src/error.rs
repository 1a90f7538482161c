//! Error types for tally

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Not logged in. Please log in first using the 'login' tool.")]
    NotAuthenticated,

    #[error("Username already exists. Please choose another.")]
    DuplicateUser,

    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("Invalid date: {0}. Use YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid period: {0}. Use 'week', 'month', or 'year'")]
    InvalidPeriod(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Could not find an amount in the text. Please include a number like '$15' or '25.50'")]
    NoAmountFound,

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
