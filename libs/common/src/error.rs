//! Errors raised while configuring or talking to PostgreSQL
//!
//! Services wrap [`DatabaseError`] in their own error types (the inventory
//! store lifts it into `StoreError::Database`), so callers never see raw
//! `sqlx::Error` values.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Failure while configuring, connecting to or querying the database
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Pool could not be established
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Statement failed or a row could not be decoded
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Invalid `DATABASE_*` environment settings
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
