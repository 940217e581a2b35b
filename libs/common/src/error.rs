//! Custom error types for the common library
//!
//! This module defines the store error taxonomy shared by every service.
//! Store failures are split into transient ones (safe to retry with backoff)
//! and everything else.

use sqlx::Error as SqlxError;
use std::time::Duration;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    pub fn is_transient(&self) -> bool {
        match self {
            DatabaseError::Connection(_) => true,
            DatabaseError::Query(e) => matches!(
                e,
                SqlxError::Io(_) | SqlxError::PoolTimedOut | SqlxError::PoolClosed
            ),
            DatabaseError::Configuration(_) => false,
        }
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Failure of a user/project store or of the key-value store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store did not answer within the configured bound
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// A stored row or value could not be decoded
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Whether retrying later may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Timeout(_) => true,
            StoreError::Database(e) => e.is_transient(),
            StoreError::Cache(e) => {
                e.is_io_error() || e.is_timeout() || e.is_connection_dropped()
                    || e.is_connection_refusal()
            }
            StoreError::Corrupt(_) => false,
        }
    }
}

impl From<SqlxError> for StoreError {
    fn from(e: SqlxError) -> Self {
        match e {
            SqlxError::Io(_) | SqlxError::PoolTimedOut | SqlxError::PoolClosed => {
                StoreError::Database(DatabaseError::Connection(e))
            }
            SqlxError::ColumnDecode { .. } | SqlxError::Decode(_) => {
                StoreError::Corrupt(e.to_string())
            }
            other => StoreError::Database(DatabaseError::Query(other)),
        }
    }
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

/// Invalid value in an environment variable
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid value for {var}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub reason: String,
}

impl ConfigError {
    pub fn new(var: &'static str, reason: impl Into<String>) -> Self {
        Self {
            var,
            reason: reason.into(),
        }
    }
}
