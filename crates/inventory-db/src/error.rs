//! # Database Error Types
//!
//! Error types for store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationError (inventory-core)  ─┐                                  │
//! │  CoreError::UnknownTarget          ─┼──► DbError (this module)         │
//! │  SQLite Error (sqlx::Error)        ─┘        │                          │
//! │                                              ▼                          │
//! │                                   Screen shows a message               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation and target errors are raised before any statement runs, so the
//! table is unchanged when they occur. Everything else is a storage failure.

use inventory_core::{CoreError, ValidationError};
use thiserror::Error;

/// Store operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Field validation failed; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The address does not resolve to the collection or an item.
    #[error("Unknown target: {address}")]
    UnknownTarget { address: String },

    /// A configuration value could not be used.
    #[error("Invalid configuration value for {key}: '{value}'")]
    InvalidConfig { key: String, value: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Pool closed during shutdown
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Schema creation or upgrade failed.
    ///
    /// ## When This Occurs
    /// - The file was written by a newer schema version
    /// - DDL failed (disk full, read-only file)
    #[error("Schema setup failed: {0}")]
    SchemaFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Insert completed without yielding a row id.
    #[error("Insert failed: {0}")]
    InsertFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// True for caller-correctable field errors.
    pub fn is_validation(&self) -> bool {
        matches!(self, DbError::Validation(_))
    }

    /// True for failures of the underlying engine.
    pub fn is_storage(&self) -> bool {
        !matches!(
            self,
            DbError::Validation(_) | DbError::UnknownTarget { .. } | DbError::InvalidConfig { .. }
        )
    }

    pub(crate) fn invalid_config(key: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::InvalidConfig {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → DbError::QueryFailed (engine message)
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::PoolClosed     → DbError::ConnectionFailed
/// sqlx::Error::Io             → DbError::ConnectionFailed
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => DbError::QueryFailed(db_err.message().to_string()),

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::Io(io) => DbError::ConnectionFailed(io.to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<CoreError> for DbError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownTarget { address } => DbError::UnknownTarget { address },
            CoreError::Validation(v) => DbError::Validation(v),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_core::Column;

    #[test]
    fn test_classification() {
        let v = DbError::from(ValidationError::MissingField { field: Column::Name });
        assert!(v.is_validation());
        assert!(!v.is_storage());

        let t = DbError::from(CoreError::unknown_target("x"));
        assert!(matches!(t, DbError::UnknownTarget { ref address } if address == "x"));
        assert!(!t.is_storage());

        assert!(DbError::PoolExhausted.is_storage());
        assert!(DbError::QueryFailed("boom".into()).is_storage());
    }

    #[test]
    fn test_sqlx_mapping() {
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::PoolExhausted
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::ConnectionFailed(_)
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::RowNotFound),
            DbError::Internal(_)
        ));
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = DbError::from(ValidationError::InvalidValue {
            field: Column::QuantityKg,
        });
        assert_eq!(err.to_string(), "quantity_kg must not be negative");
    }
}
