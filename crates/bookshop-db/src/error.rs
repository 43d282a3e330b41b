//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationError (bookshop-core)    sqlx::Error                        │
//! │       │                                  │                              │
//! │       └──────────────┬───────────────────┘                              │
//! │                      ▼                                                  │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Host application shows the message                                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bookshop_core::ValidationError;
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Input rejected before any SQL ran.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - The pre-query `COUNT(*)` for an id returned zero
    /// - Login with an unknown username
    #[error("{entity} id \"{id}\" not found")]
    NotFound { entity: String, id: String },

    /// Application-level unique key collision, detected before insert.
    ///
    /// ## When This Occurs
    /// - Adding a book whose name+author pair already exists
    /// - Registering a username that is taken
    #[error("{0} is already added")]
    AlreadyExists(String),

    /// Unique constraint violation reported by SQLite.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// Only with `DbConfig::enforce_foreign_keys(true)`, e.g. an order for a
    /// user id that does not exist.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Credentials did not match.
    #[error("{0}")]
    Authentication(String),

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Runtime SQL error.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (the single connection is busy).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity label and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates an AlreadyExists error from a description of the clashing key.
    pub fn already_exists(what: impl Into<String>) -> Self {
        DbError::AlreadyExists(what.into())
    }

    /// True for the "not found" category.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // "UNIQUE constraint failed: <table>.<column>"
                // "FOREIGN KEY constraint failed"
                if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::UniqueViolation {
                        field: field.to_string(),
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = DbError::not_found("book", 12345678);
        assert_eq!(err.to_string(), "book id \"12345678\" not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_validation_is_transparent() {
        let err: DbError = ValidationError::required("book name").into();
        assert_eq!(err.to_string(), "missing book name");
    }

    #[test]
    fn test_already_exists_message() {
        let err = DbError::already_exists("username \"doej\"");
        assert_eq!(err.to_string(), "username \"doej\" is already added");
    }
}
