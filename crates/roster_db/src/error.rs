//! Error types for the record stores

use roster_common::RosterError;
use thiserror::Error;

/// Errors that can occur when working with a record store
#[derive(Debug, Error)]
pub enum DbError {
    /// Error with the database configuration
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Error with database URL parsing
    #[error("Database URL error: {0}")]
    UrlError(String),

    /// Error with database pool creation
    #[error("Database pool error: {0}")]
    PoolError(String),

    /// Error with database query
    #[error("Database query error: {0}")]
    QueryError(String),

    /// Error with database transaction
    #[error("Database transaction error: {0}")]
    TransactionError(String),

    /// A row with the same identifier already exists
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// A stored row could not be turned back into a record
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Other errors
    #[error("Other database error: {0}")]
    Other(String),
}

impl DbError {
    /// Maps a driver error, recognising unique-constraint violations.
    pub fn from_query(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DbError::DuplicateKey(db_err.message().to_string())
            }
            _ => DbError::QueryError(err.to_string()),
        }
    }
}

/// Convert DbError to RosterError
impl From<DbError> for RosterError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::DuplicateKey(msg) => RosterError::ConflictError(msg),
            DbError::ConfigError(msg) | DbError::UrlError(msg) => RosterError::ConfigError(msg),
            other => RosterError::DatabaseError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_common::HttpStatusCode;

    #[test]
    fn test_duplicate_key_maps_to_conflict() {
        let err: RosterError = DbError::DuplicateKey("members.id".into()).into();
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn test_driver_errors_become_query_errors() {
        let err = DbError::from_query(sqlx::Error::RowNotFound);
        assert!(matches!(err, DbError::QueryError(_)));
    }

    #[test]
    fn test_query_error_maps_to_server_error() {
        let err: RosterError = DbError::QueryError("syntax".into()).into();
        assert_eq!(err.status_code(), 500);
    }
}
