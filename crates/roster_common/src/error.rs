// --- File: crates/roster_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for all Roster errors.
///
/// Each crate extends this by implementing `From<SpecificError> for RosterError`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// A request body is missing a required field, carries an unknown one,
    /// or a value has the wrong type
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A record with the same identifier or unique field already exists
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// The requested record does not exist
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// The collection holds no records
    #[error("Empty: {0}")]
    EmptyError(String),

    /// Error occurred during database operation
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for RosterError {
    fn status_code(&self) -> u16 {
        match self {
            RosterError::ValidationError(_) => 400,
            RosterError::ConflictError(_) => 409,
            RosterError::NotFoundError(_) => 404,
            RosterError::EmptyError(_) => 404,
            RosterError::DatabaseError(_) => 500,
            RosterError::ConfigError(_) => 500,
            RosterError::InternalError(_) => 500,
        }
    }
}

impl RosterError {
    /// Whether the caller, rather than the server, is at fault.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

// Utility functions for error handling
pub fn validation_error<T: fmt::Display>(message: T) -> RosterError {
    RosterError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> RosterError {
    RosterError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> RosterError {
    RosterError::ConflictError(message.to_string())
}

pub fn empty<T: fmt::Display>(message: T) -> RosterError {
    RosterError::EmptyError(message.to_string())
}

pub fn internal_error<T: fmt::Display>(message: T) -> RosterError {
    RosterError::InternalError(message.to_string())
}
