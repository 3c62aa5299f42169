//! # Store Errors

use std::io;

use thiserror::Error;

use crate::person::PersonId;

/// Result type for durable log operations
pub type LogResult<T> = Result<T, LogError>;

/// Result type for person service operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the durable log and its codec
#[derive(Debug, Error)]
pub enum LogError {
    #[error("Log file not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed log at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("Person {0} not found in log")]
    MissingRow(PersonId),
}

impl LogError {
    /// A missing log file means "no data yet" to the reconciler
    pub fn is_not_found(&self) -> bool {
        matches!(self, LogError::NotFound(_))
    }
}

/// The id counter cannot advance past the given id without overflowing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Person id {0} leaves no room for a next id")]
pub struct IdOverflow(pub PersonId);

/// Which persistence step failed; selects the message returned to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOp {
    Load,
    Save,
    Update,
    Delete,
}

impl PersistOp {
    pub fn message(&self) -> &'static str {
        match self {
            PersistOp::Load => "Failed to load data from CSV",
            PersistOp::Save => "Failed to save data to CSV",
            PersistOp::Update => "Failed to update data in CSV",
            PersistOp::Delete => "Failed to delete data from CSV",
        }
    }
}

/// Errors surfaced by person service operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid ID")]
    InvalidId(String),

    #[error("Invalid JSON payload")]
    InvalidJson(String),

    #[error("Invalid Name")]
    InvalidName(String),

    #[error("Person not found")]
    NotFound(PersonId),

    #[error("{}", .op.message())]
    Persistence {
        op: PersistOp,
        #[source]
        source: LogError,
    },

    #[error("Person id space exhausted")]
    IdsExhausted(#[from] IdOverflow),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn persistence(op: PersistOp, source: LogError) -> Self {
        StoreError::Persistence { op, source }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::InvalidId(_) => 400,
            StoreError::InvalidJson(_) => 400,
            StoreError::InvalidName(_) => 400,
            StoreError::NotFound(_) => 404,
            StoreError::Persistence { .. } => 500,
            StoreError::IdsExhausted(_) => 500,
            StoreError::Internal(_) => 500,
        }
    }

    /// Malformed input is the caller's fault and is never worth retrying
    pub fn is_malformed_input(&self) -> bool {
        self.status_code() == 400
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(StoreError::InvalidId("abc".into()).status_code(), 400);
        assert_eq!(StoreError::InvalidName("Bob3".into()).status_code(), 400);
        assert_eq!(StoreError::NotFound(7).status_code(), 404);
        let err = StoreError::persistence(PersistOp::Save, LogError::NotFound("x".into()));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_persistence_message_names_the_step() {
        let err = StoreError::persistence(PersistOp::Delete, LogError::MissingRow(3));
        assert_eq!(err.to_string(), "Failed to delete data from CSV");
        assert!(!err.is_malformed_input());
    }

    #[test]
    fn test_exhausted_ids_are_a_server_error() {
        let err = StoreError::from(IdOverflow(PersonId::MAX));
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.to_string(), "Person id space exhausted");
    }

    #[test]
    fn test_not_found_is_distinguished() {
        assert!(LogError::NotFound("persons.csv".into()).is_not_found());
        assert!(!LogError::MissingRow(1).is_not_found());
    }
}
