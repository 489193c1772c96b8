//! Store Errors
//!
//! Error types for storage operations.

/// Errors that can occur in a store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error while {operation}: {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// Backend refused or lost the operation
    #[error("Storage unavailable while {operation}")]
    Unavailable { operation: &'static str },

    /// Constraint violated by the write
    #[error("Constraint violation while {operation}: {detail}")]
    Constraint {
        operation: &'static str,
        detail: String,
    },

    /// Stored row could not be decoded
    #[error("Invalid stored data while {operation}: {detail}")]
    InvalidData {
        operation: &'static str,
        detail: String,
    },
}

impl StoreError {
    /// What the store was doing when it failed
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Database { operation, .. }
            | Self::Unavailable { operation }
            | Self::Constraint { operation, .. }
            | Self::InvalidData { operation, .. } => operation,
        }
    }
}

/// Wrap a sqlx error with the operation that produced it
pub(crate) fn database(operation: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |source| StoreError::Database { operation, source }
}
