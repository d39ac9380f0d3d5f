//! Error types for the history store

use thiserror::Error;

/// Errors returned by history operations
#[derive(Error, Debug)]
pub enum HistoryError {
    /// The backing key-value store could not be read or written
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// No entry carries the requested timestamp
    #[error("History entry not found: {0}")]
    EntryNotFound(i64),

    /// Caller supplied something the store cannot record
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for HistoryError {
    fn from(e: rusqlite::Error) -> Self {
        HistoryError::StorageUnavailable(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for HistoryError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        HistoryError::StorageUnavailable(format!("lock poisoned: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, HistoryError>;
