//! This module contains the error types for the persistence layer.

use thiserror::Error;

/// Errors that can occur in the persistence layer.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// A history file operation failed.
    #[error("A history file operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// An error occurred during serialization or deserialization.
    #[error("Failed to serialize or deserialize history data: {0}")]
    Serialization(#[from] serde_json::Error),
}
