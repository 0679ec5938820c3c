//! Error types for storage operations

use std::fmt;

/// Result type alias for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing the durable files
#[derive(Debug)]
pub enum StoreError {
    /// I/O error (file access, rename, etc.)
    Io(std::io::Error),

    /// Record serialization/deserialization error
    Serialization(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(err) => write!(f, "I/O error: {}", err),
            StoreError::Serialization(err) => write!(f, "record serialization error: {}", err),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(err) => Some(err),
            StoreError::Serialization(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err)
    }
}
