//! Error types for draft persistence

use std::path::PathBuf;

/// Failures of the underlying key-value storage
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Key cannot be mapped onto the storage medium
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// Storing the value would exceed the store's capacity
    #[error("storage quota exceeded for '{key}': {needed} bytes needed, {available} available")]
    QuotaExceeded {
        /// Key being written
        key: String,
        /// Bytes the write needs
        needed: usize,
        /// Bytes still free
        available: usize,
    },

    /// Filesystem failure
    #[error("i/o error at {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Failures while saving or loading a draft
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    /// Storage rejected the operation
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Record could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
