/*!
 * Error types for substore.
 *
 * Absence is never an error here: lookups return `Option`. These variants
 * cover the failures that do propagate to the caller.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the storage layer
#[derive(Error, Debug)]
pub enum StorageError {
    /// A score value could not be coerced to an integer
    #[error("Invalid subtitle score: {0}")]
    InvalidScore(String),

    /// Filesystem operation failed
    #[error("I/O error at {path:?}: {source}")]
    Io {
        /// Path the operation was working on
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A stored object could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key cannot be mapped to a single entry of the data directory
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// No usable data directory
    #[error("Data directory error: {0}")]
    DataDirectory(String),
}

impl StorageError {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;
