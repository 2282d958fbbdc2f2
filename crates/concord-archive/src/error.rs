//! Error types for archiving

use thiserror::Error;

/// Errors that can occur while archiving or verifying a bundle
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Value could not be serialized, or bytes are not JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The sink refused the bytes
    #[error("Sink error: {0}")]
    Sink(String),
}

/// Result type for archive operations
pub type Result<T> = std::result::Result<T, ArchiveError>;
