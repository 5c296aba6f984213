//! Error types for backend operations.

use thiserror::Error;

/// Errors a backend can raise.
///
/// Absence of a record or blob is normally reported as `Ok(None)`; the
/// `NotFound` variants exist for backends that can only signal it as an error.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Record not found.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Blob absent locally and not obtainable from peers.
    #[error("blob not found: {0}")]
    BlobNotFound(String),

    /// The backend lacks the named capability.
    #[error("capability not available: {0}")]
    Unsupported(&'static str),

    /// The backend gave up waiting.
    #[error("backend timed out: {0}")]
    Timeout(String),

    /// Record serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else the backend reports.
    #[error("{0}")]
    Other(String),
}

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;
