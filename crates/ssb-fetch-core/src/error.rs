//! Error types for ssb-fetch core.

use thiserror::Error;

/// Errors raised while parsing caller-supplied input.
///
/// None of these ever reach the backend: they are detected before
/// resolution begins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The request URL does not use the `ssb:` scheme.
    #[error("invalid protocol: {0}")]
    InvalidProtocol(String),

    /// The string is neither a legacy sigil nor a recognised ssb URI.
    #[error("invalid ssb identifier: {0}")]
    InvalidIdentifier(String),

    /// The Range header is not of the form `bytes=<start>-<end>[, ...]`.
    #[error("malformed range: {0}")]
    MalformedRange(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
