//! Error types for request resolution.

use ssb_fetch_backend::BackendError;
use ssb_fetch_core::CoreError;
use thiserror::Error;

/// Errors that can occur while resolving a request.
///
/// Every variant maps onto exactly one response status, see [`FetchError::status`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// Bad URL, identifier or header.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// No record with this id.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Blob absent locally and not obtained from peers.
    #[error("blob not found: {0}")]
    BlobNotFound(String),

    /// Profile indexes the backend does not provide.
    #[error("missing capabilities: {}", .0.join(", "))]
    MissingCapability(Vec<&'static str>),

    /// Any other backend failure.
    #[error("backend error: {0}")]
    Backend(BackendError),
}

impl From<BackendError> for FetchError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotFound(id) => FetchError::NotFound(id),
            BackendError::BlobNotFound(id) => FetchError::BlobNotFound(id),
            BackendError::Unsupported(name) => FetchError::MissingCapability(vec![name]),
            other => FetchError::Backend(other),
        }
    }
}

impl FetchError {
    /// HTTP status this error is reported with.
    pub fn status(&self) -> u16 {
        match self {
            FetchError::Core(_) => 400,
            FetchError::NotFound(_)
            | FetchError::BlobNotFound(_)
            | FetchError::MissingCapability(_) => 404,
            FetchError::Backend(_) => 500,
        }
    }

    /// Whether this is a server-side fault rather than a caller mistake.
    pub fn is_internal(&self) -> bool {
        self.status() >= 500
    }

    /// Plain-text explanation for the caller.
    ///
    /// Internal failures get a generic apology plus `hint`; their details
    /// are logged, never sent.
    pub fn ui_message(&self, hint: &str) -> String {
        match self {
            FetchError::Core(CoreError::InvalidProtocol(url)) => {
                format!("BadRequestError:Only ssb: URLs can be fetched [{url}]")
            }
            FetchError::Core(CoreError::InvalidIdentifier(raw)) => format!(
                "BadRequestError:Key *must* be a valid ssb message, blob or feed id [{raw}]"
            ),
            FetchError::Core(CoreError::MalformedRange(header)) => {
                format!("BadRequestError:Malformed Range header [{header}]")
            }
            FetchError::NotFound(id) => format!("NotFoundError:Key not found in database [{id}]"),
            FetchError::BlobNotFound(id) => {
                format!("NotFoundError:Key blob not found in database [{id}]")
            }
            FetchError::MissingCapability(plugins) => {
                format!("MissingPlugins: Profiles need {} plugins", plugins.join(" and "))
            }
            FetchError::Backend(_) => format!("Server error. Sorry about that! {hint}"),
        }
    }

    /// Structured body for capability errors.
    pub fn capability_body(&self) -> Option<serde_json::Value> {
        match self {
            FetchError::MissingCapability(plugins) => Some(serde_json::json!({
                "error": self.ui_message(""),
                "plugins": plugins,
            })),
            _ => None,
        }
    }
}

/// Result type for resolution.
pub type Result<T> = std::result::Result<T, FetchError>;
