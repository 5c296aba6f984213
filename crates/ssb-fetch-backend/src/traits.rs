//! Backend trait: the capability interface onto the log engine.
//!
//! Resolution never touches storage or the network directly. Everything it
//! needs from the host (records, blobs, profile indexes) goes through
//! [`Backend`], so any log engine can sit behind it.

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{Map, Value};

use ssb_fetch_core::Identifier;

use crate::error::{BackendError, Result};

/// Optional indexes a backend may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Latest-value index over about assertions.
    pub about: bool,
    /// Backlink index (required alongside `about`).
    pub backlinks: bool,
    /// Single-shot index of self-authored about assertions.
    pub about_self: bool,
}

impl Capabilities {
    pub const ABOUT: &'static str = "ssb-about";
    pub const BACKLINKS: &'static str = "ssb-backlinks";
    pub const ABOUT_SELF: &'static str = "ssb-db2/about-self";

    /// The about + backlinks pair.
    pub const fn about_and_backlinks() -> Self {
        Self {
            about: true,
            backlinks: true,
            about_self: false,
        }
    }

    /// Only the self-authored profile index.
    pub const fn about_self_only() -> Self {
        Self {
            about: false,
            backlinks: false,
            about_self: true,
        }
    }

    /// No profile indexes at all.
    pub const fn none() -> Self {
        Self {
            about: false,
            backlinks: false,
            about_self: false,
        }
    }

    /// Names of the capabilities missing for profile resolution.
    ///
    /// Empty when either the about-self index or the about + backlinks pair
    /// is available.
    pub fn missing_for_profiles(&self) -> Vec<&'static str> {
        if self.about_self {
            return Vec::new();
        }
        let mut missing = Vec::new();
        if !self.about {
            missing.push(Self::ABOUT);
        }
        if !self.backlinks {
            missing.push(Self::BACKLINKS);
        }
        missing
    }
}

/// The Backend trait: async interface to records, blobs and profile indexes.
///
/// A backend is opened once per process and shared by every request.
///
/// # Design Notes
///
/// - **Absence is not an error**: lookups return `Ok(None)` for unknown ids.
/// - **Slices clamp**: `get_blob_slice` with an end past the blob returns
///   bytes through the real end; a start past the end returns empty bytes.
/// - **One want per call**: `want_blob` asks peers once and reports whether
///   the blob became available locally.
#[async_trait]
pub trait Backend: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Records
    // ─────────────────────────────────────────────────────────────────────────

    /// Get a record (key, value, timestamp) by message id.
    async fn get_record(&self, id: &Identifier) -> Result<Option<Value>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Blobs
    // ─────────────────────────────────────────────────────────────────────────

    /// Check whether a blob is stored locally.
    async fn has_blob(&self, id: &Identifier) -> Result<bool>;

    /// Ask peers for a blob and wait until it is found or given up on.
    async fn want_blob(&self, id: &Identifier) -> Result<bool>;

    /// Get a whole blob.
    async fn get_blob(&self, id: &Identifier) -> Result<Option<Bytes>>;

    /// Get the bytes `[start, end)` of a blob; `end == None` reads through the end.
    async fn get_blob_slice(
        &self,
        id: &Identifier,
        start: u64,
        end: Option<u64>,
    ) -> Result<Option<Bytes>>;

    /// Get a blob's size in bytes.
    async fn blob_size(&self, id: &Identifier) -> Result<Option<u64>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Profile indexes
    // ─────────────────────────────────────────────────────────────────────────

    /// Which profile indexes this backend provides.
    fn capabilities(&self) -> Capabilities;

    /// Latest value of `field` asserted about `feed`, by stream order.
    async fn latest_about_value(&self, feed: &Identifier, field: &str) -> Result<Option<Value>>;

    /// All latest self-asserted profile fields for `feed`.
    async fn about_self_profile(&self, _feed: &Identifier) -> Result<Option<Map<String, Value>>> {
        Err(BackendError::Unsupported(Capabilities::ABOUT_SELF))
    }
}

/// Extension trait for common backend patterns.
pub trait BackendExt: Backend {
    /// Make sure a blob is available locally, asking peers once if it is not.
    fn ensure_blob(
        &self,
        id: &Identifier,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;
}

impl<B: Backend + ?Sized> BackendExt for B {
    async fn ensure_blob(&self, id: &Identifier) -> Result<bool> {
        if self.has_blob(id).await? {
            return Ok(true);
        }

        tracing::debug!(blob = %id, "blob not stored locally, asking peers");
        self.want_blob(id).await
    }
}
