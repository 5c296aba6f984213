//! In-memory implementation of the Backend trait.
//!
//! This is primarily for testing and embedding. It keeps an append-only log
//! of signed records, a local blob store, and a pool of blobs "held by
//! peers" that `want_blob` can pull from. Nothing is persisted.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{json, Map, Value};

use ssb_fetch_core::crypto::{blob_id, message_id, Keypair, SHA256};
use ssb_fetch_core::{normalize, AboutFold, Identifier};

use crate::error::{BackendError, Result};
use crate::traits::{Backend, Capabilities};

/// In-memory backend.
///
/// All data is lost when the backend is dropped. Thread-safe via RwLock.
pub struct MemoryBackend {
    inner: RwLock<MemoryBackendInner>,
    capabilities: Capabilities,
}

#[derive(Default)]
struct MemoryBackendInner {
    /// Records indexed by message id.
    records: HashMap<Identifier, Value>,

    /// Message ids in append order.
    log: Vec<Identifier>,

    /// Per-feed head: (sequence, previous message sigil).
    heads: HashMap<Identifier, (u64, String)>,

    /// About assertions from any author.
    about: AboutFold,

    /// About assertions an author made about themselves.
    about_self: AboutFold,

    /// Blobs stored locally.
    blobs: HashMap<Identifier, Bytes>,

    /// Blobs only peers have.
    remote_blobs: HashMap<Identifier, Bytes>,

    /// Want requests issued, in order.
    wants: Vec<Identifier>,
}

impl MemoryBackend {
    /// Create an empty backend with the about + backlinks indexes.
    pub fn new() -> Self {
        Self::with_capabilities(Capabilities::about_and_backlinks())
    }

    /// Create an empty backend exposing exactly `capabilities`.
    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        Self {
            inner: RwLock::new(MemoryBackendInner::default()),
            capabilities,
        }
    }

    /// Append a signed record with `content` to `keypair`'s feed.
    ///
    /// Returns the new message id.
    pub fn publish(&self, keypair: &Keypair, content: Value) -> Result<Identifier> {
        let mut inner = self.write()?;
        let author = keypair.feed_id();

        let (sequence, previous) = match inner.heads.get(&author) {
            Some((seq, prev)) => (seq + 1, Value::String(prev.clone())),
            None => (1, Value::Null),
        };

        let timestamp = now_millis();
        let mut value = Map::new();
        value.insert("previous".into(), previous);
        value.insert("sequence".into(), json!(sequence));
        value.insert("author".into(), Value::String(author.sigil()));
        value.insert("timestamp".into(), json!(timestamp));
        value.insert("hash".into(), Value::String(SHA256.into()));
        value.insert("content".into(), content.clone());

        let unsigned = serde_json::to_vec_pretty(&value)?;
        value.insert("signature".into(), Value::String(keypair.sign(&unsigned)));

        let key = message_id(&serde_json::to_vec_pretty(&value)?);
        let record = json!({
            "key": key.sigil(),
            "value": value,
            "timestamp": timestamp,
        });

        inner.about.apply(&content);
        let self_asserted = content
            .get("about")
            .and_then(Value::as_str)
            .and_then(|s| normalize(s).ok())
            .is_some_and(|subject| subject == author);
        if self_asserted {
            inner.about_self.apply(&content);
        }

        inner.records.insert(key.clone(), record);
        inner.log.push(key.clone());
        inner.heads.insert(author, (sequence, key.sigil()));

        tracing::debug!(message = %key, sequence, "published record");
        Ok(key)
    }

    /// Store a blob locally, returning its id.
    pub fn add_blob(&self, bytes: impl Into<Bytes>) -> Result<Identifier> {
        let bytes = bytes.into();
        let id = blob_id(&bytes);
        self.write()?.blobs.insert(id.clone(), bytes);
        Ok(id)
    }

    /// Make a blob available from peers only, returning its id.
    pub fn add_remote_blob(&self, bytes: impl Into<Bytes>) -> Result<Identifier> {
        let bytes = bytes.into();
        let id = blob_id(&bytes);
        self.write()?.remote_blobs.insert(id.clone(), bytes);
        Ok(id)
    }

    /// Number of want requests issued for `id`.
    pub fn want_count(&self, id: &Identifier) -> usize {
        self.read()
            .map(|inner| inner.wants.iter().filter(|w| *w == id).count())
            .unwrap_or_default()
    }

    /// Number of records in the log.
    pub fn record_count(&self) -> usize {
        self.read().map(|inner| inner.log.len()).unwrap_or_default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, MemoryBackendInner>> {
        self.inner
            .read()
            .map_err(|_| BackendError::Other("memory backend lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, MemoryBackendInner>> {
        self.inner
            .write()
            .map_err(|_| BackendError::Other("memory backend lock poisoned".into()))
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn get_record(&self, id: &Identifier) -> Result<Option<Value>> {
        Ok(self.read()?.records.get(id).cloned())
    }

    async fn has_blob(&self, id: &Identifier) -> Result<bool> {
        Ok(self.read()?.blobs.contains_key(id))
    }

    async fn want_blob(&self, id: &Identifier) -> Result<bool> {
        let mut inner = self.write()?;
        inner.wants.push(id.clone());

        match inner.remote_blobs.remove(id) {
            Some(bytes) => {
                tracing::debug!(blob = %id, len = bytes.len(), "blob received from peer");
                inner.blobs.insert(id.clone(), bytes);
                Ok(true)
            }
            None => Ok(inner.blobs.contains_key(id)),
        }
    }

    async fn get_blob(&self, id: &Identifier) -> Result<Option<Bytes>> {
        Ok(self.read()?.blobs.get(id).cloned())
    }

    async fn get_blob_slice(
        &self,
        id: &Identifier,
        start: u64,
        end: Option<u64>,
    ) -> Result<Option<Bytes>> {
        let inner = self.read()?;
        let Some(blob) = inner.blobs.get(id) else {
            return Ok(None);
        };

        let len = blob.len();
        let start = clamp(start, len);
        let end = end.map_or(len, |e| clamp(e, len)).max(start);
        Ok(Some(blob.slice(start..end)))
    }

    async fn blob_size(&self, id: &Identifier) -> Result<Option<u64>> {
        Ok(self.read()?.blobs.get(id).map(|b| b.len() as u64))
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    async fn latest_about_value(&self, feed: &Identifier, field: &str) -> Result<Option<Value>> {
        if !self.capabilities.about {
            return Err(BackendError::Unsupported(Capabilities::ABOUT));
        }
        Ok(self.read()?.about.latest(feed, field).cloned())
    }

    async fn about_self_profile(&self, feed: &Identifier) -> Result<Option<Map<String, Value>>> {
        if !self.capabilities.about_self {
            return Err(BackendError::Unsupported(Capabilities::ABOUT_SELF));
        }
        Ok(self.read()?.about_self.fields(feed).cloned())
    }
}

fn clamp(offset: u64, len: usize) -> usize {
    usize::try_from(offset).map_or(len, |o| o.min(len))
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
