//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use ssb_fetch::{FetchConfig, Fetcher};
use ssb_fetch_backend::{Capabilities, MemoryBackend, Result};
use ssb_fetch_core::{Identifier, Keypair};

/// Plain text blob used throughout the tests.
pub const TEXT_BLOB: &[u8] = b"a test blob";

/// A 1x1 transparent GIF.
pub const GIF_1X1: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xff, 0xff, 0xff, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x01, 0x44, 0x00, 0x3b,
];

/// A test fixture with a feed keypair and a memory backend.
///
/// Fixtures made by [`multi_party_fixtures`] share one backend.
pub struct TestFixture {
    pub keypair: Keypair,
    pub backend: Arc<MemoryBackend>,
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    /// Create a new test fixture with a random keypair.
    pub fn new() -> Self {
        Self::with_capabilities(Capabilities::about_and_backlinks())
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            keypair: Keypair::from_seed(&seed),
            backend: Arc::new(MemoryBackend::new()),
        }
    }

    /// Create with a backend exposing exactly `capabilities`.
    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        Self {
            keypair: Keypair::generate(),
            backend: Arc::new(MemoryBackend::with_capabilities(capabilities)),
        }
    }

    /// Another identity publishing into the same backend.
    pub fn peer(&self) -> Self {
        Self {
            keypair: Keypair::generate(),
            backend: Arc::clone(&self.backend),
        }
    }

    pub fn feed_id(&self) -> Identifier {
        self.keypair.feed_id()
    }

    /// Publish arbitrary content.
    pub fn publish(&self, content: Value) -> Result<Identifier> {
        self.backend.publish(&self.keypair, content)
    }

    /// Publish a `post` message.
    pub fn post(&self, text: &str) -> Result<Identifier> {
        self.publish(json!({ "type": "post", "text": text }))
    }

    /// Publish an about assertion on this fixture's own feed.
    pub fn about_self(&self, fields: Value) -> Result<Identifier> {
        self.about(&self.feed_id(), fields)
    }

    /// Publish an about assertion on `subject`.
    ///
    /// `fields` must be a JSON object; anything else asserts nothing.
    pub fn about(&self, subject: &Identifier, fields: Value) -> Result<Identifier> {
        let mut content = Map::new();
        content.insert("type".into(), json!("about"));
        content.insert("about".into(), json!(subject.sigil()));
        if let Value::Object(fields) = fields {
            content.extend(fields);
        }
        self.publish(Value::Object(content))
    }

    pub fn add_blob(&self, bytes: &'static [u8]) -> Result<Identifier> {
        self.backend.add_blob(bytes)
    }

    /// Make a blob that only peers hold.
    pub fn add_remote_blob(&self, bytes: &'static [u8]) -> Result<Identifier> {
        self.backend.add_remote_blob(bytes)
    }

    /// A fetcher over this fixture's backend with the default configuration.
    pub fn fetcher(&self) -> Fetcher<MemoryBackend> {
        self.fetcher_with(FetchConfig::default())
    }

    pub fn fetcher_with(&self, config: FetchConfig) -> Fetcher<MemoryBackend> {
        Fetcher::from_shared(Arc::clone(&self.backend), config)
    }
}

/// Create `count` identities publishing into one shared backend.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    let first = TestFixture::new();
    let mut fixtures: Vec<TestFixture> = (1..count).map(|_| first.peer()).collect();
    fixtures.insert(0, first);
    fixtures.truncate(count);
    fixtures
}
