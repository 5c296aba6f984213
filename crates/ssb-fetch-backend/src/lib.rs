//! # ssb-fetch backend
//!
//! Capability interface onto the log engine that ssb-fetch resolves against.
//!
//! ## Overview
//!
//! Resolution is storage-agnostic: records, blobs and profile indexes are
//! reached only through the [`Backend`] trait. The host supplies a real log
//! engine; [`MemoryBackend`] is provided for tests and embedding.
//!
//! ## Key Types
//!
//! - [`Backend`] - The async trait for all backend operations
//! - [`BackendExt`] - Helpers built on top of it
//! - [`Capabilities`] - Which optional profile indexes a backend has
//! - [`MemoryBackend`] - In-memory log, blob store and peer pool
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ssb_fetch_backend::{Backend, MemoryBackend};
//! use ssb_fetch_core::Keypair;
//! use serde_json::json;
//!
//! async fn example() {
//!     let backend = MemoryBackend::new();
//!     let keypair = Keypair::generate();
//!
//!     let id = backend
//!         .publish(&keypair, json!({ "type": "post", "text": "hello" }))
//!         .unwrap();
//!     let record = backend.get_record(&id).await.unwrap();
//!     assert!(record.is_some());
//! }
//! ```

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{BackendError, Result};
pub use memory::MemoryBackend;
pub use traits::{Backend, BackendExt, Capabilities};
