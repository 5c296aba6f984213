//! # ssb-fetch
//!
//! Resolves `ssb:` URLs (messages, blobs and feed profiles) into
//! HTTP-shaped responses, against whatever log engine the host provides.
//!
//! ## Overview
//!
//! A request goes through four steps:
//!
//! - **Normalize**: the `ssb:` URL becomes an [`Identifier`](core::Identifier)
//! - **Resolve**: messages become records, blobs become bytes (optionally
//!   sliced by a `Range` header), feeds become profiles
//! - **Type**: blob bytes are sniffed for a content type
//! - **Render**: status, headers and body are assembled; errors become
//!   4xx/5xx responses instead of failing the call
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ssb_fetch::{FetchConfig, FetchRequest, Fetcher};
//! use ssb_fetch::backend::MemoryBackend;
//!
//! async fn example() {
//!     let backend = MemoryBackend::new();
//!     let blob = backend.add_blob(&b"a test blob"[..]).unwrap();
//!
//!     let fetcher = Fetcher::new(backend, FetchConfig::default());
//!     let request = FetchRequest::get(blob.canonical_id()).with_range("bytes=0-6");
//!
//!     let response = fetcher.fetch(&request).await;
//!     assert_eq!(response.status, 206);
//!     assert_eq!(response.text(), Some("a test"));
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `ssb_fetch::core` - Identifiers, ranges, content types, profiles
//! - `ssb_fetch::backend` - The backend trait and the in-memory backend

pub mod config;
pub mod error;
pub mod fetcher;
pub mod profile;
pub mod request;
pub mod resolve;
pub mod response;

pub use ssb_fetch_backend as backend;
pub use ssb_fetch_core as core;

pub use config::FetchConfig;
pub use error::{FetchError, Result};
pub use fetcher::Fetcher;
pub use profile::aggregate_profile;
pub use request::{FetchRequest, Method};
pub use resolve::{resolve_blob, resolve_record};
pub use response::{build_response, HttpResponse, ResolvedPayload, ResponseBuilder};
