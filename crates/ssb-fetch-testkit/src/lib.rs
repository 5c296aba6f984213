//! # ssb-fetch testkit
//!
//! Testing utilities for ssb-fetch.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known identifier and range cases with expected outputs
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: A feed keypair plus an in-memory backend, ready to fetch from
//!
//! ## Golden Vectors
//!
//! ```rust
//! use ssb_fetch_testkit::vectors::verify_all_vectors;
//!
//! verify_all_vectors().unwrap();
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use ssb_fetch_testkit::generators::sigil;
//!
//! proptest! {
//!     #[test]
//!     fn normalize_is_idempotent(raw in sigil()) {
//!         let id = ssb_fetch_core::normalize(&raw).unwrap();
//!         prop_assert_eq!(ssb_fetch_core::normalize(id.canonical_id()).unwrap(), id);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use ssb_fetch_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let blob = fixture.add_blob(b"a test blob").unwrap();
//! let fetcher = fixture.fetcher();
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, TestFixture, GIF_1X1, TEXT_BLOB};
pub use generators::{byte_ranges, sigil, ssb_uri};
pub use vectors::{all_vectors, range_vectors, verify_all_vectors, IdentifierVector, RangeVector};
