//! # ssb-fetch core
//!
//! Pure primitives for resolving SSB identifiers into HTTP-shaped responses.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over identifiers, header values and byte buffers.
//!
//! ## Key Types
//!
//! - [`Identifier`] - A normalized message, blob or feed identifier
//! - [`ByteRange`] - One requested byte range from a `Range` header
//! - [`Profile`] - A feed profile snapshot
//! - [`AboutFold`] - Per-field last-writer-wins reduction over about assertions
//!
//! ## Identifier Forms
//!
//! Identifiers arrive either as legacy sigils (`%<hash>.sha256`, `&<hash>.sha256`,
//! `@<key>.ed25519`) or as `ssb:` URIs. See [`ssb_ref`] for the exact rules.

pub mod content_type;
pub mod crypto;
pub mod error;
pub mod profile;
pub mod range;
pub mod ssb_ref;

pub use content_type::{resolve_type, JSON_MIME, OCTET_STREAM};
pub use crypto::{blob_id, message_id, Keypair};
pub use error::{CoreError, Result};
pub use profile::{fold_about, normalize_image, AboutFold, Profile, PROFILE_FIELDS};
pub use range::{parse_range, ByteRange};
pub use ssb_ref::{convert_legacy, normalize, Identifier, IdentifierKind};
