//! Proptest generators for property-based testing.

use proptest::prelude::*;

use ssb_fetch_core::{ByteRange, Identifier, IdentifierKind, Keypair};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate an identifier kind.
pub fn identifier_kind() -> impl Strategy<Value = IdentifierKind> {
    prop_oneof![
        Just(IdentifierKind::Message),
        Just(IdentifierKind::Blob),
        Just(IdentifierKind::Feed),
    ]
}

/// Generate an identifier over a random 32-byte payload.
pub fn identifier() -> impl Strategy<Value = Identifier> {
    (identifier_kind(), any::<[u8; 32]>()).prop_filter_map("valid identifier", |(kind, bytes)| {
        let algorithm = match kind {
            IdentifierKind::Feed => "ed25519",
            _ => "sha256",
        };
        Identifier::from_bytes(kind, algorithm, &bytes).ok()
    })
}

/// Generate a legacy sigil string.
pub fn sigil() -> impl Strategy<Value = String> {
    identifier().prop_map(|id| id.sigil())
}

/// Generate a canonical `ssb:` URI string.
pub fn ssb_uri() -> impl Strategy<Value = String> {
    identifier().prop_map(|id| id.canonical_id().to_string())
}

/// Generate one range spec, closed or open.
pub fn byte_range(max: u64) -> impl Strategy<Value = ByteRange> {
    (0..=max, prop::option::of(0..=max)).prop_map(|(start, len)| match len {
        Some(len) => ByteRange::new(start, start + len),
        None => ByteRange::open(start),
    })
}

/// Generate a non-empty list of range specs.
pub fn byte_ranges(max: u64) -> impl Strategy<Value = Vec<ByteRange>> {
    prop::collection::vec(byte_range(max), 1..=6)
}

/// Render ranges as a `Range` header value.
pub fn range_header(ranges: &[ByteRange]) -> String {
    let specs: Vec<String> = ranges.iter().map(ToString::to_string).collect();
    format!("bytes={}", specs.join(","))
}

/// Generate blob contents of at most `max_len` bytes.
pub fn blob_bytes(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}
