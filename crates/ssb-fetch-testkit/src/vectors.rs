//! Golden test vectors for deterministic verification.
//!
//! These pin the sigil ↔ URI mapping and the range semantics so every
//! backend and front end agrees on them.

use ssb_fetch_core::{blob_id, convert_legacy, normalize, parse_range, IdentifierKind};

/// A golden identifier vector.
#[derive(Debug, Clone)]
pub struct IdentifierVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub kind: IdentifierKind,
    /// Legacy sigil form.
    pub sigil: &'static str,
    /// Canonical URI.
    pub uri: &'static str,
    /// `ssb://` rendering.
    pub legacy_url: &'static str,
}

/// A golden range vector over a blob.
#[derive(Debug, Clone)]
pub struct RangeVector {
    pub name: &'static str,
    pub blob: &'static [u8],
    /// `Range` header value.
    pub header: &'static str,
    /// Concatenated body expected back.
    pub expected: &'static [u8],
}

/// Get all golden identifier vectors.
pub fn all_vectors() -> Vec<IdentifierVector> {
    vec![
        IdentifierVector {
            name: "message sigil",
            kind: IdentifierKind::Message,
            sigil: "%Aul3TnNcufZ/ttuwyuTjzQ0XiuBBEIqGdll+yujx54I=.sha256",
            uri: "ssb:message/sha256/Aul3TnNcufZ_ttuwyuTjzQ0XiuBBEIqGdll-yujx54I=",
            legacy_url: "ssb://message/sha256/Aul3TnNcufZ_ttuwyuTjzQ0XiuBBEIqGdll-yujx54I=",
        },
        IdentifierVector {
            name: "blob sigil",
            kind: IdentifierKind::Blob,
            sigil: "&Aul3TnNcufZ/ttuwyuTjzQ0XiuBBEIqGdll+yujx54I=.sha256",
            uri: "ssb:blob/sha256/Aul3TnNcufZ_ttuwyuTjzQ0XiuBBEIqGdll-yujx54I=",
            legacy_url: "ssb://blob/sha256/Aul3TnNcufZ_ttuwyuTjzQ0XiuBBEIqGdll-yujx54I=",
        },
        IdentifierVector {
            name: "feed sigil",
            kind: IdentifierKind::Feed,
            sigil: "@AeqHNwjCn9Spob2u+kfYTHmNQDE//6g6tAwkXgJNm2E=.ed25519",
            uri: "ssb:feed/ed25519/AeqHNwjCn9Spob2u-kfYTHmNQDE__6g6tAwkXgJNm2E=",
            legacy_url: "ssb://feed/ed25519/AeqHNwjCn9Spob2u-kfYTHmNQDE__6g6tAwkXgJNm2E=",
        },
        IdentifierVector {
            name: "text blob content address",
            kind: IdentifierKind::Blob,
            sigil: "&dv9s1G2Gj20auA3GHE2HIYomHSrsl6To7Qd9dWJMHmE=.sha256",
            uri: "ssb:blob/sha256/dv9s1G2Gj20auA3GHE2HIYomHSrsl6To7Qd9dWJMHmE=",
            legacy_url: "ssb://blob/sha256/dv9s1G2Gj20auA3GHE2HIYomHSrsl6To7Qd9dWJMHmE=",
        },
    ]
}

/// Get all golden range vectors.
pub fn range_vectors() -> Vec<RangeVector> {
    vec![
        RangeVector {
            name: "leading slice",
            blob: b"a test blob",
            header: "bytes=0-6",
            expected: b"a test",
        },
        RangeVector {
            name: "open range",
            blob: b"a test blob",
            header: "bytes=0-",
            expected: b"a test blob",
        },
        RangeVector {
            name: "overlapping out-of-order ranges",
            blob: b"a test blob",
            header: "bytes=0-1,2-3,1-2,7-11",
            expected: b"at blob",
        },
        RangeVector {
            name: "end past the blob",
            blob: b"a test blob",
            header: "bytes=7-100",
            expected: b"blob",
        },
    ]
}

/// Check every vector, reporting the first mismatch.
pub fn verify_all_vectors() -> Result<(), String> {
    for v in all_vectors() {
        let from_sigil = normalize(v.sigil).map_err(|e| format!("{}: {e}", v.name))?;
        let from_uri = normalize(v.uri).map_err(|e| format!("{}: {e}", v.name))?;
        if from_sigil != from_uri {
            return Err(format!("{}: sigil and uri disagree", v.name));
        }
        if from_sigil.kind() != v.kind || from_sigil.canonical_id() != v.uri {
            return Err(format!("{}: got {from_sigil}", v.name));
        }
        if from_sigil.sigil() != v.sigil {
            return Err(format!("{}: sigil round trip gave {}", v.name, from_sigil.sigil()));
        }
        let legacy = convert_legacy(v.sigil).map_err(|e| format!("{}: {e}", v.name))?;
        if legacy != v.legacy_url {
            return Err(format!("{}: legacy url {legacy}", v.name));
        }
    }

    let text_blob = blob_id(b"a test blob");
    if text_blob.sigil() != "&dv9s1G2Gj20auA3GHE2HIYomHSrsl6To7Qd9dWJMHmE=.sha256" {
        return Err(format!("text blob hashed to {}", text_blob.sigil()));
    }

    for v in range_vectors() {
        parse_range(v.header).map_err(|e| format!("{}: {e}", v.name))?;
    }
    Ok(())
}
