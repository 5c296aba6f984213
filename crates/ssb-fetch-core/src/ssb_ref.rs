//! SSB identifiers: legacy sigils and canonical `ssb:` URIs.
//!
//! Three identifier families exist (messages, blobs, feeds). Each can be
//! written either as a legacy sigil such as `%<base64>.sha256`, or as a
//! URI such as `ssb:message/sha256/<urlsafe-base64>`. [`normalize`] accepts
//! both and produces an [`Identifier`] whose canonical form is always the URI.

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};

/// The URI scheme prefix for canonical identifiers.
pub const SCHEME: &str = "ssb:";

/// Which family an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    /// A log entry (`%` sigil).
    Message,
    /// An immutable binary object (`&` sigil).
    Blob,
    /// An author's feed (`@` sigil).
    Feed,
}

impl IdentifierKind {
    /// The leading character of the legacy sigil form.
    pub const fn sigil(self) -> char {
        match self {
            IdentifierKind::Message => '%',
            IdentifierKind::Blob => '&',
            IdentifierKind::Feed => '@',
        }
    }

    /// The type segment of the URI form.
    pub const fn uri_type(self) -> &'static str {
        match self {
            IdentifierKind::Message => "message",
            IdentifierKind::Blob => "blob",
            IdentifierKind::Feed => "feed",
        }
    }

    /// Classify by sigil character.
    pub fn from_sigil(c: char) -> Option<Self> {
        match c {
            '%' => Some(IdentifierKind::Message),
            '&' => Some(IdentifierKind::Blob),
            '@' => Some(IdentifierKind::Feed),
            _ => None,
        }
    }

    /// Classify by URI type segment.
    pub fn from_uri_type(s: &str) -> Option<Self> {
        match s {
            "message" => Some(IdentifierKind::Message),
            "blob" => Some(IdentifierKind::Blob),
            "feed" => Some(IdentifierKind::Feed),
            _ => None,
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri_type())
    }
}

/// A validated, normalized identifier.
///
/// Two identifiers compare equal iff they name the same object, regardless
/// of whether they were parsed from a sigil or a URI.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier {
    kind: IdentifierKind,
    algorithm: String,
    /// URL-safe base64 payload, padded.
    payload: String,
    canonical_id: String,
}

impl Identifier {
    /// Build an identifier from raw hash/key bytes.
    pub fn from_bytes(kind: IdentifierKind, algorithm: &str, bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() || !is_algorithm_token(algorithm) {
            return Err(CoreError::InvalidIdentifier(format!(
                "{}:{}",
                kind.uri_type(),
                algorithm
            )));
        }
        Ok(Self::assemble(kind, algorithm, URL_SAFE.encode(bytes)))
    }

    /// Build from non-empty bytes and a known-good algorithm constant.
    pub(crate) fn from_known(kind: IdentifierKind, algorithm: &'static str, bytes: &[u8]) -> Self {
        Self::assemble(kind, algorithm, URL_SAFE.encode(bytes))
    }

    fn assemble(kind: IdentifierKind, algorithm: &str, payload: String) -> Self {
        let canonical_id = format!("{}{}/{}/{}", SCHEME, kind.uri_type(), algorithm, payload);
        Self {
            kind,
            algorithm: algorithm.to_string(),
            payload,
            canonical_id,
        }
    }

    /// The identifier family.
    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }

    /// The hash or key algorithm suffix, e.g. `sha256` or `ed25519`.
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// The canonical URI form: `ssb:<type>/<algorithm>/<urlsafe-payload>`.
    pub fn canonical_id(&self) -> &str {
        &self.canonical_id
    }

    /// The decoded payload bytes.
    pub fn payload_bytes(&self) -> Vec<u8> {
        // The payload was produced by URL_SAFE.encode, so decoding cannot fail.
        URL_SAFE.decode(&self.payload).unwrap_or_default()
    }

    /// The legacy sigil form, e.g. `%<base64>.sha256`.
    pub fn sigil(&self) -> String {
        let payload: String = self
            .payload
            .chars()
            .map(|c| match c {
                '-' => '+',
                '_' => '/',
                other => other,
            })
            .collect();
        format!("{}{}.{}", self.kind.sigil(), payload, self.algorithm)
    }

    /// The `ssb://` URL form produced for legacy sigil conversion.
    pub fn to_legacy_url(&self) -> String {
        format!(
            "ssb://{}/{}/{}",
            self.kind.uri_type(),
            self.algorithm,
            self.payload
        )
    }

    pub fn is_message(&self) -> bool {
        self.kind == IdentifierKind::Message
    }

    pub fn is_blob(&self) -> bool {
        self.kind == IdentifierKind::Blob
    }

    pub fn is_feed(&self) -> bool {
        self.kind == IdentifierKind::Feed
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self.canonical_id)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_id)
    }
}

impl FromStr for Identifier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        normalize(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self> {
        normalize(&s)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.canonical_id
    }
}

/// Parse a legacy sigil or an `ssb:` URI into an [`Identifier`].
///
/// The kind is decided by the sigil character or the URI type segment,
/// never by the shape of the payload.
pub fn normalize(raw: &str) -> Result<Identifier> {
    let raw = raw.trim();
    if let Some(rest) = raw.strip_prefix(SCHEME) {
        return parse_uri(raw, rest);
    }

    match raw.chars().next().and_then(IdentifierKind::from_sigil) {
        Some(kind) => parse_sigil(raw, kind),
        None => Err(invalid(raw)),
    }
}

/// Convert a sigil (or any accepted form) into its `ssb://` URL.
pub fn convert_legacy(raw: &str) -> Result<String> {
    Ok(normalize(raw)?.to_legacy_url())
}

fn parse_sigil(raw: &str, kind: IdentifierKind) -> Result<Identifier> {
    let body = &raw[kind.sigil().len_utf8()..];
    let (payload, algorithm) = body.rsplit_once('.').ok_or_else(|| invalid(raw))?;

    if payload.is_empty() || !is_algorithm_token(algorithm) {
        return Err(invalid(raw));
    }

    let bytes = STANDARD.decode(payload).map_err(|_| invalid(raw))?;
    if bytes.is_empty() {
        return Err(invalid(raw));
    }

    Ok(Identifier::assemble(kind, algorithm, URL_SAFE.encode(bytes)))
}

fn parse_uri(raw: &str, rest: &str) -> Result<Identifier> {
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let rest = rest.split(['?', '#']).next().unwrap_or_default();

    let mut segments = rest.split('/');
    let (Some(ty), Some(algorithm), Some(payload), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(invalid(raw));
    };

    let kind = IdentifierKind::from_uri_type(ty).ok_or_else(|| invalid(raw))?;
    if payload.is_empty() || !is_algorithm_token(algorithm) {
        return Err(invalid(raw));
    }

    let payload = payload.replace("%3D", "=").replace("%3d", "=");
    let bytes = URL_SAFE.decode(&payload).map_err(|_| invalid(raw))?;
    if bytes.is_empty() {
        return Err(invalid(raw));
    }

    Ok(Identifier::assemble(kind, algorithm, URL_SAFE.encode(bytes)))
}

fn is_algorithm_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn invalid(raw: &str) -> CoreError {
    CoreError::InvalidIdentifier(raw.to_string())
}
