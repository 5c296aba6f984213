//! Feed keys and content addresses.
//!
//! Wraps Ed25519 signing and SHA-256 hashing, producing values in the
//! encodings the log uses: base64 payloads with a `.sha256` / `.ed25519`
//! algorithm suffix.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};

use crate::ssb_ref::{Identifier, IdentifierKind};

/// Algorithm suffix for content hashes.
pub const SHA256: &str = "sha256";

/// Algorithm suffix for feed keys.
pub const ED25519: &str = "ed25519";

/// SHA-256 of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Standard base64 of the SHA-256 of `data`.
pub fn sha256_base64(data: &[u8]) -> String {
    STANDARD.encode(sha256(data))
}

fn content_address(kind: IdentifierKind, data: &[u8]) -> Identifier {
    Identifier::from_known(kind, SHA256, &sha256(data))
}

/// Blob identifier for the given bytes.
pub fn blob_id(data: &[u8]) -> Identifier {
    content_address(IdentifierKind::Blob, data)
}

/// Message identifier for the given serialized record value.
pub fn message_id(encoded_value: &[u8]) -> Identifier {
    content_address(IdentifierKind::Message, encoded_value)
}

/// A feed signing keypair.
///
/// This wraps ed25519-dalek's SigningKey.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::generate(&mut rng);
        Self { signing_key }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// Raw public key bytes.
    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// The feed this key publishes to.
    pub fn feed_id(&self) -> Identifier {
        Identifier::from_known(IdentifierKind::Feed, ED25519, &self.public_key())
    }

    /// Sign a message, returning the `<base64>.sig.ed25519` signature string.
    pub fn sign(&self, message: &[u8]) -> String {
        let sig = self.signing_key.sign(message);
        format!("{}.sig.{}", STANDARD.encode(sig.to_bytes()), ED25519)
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Keypair({})", self.feed_id())
    }
}

/// Verify a `<base64>.sig.ed25519` signature by `feed` over `message`.
pub fn verify(feed: &Identifier, message: &[u8], signature: &str) -> bool {
    let Some(encoded) = signature.strip_suffix(".sig.ed25519") else {
        return false;
    };
    let (Ok(sig_bytes), Ok(key_bytes)) = (
        STANDARD.decode(encoded),
        <[u8; 32]>::try_from(feed.payload_bytes()),
    ) else {
        return false;
    };
    let (Ok(sig_bytes), Ok(key)) = (
        <[u8; 64]>::try_from(sig_bytes),
        VerifyingKey::from_bytes(&key_bytes),
    ) else {
        return false;
    };
    key.verify(message, &Signature::from_bytes(&sig_bytes)).is_ok()
}
