//! Canonical content hash of a document for change detection.
//!
//! The engine compares digests instead of full serializations: the digest
//! of the last state exchanged with the remote store is kept, and both
//! outbound saves (skip redundant writes) and inbound snapshots (drop
//! echoes of our own writes) are gated on digest equality.

#[cfg(test)]
#[path = "digest_test.rs"]
mod digest_test;

use board::doc::Document;
use sha2::{Digest as _, Sha256};

/// SHA-256 over the canonical JSON form of a document.
///
/// Two documents with equal field values always produce equal digests,
/// regardless of the key order of any JSON they originally came from.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DocumentDigest([u8; 32]);

impl std::fmt::Debug for DocumentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DocumentDigest(")?;
        for byte in &self.0[..8] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "…)")
    }
}

/// Compute the digest of `doc`.
#[must_use]
pub fn document_digest(doc: &Document) -> DocumentDigest {
    // Round-tripping through `serde_json::Value` canonicalizes: the map
    // type sorts keys (the `preserve_order` feature is not enabled).
    // Serializing the document cannot fail: every field is a plain serde
    // type with string keys.
    let value = serde_json::to_value(doc).unwrap_or_default();
    let hash = Sha256::digest(value.to_string().as_bytes());
    DocumentDigest(hash.into())
}
