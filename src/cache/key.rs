//! Cache key derivation.

use crate::types::OperationRequest;
use sha2::{Digest, Sha256};

/// Content-addressed cache key: a hex-encoded SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the cache key for a request.
///
/// The digest covers the operation tag, the raw content, and the source-type
/// hint when present. The content is hashed as-is: inputs differing only in
/// whitespace produce different keys. That is a known limitation, kept
/// because normalizing would silently change hit-rate behavior.
pub fn request_key(request: &OperationRequest) -> CacheKey {
    let mut hasher = Sha256::new();
    hasher.update(request.operation.as_str().as_bytes());
    hasher.update(b":");
    hasher.update(request.content.as_bytes());
    if let Some(source_type) = &request.source_type {
        hasher.update(b":");
        hasher.update(source_type.as_bytes());
    }
    let hash: String = hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect();
    CacheKey(hash)
}
