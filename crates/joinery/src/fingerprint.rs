//! Content fingerprints for cache-busting.

use sha2::{Digest, Sha256};

/// SHA-256 of `content` as lowercase hex. Depends on the bytes only.
pub fn fingerprint(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}
