use sha2::{Digest, Sha256};

/// Compute the version-aware identity hash for normalized text.
///
/// The hash is defined as:
/// `SHA-256( canonical_version.to_be_bytes() || 0x00 || text_bytes )`.
pub fn hash_canonical_bytes(canonical_version: u32, canonical_bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_version.to_be_bytes());
    hasher.update([0]);
    hasher.update(canonical_bytes);
    hex::encode(hasher.finalize())
}

/// Truncated form of [`hash_canonical_bytes`], used for compact paragraph keys.
///
/// `len` is clamped to the full digest length (64 hex characters).
pub fn short_hash(canonical_version: u32, text: &str, len: usize) -> String {
    let mut full = hash_canonical_bytes(canonical_version, text.as_bytes());
    full.truncate(len.min(full.len()));
    full
}
