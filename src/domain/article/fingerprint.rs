use sha2::{Digest, Sha256};

/// Compute the dedup key for an article body: the SHA-256 digest of the raw
/// UTF-8 bytes, as 64 lowercase hex characters. Titles and metadata are
/// deliberately excluded — only byte-identical content shares a fingerprint.
pub fn fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}
