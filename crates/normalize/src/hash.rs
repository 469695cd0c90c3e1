//! Content hashing for normalized text.
//!
//! ```text
//! SHA-256(text_bytes) → 64 lowercase hex chars
//! ```
//!
//! Hash the output of [`normalize`](crate::normalize), not the raw input:
//! two files that differ only in line endings or trailing spaces then share
//! one fingerprint.

use sha2::{Digest, Sha256};

/// Hash text with SHA-256 and return a lowercase hex digest.
///
/// ```rust
/// use normalize::{hash_text, normalize};
///
/// let a = hash_text(&normalize("hello  world\r\n"));
/// let b = hash_text(&normalize("hello world"));
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 64);
/// ```
pub fn hash_text(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest() {
        assert_eq!(
            hash_text(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn deterministic_and_distinct() {
        for text in ["", "hello world", "こんにちは世界", "emoji \u{1f600}"] {
            assert_eq!(hash_text(text), hash_text(text));
        }
        assert_ne!(hash_text("hello world"), hash_text("hello world!"));
    }
}
