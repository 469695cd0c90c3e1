//! Parse counters.
//!
//! Loaders report how much they read and how much survived cleaning, one
//! [`ParseStats`] per file. A multi-file load folds them together with
//! [`ParseStats::merge`]; the file count can never be zero.
use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

/// Counters describing one parse (or, after [`merge`](ParseStats::merge),
/// a batch of them).
///
/// Char counts are Unicode scalar values. Nothing ties `chars_before_clean`
/// to `chars_after_clean`: repair can grow text as easily as cleaning
/// shrinks it.
///
/// ```rust
/// use document::ParseStats;
///
/// let a = ParseStats::measure(b"a  b\r\n", "a  b\r\n", "a b");
/// assert_eq!((a.bytes_read(), a.chars_before_clean(), a.chars_after_clean()), (6, 6, 3));
///
/// let total = a.merge(&ParseStats::new(10, 10, 9));
/// assert_eq!(total.files_count().get(), 2);
/// assert_eq!(total.bytes_read(), 16);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ParseStats {
    bytes_read: u64,
    chars_before_clean: u64,
    chars_after_clean: u64,
    #[serde(default = "one")]
    files_count: NonZeroU64,
}

fn one() -> NonZeroU64 {
    NonZeroU64::MIN
}

impl ParseStats {
    /// Stats for a single file.
    pub fn new(bytes_read: u64, chars_before_clean: u64, chars_after_clean: u64) -> Self {
        Self {
            bytes_read,
            chars_before_clean,
            chars_after_clean,
            files_count: one(),
        }
    }

    /// Measures one parse from its raw bytes, decoded text and cleaned text.
    pub fn measure(raw_bytes: &[u8], raw_text: &str, cleaned: &str) -> Self {
        Self::new(
            raw_bytes.len() as u64,
            raw_text.chars().count() as u64,
            cleaned.chars().count() as u64,
        )
    }

    pub fn with_files_count(self, files_count: NonZeroU64) -> Self {
        Self {
            files_count,
            ..self
        }
    }

    /// Field-wise sum. Saturates instead of wrapping.
    pub fn merge(&self, other: &ParseStats) -> Self {
        Self {
            bytes_read: self.bytes_read.saturating_add(other.bytes_read),
            chars_before_clean: self
                .chars_before_clean
                .saturating_add(other.chars_before_clean),
            chars_after_clean: self
                .chars_after_clean
                .saturating_add(other.chars_after_clean),
            files_count: self.files_count.saturating_add(other.files_count.get()),
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn chars_before_clean(&self) -> u64 {
        self.chars_before_clean
    }

    pub fn chars_after_clean(&self) -> u64 {
        self.chars_after_clean
    }

    pub fn files_count(&self) -> NonZeroU64 {
        self.files_count
    }
}
