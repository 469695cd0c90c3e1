//! Error types produced by the document crate.
//!
//! Every constructor in this crate validates its inputs and fails with a
//! [`ValidationError`] instead of handing out a malformed record. The error
//! is typed, cloneable and comparable so callers can match on the exact
//! violation and tests can assert on it.
//!
//! | Error | Raised by |
//! |-------|-----------|
//! | [`EmptyField`](ValidationError::EmptyField) | any constructor taking an id, uri or doc id |
//! | [`NotCanonical`](ValidationError::NotCanonical) | [`Document::new`](crate::Document::new) |
//! | [`EmptyRange`](ValidationError::EmptyRange) | [`ChunkMeta::new`](crate::ChunkMeta::new) |
//! | [`OutOfBounds`](ValidationError::OutOfBounds) | [`Chunk::new`](crate::Chunk::new), chunk checks |
//! | [`DocIdMismatch`](ValidationError::DocIdMismatch) | [`Chunk::new`](crate::Chunk::new), chunk checks |
//! | [`TextMismatch`](ValidationError::TextMismatch) | chunk checks, chunk deserialization |
//! | [`DuplicateOrder`](ValidationError::DuplicateOrder) | [`validate_chunk_sequence`](crate::validate_chunk_sequence) |
//! | [`Overlap`](ValidationError::Overlap) | [`validate_chunk_sequence`](crate::validate_chunk_sequence) |
//! | [`UnknownSource`](ValidationError::UnknownSource) | `Source::from_str` |
use thiserror::Error;

/// An invalid field or field combination on a model record.
///
/// ```rust
/// use document::ValidationError;
///
/// let err = ValidationError::EmptyRange { start_char: 4, end_char: 4 };
/// assert_eq!(err.to_string(), "chunk range [4, 4) is empty or reversed");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    /// A required identifier or locator is empty or whitespace-only.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// Document text is not the output of the normalizer.
    #[error("document text is not canonical; normalize it before building a document")]
    NotCanonical,

    /// `start_char >= end_char`.
    #[error("chunk range [{start_char}, {end_char}) is empty or reversed")]
    EmptyRange { start_char: usize, end_char: usize },

    /// Chunk end lies past the end of its document.
    #[error("chunk {order} ends at char {end_char} but document has {doc_chars} chars")]
    OutOfBounds {
        order: usize,
        end_char: usize,
        doc_chars: usize,
    },

    /// Chunk points at a different document.
    #[error("chunk belongs to document {found:?}, expected {expected:?}")]
    DocIdMismatch { expected: String, found: String },

    /// Chunk text is not the exact substring its offsets describe.
    #[error("chunk {order} text does not match its [{start_char}, {end_char}) span")]
    TextMismatch {
        order: usize,
        start_char: usize,
        end_char: usize,
    },

    /// Two chunks of one document share an `order`.
    #[error("duplicate chunk order {order} in document {doc_id:?}")]
    DuplicateOrder { doc_id: String, order: usize },

    /// A chunk starts before the previous one (by `order`) ends.
    #[error("chunk {order} starts at char {start_char} before previous chunk ends at {previous_end}")]
    Overlap {
        order: usize,
        start_char: usize,
        previous_end: usize,
    },

    /// String is not one of the known [`Source`](crate::Source) names.
    #[error("unknown document source {0:?}")]
    UnknownSource(String),
}
