//! Chunks: contiguous spans of a document's canonical text.
//!
//! A chunk never owns text of its own making. Its `text` is always the exact
//! substring `document.text[start_char..end_char]` (char offsets, half-open),
//! and every way of obtaining a [`Chunk`] checks that:
//!
//! - [`Chunk::new`] slices the text out of the document itself
//! - [`Chunk::check_against`] re-verifies a chunk that came from elsewhere
//! - deserialization checks the text length against the recorded span
//! - [`build_chunks`] and [`validate_chunk_sequence`] also check ordering
//!
//! Chunk boundaries are decided elsewhere. A splitter reports
//! [`ChunkSpan`]s and [`build_chunks`] turns them into records.
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::trace;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::ids::derive_chunk_id;
use crate::metadata::{require_non_blank, sanitize_optional_string};
use crate::types::Document;

/// Where a chunk sits inside its document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "ChunkMetaRecord")]
pub struct ChunkMeta {
    doc_id: String,
    order: usize,
    start_char: usize,
    end_char: usize,
    heading: Option<String>,
    tokens: Option<usize>,
}

impl ChunkMeta {
    /// Fails on a blank `doc_id` or when `start_char >= end_char`.
    pub fn new(
        doc_id: impl Into<String>,
        order: usize,
        start_char: usize,
        end_char: usize,
    ) -> Result<Self, ValidationError> {
        let doc_id = require_non_blank("chunk doc_id", doc_id.into())?;
        if start_char >= end_char {
            return Err(ValidationError::EmptyRange {
                start_char,
                end_char,
            });
        }
        Ok(Self {
            doc_id,
            order,
            start_char,
            end_char,
            heading: None,
            tokens: None,
        })
    }

    /// Nearest section heading. Sanitized like titles; blank clears it.
    pub fn with_heading(self, heading: impl Into<String>) -> Self {
        Self {
            heading: sanitize_optional_string(Some(heading.into())),
            ..self
        }
    }

    /// Token count from whatever tokenizer the caller uses.
    pub fn with_tokens(self, tokens: usize) -> Self {
        Self {
            tokens: Some(tokens),
            ..self
        }
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn start_char(&self) -> usize {
        self.start_char
    }

    pub fn end_char(&self) -> usize {
        self.end_char
    }

    /// `end_char - start_char`, always at least 1.
    pub fn char_len(&self) -> usize {
        self.end_char - self.start_char
    }

    pub fn heading(&self) -> Option<&str> {
        self.heading.as_deref()
    }

    pub fn tokens(&self) -> Option<usize> {
        self.tokens
    }
}

#[derive(Deserialize)]
struct ChunkMetaRecord {
    doc_id: String,
    order: usize,
    start_char: usize,
    end_char: usize,
    #[serde(default)]
    heading: Option<String>,
    #[serde(default)]
    tokens: Option<usize>,
}

impl TryFrom<ChunkMetaRecord> for ChunkMeta {
    type Error = ValidationError;

    fn try_from(record: ChunkMetaRecord) -> Result<Self, Self::Error> {
        let meta = ChunkMeta::new(record.doc_id, record.order, record.start_char, record.end_char)?;
        Ok(ChunkMeta {
            heading: sanitize_optional_string(record.heading),
            tokens: record.tokens,
            ..meta
        })
    }
}

/// A contiguous span of a document's canonical text.
///
/// ```rust
/// use document::{Chunk, ChunkMeta, Document, DocumentMeta, Source};
///
/// let doc = Document::new("doc", "u", "alpha beta", DocumentMeta::new(Source::Local, "txt")).unwrap();
/// let meta = ChunkMeta::new("doc", 0, 6, 10).unwrap().with_tokens(1);
/// let chunk = Chunk::new("chunk-0", &doc, meta).unwrap();
/// assert_eq!(chunk.text(), "beta");
/// assert!(chunk.check_against(&doc).is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "ChunkRecord")]
pub struct Chunk {
    id: String,
    text: String,
    meta: ChunkMeta,
}

impl Chunk {
    /// Cuts the chunk described by `meta` out of `document`.
    pub fn new(
        id: impl Into<String>,
        document: &Document,
        meta: ChunkMeta,
    ) -> Result<Self, ValidationError> {
        let id = require_non_blank("chunk id", id.into())?;
        check_owner(document, &meta)?;
        let text = document
            .slice_chars(meta.start_char, meta.end_char)
            .ok_or(ValidationError::OutOfBounds {
                order: meta.order,
                end_char: meta.end_char,
                doc_chars: document.char_len(),
            })?
            .to_string();
        Ok(Self { id, text, meta })
    }

    /// Verifies that this chunk belongs to `document` and that its text is
    /// the exact substring its offsets describe.
    pub fn check_against(&self, document: &Document) -> Result<(), ValidationError> {
        check_owner(document, &self.meta)?;
        match document.slice_chars(self.meta.start_char, self.meta.end_char) {
            Some(expected) if expected == self.text => Ok(()),
            Some(_) => Err(self.text_mismatch()),
            None => Err(ValidationError::OutOfBounds {
                order: self.meta.order,
                end_char: self.meta.end_char,
                doc_chars: document.char_len(),
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn meta(&self) -> &ChunkMeta {
        &self.meta
    }

    fn text_mismatch(&self) -> ValidationError {
        ValidationError::TextMismatch {
            order: self.meta.order,
            start_char: self.meta.start_char,
            end_char: self.meta.end_char,
        }
    }
}

fn check_owner(document: &Document, meta: &ChunkMeta) -> Result<(), ValidationError> {
    if meta.doc_id != document.id() {
        return Err(ValidationError::DocIdMismatch {
            expected: document.id().to_string(),
            found: meta.doc_id.clone(),
        });
    }
    if meta.end_char > document.char_len() {
        return Err(ValidationError::OutOfBounds {
            order: meta.order,
            end_char: meta.end_char,
            doc_chars: document.char_len(),
        });
    }
    Ok(())
}

#[derive(Deserialize)]
struct ChunkRecord {
    id: String,
    text: String,
    meta: ChunkMeta,
}

impl TryFrom<ChunkRecord> for Chunk {
    type Error = ValidationError;

    fn try_from(record: ChunkRecord) -> Result<Self, Self::Error> {
        let id = require_non_blank("chunk id", record.id)?;
        let chunk = Chunk {
            id,
            text: record.text,
            meta: record.meta,
        };
        if chunk.text.chars().count() != chunk.meta.char_len() {
            return Err(chunk.text_mismatch());
        }
        Ok(chunk)
    }
}

/// A span reported by a splitter, before ids and order are assigned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ChunkSpan {
    pub start_char: usize,
    pub end_char: usize,
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub tokens: Option<usize>,
}

impl ChunkSpan {
    pub fn new(start_char: usize, end_char: usize) -> Self {
        Self {
            start_char,
            end_char,
            heading: None,
            tokens: None,
        }
    }

    pub fn with_heading(self, heading: impl Into<String>) -> Self {
        Self {
            heading: Some(heading.into()),
            ..self
        }
    }

    pub fn with_tokens(self, tokens: usize) -> Self {
        Self {
            tokens: Some(tokens),
            ..self
        }
    }
}

/// Char index to byte offset table for one text, with a trailing entry for
/// the end of the text.
struct CharOffsets(Vec<usize>);

impl CharOffsets {
    fn new(text: &str) -> Self {
        let mut offsets: Vec<usize> = text.char_indices().map(|(idx, _)| idx).collect();
        offsets.push(text.len());
        Self(offsets)
    }

    fn slice<'a>(&self, text: &'a str, start: usize, end: usize) -> Option<&'a str> {
        let start_byte = *self.0.get(start)?;
        let end_byte = *self.0.get(end)?;
        text.get(start_byte..end_byte)
    }
}

/// Turns splitter output into validated chunks.
///
/// Spans are taken in the order given: the first becomes `order` 0. Ids come
/// from [`derive_chunk_id`] under `namespace`. Fails on the first empty,
/// out-of-bounds or overlapping span.
///
/// ```rust
/// use document::{build_chunks, ChunkSpan, Document, DocumentMeta, Source, DEFAULT_ID_NAMESPACE};
///
/// let doc = Document::new("doc", "u", "one two three", DocumentMeta::new(Source::Local, "txt")).unwrap();
/// let spans = [ChunkSpan::new(0, 7), ChunkSpan::new(8, 13).with_heading("tail")];
/// let chunks = build_chunks(&doc, &spans, &DEFAULT_ID_NAMESPACE).unwrap();
///
/// assert_eq!(chunks[0].text(), "one two");
/// assert_eq!(chunks[1].text(), "three");
/// assert_eq!(chunks[1].meta().order(), 1);
/// assert_eq!(chunks[1].meta().heading(), Some("tail"));
/// ```
pub fn build_chunks(
    document: &Document,
    spans: &[ChunkSpan],
    namespace: &Uuid,
) -> Result<Vec<Chunk>, ValidationError> {
    let offsets = CharOffsets::new(document.text());
    let mut chunks = Vec::with_capacity(spans.len());
    let mut previous_end = 0;

    for (order, span) in spans.iter().enumerate() {
        let mut meta = ChunkMeta::new(document.id(), order, span.start_char, span.end_char)?;
        if let Some(heading) = &span.heading {
            meta = meta.with_heading(heading.as_str());
        }
        if let Some(tokens) = span.tokens {
            meta = meta.with_tokens(tokens);
        }
        if order > 0 && meta.start_char < previous_end {
            return Err(ValidationError::Overlap {
                order,
                start_char: meta.start_char,
                previous_end,
            });
        }
        let text = offsets
            .slice(document.text(), meta.start_char, meta.end_char)
            .ok_or(ValidationError::OutOfBounds {
                order,
                end_char: meta.end_char,
                doc_chars: document.char_len(),
            })?;
        previous_end = meta.end_char;
        chunks.push(Chunk {
            id: derive_chunk_id(namespace, document.id(), order),
            text: text.to_string(),
            meta,
        });
    }

    trace!(
        doc_id = document.id(),
        chunks = chunks.len(),
        covered_chars = chunks.iter().map(|c| c.meta.char_len()).sum::<usize>(),
        doc_chars = document.char_len(),
        "chunks_built"
    );
    Ok(chunks)
}

/// Checks a set of chunks against their document.
///
/// Every chunk must belong to `document` and match its substring. Ordered by
/// `order`, the orders must be unique and the ranges must not overlap
/// (`previous.end_char <= next.start_char`). Gaps in `order` are fine, so a
/// filtered subset of a document's chunks still validates. The input does
/// not need to be sorted.
pub fn validate_chunk_sequence(
    document: &Document,
    chunks: &[Chunk],
) -> Result<(), ValidationError> {
    let offsets = CharOffsets::new(document.text());
    for chunk in chunks {
        check_owner(document, &chunk.meta)?;
        let expected = offsets.slice(document.text(), chunk.meta.start_char, chunk.meta.end_char);
        if expected != Some(chunk.text.as_str()) {
            return Err(chunk.text_mismatch());
        }
    }

    let mut sorted: Vec<&ChunkMeta> = chunks.iter().map(|c| &c.meta).collect();
    sorted.sort_by_key(|meta| meta.order);

    let mut seen = HashSet::with_capacity(sorted.len());
    let mut previous_end: Option<usize> = None;
    for meta in sorted {
        if !seen.insert(meta.order) {
            return Err(ValidationError::DuplicateOrder {
                doc_id: document.id().to_string(),
                order: meta.order,
            });
        }
        if let Some(end) = previous_end {
            if meta.start_char < end {
                return Err(ValidationError::Overlap {
                    order: meta.order,
                    start_char: meta.start_char,
                    previous_end: end,
                });
            }
        }
        previous_end = Some(meta.end_char);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::DEFAULT_ID_NAMESPACE;
    use crate::types::{DocumentMeta, Source};

    fn doc(text: &str) -> Document {
        Document::new("doc", "mem://doc", text, DocumentMeta::new(Source::Api, "txt"))
            .expect("canonical test text")
    }

    #[test]
    fn meta_rejects_empty_ranges_and_blank_doc_id() {
        assert_eq!(
            ChunkMeta::new("doc", 0, 3, 3),
            Err(ValidationError::EmptyRange {
                start_char: 3,
                end_char: 3
            })
        );
        assert!(ChunkMeta::new("doc", 0, 4, 2).is_err());
        assert_eq!(
            ChunkMeta::new("  ", 0, 0, 1),
            Err(ValidationError::EmptyField("chunk doc_id"))
        );
    }

    #[test]
    fn new_slices_by_chars() {
        let doc = doc("añb\u{1F600}c");
        let chunk = Chunk::new("c", &doc, ChunkMeta::new("doc", 0, 1, 4).unwrap()).unwrap();
        assert_eq!(chunk.text(), "ñb\u{1F600}");
        assert_eq!(chunk.meta().char_len(), 3);
    }

    #[test]
    fn new_rejects_foreign_and_out_of_bounds_meta() {
        let doc = doc("short");
        let foreign = ChunkMeta::new("other", 0, 0, 2).unwrap();
        assert_eq!(
            Chunk::new("c", &doc, foreign),
            Err(ValidationError::DocIdMismatch {
                expected: "doc".into(),
                found: "other".into()
            })
        );

        let too_long = ChunkMeta::new("doc", 4, 2, 6).unwrap();
        assert_eq!(
            Chunk::new("c", &doc, too_long),
            Err(ValidationError::OutOfBounds {
                order: 4,
                end_char: 6,
                doc_chars: 5
            })
        );
    }

    #[test]
    fn heading_is_sanitized() {
        let meta = ChunkMeta::new("doc", 0, 0, 1)
            .unwrap()
            .with_heading(" Intro\u{0000} ");
        assert_eq!(meta.heading(), Some("Intro"));
        assert_eq!(meta.clone().with_heading("").heading(), None);
    }

    #[test]
    fn check_against_catches_tampered_text() {
        let doc = doc("hello world");
        let json = serde_json::json!({
            "id": "c",
            "text": "HELLO",
            "meta": {"doc_id": "doc", "order": 0, "start_char": 0, "end_char": 5}
        });
        let chunk: Chunk = serde_json::from_value(json).expect("length matches span");
        assert_eq!(
            chunk.check_against(&doc),
            Err(ValidationError::TextMismatch {
                order: 0,
                start_char: 0,
                end_char: 5
            })
        );
    }

    #[test]
    fn deserialization_checks_text_length() {
        let json = serde_json::json!({
            "id": "c",
            "text": "four",
            "meta": {"doc_id": "doc", "order": 0, "start_char": 0, "end_char": 5}
        });
        assert!(serde_json::from_value::<Chunk>(json).is_err());

        let empty_range = serde_json::json!({
            "id": "c",
            "text": "",
            "meta": {"doc_id": "doc", "order": 0, "start_char": 2, "end_char": 2}
        });
        assert!(serde_json::from_value::<Chunk>(empty_range).is_err());
    }

    #[test]
    fn build_assigns_orders_and_ids() {
        let doc = doc("a b c d");
        let spans = [ChunkSpan::new(0, 1), ChunkSpan::new(2, 3), ChunkSpan::new(4, 7)];
        let chunks = build_chunks(&doc, &spans, &DEFAULT_ID_NAMESPACE).unwrap();

        let orders: Vec<_> = chunks.iter().map(|c| c.meta().order()).collect();
        assert_eq!(orders, [0, 1, 2]);
        assert_eq!(chunks[2].text(), "c d");
        assert_eq!(
            chunks[1].id(),
            derive_chunk_id(&DEFAULT_ID_NAMESPACE, "doc", 1)
        );
        assert!(validate_chunk_sequence(&doc, &chunks).is_ok());
    }

    #[test]
    fn build_accepts_touching_spans_and_rejects_overlap() {
        let doc = doc("abcdef");
        assert!(build_chunks(&doc, &[ChunkSpan::new(0, 3), ChunkSpan::new(3, 6)], &DEFAULT_ID_NAMESPACE).is_ok());
        assert_eq!(
            build_chunks(&doc, &[ChunkSpan::new(0, 4), ChunkSpan::new(3, 6)], &DEFAULT_ID_NAMESPACE),
            Err(ValidationError::Overlap {
                order: 1,
                start_char: 3,
                previous_end: 4
            })
        );
        assert!(matches!(
            build_chunks(&doc, &[ChunkSpan::new(2, 9)], &DEFAULT_ID_NAMESPACE),
            Err(ValidationError::OutOfBounds { .. })
        ));
        assert!(build_chunks(&doc, &[], &DEFAULT_ID_NAMESPACE).unwrap().is_empty());
    }

    #[test]
    fn sequence_allows_gaps_and_any_input_order() {
        let doc = doc("abcdefgh");
        let chunks = build_chunks(
            &doc,
            &[ChunkSpan::new(0, 2), ChunkSpan::new(2, 4), ChunkSpan::new(6, 8)],
            &DEFAULT_ID_NAMESPACE,
        )
        .unwrap();
        let subset = vec![chunks[2].clone(), chunks[0].clone()];
        assert!(validate_chunk_sequence(&doc, &subset).is_ok());
    }

    #[test]
    fn sequence_rejects_duplicate_orders() {
        let doc = doc("abcdef");
        let a = Chunk::new("a", &doc, ChunkMeta::new("doc", 1, 0, 2).unwrap()).unwrap();
        let b = Chunk::new("b", &doc, ChunkMeta::new("doc", 1, 3, 5).unwrap()).unwrap();
        assert_eq!(
            validate_chunk_sequence(&doc, &[a, b]),
            Err(ValidationError::DuplicateOrder {
                doc_id: "doc".into(),
                order: 1
            })
        );
    }

    #[test]
    fn sequence_rejects_starts_going_backwards() {
        let doc = doc("abcdef");
        let a = Chunk::new("a", &doc, ChunkMeta::new("doc", 0, 3, 5).unwrap()).unwrap();
        let b = Chunk::new("b", &doc, ChunkMeta::new("doc", 1, 0, 2).unwrap()).unwrap();
        assert!(matches!(
            validate_chunk_sequence(&doc, &[a, b]),
            Err(ValidationError::Overlap { order: 1, .. })
        ));
    }
}
