//! docprep document model
//!
//! Immutable records for cleaned documents and the chunks cut from them.
//! Everything downstream (indexing, embedding, retrieval) keys off these
//! types, so they refuse to exist in an invalid state.
//!
//! ## What lives here
//!
//! - **[`Document`]** - id, uri, canonical text and [`DocumentMeta`]
//! - **[`Chunk`]** - a `[start_char, end_char)` span of a document with its
//!   exact text and [`ChunkMeta`]
//! - **[`ParseStats`]** - byte and char counters for one or more parses
//! - **Ids** - [`derive_document_id`] / [`derive_chunk_id`], UUIDv5 based
//! - **Sequences** - [`build_chunks`] from splitter spans,
//!   [`validate_chunk_sequence`] for chunks from anywhere
//!
//! ## Guarantees
//!
//! - `Document::text` is always canonical (see the `normalize` crate)
//! - `Chunk::text` is always the substring its offsets name
//! - Offsets count Unicode scalar values, not bytes
//! - No record can be mutated after construction; share them freely across
//!   threads
//!
//! ## Example
//!
//! ```
//! use document::{
//!     build_chunks, derive_document_id, validate_chunk_sequence, ChunkSpan, Document,
//!     DocumentMeta, Source, DEFAULT_ID_NAMESPACE,
//! };
//! use normalize::Normalizer;
//!
//! let uri = "/kb/faq.md";
//! let id = derive_document_id(&DEFAULT_ID_NAMESPACE, uri, None);
//! let doc = Document::from_raw(
//!     id,
//!     uri,
//!     "Q: why?\r\n\r\n\r\nA: because.  ",
//!     DocumentMeta::new(Source::Local, document::extension_of(uri)),
//!     &Normalizer::new(),
//! )?;
//! assert_eq!(doc.text(), "Q: why?\n\nA: because.");
//!
//! let chunks = build_chunks(&doc, &[ChunkSpan::new(0, 7), ChunkSpan::new(9, 20)], &DEFAULT_ID_NAMESPACE)?;
//! assert_eq!(chunks[1].text(), "A: because.");
//! validate_chunk_sequence(&doc, &chunks)?;
//! # Ok::<(), document::ValidationError>(())
//! ```

mod chunk;
mod error;
mod ids;
mod metadata;
mod stats;
mod types;

pub use crate::chunk::{build_chunks, validate_chunk_sequence, Chunk, ChunkMeta, ChunkSpan};
pub use crate::error::ValidationError;
pub use crate::ids::{derive_chunk_id, derive_document_id, DEFAULT_ID_NAMESPACE};
pub use crate::metadata::extension_of;
pub use crate::stats::ParseStats;
pub use crate::types::{Document, DocumentMeta, Source};

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use normalize::Normalizer;

    use super::*;

    fn records_are_send_sync<T: Send + Sync>() {}

    #[test]
    fn records_cross_threads() {
        records_are_send_sync::<Document>();
        records_are_send_sync::<Chunk>();
        records_are_send_sync::<ParseStats>();

        let doc = Arc::new(
            Document::new("d", "u", "shared text", DocumentMeta::new(Source::Local, "txt"))
                .expect("canonical"),
        );
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let doc = Arc::clone(&doc);
                thread::spawn(move || doc.char_len())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().expect("thread"), 11);
        }
    }

    #[test]
    fn chunks_of_prepared_document_cover_exact_substrings() {
        let raw = "Title\r\n\r\n\r\n\r\nFirst   paragraph.\n\nSecond\tparagraph.   \n";
        let doc = Document::from_raw(
            "d",
            "file:///t.txt",
            raw,
            DocumentMeta::new(Source::Local, extension_of("file:///t.txt")),
            &Normalizer::without_repair(),
        )
        .expect("normalizes");
        assert_eq!(doc.text(), "Title\n\nFirst paragraph.\n\nSecond\tparagraph.");

        let spans = [
            ChunkSpan::new(0, 5).with_heading("Title"),
            ChunkSpan::new(7, 23).with_tokens(2),
            ChunkSpan::new(25, 42),
        ];
        let chunks = build_chunks(&doc, &spans, &DEFAULT_ID_NAMESPACE).expect("valid spans");
        let texts: Vec<_> = chunks.iter().map(Chunk::text).collect();
        assert_eq!(texts, ["Title", "First paragraph.", "Second\tparagraph."]);
        for chunk in &chunks {
            assert!(chunk.check_against(&doc).is_ok());
        }
    }

    #[test]
    fn chunk_round_trips_through_json() {
        let doc = Document::new("d", "u", "alpha beta", DocumentMeta::new(Source::Web, "html"))
            .expect("canonical");
        let chunks = build_chunks(&doc, &[ChunkSpan::new(6, 10).with_heading("B")], &DEFAULT_ID_NAMESPACE)
            .expect("valid");
        let json = serde_json::to_string(&chunks).expect("serialize");
        let back: Vec<Chunk> = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, chunks);
        assert!(validate_chunk_sequence(&doc, &back).is_ok());
    }
}
