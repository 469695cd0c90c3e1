//! Builds a document from a file and splits it on blank lines.
//!
//! ```text
//! cargo run -p docprep-document --example chunk_demo -- notes.md
//! ```
use std::env;
use std::error::Error;
use std::fs;

use document::{
    build_chunks, derive_document_id, extension_of, ChunkSpan, Document, DocumentMeta, Source,
    DEFAULT_ID_NAMESPACE,
};
use normalize::Normalizer;

fn paragraph_spans(text: &str) -> Vec<ChunkSpan> {
    let mut spans = Vec::new();
    let mut start = 0;
    for (pos, part) in text.split("\n\n").enumerate() {
        let len = part.chars().count();
        if len > 0 {
            let span = ChunkSpan::new(start, start + len);
            spans.push(if pos == 0 { span.with_heading(part.lines().next().unwrap_or("")) } else { span });
        }
        start += len + 2;
    }
    spans
}

fn main() -> Result<(), Box<dyn Error>> {
    let path = env::args().nth(1).ok_or("usage: chunk_demo <file>")?;
    let raw = fs::read_to_string(&path)?;

    let id = derive_document_id(&DEFAULT_ID_NAMESPACE, &path, None);
    let meta = DocumentMeta::new(Source::Local, extension_of(&path));
    let doc = Document::from_raw(id, path.as_str(), &raw, meta, &Normalizer::new())?;

    let chunks = build_chunks(&doc, &paragraph_spans(doc.text()), &DEFAULT_ID_NAMESPACE)?;
    println!("document {} ({} chars, {} chunks)", doc.id(), doc.char_len(), chunks.len());
    for chunk in &chunks {
        let meta = chunk.meta();
        println!(
            "  #{:<3} [{:>6}, {:>6}) {}",
            meta.order(),
            meta.start_char(),
            meta.end_char(),
            chunk.text().lines().next().unwrap_or("")
        );
    }
    Ok(())
}
