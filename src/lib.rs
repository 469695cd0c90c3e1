//! Workspace umbrella crate for docprep.
//!
//! This crate stitches the normalizer and the document model together so
//! loaders can hand over raw text or bytes and get back a validated
//! [`Document`] plus [`ParseStats`] from a single entry point. Splitters hand
//! their spans to [`Preparer::chunk`] and get validated [`Chunk`]s back.
//!
//! ```
//! use docprep::{ChunkSpan, DocumentMeta, Preparer, PrepareConfig, RawDocument, Source};
//!
//! let preparer = Preparer::new(PrepareConfig::default())?;
//! let raw = RawDocument::from_bytes(
//!     "/notes/todo.txt",
//!     DocumentMeta::new(Source::Local, "txt"),
//!     b"Buy milk  \r\n\r\n\r\nCall   home\r\n".to_vec(),
//! );
//!
//! let prepared = preparer.prepare(raw)?;
//! assert_eq!(prepared.document.text(), "Buy milk\n\nCall home");
//! assert_eq!(prepared.stats.bytes_read(), 29);
//!
//! let chunks = preparer.chunk(&prepared.document, &[ChunkSpan::new(0, 8), ChunkSpan::new(10, 19)])?;
//! assert_eq!(chunks[1].text(), "Call home");
//! # Ok::<(), docprep::PipelineError>(())
//! ```

pub mod config;

use std::time::Instant;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{Level, info, warn};

pub use crate::config::{
    CONFIG_VERSION, ConfigError, ConfigLoadError, DocumentConfig, PrepareConfig,
};
pub use document::{
    Chunk, ChunkMeta, ChunkSpan, DEFAULT_ID_NAMESPACE, Document, DocumentMeta, ParseStats, Source,
    ValidationError, build_chunks, derive_chunk_id, derive_document_id, extension_of,
    validate_chunk_sequence,
};
#[cfg(feature = "repair")]
pub use normalize::UnicodeRepairer;
pub use normalize::{
    NormalizeConfig, Normalizer, TextRepairer, UnicodeForm, hash_text, is_canonical, normalize,
};

/// Errors that can occur while preparing a document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PipelineError {
    #[error("invalid record: {0}")]
    Validation(#[from] ValidationError),

    #[error("payload is not valid UTF-8: {0}")]
    InvalidUtf8(String),

    #[error("raw payload size {size} exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("document text is empty after normalization")]
    EmptyText,

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Raw content as a loader produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawPayload {
    /// Already decoded text.
    Text(String),
    /// Undecoded bytes, expected to be UTF-8.
    Bytes(Vec<u8>),
}

impl RawPayload {
    /// Size of the payload in bytes.
    pub fn len(&self) -> usize {
        match self {
            RawPayload::Text(text) => text.len(),
            RawPayload::Bytes(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Loader output waiting to be prepared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Where the content came from. Required.
    pub uri: String,
    /// Caller-chosen id. Derived from `uri` (and `modified`) when absent.
    pub id: Option<String>,
    /// Source modification time; part of the derived id when present.
    pub modified: Option<DateTime<Utc>>,
    pub meta: DocumentMeta,
    pub payload: RawPayload,
}

impl RawDocument {
    pub fn from_text(uri: impl Into<String>, meta: DocumentMeta, text: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            id: None,
            modified: None,
            meta,
            payload: RawPayload::Text(text.into()),
        }
    }

    pub fn from_bytes(uri: impl Into<String>, meta: DocumentMeta, bytes: Vec<u8>) -> Self {
        Self {
            uri: uri.into(),
            id: None,
            modified: None,
            meta,
            payload: RawPayload::Bytes(bytes),
        }
    }

    pub fn with_id(self, id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..self
        }
    }

    pub fn with_modified(self, modified: DateTime<Utc>) -> Self {
        Self {
            modified: Some(modified),
            ..self
        }
    }
}

/// A prepared document and the counters from preparing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedDocument {
    pub document: Document,
    pub stats: ParseStats,
}

/// Turns raw loader output into documents and splitter spans into chunks.
///
/// Holds only immutable state; clone it or share it by reference across
/// threads.
#[derive(Debug, Clone)]
pub struct Preparer {
    normalizer: Normalizer,
    config: DocumentConfig,
}

impl Preparer {
    /// Validates `config` and builds the normalizer it describes.
    pub fn new(config: PrepareConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            normalizer: Normalizer::from_config(&config.normalize),
            config: config.document,
        })
    }

    /// Replaces the configured repairer.
    pub fn with_repairer(self, repairer: impl TextRepairer + 'static) -> Self {
        Self {
            normalizer: Normalizer::with_repairer(repairer),
            ..self
        }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Decode, normalize and validate one raw document.
    pub fn prepare(&self, raw: RawDocument) -> Result<PreparedDocument, PipelineError> {
        let start = Instant::now();
        let span = tracing::span!(
            Level::INFO,
            "docprep.prepare",
            uri = %raw.uri,
            source = %raw.meta.source()
        );
        let _guard = span.enter();

        let id_hint = raw.id.clone();
        match self.prepare_inner(raw) {
            Ok(prepared) => {
                let elapsed_micros = start.elapsed().as_micros();
                info!(
                    doc_id = %prepared.document.id(),
                    bytes_read = prepared.stats.bytes_read(),
                    chars_before_clean = prepared.stats.chars_before_clean(),
                    chars_after_clean = prepared.stats.chars_after_clean(),
                    content_sha256 = %hash_text(prepared.document.text()),
                    elapsed_micros,
                    "prepare_success"
                );
                Ok(prepared)
            }
            Err(err) => {
                let elapsed_micros = start.elapsed().as_micros();
                warn!(
                    doc_id = ?id_hint,
                    error = %err,
                    elapsed_micros,
                    "prepare_failure"
                );
                Err(err)
            }
        }
    }

    fn prepare_inner(&self, raw: RawDocument) -> Result<PreparedDocument, PipelineError> {
        let RawDocument {
            uri,
            id,
            modified,
            meta,
            payload,
        } = raw;

        // Reject oversized payloads before decoding.
        let size = payload.len();
        if let Some(limit) = self.config.max_raw_bytes {
            if size > limit {
                return Err(PipelineError::PayloadTooLarge { size, limit });
            }
        }

        let raw_text = self.decode(payload)?;
        let cleaned = self.normalizer.normalize(&raw_text);
        if self.config.reject_empty_text && cleaned.is_empty() {
            return Err(PipelineError::EmptyText);
        }

        let stats = ParseStats::new(
            size as u64,
            raw_text.chars().count() as u64,
            cleaned.chars().count() as u64,
        );
        let id = match id.filter(|id| !id.trim().is_empty()) {
            Some(id) => id,
            None => derive_document_id(&self.config.id_namespace, &uri, modified),
        };
        let document = Document::new(id, uri, cleaned, meta)?;
        Ok(PreparedDocument { document, stats })
    }

    fn decode(&self, payload: RawPayload) -> Result<String, PipelineError> {
        match payload {
            RawPayload::Text(text) => Ok(text),
            RawPayload::Bytes(bytes) if self.config.lossy_utf8 => {
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            RawPayload::Bytes(bytes) => {
                String::from_utf8(bytes).map_err(|err| PipelineError::InvalidUtf8(err.to_string()))
            }
        }
    }

    /// Cuts validated chunks out of `document`, one per span, with ids
    /// derived under the configured namespace.
    pub fn chunk(
        &self,
        document: &Document,
        spans: &[ChunkSpan],
    ) -> Result<Vec<Chunk>, PipelineError> {
        Ok(build_chunks(document, spans, &self.config.id_namespace)?)
    }
}

/// Prepare one document with a throwaway [`Preparer`] built from `config`.
pub fn prepare_document(
    raw: RawDocument,
    config: &PrepareConfig,
) -> Result<PreparedDocument, PipelineError> {
    Preparer::new(config.clone())?.prepare(raw)
}
