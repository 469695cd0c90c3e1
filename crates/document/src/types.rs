//! Document-level records.
//!
//! ```text
//! Document
//! ├── id: String          stable, producer-derived (see ids module)
//! ├── uri: String         locator, kept verbatim
//! ├── text: String        canonical: normalize(raw) == text
//! └── meta: DocumentMeta
//!     ├── source: Source  local | notion | web | api
//!     ├── extension       no leading dot, lowercase
//!     ├── title           Option<String>
//!     ├── creation_date   Option<DateTime<Utc>>
//!     └── tags            ordered, duplicates allowed
//! ```
//!
//! Every record is immutable once built: fields are private, there are no
//! `&mut self` methods, and the `with_*` builders consume the value and
//! return a new one. Deserialization goes through the same checks as the
//! constructors.
//!
//! ```rust
//! use document::{Document, DocumentMeta, Source};
//! use normalize::Normalizer;
//!
//! let meta = DocumentMeta::new(Source::Local, ".MD")
//!     .with_title("Release notes")
//!     .with_tags(["changelog", "v2"]);
//! let doc = Document::from_raw(
//!     "doc-1",
//!     "/notes/release.md",
//!     "# Release  \r\n\r\n\r\nFixed   things.\r\n",
//!     meta,
//!     &Normalizer::new(),
//! )
//! .unwrap();
//!
//! assert_eq!(doc.text(), "# Release\n\nFixed things.");
//! assert_eq!(doc.meta().extension(), "md");
//! assert_eq!(doc.meta().tags(), ["changelog", "v2"]);
//! ```
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use normalize::{is_canonical, Normalizer};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::metadata::{
    normalize_extension, require_non_blank, sanitize_optional_string, sanitize_tags,
};

/// Where a document came from.
///
/// The serialized names are stable: `"local"`, `"notion"`, `"web"`, `"api"`.
///
/// ```rust
/// use document::Source;
///
/// let source: Source = "web".parse().unwrap();
/// assert_eq!(source, Source::Web);
/// assert_eq!(source.to_string(), "web");
/// assert!("ftp".parse::<Source>().is_err());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Files on a local or mounted filesystem.
    Local,
    /// Notion export or API.
    Notion,
    /// Crawled HTML.
    Web,
    /// Any other external API.
    Api,
}

impl Source {
    pub const ALL: [Source; 4] = [Source::Local, Source::Notion, Source::Web, Source::Api];

    pub fn as_str(self) -> &'static str {
        match self {
            Source::Local => "local",
            Source::Notion => "notion",
            Source::Web => "web",
            Source::Api => "api",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::ALL
            .into_iter()
            .find(|source| source.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownSource(s.to_string()))
    }
}

/// Author-time facts about a document. Small; carried by value everywhere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "DocumentMetaRecord")]
pub struct DocumentMeta {
    source: Source,
    extension: String,
    title: Option<String>,
    creation_date: Option<DateTime<Utc>>,
    tags: Vec<String>,
}

impl DocumentMeta {
    /// Metadata with no title, date or tags. `extension` may carry a leading
    /// dot or any case; it is stored as lowercase without the dot.
    pub fn new(source: Source, extension: impl AsRef<str>) -> Self {
        Self {
            source,
            extension: normalize_extension(extension.as_ref()),
            title: None,
            creation_date: None,
            tags: Vec::new(),
        }
    }

    /// Sets the title. Control characters are dropped; a blank title clears it.
    pub fn with_title(self, title: impl Into<String>) -> Self {
        Self {
            title: sanitize_optional_string(Some(title.into())),
            ..self
        }
    }

    pub fn with_creation_date(self, creation_date: DateTime<Utc>) -> Self {
        Self {
            creation_date: Some(creation_date),
            ..self
        }
    }

    /// Replaces the tags. Order and duplicates are kept, blank tags dropped.
    pub fn with_tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: sanitize_tags(tags),
            ..self
        }
    }

    /// Appends one tag (ignored when blank).
    pub fn with_tag(self, tag: impl Into<String>) -> Self {
        let mut tags = self.tags;
        tags.extend(sanitize_optional_string(Some(tag.into())));
        Self { tags, ..self }
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn creation_date(&self) -> Option<DateTime<Utc>> {
        self.creation_date
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

#[derive(Deserialize)]
struct DocumentMetaRecord {
    source: Source,
    extension: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    creation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    tags: Vec<String>,
}

impl From<DocumentMetaRecord> for DocumentMeta {
    fn from(record: DocumentMetaRecord) -> Self {
        Self {
            source: record.source,
            extension: normalize_extension(&record.extension),
            title: sanitize_optional_string(record.title),
            creation_date: record.creation_date,
            tags: sanitize_tags(record.tags),
        }
    }
}

/// A cleaned text unit ready for splitting and indexing.
///
/// `text` is always canonical text. Two documents with equal `id` are meant to
/// be the same logical document, but equality on this type compares every
/// field; compare [`id`](Document::id) when that is what you mean.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "DocumentRecord")]
pub struct Document {
    id: String,
    uri: String,
    text: String,
    meta: DocumentMeta,
    #[serde(skip_serializing)]
    char_len: usize,
}

impl Document {
    /// Builds a document from text that is already canonical.
    ///
    /// Fails when `id` or `uri` is blank, or when `text` still contains
    /// anything the normalizer would rewrite. Use [`Document::from_raw`] to
    /// normalize and build in one step.
    pub fn new(
        id: impl Into<String>,
        uri: impl Into<String>,
        text: impl Into<String>,
        meta: DocumentMeta,
    ) -> Result<Self, ValidationError> {
        let id = require_non_blank("document id", id.into())?;
        let uri = require_non_blank("document uri", uri.into())?;
        let text = text.into();
        if !is_canonical(&text) {
            return Err(ValidationError::NotCanonical);
        }
        let char_len = text.chars().count();
        Ok(Self {
            id,
            uri,
            text,
            meta,
            char_len,
        })
    }

    /// Normalizes `raw` with `normalizer` and builds the document from the
    /// result.
    pub fn from_raw(
        id: impl Into<String>,
        uri: impl Into<String>,
        raw: &str,
        meta: DocumentMeta,
        normalizer: &Normalizer,
    ) -> Result<Self, ValidationError> {
        Self::new(id, uri, normalizer.normalize(raw), meta)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn meta(&self) -> &DocumentMeta {
        &self.meta
    }

    /// Length of `text` in chars (Unicode scalar values), the unit chunk
    /// offsets are measured in.
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    /// The substring covering chars `[start, end)`, or `None` when the range
    /// is reversed or runs past the end.
    ///
    /// ```rust
    /// use document::{Document, DocumentMeta, Source};
    ///
    /// let doc = Document::new("d", "u", "héllo wörld", DocumentMeta::new(Source::Api, "")).unwrap();
    /// assert_eq!(doc.slice_chars(6, 11), Some("wörld"));
    /// assert_eq!(doc.slice_chars(6, 12), None);
    /// ```
    pub fn slice_chars(&self, start: usize, end: usize) -> Option<&str> {
        if start > end || end > self.char_len {
            return None;
        }
        let mut offsets = self
            .text
            .char_indices()
            .map(|(idx, _)| idx)
            .chain(std::iter::once(self.text.len()));
        let start_byte = offsets.nth(start)?;
        let end_byte = if end == start {
            start_byte
        } else {
            offsets.nth(end - start - 1)?
        };
        Some(&self.text[start_byte..end_byte])
    }
}

#[derive(Deserialize)]
struct DocumentRecord {
    id: String,
    uri: String,
    text: String,
    meta: DocumentMeta,
}

impl TryFrom<DocumentRecord> for Document {
    type Error = ValidationError;

    fn try_from(record: DocumentRecord) -> Result<Self, Self::Error> {
        Document::new(record.id, record.uri, record.text, record.meta)
    }
}
