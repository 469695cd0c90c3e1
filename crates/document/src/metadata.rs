//! Sanitization of metadata strings.
//!
//! Titles, tags, headings and extensions come from loaders and splitters that
//! read them out of file names, front matter or HTML. Before they are frozen
//! into a record they go through the helpers here:
//!
//! - control characters are removed
//! - surrounding whitespace is trimmed
//! - a value that ends up empty counts as absent
//!
//! Extensions are additionally stored without a leading dot and in ASCII
//! lowercase, so `".MD"`, `"md"` and `"Md"` all become `"md"`.
use std::path::Path;

use crate::error::ValidationError;

/// Strips control characters and trims; blank input becomes `None`.
pub(crate) fn sanitize_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let filtered = if raw.chars().any(char::is_control) {
            raw.chars().filter(|c| !c.is_control()).collect::<String>()
        } else {
            raw
        };
        let trimmed = filtered.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == filtered.len() {
            Some(filtered)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Rejects blank identifiers. The value itself is kept verbatim.
pub(crate) fn require_non_blank(
    field: &'static str,
    value: String,
) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(value)
    }
}

/// Canonical extension form: no leading dot, ASCII lowercase, no control
/// characters, no surrounding whitespace. May be empty.
pub(crate) fn normalize_extension(raw: &str) -> String {
    let cleaned = sanitize_optional_string(Some(raw.to_string())).unwrap_or_default();
    cleaned.trim_start_matches('.').to_ascii_lowercase()
}

/// Sanitized tags in their original order. Blank tags are dropped, duplicates
/// are kept.
pub(crate) fn sanitize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    tags.into_iter()
        .filter_map(|tag| sanitize_optional_string(Some(tag.into())))
        .collect()
}

/// Extension of the last path segment of a file path or URL, in canonical
/// form. Query strings and fragments are ignored. Empty when there is none.
///
/// ```rust
/// use document::extension_of;
///
/// assert_eq!(extension_of("/notes/Plan.MD"), "md");
/// assert_eq!(extension_of("https://example.com/a/page.html?x=1#top"), "html");
/// assert_eq!(extension_of("https://example.com/a/"), "");
/// ```
pub fn extension_of(uri: &str) -> String {
    let path = uri.split(|c: char| c == '?' || c == '#').next().unwrap_or(uri);
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(normalize_extension)
        .unwrap_or_default()
}
