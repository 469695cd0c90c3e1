//! Line and whitespace canonicalization stages.
//!
//! Each stage is a standalone function so callers that only need one of them
//! (for example a loader that wants LF line endings but keeps its own spacing)
//! can use it without running the full [`normalize`](crate::normalize)
//! pipeline. The stages are listed in the order the pipeline applies them.
//!
//! "Horizontal whitespace" in this module means exactly ASCII space (U+0020)
//! and ASCII tab (U+0009). Other Unicode spaces are content until the final
//! outer trim.
//!
//! ```rust
//! use normalize::{
//!     canonicalize_newlines, collapse_blank_lines, collapse_horizontal_whitespace,
//!     trim_line_ends,
//! };
//!
//! let text = canonicalize_newlines("a  b \r\n\r\n\r\nc");
//! let text = trim_line_ends(&text);
//! let text = collapse_horizontal_whitespace(&text);
//! let text = collapse_blank_lines(&text);
//! assert_eq!(text, "a b\n\nc");
//! ```

use std::borrow::Cow;

/// Returns true for the characters the line-level stages treat as spacing.
#[inline]
pub(crate) fn is_horizontal(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

/// Rewrites `\r\n` and lone `\r` to `\n`.
///
/// Borrows the input when it contains no carriage return.
///
/// ```rust
/// use normalize::canonicalize_newlines;
///
/// assert_eq!(canonicalize_newlines("a\r\nb\rc"), "a\nb\nc");
/// assert_eq!(canonicalize_newlines("\r\r\n"), "\n\n");
/// ```
pub fn canonicalize_newlines(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' {
            // A CRLF pair collapses into the single LF pushed below.
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

/// Strips trailing spaces and tabs from every `\n`-separated line.
///
/// Leading and interior whitespace is left alone.
///
/// ```rust
/// use normalize::trim_line_ends;
///
/// assert_eq!(trim_line_ends("  a  \nb\t\n"), "  a\nb\n");
/// ```
pub fn trim_line_ends(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (idx, line) in text.split('\n').enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(line.trim_end_matches(is_horizontal));
    }
    out
}

/// Collapses runs of spaces and tabs.
///
/// - a run of two or more becomes a single space;
/// - a run of any length directly before `\n` is removed;
/// - a lone space or tab anywhere else is kept as is.
///
/// ```rust
/// use normalize::collapse_horizontal_whitespace;
///
/// assert_eq!(collapse_horizontal_whitespace("a \t b"), "a b");
/// assert_eq!(collapse_horizontal_whitespace("a\tb"), "a\tb");
/// assert_eq!(collapse_horizontal_whitespace("a\t\nb"), "a\nb");
/// ```
pub fn collapse_horizontal_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // (first char of the pending run, run length)
    let mut run: Option<(char, usize)> = None;

    for ch in text.chars() {
        if is_horizontal(ch) {
            run = match run {
                Some((first, len)) => Some((first, len + 1)),
                None => Some((ch, 1)),
            };
            continue;
        }
        if let Some((first, len)) = run.take() {
            if ch != '\n' {
                push_run(&mut out, first, len);
            }
        }
        out.push(ch);
    }

    if let Some((first, len)) = run {
        push_run(&mut out, first, len);
    }
    out
}

fn push_run(out: &mut String, first: char, len: usize) {
    if len == 1 {
        out.push(first);
    } else {
        out.push(' ');
    }
}

/// Caps consecutive line feeds at two, leaving at most one blank line.
///
/// ```rust
/// use normalize::collapse_blank_lines;
///
/// assert_eq!(collapse_blank_lines("a\n\n\n\n\nb"), "a\n\nb");
/// assert_eq!(collapse_blank_lines("a\n\nb"), "a\n\nb");
/// ```
pub fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0usize;

    for ch in text.chars() {
        if ch == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push('\n');
            }
        } else {
            newlines = 0;
            out.push(ch);
        }
    }
    out
}

/// Checks that `text` is already a fixed point of the line and whitespace
/// stages plus the outer trim.
///
/// The check is structural only: it does not run a repairer, so it holds for
/// the output of any [`Normalizer`](crate::Normalizer) configuration.
///
/// ```rust
/// use normalize::{is_canonical, normalize};
///
/// assert!(is_canonical("a\n\nb"));
/// assert!(!is_canonical("a \nb"));
/// assert!(!is_canonical(" a"));
/// assert!(is_canonical(&normalize("\r\n  x  \t y \n\n\n\n z ")));
/// ```
pub fn is_canonical(text: &str) -> bool {
    if text.len() != text.trim().len() {
        return false;
    }

    let mut prev: Option<char> = None;
    let mut newlines = 0usize;
    for ch in text.chars() {
        match ch {
            '\r' => return false,
            '\n' => {
                if prev.is_some_and(is_horizontal) {
                    return false;
                }
                newlines += 1;
                if newlines > 2 {
                    return false;
                }
            }
            c if is_horizontal(c) => {
                if prev.is_some_and(is_horizontal) {
                    return false;
                }
                newlines = 0;
            }
            _ => newlines = 0,
        }
        prev = Some(ch);
    }
    true
}
