//! Pluggable unicode repair.
//!
//! The normalizer calls a [`TextRepairer`] between newline canonicalization
//! and the whitespace stages, if one is configured. Having no repairer is a
//! valid configuration: the step is skipped and nothing fails.
//!
//! [`UnicodeRepairer`] (feature `repair`, on by default) is the stock
//! implementation:
//!
//! 1. drop byte-order marks (U+FEFF) left inside the text;
//! 2. apply the configured [`UnicodeForm`];
//! 3. if the text reads like UTF-8 that was decoded as Windows-1252
//!    (`cafÃ©`), re-encode it to bytes and decode those as UTF-8;
//! 4. repeat from 1 until nothing changes, so doubly mangled text is also
//!    undone and the result is a fixed point.
//!
//! Mojibake repair is all-or-nothing over the whole text. If any character
//! cannot be mapped back to a Windows-1252 byte, or the bytes are not valid
//! UTF-8, the text is left as it was.

#[cfg(feature = "repair")]
use std::borrow::Cow;

#[cfg(feature = "repair")]
use crate::config::{NormalizeConfig, UnicodeForm};

/// A best-effort text fixer run by the [`Normalizer`](crate::Normalizer).
///
/// Implementations must be total and deterministic, and must not introduce
/// carriage returns. They should be idempotent (`repair(repair(x)) ==
/// repair(x)`), otherwise the normalizer loses its idempotence guarantee.
pub trait TextRepairer: Send + Sync {
    /// Returns the repaired text, or an unchanged copy when nothing applies.
    fn repair(&self, text: &str) -> String;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Stock repairer: BOM removal, Windows-1252 mojibake undo, normalization form.
#[cfg(feature = "repair")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnicodeRepairer {
    fix_mojibake: bool,
    form: UnicodeForm,
}

#[cfg(feature = "repair")]
impl UnicodeRepairer {
    pub fn new(fix_mojibake: bool, form: UnicodeForm) -> Self {
        Self { fix_mojibake, form }
    }

    pub fn from_config(cfg: &NormalizeConfig) -> Self {
        Self::new(cfg.fix_mojibake, cfg.unicode_form)
    }

    pub fn form(&self) -> UnicodeForm {
        self.form
    }
}

#[cfg(feature = "repair")]
impl Default for UnicodeRepairer {
    fn default() -> Self {
        Self::from_config(&NormalizeConfig::default())
    }
}

#[cfg(feature = "repair")]
impl TextRepairer for UnicodeRepairer {
    fn repair(&self, text: &str) -> String {
        // Every undo strictly shrinks the UTF-8 length, so this terminates.
        let mut current = text.to_string();
        loop {
            let cleaned = apply_form(&strip_byte_order_marks(&current), self.form).into_owned();
            if !self.fix_mojibake {
                return cleaned;
            }
            match undo_mojibake(&cleaned) {
                Some(fixed) => current = fixed,
                None => return cleaned,
            }
        }
    }

    fn name(&self) -> &'static str {
        "unicode"
    }
}

#[cfg(feature = "repair")]
fn strip_byte_order_marks(text: &str) -> Cow<'_, str> {
    if text.contains('\u{FEFF}') {
        Cow::Owned(text.chars().filter(|&c| c != '\u{FEFF}').collect())
    } else {
        Cow::Borrowed(text)
    }
}

#[cfg(feature = "repair")]
fn apply_form(text: &str, form: UnicodeForm) -> Cow<'_, str> {
    use unicode_normalization::{is_nfc, is_nfkc, UnicodeNormalization};

    match form {
        UnicodeForm::Nfc if !is_nfc(text) => Cow::Owned(text.nfc().collect()),
        UnicodeForm::Nfkc if !is_nfkc(text) => Cow::Owned(text.nfkc().collect()),
        _ => Cow::Borrowed(text),
    }
}

/// Windows-1252 renders UTF-8 lead bytes 0xC2..=0xF4 as `Â`..=`ô`. Text without
/// any of them cannot be mojibake of a multi-byte sequence.
#[cfg(feature = "repair")]
fn has_mojibake_lead(text: &str) -> bool {
    text.chars().any(|c| ('\u{00C2}'..='\u{00F4}').contains(&c))
}

#[cfg(feature = "repair")]
fn undo_mojibake(text: &str) -> Option<String> {
    if text.is_ascii() || !has_mojibake_lead(text) {
        return None;
    }

    let (bytes, _, had_unmappable) = encoding_rs::WINDOWS_1252.encode(text);
    if had_unmappable {
        return None;
    }
    let decoded = std::str::from_utf8(&bytes).ok()?;
    if decoded.len() < text.len() {
        Some(decoded.to_string())
    } else {
        None
    }
}
