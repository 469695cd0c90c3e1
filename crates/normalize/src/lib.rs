//! docprep text normalizer.
//!
//! Turns raw text from any loader into canonical text: the only text form
//! documents store and chunks are cut from.
//!
//! ## What we do, in order
//!
//! 1. `\r\n` and lone `\r` become `\n`
//! 2. Unicode repair, if a [`TextRepairer`] is configured (BOMs, mojibake,
//!    normalization form); skipped silently otherwise
//! 3. Trailing spaces/tabs are stripped from every line
//! 4. Runs of 2+ spaces/tabs become one space; runs before `\n` disappear
//! 5. Three or more `\n` in a row become two (at most one blank line)
//! 6. Leading and trailing whitespace of the whole text is trimmed
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock, no locale, no errors. [`normalize`] is total and
//! idempotent: `normalize(&normalize(x)) == normalize(x)` for every `x`.
//!
//! ## Invariants worth knowing
//!
//! - Output never contains `\r`
//! - Output passes [`is_canonical`], whatever repairer was used
//! - Interior single spaces and tabs, leading indentation of non-first lines,
//!   and non-ASCII spaces inside a line are preserved
//!
//! ```rust
//! use normalize::{normalize, Normalizer};
//!
//! assert_eq!(normalize("  Hello   world \r\n\r\n\r\n\r\nBye\t\n"), "Hello world\n\nBye");
//!
//! let plain = Normalizer::without_repair();
//! assert_eq!(plain.normalize("cafÃ©  "), "cafÃ©");
//! ```

mod config;
mod hash;
mod pipeline;
mod repair;
mod whitespace;

pub use crate::config::{NormalizeConfig, UnicodeForm};
pub use crate::hash::hash_text;
pub use crate::pipeline::{normalize, Normalizer};
#[cfg(feature = "repair")]
pub use crate::repair::UnicodeRepairer;
pub use crate::repair::TextRepairer;
pub use crate::whitespace::{
    canonicalize_newlines, collapse_blank_lines, collapse_horizontal_whitespace, is_canonical,
    trim_line_ends,
};
