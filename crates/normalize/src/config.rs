//! Configuration for the normalizer.
//!
//! [`NormalizeConfig`] only controls the optional repair stage. The line and
//! whitespace stages are fixed: changing them would change what counts as
//! canonical text, and every stored document and chunk offset depends on it.
//!
//! # Examples
//!
//! ```rust
//! use normalize::{NormalizeConfig, UnicodeForm};
//!
//! let config = NormalizeConfig::default();
//! assert!(config.repair_unicode);
//! assert!(config.fix_mojibake);
//! assert_eq!(config.unicode_form, UnicodeForm::Nfc);
//!
//! let whitespace_only = NormalizeConfig {
//!     repair_unicode: false,
//!     ..Default::default()
//! };
//! assert!(!whitespace_only.repair_unicode);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unicode normalization form applied by the repair stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnicodeForm {
    /// Canonical composition. Keeps compatibility characters such as `ﬁ`.
    #[default]
    Nfc,
    /// Compatibility composition. Folds `ﬁ` to `fi`, full-width forms to ASCII.
    Nfkc,
    /// Leave code points as they are.
    None,
}

impl UnicodeForm {
    /// Stable lowercase name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            UnicodeForm::Nfc => "nfc",
            UnicodeForm::Nfkc => "nfkc",
            UnicodeForm::None => "none",
        }
    }
}

impl fmt::Display for UnicodeForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings for building a [`Normalizer`](crate::Normalizer).
///
/// Serialized form:
///
/// ```json
/// {
///   "repair_unicode": true,
///   "fix_mojibake": true,
///   "unicode_form": "nfc"
/// }
/// ```
///
/// When the crate is built without the `repair` feature, `repair_unicode`
/// is accepted but has no effect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Run the unicode repair stage at all.
    pub repair_unicode: bool,

    /// Undo UTF-8 text that was decoded as Windows-1252 (`cafÃ©` to `café`).
    pub fix_mojibake: bool,

    /// Normalization form applied after mojibake repair.
    pub unicode_form: UnicodeForm,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            repair_unicode: true,
            fix_mojibake: true,
            unicode_form: UnicodeForm::Nfc,
        }
    }
}
