use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::config::NormalizeConfig;
use crate::repair::TextRepairer;
#[cfg(feature = "repair")]
use crate::repair::UnicodeRepairer;
use crate::whitespace::{
    canonicalize_newlines, collapse_blank_lines, collapse_horizontal_whitespace, trim_line_ends,
};

/// Normalizes raw text into canonical text.
///
/// Holds an optional [`TextRepairer`]; everything else is fixed. Cloning is
/// cheap (the repairer is shared) and one instance can be used from any
/// number of threads.
#[derive(Clone)]
pub struct Normalizer {
    repairer: Option<Arc<dyn TextRepairer>>,
}

impl Normalizer {
    /// Normalizer with the default configuration: the stock
    /// [`UnicodeRepairer`](crate::UnicodeRepairer) when the `repair` feature is
    /// enabled, no repairer otherwise.
    pub fn new() -> Self {
        Self::from_config(&NormalizeConfig::default())
    }

    /// Normalizer that only canonicalizes newlines and whitespace.
    pub fn without_repair() -> Self {
        Self { repairer: None }
    }

    /// Normalizer using a caller-supplied repairer.
    pub fn with_repairer(repairer: impl TextRepairer + 'static) -> Self {
        Self {
            repairer: Some(Arc::new(repairer)),
        }
    }

    pub fn from_config(cfg: &NormalizeConfig) -> Self {
        if !cfg.repair_unicode {
            return Self::without_repair();
        }
        #[cfg(feature = "repair")]
        {
            Self::with_repairer(UnicodeRepairer::from_config(cfg))
        }
        #[cfg(not(feature = "repair"))]
        {
            debug!("unicode repair requested but the `repair` feature is disabled");
            Self::without_repair()
        }
    }

    /// Name of the configured repairer, if any.
    pub fn repairer_name(&self) -> Option<&'static str> {
        self.repairer.as_deref().map(|r| r.name())
    }

    /// Runs the full pipeline. Total: never fails, never panics.
    ///
    /// With a repairer configured, the pipeline is re-run on its own output
    /// for as long as that output keeps shrinking. Whole-text repair can be
    /// blocked by a character the final trim removes (`"Ã©\u{a0}"`), so one
    /// pass alone is not a fixed point.
    pub fn normalize(&self, raw: &str) -> String {
        let mut current = self.pass(raw);
        if self.repairer.is_none() {
            return current;
        }
        loop {
            let next = self.pass(&current);
            if next == current {
                return current;
            }
            if next.len() >= current.len() {
                return next;
            }
            current = next;
        }
    }

    fn pass(&self, raw: &str) -> String {
        let text = canonicalize_newlines(raw);

        let text = match self.repairer.as_deref() {
            Some(repairer) => {
                let repaired = repairer.repair(&text);
                if repaired != text {
                    debug!(
                        repairer = repairer.name(),
                        before_len = text.len(),
                        after_len = repaired.len(),
                        "unicode_repair_applied"
                    );
                }
                // Keep LF-only even if a custom repairer slipped a CR in.
                if repaired.contains('\r') {
                    Cow::Owned(canonicalize_newlines(&repaired).into_owned())
                } else {
                    Cow::Owned(repaired)
                }
            }
            None => text,
        };

        let text = trim_line_ends(&text);
        let text = collapse_horizontal_whitespace(&text);
        let text = collapse_blank_lines(&text);
        text.trim().to_string()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("repairer", &self.repairer_name())
            .finish()
    }
}

fn default_normalizer() -> &'static Normalizer {
    static DEFAULT: OnceLock<Normalizer> = OnceLock::new();
    DEFAULT.get_or_init(Normalizer::new)
}

/// Normalizes `raw` with the default [`Normalizer`].
///
/// ```rust
/// use normalize::normalize;
///
/// assert_eq!(normalize("a   \nb\t\n"), "a\nb");
/// assert_eq!(normalize("a\n\n\n\n\nb"), "a\n\nb");
/// assert_eq!(normalize("  \n\na\n\n  "), "a");
/// ```
pub fn normalize(raw: &str) -> String {
    default_normalizer().normalize(raw)
}
