//! YAML configuration for the preparation pipeline.
//!
//! One file configures both stages. Every field has a default, so an empty
//! document (or just `version: "1.0"`) is a valid configuration.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//!
//! normalize:
//!   repair_unicode: true
//!   fix_mojibake: true
//!   unicode_form: nfc        # nfc | nfkc | none
//!
//! document:
//!   id_namespace: "5d0cf1a2-7b3e-4c89-9f21-d0c5e7a8b463"  # DEFAULT_ID_NAMESPACE
//!   max_raw_bytes: 10485760  # omit for no limit
//!   lossy_utf8: false
//!   reject_empty_text: false
//! ```

use std::fs;
use std::path::Path;

use document::DEFAULT_ID_NAMESPACE;
use normalize::NormalizeConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// The only configuration format version understood by this release.
pub const CONFIG_VERSION: &str = "1.0";

/// An in-memory configuration that does not make sense.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),

    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// Errors that can occur when loading a YAML configuration file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),

    #[error("validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for ConfigLoadError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::UnsupportedVersion(v) => ConfigLoadError::UnsupportedVersion(v),
            ConfigError::Validation(msg) => ConfigLoadError::Validation(msg),
        }
    }
}

/// Top-level configuration for a [`Preparer`](crate::Preparer).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrepareConfig {
    /// Configuration format version. Must be `"1.0"`.
    #[serde(default = "default_version")]
    pub version: String,

    /// Normalizer settings.
    #[serde(default)]
    pub normalize: NormalizeConfig,

    /// Decoding, limits and identity.
    #[serde(default)]
    pub document: DocumentConfig,
}

impl PrepareConfig {
    /// Load and validate a YAML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate YAML configuration from a string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: PrepareConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to YAML.
    pub fn to_yaml_string(&self) -> Result<String, ConfigLoadError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion(self.version.clone()));
        }
        self.document.validate()
    }
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            normalize: NormalizeConfig::default(),
            document: DocumentConfig::default(),
        }
    }
}

/// How raw payloads become documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DocumentConfig {
    /// UUIDv5 namespace for derived document and chunk ids.
    pub id_namespace: Uuid,

    /// Upper bound on raw payload size in bytes, checked before decoding.
    /// `None` disables the check.
    pub max_raw_bytes: Option<usize>,

    /// Replace invalid UTF-8 with U+FFFD instead of failing.
    pub lossy_utf8: bool,

    /// Fail when the normalized text is empty.
    pub reject_empty_text: bool,
}

impl DocumentConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_raw_bytes == Some(0) {
            return Err(ConfigError::Validation(
                "document.max_raw_bytes must be > 0 when set".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            id_namespace: DEFAULT_ID_NAMESPACE,
            max_raw_bytes: Some(10 * 1024 * 1024), // 10MB
            lossy_utf8: false,
            reject_empty_text: false,
        }
    }
}

fn default_version() -> String {
    CONFIG_VERSION.to_string()
}
