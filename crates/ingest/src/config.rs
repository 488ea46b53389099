//! Configuration types for document ingest.
//!
//! [`IngestConfig`] controls how source documents are opened and turned into
//! [`DocumentProfile`](crate::DocumentProfile)s. It is cheap to clone and
//! serde-friendly so it can be embedded in the YAML pipeline configuration.
//!
//! # Quick Start
//!
//! ```rust
//! use ingest::IngestConfig;
//!
//! let config = IngestConfig::default();
//! config.validate().expect("default config is valid");
//! assert_eq!(config.default_style, "Normal");
//! ```
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default upper bound for a single source file (64 MiB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 64 * 1024 * 1024;

/// Runtime configuration for ingest behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IngestConfig {
    /// Semantic version of the ingest configuration.
    ///
    /// Default: `1`
    pub version: u32,

    /// Files larger than this are rejected with
    /// [`ParseError::FileTooLarge`](crate::ParseError::FileTooLarge) before
    /// they are opened. `None` disables the check.
    pub max_file_bytes: Option<u64>,

    /// Read `word/header*.xml` and `word/footer*.xml` parts.
    pub include_headers_footers: bool,

    /// Style name used for paragraphs that carry no explicit style when the
    /// document does not declare a default paragraph style either.
    pub default_style: String,

    /// Remove control characters (except `\t` and `\n`) from paragraph text.
    pub strip_control_chars: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            version: 1,
            max_file_bytes: Some(DEFAULT_MAX_FILE_BYTES),
            include_headers_footers: true,
            default_style: "Normal".to_string(),
            strip_control_chars: true,
        }
    }
}

/// Errors produced by [`IngestConfig::validate`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("ingest config version must be >= 1")]
    InvalidVersion,

    #[error("max_file_bytes must be greater than zero when set")]
    ZeroFileLimit,

    #[error("default_style must not be empty")]
    EmptyDefaultStyle,
}

impl IngestConfig {
    /// Validate the configuration.
    ///
    /// Performs in-memory checks only.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 {
            return Err(ConfigError::InvalidVersion);
        }
        if self.max_file_bytes == Some(0) {
            return Err(ConfigError::ZeroFileLimit);
        }
        if self.default_style.trim().is_empty() {
            return Err(ConfigError::EmptyDefaultStyle);
        }
        Ok(())
    }
}
