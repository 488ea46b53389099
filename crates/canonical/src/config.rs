//! Configuration types for the layered normalizer.
//!
//! This module defines [`CanonicalizeConfig`], which controls how the `basic`
//! layer of a [`NormalizedText`](crate::NormalizedText) is produced. The
//! placeholder layers (`no_dates`, `no_ids`, `no_names`) are fixed regex
//! passes and are not configurable; they always build on whatever `basic`
//! produced.
//!
//! # Versioning
//!
//! The `version` field feeds the fingerprint hash. Any change to basic
//! normalization or to the placeholder grammars that can alter normalized
//! text must be accompanied by a version bump so fingerprints from different
//! runs are never confused.
//!
//! # Examples
//!
//! ```rust
//! use canonical::CanonicalizeConfig;
//!
//! let config = CanonicalizeConfig::default();
//! assert_eq!(config.version, 1);
//! assert!(config.normalize_unicode);
//! assert!(config.lowercase);
//! assert!(config.unify_punctuation);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;

/// Configuration for the `basic` normalization layer.
///
/// Cheap to clone and serde-friendly so it can be embedded in the YAML
/// pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CanonicalizeConfig {
    /// Semantic version of the normalization behavior.
    ///
    /// Must be >= 1. The version is mixed into every fingerprint hash:
    /// ```text
    /// SHA-256(version.to_be_bytes() || 0x00 || text_bytes)
    /// ```
    pub version: u32,

    /// If true, apply Unicode NFKC normalization before other transforms.
    ///
    /// Dictated and typed reports mix composed and decomposed umlauts
    /// ("ü" vs "u" + U+0308); NFKC folds both to the same form.
    pub normalize_unicode: bool,

    /// If true, casefold the text (locale-free Unicode lowercasing).
    pub lowercase: bool,

    /// If true, map typographic quote and dash variants to their ASCII form
    /// (`„“”«»` → `"`, `‚‘’` → `'`, `–—` → `-`).
    pub unify_punctuation: bool,
}

impl CanonicalizeConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), CanonicalError> {
        if self.version == 0 {
            return Err(CanonicalError::InvalidConfig(
                "config version must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for CanonicalizeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            normalize_unicode: true,
            lowercase: true,
            unify_punctuation: true,
        }
    }
}
