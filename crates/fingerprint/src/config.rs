//! Configuration and error types for paragraph fingerprinting.
//!
//! The fingerprint stage is a pure function of `(paragraph, config)`; nothing
//! here touches I/O or process state.

use canonical::{CanonicalError, CanonicalizeConfig, NormalizationLevel};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hex characters kept from the SHA-256 digest.
pub const DEFAULT_HASH_LEN: usize = 12;

/// Shortest hash accepted; shorter keys collide too easily in a corpus.
pub const MIN_HASH_LEN: usize = 8;

/// Configuration for fingerprint computation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FingerprintConfig {
    /// Configuration schema version.
    pub version: u32,
    /// Normalization layer the hash is computed over.
    pub level: NormalizationLevel,
    /// Number of hex characters in the hash part of the key.
    pub hash_len: usize,
    /// Settings for the `basic` layer that every other layer builds on.
    pub canonical: CanonicalizeConfig,
}

impl FingerprintConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fingerprint at a different normalization layer.
    pub fn with_level(mut self, level: NormalizationLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the hash length (8..=64 hex characters).
    pub fn with_hash_len(mut self, hash_len: usize) -> Self {
        self.hash_len = hash_len;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), FingerprintError> {
        if self.version < 1 {
            return Err(FingerprintError::InvalidConfigVersion {
                version: self.version,
            });
        }
        if !(MIN_HASH_LEN..=64).contains(&self.hash_len) {
            return Err(FingerprintError::InvalidHashLength { len: self.hash_len });
        }
        self.canonical.validate()?;
        Ok(())
    }
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            version: 1,
            level: NormalizationLevel::NoIds,
            hash_len: DEFAULT_HASH_LEN,
            canonical: CanonicalizeConfig::default(),
        }
    }
}

/// Errors returned by the fingerprint stage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FingerprintError {
    #[error("invalid config version {version}; expected >= 1")]
    InvalidConfigVersion { version: u32 },

    #[error("invalid config: hash_len must be within 8..=64 (got {len})")]
    InvalidHashLength { len: usize },

    #[error(transparent)]
    Canonical(#[from] CanonicalError),
}
