//! YAML configuration file support.
//!
//! One file bundles every stage's settings plus the template family
//! identity. Every section is optional and falls back to the stage's
//! defaults.
//!
//! ## Example
//!
//! ```yaml
//! version: "1.0"
//! name: "neurologische Gutachten"
//! family_id: "neuro"
//! family_name: "Neurologisches Gutachten"
//! parallel: true
//!
//! ingest:
//!   include_headers_footers: true
//!   max_file_bytes: 67108864
//!
//! canonical:
//!   normalize_unicode: true
//!   lowercase: true
//!
//! fingerprint:
//!   level: no_ids
//!   hash_len: 12
//!
//! miner:
//!   boilerplate_threshold: 0.85
//!   classification_mode: threshold
//!   anchor_similarity_threshold: 0.88
//!   ngram_min: 2
//!   ngram_max: 5
//!   vocabulary:
//!     - "Anamnese"
//!     - "Befund"
//!     - "Beurteilung"
//! ```

use std::fs;
use std::path::Path;

use canonical::CanonicalizeConfig;
use fingerprint::FingerprintConfig;
use ingest::IngestConfig;
use miner::{MinerConfig, TemplateFamily};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Settings for a whole mining run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    /// Configuration format version.
    pub version: String,

    /// Optional configuration name/description.
    pub name: Option<String>,

    pub family_id: String,
    pub family_name: String,

    /// Ingest documents on a worker pool. Output does not depend on it.
    pub parallel: bool,

    pub ingest: IngestConfig,

    /// Text normalization; also used for fingerprints and anchor matching,
    /// overriding any `canonical` block nested under `fingerprint`.
    pub canonical: CanonicalizeConfig,

    pub fingerprint: FingerprintConfig,

    pub miner: MinerConfig,
}

impl Default for MiningConfig {
    fn default() -> Self {
        let family = TemplateFamily::default();
        Self {
            version: "1.0".to_string(),
            name: None,
            family_id: family.id,
            family_name: family.name,
            parallel: false,
            ingest: IngestConfig::default(),
            canonical: CanonicalizeConfig::default(),
            fingerprint: FingerprintConfig::default(),
            miner: MinerConfig::default(),
        }
    }
}

impl MiningConfig {
    /// Load a YAML configuration file from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: MiningConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the file version and every stage section.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        if self.family_id.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "family_id must not be empty".to_string(),
            ));
        }
        self.ingest
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("ingest: {err}")))?;
        self.canonical
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("canonical: {err}")))?;
        self.fingerprint_config()
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("fingerprint: {err}")))?;
        self.miner
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("miner: {err}")))?;
        Ok(())
    }

    /// Fingerprint settings with the shared canonical section applied.
    pub fn fingerprint_config(&self) -> FingerprintConfig {
        FingerprintConfig {
            canonical: self.canonical.clone(),
            ..self.fingerprint.clone()
        }
    }

    pub fn family(&self) -> TemplateFamily {
        TemplateFamily {
            id: self.family_id.clone(),
            name: self.family_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canonical::NormalizationLevel;
    use miner::ClassificationMode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_yaml() {
        let yaml = r#"
version: "1.0"
name: "test config"
family_id: "neuro"
miner:
  boilerplate_threshold: 0.8
  classification_mode: strict_intersection
"#;

        let config = MiningConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.name, Some("test config".to_string()));
        assert_eq!(config.family().id, "neuro");
        assert_eq!(config.family().name, "Default Template");
        assert_eq!(config.miner.boilerplate_threshold, 0.8);
        assert_eq!(
            config.miner.classification_mode,
            ClassificationMode::StrictIntersection
        );
        assert_eq!(config.miner.ngram_max, 5);
    }

    #[test]
    fn test_load_from_file() {
        let yaml = r#"
version: "1.0"
fingerprint:
  level: no_names
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = MiningConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.fingerprint.level, NormalizationLevel::NoNames);
    }

    #[test]
    fn test_default_config() {
        let config = MiningConfig::default();
        assert_eq!(config.version, "1.0");
        assert!(config.name.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unsupported_version() {
        let result = MiningConfig::from_yaml("version: \"2.0\"\n");
        assert!(matches!(
            result,
            Err(ConfigLoadError::UnsupportedVersion(v)) if v == "2.0"
        ));
    }

    #[test]
    fn test_miner_validation() {
        let yaml = r#"
version: "1.0"
miner:
  ngram_min: 4
  ngram_max: 2
"#;

        let result = MiningConfig::from_yaml(yaml);
        assert!(result.unwrap_err().to_string().contains("n-gram range"));
    }

    #[test]
    fn test_vocabulary_list_keeps_order() {
        let yaml = r#"
version: "1.0"
miner:
  vocabulary: ["Befund", "Anamnese"]
"#;

        let config = MiningConfig::from_yaml(yaml).unwrap();
        assert_eq!(
            config.miner.vocabulary.entries(),
            &["Befund".to_string(), "Anamnese".to_string()]
        );
    }

    #[test]
    fn test_canonical_section_reaches_fingerprints() {
        let yaml = r#"
version: "1.0"
canonical:
  lowercase: false
"#;

        let config = MiningConfig::from_yaml(yaml).unwrap();
        assert!(!config.fingerprint_config().canonical.lowercase);
    }
}
