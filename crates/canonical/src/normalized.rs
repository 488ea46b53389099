use std::fmt;

use serde::{Deserialize, Serialize};

/// Layered normalized variants of one paragraph's text.
///
/// Each layer strictly builds on the previous one:
/// `basic` → `no_dates` → `no_ids` → `no_names`.
/// For a fixed [`CanonicalizeConfig`](crate::CanonicalizeConfig) the same raw
/// text always produces the same `NormalizedText` on any machine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NormalizedText {
    /// Casefolded, whitespace-collapsed, punctuation-unified text.
    pub basic: String,
    /// `basic` with dates replaced by `<DATE>`.
    pub no_dates: String,
    /// `no_dates` with reference numbers replaced by `<ID>`.
    pub no_ids: String,
    /// `no_ids` with salutation+name and birth phrases replaced by `<NAME>`.
    pub no_names: String,
}

impl NormalizedText {
    /// Text at the requested layer.
    pub fn at(&self, level: NormalizationLevel) -> &str {
        match level {
            NormalizationLevel::Basic => &self.basic,
            NormalizationLevel::NoDates => &self.no_dates,
            NormalizationLevel::NoIds => &self.no_ids,
            NormalizationLevel::NoNames => &self.no_names,
        }
    }

    /// True when the paragraph carried no visible text.
    pub fn is_blank(&self) -> bool {
        self.basic.is_empty()
    }
}

/// Named normalization layers, ordered from least to most generalizing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationLevel {
    Basic,
    NoDates,
    /// Fingerprinting level: generalizes dates and reference numbers but
    /// keeps names, which would otherwise over-merge distinct paragraphs.
    #[default]
    NoIds,
    NoNames,
}

impl fmt::Display for NormalizationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NormalizationLevel::Basic => "basic",
            NormalizationLevel::NoDates => "no_dates",
            NormalizationLevel::NoIds => "no_ids",
            NormalizationLevel::NoNames => "no_names",
        };
        f.write_str(label)
    }
}
