//! Mining configuration and the canonical section vocabulary.
//!
//! Every threshold the miner uses lives in [`MinerConfig`]; nothing is read
//! from module-level state. The config is immutable once built and passed
//! by reference into each stage.
//!
//! ```
//! use miner::{ClassificationMode, MinerConfig};
//!
//! let cfg = MinerConfig::default();
//! assert_eq!(cfg.boilerplate_threshold, 0.85);
//! assert_eq!(cfg.min_support(5), 5); // ceil(5 * 0.85)
//!
//! let relaxed = MinerConfig {
//!     boilerplate_threshold: 0.8,
//!     ..Default::default()
//! };
//! assert_eq!(relaxed.min_support(5), 4);
//!
//! let strict = MinerConfig {
//!     classification_mode: ClassificationMode::StrictIntersection,
//!     ..Default::default()
//! };
//! assert_eq!(strict.min_support(7), 7);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::MinerError;

/// Absorbs float error in `total * threshold` so that e.g. `10 * 0.7`
/// requires 7 documents, not 8.
const SUPPORT_EPSILON: f64 = 1e-9;

/// Known section headings, most specific first.
///
/// Order matters twice: matching is first-match-wins over this list, and
/// retained anchors are emitted in this order.
pub const DEFAULT_ANCHORS: &[&str] = &[
    "Gutachterliche Fragestellung",
    "Fragestellung",
    "1. Anamnese",
    "Anamnese",
    "2. Untersuchungsbefunde",
    "Untersuchungsbefunde",
    "3. Diagnosen",
    "Diagnosen",
    "Diagnose",
    "4. Epikrise",
    "Epikrise",
    "5. Sozialmedizinische Leistungsbeurteilung",
    "Sozialmedizinische Leistungsbeurteilung",
    "1.1 Anamnese medizinischer Daten",
    "Anamnese medizinischer Daten",
    "1.2 Biografische Anamnese",
    "Biografische Anamnese",
    "Familienanamnese",
    "Eigenanamnese",
    "Sozialanamnese",
    "Vegetative Anamnese",
    "Aktuelle Beschwerden",
    "Jetzige Beschwerden",
    "Aktuelle Medikation",
    "Therapie und behandelnde Ärzte",
    "Neurologischer Befund",
    "Körperlicher Befund",
    "Psychischer Befund",
    "Neurologischer/körperlicher Untersuchungsbefund",
    "Beurteilung",
    "Zusammenfassung",
    "Therapieempfehlung",
    "Empfehlung",
    "Hamilton Depression Scale",
    "Vorgelegte Klinikaufenthalte",
];

/// Ordered list of canonical section names for one report family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct AnchorVocabulary {
    entries: Vec<String>,
}

impl AnchorVocabulary {
    /// Build a vocabulary. Entries are trimmed; the list must be non-empty
    /// and free of duplicates.
    pub fn new<I, S>(entries: I) -> Result<Self, MinerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for entry in entries {
            let entry: String = entry.into();
            let entry = entry.trim();
            if entry.is_empty() {
                return Err(MinerError::InvalidVocabulary("empty entry".into()));
            }
            if out.iter().any(|e| e == entry) {
                return Err(MinerError::InvalidVocabulary(format!(
                    "duplicate entry {entry:?}"
                )));
            }
            out.push(entry.to_string());
        }
        if out.is_empty() {
            return Err(MinerError::InvalidVocabulary(
                "vocabulary must contain at least one entry".into(),
            ));
        }
        Ok(Self { entries: out })
    }

    /// Parse one entry per line. Blank lines and `#` comments are skipped.
    pub fn from_lines(text: &str) -> Result<Self, MinerError> {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AnchorVocabulary {
    fn default() -> Self {
        Self {
            entries: DEFAULT_ANCHORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for AnchorVocabulary {
    type Error = MinerError;

    fn try_from(entries: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<AnchorVocabulary> for Vec<String> {
    fn from(vocabulary: AnchorVocabulary) -> Self {
        vocabulary.entries
    }
}

/// How the FIXED support requirement is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMode {
    /// `ceil(total * boilerplate_threshold)` documents.
    #[default]
    Threshold,
    /// Every document.
    StrictIntersection,
}

/// Thresholds and limits for the cross-document stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    pub version: u32,
    /// Fraction of documents a fingerprint (or sequence) must appear in to
    /// be FIXED.
    pub boilerplate_threshold: f64,
    pub classification_mode: ClassificationMode,
    /// FIXED fingerprints need an example of at least this many characters.
    pub min_text_length: usize,
    /// Shortest n-gram mined.
    pub ngram_min: usize,
    /// Longest n-gram mined.
    pub ngram_max: usize,
    /// Minimum Levenshtein similarity for a heading to match a vocabulary
    /// entry.
    pub anchor_similarity_threshold: f64,
    /// Fraction of documents an anchor must be found in to be retained.
    pub anchor_min_occurrence: f64,
    /// Slots of anchors found in fewer than this fraction of documents are
    /// optional.
    pub optional_slot_below: f64,
    /// Non-heading paragraphs shorter than this (normalized characters) are
    /// still anchor candidates.
    pub anchor_candidate_max_len: usize,
    /// Paragraphs longer than this are never anchor candidates.
    pub anchor_max_text_len: usize,
    pub example_limit: usize,
    pub sequence_example_limit: usize,
    /// Characters kept per paragraph in sequence examples.
    pub sequence_example_chars: usize,
    /// Anchor heading variants and header/footer variants kept.
    pub variant_limit: usize,
    /// Non-heading, non-list paragraphs longer than this count as body text
    /// for style roles.
    pub body_min_length: usize,
    pub vocabulary: AnchorVocabulary,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            boilerplate_threshold: 0.85,
            classification_mode: ClassificationMode::Threshold,
            min_text_length: 3,
            ngram_min: 2,
            ngram_max: 5,
            anchor_similarity_threshold: 0.88,
            anchor_min_occurrence: 0.5,
            optional_slot_below: 0.8,
            anchor_candidate_max_len: 60,
            anchor_max_text_len: 100,
            example_limit: 3,
            sequence_example_limit: 2,
            sequence_example_chars: 50,
            variant_limit: 5,
            body_min_length: 20,
            vocabulary: AnchorVocabulary::default(),
        }
    }
}

impl MinerConfig {
    pub fn validate(&self) -> Result<(), MinerError> {
        let invalid = |msg: String| Err(MinerError::InvalidConfig(msg));

        if self.version < 1 {
            return invalid(format!("version must be >= 1 (got {})", self.version));
        }
        if !(self.boilerplate_threshold > 0.0 && self.boilerplate_threshold <= 1.0) {
            return invalid(format!(
                "boilerplate_threshold must be in (0, 1] (got {})",
                self.boilerplate_threshold
            ));
        }
        if !(self.anchor_similarity_threshold > 0.0 && self.anchor_similarity_threshold <= 1.0) {
            return invalid(format!(
                "anchor_similarity_threshold must be in (0, 1] (got {})",
                self.anchor_similarity_threshold
            ));
        }
        for (name, value) in [
            ("anchor_min_occurrence", self.anchor_min_occurrence),
            ("optional_slot_below", self.optional_slot_below),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("{name} must be in [0, 1] (got {value})"));
            }
        }
        if self.ngram_min < 2 || self.ngram_min > self.ngram_max {
            return invalid(format!(
                "n-gram range must satisfy 2 <= min <= max (got {}..={})",
                self.ngram_min, self.ngram_max
            ));
        }
        if self.anchor_candidate_max_len > self.anchor_max_text_len {
            return invalid(format!(
                "anchor_candidate_max_len ({}) exceeds anchor_max_text_len ({})",
                self.anchor_candidate_max_len, self.anchor_max_text_len
            ));
        }
        if self.vocabulary.is_empty() {
            return Err(MinerError::InvalidVocabulary(
                "vocabulary must contain at least one entry".into(),
            ));
        }
        Ok(())
    }

    /// Documents a fingerprint or sequence must appear in to qualify.
    pub fn min_support(&self, total_documents: usize) -> usize {
        match self.classification_mode {
            ClassificationMode::Threshold => {
                support_for(total_documents, self.boilerplate_threshold)
            }
            ClassificationMode::StrictIntersection => total_documents.max(1),
        }
    }

    /// Documents an anchor must be found in to be retained.
    pub fn anchor_min_support(&self, total_documents: usize) -> usize {
        support_for(total_documents, self.anchor_min_occurrence)
    }
}

/// `max(1, ceil(total * fraction))`, tolerant of float noise.
pub(crate) fn support_for(total_documents: usize, fraction: f64) -> usize {
    let raw = (total_documents as f64 * fraction - SUPPORT_EPSILON).ceil();
    if raw < 1.0 {
        1
    } else {
        raw as usize
    }
}
