//! Fingerprint key and fingerprinted-document types.
//!
//! The key format is part of the artifact contract: `"<style>:<hash>"`,
//! where `hash` is a hex prefix of the versioned SHA-256 of the normalized
//! text. Changing it requires a new canonical config version.

use std::fmt;

use canonical::NormalizedText;
use ingest::{DocumentProfile, ParagraphRecord};
use serde::{Deserialize, Serialize};

use crate::case_specific::CaseSignal;

/// Style-aware identity key for a paragraph.
///
/// Two paragraphs are the same boilerplate unit iff their fingerprints are
/// equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub(crate) fn from_parts(style_name: &str, hash: &str) -> Self {
        Fingerprint(format!("{style_name}:{hash}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Style-name part of the key.
    pub fn style(&self) -> &str {
        self.0.rsplit_once(':').map_or(self.0.as_str(), |(style, _)| style)
    }

    /// Hash part of the key.
    pub fn hash(&self) -> &str {
        self.0.rsplit_once(':').map_or("", |(_, hash)| hash)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Fingerprint-stage view of one paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintedParagraph {
    /// Layered normalized text.
    pub normalized: NormalizedText,
    /// `None` for spacer paragraphs, which never take part in matching.
    pub fingerprint: Option<Fingerprint>,
    /// Heuristics that flagged the raw text as case-specific.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub case_signals: Vec<CaseSignal>,
}

impl FingerprintedParagraph {
    pub fn is_case_specific(&self) -> bool {
        !self.case_signals.is_empty()
    }

    pub fn is_spacer(&self) -> bool {
        self.fingerprint.is_none()
    }
}

/// A document profile with one [`FingerprintedParagraph`] per paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct FingerprintedDocument {
    pub profile: DocumentProfile,
    /// Aligned index-for-index with `profile.paragraphs`.
    pub paragraphs: Vec<FingerprintedParagraph>,
}

impl FingerprintedDocument {
    pub fn source(&self) -> &str {
        &self.profile.source
    }

    /// Raw records paired with their fingerprint-stage view, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParagraphRecord, &FingerprintedParagraph)> {
        self.profile.paragraphs.iter().zip(self.paragraphs.iter())
    }

    /// Fingerprints of non-spacer paragraphs, in document order.
    pub fn fingerprints(&self) -> impl Iterator<Item = &Fingerprint> {
        self.paragraphs.iter().filter_map(|p| p.fingerprint.as_ref())
    }
}
