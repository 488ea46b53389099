//! Core data structures produced by ingest.
//!
//! A [`DocumentProfile`] is built once per source document and is read-only
//! afterwards. Every later pipeline stage consumes profiles by reference.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One body paragraph of a source document, with its formatting metadata.
///
/// Blank paragraphs are kept as explicit spacing markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphRecord {
    /// Raw paragraph text. Runs are concatenated; tabs and breaks are kept
    /// as `\t` and `\n`.
    pub text: String,

    /// Resolved display name of the paragraph style, e.g. `"Heading 1"`.
    pub style_name: String,

    /// Heading level, from the style name or the explicit outline level.
    #[serde(default)]
    pub outline_level: Option<u8>,

    /// Paragraph carries list numbering.
    #[serde(default)]
    pub is_list: bool,

    /// Zero-based list nesting level.
    #[serde(default)]
    pub list_level: Option<u8>,

    /// Space before, in points.
    #[serde(default)]
    pub spacing_before: Option<f64>,

    /// Space after, in points.
    #[serde(default)]
    pub spacing_after: Option<f64>,

    /// Left indentation, in points.
    #[serde(default)]
    pub left_indent: Option<f64>,

    /// Raw justification value (`left`, `center`, `both`, ...).
    #[serde(default)]
    pub alignment: Option<String>,
}

impl ParagraphRecord {
    /// Plain paragraph with the given text and style and no other formatting.
    pub fn new(text: impl Into<String>, style_name: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style_name: style_name.into(),
            outline_level: None,
            is_list: false,
            list_level: None,
            spacing_before: None,
            spacing_after: None,
            left_indent: None,
            alignment: None,
        }
    }

    /// True when the paragraph has no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Everything ingest extracts from one source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentProfile {
    /// File name of the source document.
    pub source: String,

    /// Full path the document was read from.
    #[serde(default)]
    pub source_path: String,

    /// Body paragraphs in document order.
    pub paragraphs: Vec<ParagraphRecord>,

    /// Distinct header blocks, first-seen order.
    #[serde(default)]
    pub headers: Vec<String>,

    /// Distinct footer blocks, first-seen order.
    #[serde(default)]
    pub footers: Vec<String>,

    /// Paragraph count per style name.
    #[serde(default)]
    pub styles_histogram: BTreeMap<String, usize>,
}

impl DocumentProfile {
    /// Build a profile and derive its style histogram from `paragraphs`.
    pub fn new(
        source: impl Into<String>,
        source_path: impl Into<String>,
        paragraphs: Vec<ParagraphRecord>,
        headers: Vec<String>,
        footers: Vec<String>,
    ) -> Self {
        let mut styles_histogram = BTreeMap::new();
        for para in &paragraphs {
            *styles_histogram.entry(para.style_name.clone()).or_insert(0) += 1;
        }
        Self {
            source: source.into(),
            source_path: source_path.into(),
            paragraphs,
            headers: dedup_preserving_order(headers),
            footers: dedup_preserving_order(footers),
            styles_histogram,
        }
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Ordering key used to reduce ingest results deterministically.
    pub fn sort_key(&self) -> (&str, &str) {
        (&self.source, &self.source_path)
    }
}

/// A document excluded from the corpus, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDocument {
    pub source: String,
    pub reason: String,
}

pub(crate) fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_counts_every_paragraph() {
        let profile = DocumentProfile::new(
            "a.docx",
            "/tmp/a.docx",
            vec![
                ParagraphRecord::new("ANAMNESE", "Heading 1"),
                ParagraphRecord::new("", "Normal"),
                ParagraphRecord::new("Der Patient berichtet.", "Normal"),
            ],
            vec![],
            vec![],
        );
        assert_eq!(profile.styles_histogram.get("Normal"), Some(&2));
        assert_eq!(profile.styles_histogram.get("Heading 1"), Some(&1));
        assert_eq!(profile.paragraph_count(), 3);
    }

    #[test]
    fn header_blocks_are_deduplicated_in_order() {
        let profile = DocumentProfile::new(
            "a.docx",
            "",
            vec![],
            vec!["Praxis".into(), "Seite".into(), "Praxis".into()],
            vec![],
        );
        assert_eq!(profile.headers, vec!["Praxis".to_string(), "Seite".to_string()]);
    }

    #[test]
    fn blank_detection_ignores_whitespace() {
        assert!(ParagraphRecord::new(" \t\n", "Normal").is_blank());
        assert!(!ParagraphRecord::new(" x ", "Normal").is_blank());
    }

    #[test]
    fn minimal_json_profile_deserializes() {
        let json = r#"{
            "source": "a.docx",
            "paragraphs": [{"text": "ANAMNESE", "style_name": "Heading 1"}]
        }"#;
        let profile: DocumentProfile = serde_json::from_str(json).expect("parse");
        assert_eq!(profile.paragraphs[0].outline_level, None);
        assert!(!profile.paragraphs[0].is_list);
        assert!(profile.headers.is_empty());
    }
}
