//! Section anchor detection.
//!
//! Heading-styled or short paragraphs are matched against the ordered
//! vocabulary with normalized Levenshtein similarity. An exact match with
//! any entry wins outright; otherwise the first entry at or above the
//! similarity threshold wins. Anchors found in enough documents are
//! emitted in vocabulary order, never in observed order.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use canonical::{normalize_basic, CanonicalizeConfig};
use fingerprint::FingerprintedDocument;
use ingest::ParagraphRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{AnchorVocabulary, MinerConfig};
use crate::style::is_heading_like;

/// `1 - levenshtein / max_len` over characters; `0.0` if either side is
/// empty.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    strsim::normalized_levenshtein(a, b)
}

/// Stable identifier for a section name: lower-case ASCII, German
/// umlauts transliterated, every other run of non-alphanumerics folded
/// into a single `_`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_sep = false;
    for ch in text.chars().flat_map(char::to_lowercase) {
        let mapped: &str = match ch {
            'ä' => "ae",
            'ö' => "oe",
            'ü' => "ue",
            'ß' => "ss",
            c if c.is_ascii_alphanumeric() => {
                if pending_sep && !slug.is_empty() {
                    slug.push('_');
                }
                pending_sep = false;
                slug.push(c);
                continue;
            }
            _ => {
                pending_sep = true;
                continue;
            }
        };
        if pending_sep && !slug.is_empty() {
            slug.push('_');
        }
        pending_sep = false;
        slug.push_str(mapped);
    }
    slug
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    Fuzzy,
}

/// A recognized section heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub id: String,
    pub canonical_text: String,
    pub match_mode: MatchMode,
    pub min_similarity: f64,
    /// Documents the section was found in.
    pub occurrence_count: usize,
    pub occurrence_rate: f64,
    pub styles_seen: Vec<String>,
    /// Distinct heading texts, first-seen order, bounded.
    pub variants_seen: Vec<String>,
    /// Most frequent heading text.
    pub heading_text: String,
    /// Most frequent heading style; ties go to the smallest name.
    pub heading_style: String,
}

/// Vocabulary prepared for matching.
#[derive(Debug, Clone)]
pub struct AnchorMatcher {
    entries: Vec<(String, String)>,
    threshold: f64,
}

impl AnchorMatcher {
    pub fn new(
        vocabulary: &AnchorVocabulary,
        canonical: &CanonicalizeConfig,
        threshold: f64,
    ) -> Self {
        let entries = vocabulary
            .entries()
            .iter()
            .map(|entry| (entry.clone(), normalize_basic(entry, canonical)))
            .collect();
        Self { entries, threshold }
    }

    /// Vocabulary index and similarity of the entry `normalized` matches.
    pub fn match_normalized(&self, normalized: &str) -> Option<(usize, f64)> {
        if normalized.is_empty() {
            return None;
        }
        if let Some(idx) = self.entries.iter().position(|(_, norm)| norm == normalized) {
            return Some((idx, 1.0));
        }
        self.entries.iter().enumerate().find_map(|(idx, (_, norm))| {
            let score = similarity(normalized, norm);
            (score >= self.threshold).then_some((idx, score))
        })
    }

    /// Match raw paragraph text; trailing `:`/`-` are ignored.
    pub fn match_text(&self, text: &str, canonical: &CanonicalizeConfig) -> Option<(usize, f64)> {
        let stripped = text.trim_end_matches(|c: char| c == ':' || c == '-' || c.is_whitespace());
        self.match_normalized(&normalize_basic(stripped, canonical))
    }

    pub fn canonical_text(&self, idx: usize) -> Option<&str> {
        self.entries.get(idx).map(|(text, _)| text.as_str())
    }
}

#[derive(Default)]
struct AnchorTally {
    documents: usize,
    /// `(variant, occurrences)`, first-seen order.
    variants: Vec<(String, usize)>,
    styles: BTreeMap<String, usize>,
}

impl AnchorTally {
    fn record(&mut self, text: &str, style: &str) {
        match self.variants.iter_mut().find(|(v, _)| v == text) {
            Some((_, count)) => *count += 1,
            None => self.variants.push((text.to_string(), 1)),
        }
        *self.styles.entry(style.to_string()).or_default() += 1;
    }

    fn heading_text(&self) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for (text, count) in &self.variants {
            if best.is_none_or(|(_, best_count)| *count > best_count) {
                best = Some((text.as_str(), *count));
            }
        }
        best.map(|(text, _)| text)
    }

    fn heading_style(&self) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for (style, count) in &self.styles {
            if best.is_none_or(|(_, best_count)| *count > best_count) {
                best = Some((style.as_str(), *count));
            }
        }
        best.map(|(style, _)| style)
    }
}

fn is_candidate(record: &ParagraphRecord, basic: &str, cfg: &MinerConfig) -> bool {
    let text = record.text.trim();
    if text.is_empty() || text.chars().count() > cfg.anchor_max_text_len {
        return false;
    }
    is_heading_like(record) || basic.chars().count() < cfg.anchor_candidate_max_len
}

/// Detect anchors across `documents`, in vocabulary order.
pub fn detect_anchors(
    documents: &[FingerprintedDocument],
    cfg: &MinerConfig,
    canonical: &CanonicalizeConfig,
) -> Vec<Anchor> {
    let matcher = AnchorMatcher::new(&cfg.vocabulary, canonical, cfg.anchor_similarity_threshold);
    let mut tallies: BTreeMap<usize, AnchorTally> = BTreeMap::new();

    for doc in documents {
        let mut found_in_doc: HashSet<usize> = HashSet::new();
        for (record, para) in doc.iter() {
            if !is_candidate(record, &para.normalized.basic, cfg) {
                continue;
            }
            let Some((idx, score)) = matcher.match_text(&record.text, canonical) else {
                continue;
            };
            debug!(source = %doc.source(), anchor = idx, similarity = score, "anchor_match");
            let tally = tallies.entry(idx).or_default();
            if found_in_doc.insert(idx) {
                tally.documents += 1;
            }
            tally.record(record.text.trim(), &record.style_name);
        }
    }

    let total = documents.len();
    let required = cfg.anchor_min_support(total);
    let mut used_ids: BTreeSet<String> = BTreeSet::new();
    let mut anchors = Vec::new();

    // BTreeMap order over vocabulary indices is canonical order.
    for (idx, tally) in tallies {
        let Some(canonical_text) = matcher.canonical_text(idx) else {
            continue;
        };
        if tally.documents < required {
            debug!(
                anchor = canonical_text,
                documents = tally.documents,
                required,
                "anchor_dropped"
            );
            continue;
        }
        let id = unique_id(slugify(canonical_text), &mut used_ids);
        anchors.push(Anchor {
            id,
            canonical_text: canonical_text.to_string(),
            match_mode: MatchMode::Fuzzy,
            min_similarity: cfg.anchor_similarity_threshold,
            occurrence_count: tally.documents,
            occurrence_rate: if total == 0 { 0.0 } else { tally.documents as f64 / total as f64 },
            styles_seen: tally.styles.keys().cloned().collect(),
            variants_seen: tally
                .variants
                .iter()
                .take(cfg.variant_limit)
                .map(|(text, _)| text.clone())
                .collect(),
            heading_text: tally.heading_text().unwrap_or(canonical_text).to_string(),
            heading_style: tally.heading_style().unwrap_or("Heading 1").to_string(),
        });
    }
    anchors
}

fn unique_id(base: String, used: &mut BTreeSet<String>) -> String {
    if used.insert(base.clone()) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}_{n}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::doc;

    fn matcher() -> AnchorMatcher {
        AnchorMatcher::new(&AnchorVocabulary::default(), &CanonicalizeConfig::default(), 0.88)
    }

    #[test]
    fn similarity_bounds() {
        assert_eq!(similarity("anamnese", "anamnese"), 1.0);
        assert_eq!(similarity("", ""), 0.0);
        assert_eq!(similarity("abc", ""), 0.0);
        assert!((similarity("anamnesse", "anamnese") - 8.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn every_vocabulary_entry_matches_itself() {
        let m = matcher();
        let canonical = CanonicalizeConfig::default();
        for (idx, entry) in AnchorVocabulary::default().entries().iter().enumerate() {
            assert_eq!(m.match_text(entry, &canonical), Some((idx, 1.0)), "{entry}");
        }
    }

    #[test]
    fn first_match_wins_for_fuzzy_candidates() {
        let m = matcher();
        let canonical = CanonicalizeConfig::default();
        let (idx, score) = m.match_text("Diagnosee", &canonical).expect("match");
        assert_eq!(m.canonical_text(idx), Some("Diagnosen"));
        assert!(score < 1.0);
    }

    #[test]
    fn trailing_punctuation_and_case_are_ignored() {
        let m = matcher();
        let canonical = CanonicalizeConfig::default();
        let (idx, score) = m.match_text("ANAMNESE:", &canonical).expect("match");
        assert_eq!(m.canonical_text(idx), Some("Anamnese"));
        assert_eq!(score, 1.0);
        assert!(m.match_text("Sehr geehrte Damen und Herren", &canonical).is_none());
    }

    #[test]
    fn slugs() {
        assert_eq!(slugify("Anamnese"), "anamnese");
        assert_eq!(slugify("1. Anamnese"), "1_anamnese");
        assert_eq!(slugify("Therapie und behandelnde Ärzte"), "therapie_und_behandelnde_aerzte");
        assert_eq!(
            slugify("Neurologischer/körperlicher Untersuchungsbefund"),
            "neurologischer_koerperlicher_untersuchungsbefund"
        );
        assert_eq!(slugify("  Größe -- Gewicht  "), "groesse_gewicht");
    }

    #[test]
    fn anchors_follow_vocabulary_order_and_support() {
        let docs = vec![
            doc(
                "a",
                &[
                    ("Heading 1", "Beurteilung"),
                    ("Heading 1", "ANAMNESE"),
                    ("Normal", "Text a"),
                ],
            ),
            doc("b", &[("Heading 1", "Anamnese:"), ("Heading 2", "Beurteilung")]),
            doc("c", &[("Normal", "Anamnese"), ("Heading 1", "Epikrise")]),
        ];
        let anchors =
            detect_anchors(&docs, &MinerConfig::default(), &CanonicalizeConfig::default());
        let ids: Vec<&str> = anchors.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["anamnese", "beurteilung"]);

        let anamnese = &anchors[0];
        assert_eq!(anamnese.occurrence_count, 3);
        assert_eq!(anamnese.occurrence_rate, 1.0);
        assert_eq!(anamnese.variants_seen, vec!["ANAMNESE", "Anamnese:", "Anamnese"]);
        assert_eq!(anamnese.heading_text, "ANAMNESE");
        assert_eq!(anamnese.heading_style, "Heading 1");
        assert_eq!(anamnese.styles_seen, vec!["Heading 1", "Normal"]);

        let beurteilung = &anchors[1];
        assert!((beurteilung.occurrence_rate - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn long_paragraphs_are_not_candidates() {
        let long = format!("Anamnese {}", "x".repeat(120));
        let docs = vec![
            doc("a", &[("Heading 1", long.as_str())]),
            doc("b", &[("Heading 1", long.as_str())]),
        ];
        let anchors =
            detect_anchors(&docs, &MinerConfig::default(), &CanonicalizeConfig::default());
        assert!(anchors.is_empty());
    }

    #[test]
    fn custom_vocabulary() {
        let vocab = AnchorVocabulary::new(["Befund", "Procedere"]).expect("vocab");
        let cfg = MinerConfig {
            vocabulary: vocab,
            ..Default::default()
        };
        let docs = vec![
            doc("a", &[("Heading 1", "Procedere"), ("Heading 1", "Befund")]),
            doc("b", &[("Heading 1", "Befund")]),
        ];
        let anchors = detect_anchors(&docs, &cfg, &CanonicalizeConfig::default());
        let ids: Vec<&str> = anchors.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["befund", "procedere"]);
    }

    #[test]
    fn colliding_slugs_get_suffixes() {
        let mut used = BTreeSet::new();
        assert_eq!(unique_id("befund".into(), &mut used), "befund");
        assert_eq!(unique_id("befund".into(), &mut used), "befund_2");
    }
}
