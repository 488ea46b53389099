//! Heuristics for paragraphs that carry one case's personal data.
//!
//! Patterns run on the raw paragraph text so capitalization can separate a
//! salutation followed by a surname from ordinary prose.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Which heuristic flagged a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseSignal {
    /// Salutation followed by a capitalized name ("Herr Schmidt").
    Honorific,
    /// Birth-date phrasing ("geb. 03.05.1970").
    BirthDate,
    /// Street with house number, or postal code with town.
    Address,
    /// Case, file or insurance reference number.
    Reference,
    /// A bare calendar date.
    Date,
}

struct Rule {
    signal: CaseSignal,
    pattern: Regex,
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    let rules: [(CaseSignal, &str); 9] = [
        (
            CaseSignal::Honorific,
            r"\b(?:Herrn?|Frau|Hr\.|Fr\.)\s+(?:Dr\.\s*(?:med\.\s*)?)?[A-ZÄÖÜ][a-zäöüß]+",
        ),
        (
            CaseSignal::BirthDate,
            r"(?i)\b(?:geb\.|geboren(?:\s+am)?|born(?:\s+on)?)\s*\d{1,2}\.\d{1,2}\.\d{2,4}",
        ),
        (
            CaseSignal::Address,
            r"(?i)\b\p{L}[\p{L}\-]*(?:straße|strasse|str\.|weg|allee|platz|gasse|ring)\s+\d{1,4}\s?[a-z]?\b",
        ),
        (CaseSignal::Address, r"\b\d{5}\s+[A-ZÄÖÜ][a-zäöüß]+"),
        (
            CaseSignal::Reference,
            r"(?i)\b(?:aktenzeichen|az\.|vers\.?\s*-?\s*nr\.?|versicherungs(?:nummer|nr\.?))\s*:?\s*[\w\-/ ]{0,12}\d",
        ),
        (CaseSignal::Reference, r"\b[A-Z]{1,3}\s*\d{6,12}\b"),
        (CaseSignal::Date, r"\b\d{1,2}\.\d{1,2}\.\d{2,4}\b"),
        (CaseSignal::Date, r"\b\d{4}-\d{2}-\d{2}\b"),
        (CaseSignal::Date, r"\b\d{1,2}/\d{1,2}/\d{2,4}\b"),
    ];
    rules
        .into_iter()
        .map(|(signal, pattern)| Rule {
            signal,
            pattern: Regex::new(pattern).expect("static case pattern compiles"),
        })
        .collect()
});

/// Every heuristic that fires on `text`, sorted and de-duplicated.
pub fn case_signals(text: &str) -> Vec<CaseSignal> {
    let mut signals: Vec<CaseSignal> = RULES
        .iter()
        .filter(|rule| rule.pattern.is_match(text))
        .map(|rule| rule.signal)
        .collect();
    signals.sort();
    signals.dedup();
    signals
}

/// True when any heuristic fires on `text`.
pub fn is_case_specific(text: &str) -> bool {
    RULES.iter().any(|rule| rule.pattern.is_match(text))
}
