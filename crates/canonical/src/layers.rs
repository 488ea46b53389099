//! Placeholder layers: dates, reference numbers and personal names.
//!
//! Each layer is a fixed, ordered list of case-insensitive patterns applied
//! to the output of the previous layer. Within a layer the longer grammar
//! runs first ("27. November 2025" before "November 2025"), so a span that
//! was already replaced by a placeholder is never rewritten a second time.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};

/// Placeholder substituted for date-like spans.
pub const DATE_TOKEN: &str = "<DATE>";
/// Placeholder substituted for case/file/insurance reference numbers.
pub const ID_TOKEN: &str = "<ID>";
/// Placeholder substituted for salutation+name and birth-date phrases.
pub const NAME_TOKEN: &str = "<NAME>";

const MONTHS: &str = "januar|january|februar|february|märz|maerz|march|april|mai|may|juni|june|juli|july|august|september|oktober|october|november|dezember|december";

static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        // 27.11.2025, 1.5.25
        r"\b\d{1,2}\.\d{1,2}\.\d{2,4}\b".to_string(),
        // 2025-11-27
        r"\b\d{4}-\d{2}-\d{2}\b".to_string(),
        // 11/27/2025, 27/11/25
        r"\b\d{1,2}/\d{1,2}/\d{2,4}\b".to_string(),
        // 27. November 2025
        format!(r"\b\d{{1,2}}\.\s*(?:{MONTHS})\s*\d{{2,4}}\b"),
        // 27 November 2025
        format!(r"\b\d{{1,2}}\s+(?:{MONTHS})\s+\d{{2,4}}\b"),
        // November 27, 2025
        format!(r"\b(?:{MONTHS})\s+\d{{1,2}},?\s+\d{{2,4}}\b"),
        // November 2025
        format!(r"\b(?:{MONTHS})\s*\d{{2,4}}\b"),
    ])
});

static ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\baktenzeichen[:\s]*[\w\-/]+".to_string(),
        r"\baz(?:\.|:)[:\s]*[\w\-/]+".to_string(),
        r"\bversicherungs(?:nummer|nr\.?)[:\s]*[\w\-/]+".to_string(),
        r"\bvers\.?\s*-?\s*nr\.?[:\s]*[\w\-/]+".to_string(),
        // Insurance numbers like "A 123456789"
        r"\b[a-z]{1,3}\s*\d{6,12}\b".to_string(),
    ])
});

static NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    let birth_date = r"(?:<date>|\d{1,2}\.\d{1,2}\.\d{2,4})";
    compile(&[
        r"\b(?:herrn?|frau|hr\.|fr\.)\s+(?:dr\.\s*(?:med\.\s*)?)?\p{L}[\p{L}\-]*".to_string(),
        format!(r"\bgeb\.\s*{birth_date}"),
        format!(r"\bgeboren\s+(?:am\s+)?{birth_date}"),
        format!(r"\bborn\s+(?:on\s+)?{birth_date}"),
    ])
});

fn compile(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).expect("static placeholder pattern compiles"))
        .collect()
}

fn substitute(patterns: &[Regex], text: &str, token: &str) -> String {
    let mut current = text.to_string();
    for re in patterns {
        let replaced = re.replace_all(&current, NoExpand(token)).into_owned();
        current = replaced;
    }
    current
}

/// Replace date-like substrings with [`DATE_TOKEN`].
pub fn strip_dates(text: &str) -> String {
    substitute(&DATE_PATTERNS, text, DATE_TOKEN)
}

/// Replace case/reference-number patterns with [`ID_TOKEN`].
pub fn strip_ids(text: &str) -> String {
    substitute(&ID_PATTERNS, text, ID_TOKEN)
}

/// Replace salutation+name and "born on <date>" patterns with [`NAME_TOKEN`].
///
/// Expects dates to have been replaced already, but also accepts raw
/// numeric dates after a birth marker.
pub fn strip_names(text: &str) -> String {
    substitute(&NAME_PATTERNS, text, NAME_TOKEN)
}
