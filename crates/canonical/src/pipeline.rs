use std::borrow::Cow;

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::CanonicalizeConfig;
use crate::error::CanonicalError;
use crate::layers::{strip_dates, strip_ids, strip_names};
use crate::normalized::NormalizedText;

/// Main entry point. Produces every normalization layer for `input`.
pub fn normalize(input: &str, cfg: &CanonicalizeConfig) -> Result<NormalizedText, CanonicalError> {
    cfg.validate()?;

    let basic = normalize_basic(input, cfg);
    let no_dates = strip_dates(&basic);
    let no_ids = strip_ids(&no_dates);
    let no_names = strip_names(&no_ids);

    Ok(NormalizedText {
        basic,
        no_dates,
        no_ids,
        no_names,
    })
}

/// The `basic` layer: optional NFKC, casefold, whitespace collapse and
/// quote/dash unification, in a single pass.
///
/// Idempotent: `normalize_basic(normalize_basic(x)) == normalize_basic(x)`.
pub fn normalize_basic(input: &str, cfg: &CanonicalizeConfig) -> String {
    // Unicode normalization is the first step, as it can affect character boundaries.
    let normalized_text: Cow<str> = if cfg.normalize_unicode {
        Cow::Owned(input.nfkc().collect::<String>())
    } else {
        Cow::Borrowed(input)
    };

    let mut out = String::with_capacity(normalized_text.len());
    let mut pending_space = false;

    for grapheme in normalized_text.graphemes(true) {
        // Lowercasing can expand a single character into multiple.
        if cfg.lowercase {
            for lower in grapheme.to_lowercase().chars() {
                append_char(lower, cfg, &mut out, &mut pending_space);
            }
        } else {
            for ch in grapheme.chars() {
                append_char(ch, cfg, &mut out, &mut pending_space);
            }
        }
    }

    out
}

fn append_char(ch: char, cfg: &CanonicalizeConfig, out: &mut String, pending_space: &mut bool) {
    if ch.is_whitespace() {
        // Leading whitespace is dropped; interior runs collapse to one space.
        if !out.is_empty() {
            *pending_space = true;
        }
        return;
    }
    if *pending_space {
        out.push(' ');
        *pending_space = false;
    }
    let ch = if cfg.unify_punctuation {
        unify_punctuation(ch)
    } else {
        ch
    };
    out.push(ch);
}

fn unify_punctuation(ch: char) -> char {
    match ch {
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{00AB}' | '\u{00BB}' => '"',
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' => '\'',
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}' => '-',
        other => other,
    }
}
