//! Layered text normalization for report template mining.
//!
//! Every paragraph pulled out of a source document is rewritten into a
//! [`NormalizedText`] with four layers, each a pure function of the layer
//! before it:
//!
//! 1. `basic` - NFKC (configurable), casefold, whitespace collapse, and
//!    typographic quote/dash unification
//! 2. `no_dates` - date-like spans (German numeric, ISO, slash, and long
//!    German/English month forms) replaced by `<DATE>`
//! 3. `no_ids` - case/file/insurance reference numbers replaced by `<ID>`
//! 4. `no_names` - salutation+name and "born on <date>" phrases replaced by
//!    `<NAME>`
//!
//! `no_ids` is the level fingerprints are computed from. It generalizes the
//! per-report noise that appears inside otherwise identical boilerplate
//! while leaving names in place, so two paragraphs about different people do
//! not collapse into one key.
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no locale dependence. Same text plus same config
//! gives the same layers on any machine.
//!
//! ## Example
//!
//! ```
//! use canonical::{normalize, CanonicalizeConfig, NormalizationLevel};
//!
//! let cfg = CanonicalizeConfig::default();
//! let text = normalize("  Untersuchung am 27.11.2025,  Az.: S12-345/20 ", &cfg).unwrap();
//!
//! assert_eq!(text.basic, "untersuchung am 27.11.2025, az.: s12-345/20");
//! assert_eq!(text.at(NormalizationLevel::NoIds), "untersuchung am <DATE>, <ID>");
//! ```

mod config;
mod error;
mod hash;
mod layers;
mod normalized;
mod pipeline;

pub use crate::config::CanonicalizeConfig;
pub use crate::error::CanonicalError;
pub use crate::hash::{hash_canonical_bytes, short_hash};
pub use crate::layers::{strip_dates, strip_ids, strip_names, DATE_TOKEN, ID_TOKEN, NAME_TOKEN};
pub use crate::normalized::{NormalizationLevel, NormalizedText};
pub use crate::pipeline::{normalize, normalize_basic};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_layer_defaults() {
        let cfg = CanonicalizeConfig::default();
        let out = normalize("  Sehr geehrte\n\nDamen   und\tHerren ", &cfg).expect("normalize");
        assert_eq!(out.basic, "sehr geehrte damen und herren");
        assert_eq!(out.no_dates, out.basic);
        assert_eq!(out.no_ids, out.basic);
    }

    #[test]
    fn basic_layer_is_idempotent() {
        let cfg = CanonicalizeConfig::default();
        let inputs = [
            "  „Gutachten“ – Seite 1  ",
            "Cafe\u{0301} STRASSE\u{00A0}12",
            "ÄRZTLICHE   Stellungnahme:\r\n",
            "\u{FB01}nal ‘quote’ — dash",
            "",
        ];
        for input in inputs {
            let once = normalize_basic(input, &cfg);
            let twice = normalize_basic(&once, &cfg);
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn punctuation_variants_unify() {
        let cfg = CanonicalizeConfig::default();
        assert_eq!(
            normalize_basic("„Befund“ – ‚kurz‘ — lang", &cfg),
            "\"befund\" - 'kurz' - lang"
        );
    }

    #[test]
    fn unicode_equivalence_nfkc() {
        let cfg = CanonicalizeConfig::default();
        assert_eq!(
            normalize_basic("K\u{00F6}rperlicher Befund", &cfg),
            normalize_basic("Ko\u{0308}rperlicher Befund", &cfg)
        );
    }

    #[test]
    fn disable_unicode_normalization() {
        let cfg = CanonicalizeConfig {
            normalize_unicode: false,
            ..Default::default()
        };
        assert_eq!(normalize_basic("Cafe\u{0301}", &cfg), "cafe\u{0301}");
    }

    #[test]
    fn layers_build_on_each_other() {
        let cfg = CanonicalizeConfig::default();
        let out = normalize("Herr Schmidt, geb. 03.05.1970, Az. 12-345", &cfg).expect("normalize");
        assert_eq!(out.basic, "herr schmidt, geb. 03.05.1970, az. 12-345");
        assert_eq!(out.no_dates, "herr schmidt, geb. <DATE>, az. 12-345");
        assert_eq!(out.no_ids, "herr schmidt, geb. <DATE>, <ID>");
        assert_eq!(out.no_names, "<NAME>, <NAME>, <ID>");
        assert_eq!(out.at(NormalizationLevel::Basic), out.basic);
        assert_eq!(out.at(NormalizationLevel::NoNames), out.no_names);
    }

    #[test]
    fn blank_paragraph_normalizes_to_empty() {
        let cfg = CanonicalizeConfig::default();
        let out = normalize(" \t \n", &cfg).expect("normalize");
        assert!(out.is_blank());
        assert!(out.no_names.is_empty());
    }

    #[test]
    fn invalid_config_version_rejected() {
        let cfg = CanonicalizeConfig {
            version: 0,
            ..Default::default()
        };
        assert!(matches!(
            normalize("content", &cfg),
            Err(CanonicalError::InvalidConfig(_))
        ));
    }
}
