//! # Paragraph Fingerprinting
//!
//! Derives a stable identity key for every paragraph of a
//! [`DocumentProfile`](ingest::DocumentProfile) and flags paragraphs that
//! look like one case's personal data.
//!
//! ## Contract
//!
//! - A fingerprint is `style_name + ":" + short_hash(text at cfg.level)`.
//!   The default level is `no_ids`: dates and reference numbers are
//!   generalized, names are not.
//! - Spacer paragraphs (blank after normalization) get no fingerprint.
//! - The case-specific flag is computed from the raw text and is advisory:
//!   the classifier decides what to do with it.
//! - Pure function of `(profile, config)`: no I/O, no clock, no globals.
//!
//! ## Example
//!
//! ```
//! use fingerprint::{fingerprint_paragraph, FingerprintConfig};
//!
//! let cfg = FingerprintConfig::default();
//! let a = fingerprint_paragraph("Untersuchung am 01.02.2024", "Normal", &cfg).unwrap();
//! let b = fingerprint_paragraph("Untersuchung  am 30.09.2025", "Normal", &cfg).unwrap();
//!
//! assert_eq!(a.fingerprint, b.fingerprint);
//! assert!(a.is_case_specific());
//! ```
mod case_specific;
pub mod config;
pub mod fingerprint;

use canonical::{normalize, short_hash};
use ingest::DocumentProfile;

pub use crate::case_specific::{case_signals, is_case_specific, CaseSignal};
pub use crate::config::{FingerprintConfig, FingerprintError, DEFAULT_HASH_LEN, MIN_HASH_LEN};
pub use crate::fingerprint::{Fingerprint, FingerprintedDocument, FingerprintedParagraph};

/// Fingerprint a single paragraph.
pub fn fingerprint_paragraph(
    text: &str,
    style_name: &str,
    cfg: &FingerprintConfig,
) -> Result<FingerprintedParagraph, FingerprintError> {
    let normalized = normalize(text, &cfg.canonical)?;
    let key_text = normalized.at(cfg.level);
    let fingerprint = if key_text.is_empty() {
        None
    } else {
        let hash = short_hash(cfg.canonical.version, key_text, cfg.hash_len);
        Some(Fingerprint::from_parts(style_name, &hash))
    };
    let case_signals = if fingerprint.is_some() {
        case_signals(text)
    } else {
        Vec::new()
    };
    Ok(FingerprintedParagraph {
        normalized,
        fingerprint,
        case_signals,
    })
}

/// Fingerprint every paragraph of `profile`, keeping document order.
pub fn fingerprint_document(
    profile: DocumentProfile,
    cfg: &FingerprintConfig,
) -> Result<FingerprintedDocument, FingerprintError> {
    cfg.validate()?;
    let paragraphs = profile
        .paragraphs
        .iter()
        .map(|para| fingerprint_paragraph(&para.text, &para.style_name, cfg))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FingerprintedDocument {
        profile,
        paragraphs,
    })
}
