//! # Cross-Document Template Mining
//!
//! Turns a corpus of fingerprinted documents into a [`TemplateSpec`]:
//!
//! 1. [`FingerprintStats`] counts, once per document, where every
//!    fingerprint occurs.
//! 2. [`classify`] splits fingerprints into FIXED boilerplate and VARIABLE
//!    content against `boilerplate_threshold`.
//! 3. [`mine_sequences`] finds runs of 2-5 paragraphs, starting on a FIXED
//!    one, that recur in the same order.
//! 4. [`detect_anchors`] fuzzy-matches headings against the ordered
//!    [`AnchorVocabulary`].
//! 5. [`build_skeleton`] emits a heading node and a content slot per
//!    anchor, in vocabulary order.
//! 6. [`extract_style_roles`] and friends vote style roles, header/footer
//!    blocks and spacing.
//!
//! Every stage reads immutable inputs and the documents in the order given;
//! nothing here touches the filesystem.
//!
//! ```
//! use canonical::CanonicalizeConfig;
//! use fingerprint::{fingerprint_document, FingerprintConfig};
//! use ingest::{DocumentProfile, ParagraphRecord};
//! use miner::{mine_template, MinerConfig, TemplateFamily};
//!
//! let docs: Vec<_> = ["a.docx", "b.docx"]
//!     .into_iter()
//!     .map(|name| {
//!         let paragraphs = vec![
//!             ParagraphRecord::new("ANAMNESE", "Heading 1"),
//!             ParagraphRecord::new(format!("Befund zu {name}"), "Normal"),
//!         ];
//!         let profile = DocumentProfile::new(name, "", paragraphs, vec![], vec![]);
//!         fingerprint_document(profile, &FingerprintConfig::default()).unwrap()
//!     })
//!     .collect();
//!
//! let out = mine_template(
//!     &docs,
//!     0,
//!     &TemplateFamily::default(),
//!     &MinerConfig::default(),
//!     &CanonicalizeConfig::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(out.classification.fixed.len(), 1);
//! assert_eq!(out.template.anchors[0].id, "anamnese");
//! assert_eq!(out.template.skeleton.len(), 2);
//! ```

pub mod anchor;
pub mod classify;
pub mod config;
mod error;
pub mod sequence;
pub mod skeleton;
pub mod stats;
pub mod style;
pub mod template;

#[cfg(test)]
mod test_support;

pub use crate::anchor::{detect_anchors, similarity, slugify, Anchor, AnchorMatcher, MatchMode};
pub use crate::classify::{classify, Classification, ClassifiedFingerprint, VariableReason};
pub use crate::config::{AnchorVocabulary, ClassificationMode, MinerConfig, DEFAULT_ANCHORS};
pub use crate::error::MinerError;
pub use crate::sequence::{mine_sequences, Sequence, SEQUENCE_KEY_DELIMITER};
pub use crate::skeleton::{build_skeleton, FixedParagraph, ListBehavior, SkeletonNode};
pub use crate::stats::{FingerprintEntry, FingerprintStats, MIN_CORPUS_DOCUMENTS};
pub use crate::style::{
    extract_footer, extract_header, extract_render_rules, extract_style_roles, is_heading_like,
    RenderRules, RunningBlock, StyleRole, StyleRoleMap,
};
pub use crate::template::{
    mine_template, mine_template_observed, ExtractionWarning, MiningOutput, MiningStage,
    QualityMetrics, TemplateFamily, TemplateSpec, TEMPLATE_SPEC_VERSION,
};
