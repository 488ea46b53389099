//! The `TemplateSpec` artifact and the stage sequence that produces it.

use std::fmt;
use std::time::{Duration, Instant};

use canonical::CanonicalizeConfig;
use fingerprint::FingerprintedDocument;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::anchor::{detect_anchors, Anchor};
use crate::classify::{classify, Classification};
use crate::config::{ClassificationMode, MinerConfig};
use crate::error::MinerError;
use crate::sequence::{mine_sequences, Sequence};
use crate::skeleton::{build_skeleton, SkeletonNode};
use crate::stats::FingerprintStats;
use crate::style::{
    extract_footer, extract_header, extract_render_rules, extract_style_roles, RenderRules,
    RunningBlock, StyleRoleMap,
};

/// Schema version written into every `TemplateSpec`.
pub const TEMPLATE_SPEC_VERSION: &str = "1.0";

/// Report family the template is mined for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateFamily {
    pub id: String,
    pub name: String,
}

impl Default for TemplateFamily {
    fn default() -> Self {
        Self {
            id: "default".into(),
            name: "Default Template".into(),
        }
    }
}

/// Non-fatal signs of a low-quality extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionWarning {
    NoFixedFingerprints,
    NoAnchorsMatched,
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionWarning::NoFixedFingerprints => f.write_str("no fixed fingerprints found"),
            ExtractionWarning::NoAnchorsMatched => f.write_str("no anchors matched"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub documents_analyzed: usize,
    pub documents_skipped: usize,
    pub fixed_blocks_found: usize,
    pub variable_blocks_found: usize,
    pub sequences_found: usize,
    pub anchors_detected: usize,
    pub boilerplate_threshold: f64,
    pub classification_mode: ClassificationMode,
    #[serde(default)]
    pub warnings: Vec<ExtractionWarning>,
}

impl QualityMetrics {
    pub fn is_degenerate(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Everything a renderer needs to reproduce the house style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSpec {
    pub version: String,
    pub family_id: String,
    pub family_name: String,
    pub anchors: Vec<Anchor>,
    pub skeleton: Vec<SkeletonNode>,
    pub style_roles: StyleRoleMap,
    pub header: RunningBlock,
    pub footer: RunningBlock,
    pub render_rules: RenderRules,
    /// Qualifying sequences, including those no anchor covers.
    pub sequences: Vec<Sequence>,
    pub quality_metrics: QualityMetrics,
}

/// Result of a mining run: the template plus the classification it was
/// derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct MiningOutput {
    pub template: TemplateSpec,
    pub classification: Classification,
}

/// Cross-document stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MiningStage {
    Statistics,
    Classification,
    Sequences,
    Anchors,
    Skeleton,
    Styles,
}

impl MiningStage {
    pub fn as_str(self) -> &'static str {
        match self {
            MiningStage::Statistics => "statistics",
            MiningStage::Classification => "classification",
            MiningStage::Sequences => "sequences",
            MiningStage::Anchors => "anchors",
            MiningStage::Skeleton => "skeleton",
            MiningStage::Styles => "styles",
        }
    }
}

fn timed<T>(
    stage: MiningStage,
    observe: &mut impl FnMut(MiningStage, Duration),
    f: impl FnOnce() -> T,
) -> T {
    let start = Instant::now();
    let out = f();
    observe(stage, start.elapsed());
    out
}

/// Run every cross-document stage over `documents`.
///
/// `documents` must already be in their canonical order; example sampling
/// depends on it. `documents_skipped` is only reported.
pub fn mine_template(
    documents: &[FingerprintedDocument],
    documents_skipped: usize,
    family: &TemplateFamily,
    cfg: &MinerConfig,
    canonical: &CanonicalizeConfig,
) -> Result<MiningOutput, MinerError> {
    mine_template_observed(documents, documents_skipped, family, cfg, canonical, |_, _| {})
}

/// [`mine_template`] reporting each stage's latency to `observe`.
pub fn mine_template_observed(
    documents: &[FingerprintedDocument],
    documents_skipped: usize,
    family: &TemplateFamily,
    cfg: &MinerConfig,
    canonical: &CanonicalizeConfig,
    mut observe: impl FnMut(MiningStage, Duration),
) -> Result<MiningOutput, MinerError> {
    cfg.validate()?;

    let stats = timed(MiningStage::Statistics, &mut observe, || {
        FingerprintStats::from_documents(documents, cfg.example_limit)
    })?;
    let classification = timed(MiningStage::Classification, &mut observe, || classify(&stats, cfg));
    info!(
        documents = stats.total_documents,
        min_count = classification.min_count,
        fixed = classification.fixed.len(),
        variable = classification.variable.len(),
        "classification_complete"
    );

    let sequences = timed(MiningStage::Sequences, &mut observe, || {
        mine_sequences(documents, &classification, cfg)
    });
    info!(sequences = sequences.len(), "sequences_complete");

    let anchors = timed(MiningStage::Anchors, &mut observe, || {
        detect_anchors(documents, cfg, canonical)
    });
    info!(
        anchors = anchors.len(),
        ids = ?anchors.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(),
        "anchors_complete"
    );

    let skeleton = timed(MiningStage::Skeleton, &mut observe, || build_skeleton(&anchors, cfg));

    let (style_roles, header, footer, render_rules) = timed(MiningStage::Styles, &mut observe, || {
        (
            extract_style_roles(documents, cfg),
            extract_header(documents, cfg),
            extract_footer(documents, cfg),
            extract_render_rules(documents, cfg),
        )
    });

    let mut warnings = Vec::new();
    if classification.fixed.is_empty() {
        warnings.push(ExtractionWarning::NoFixedFingerprints);
    }
    if anchors.is_empty() {
        warnings.push(ExtractionWarning::NoAnchorsMatched);
    }
    for warning in &warnings {
        warn!(warning = %warning, documents = documents.len(), "degenerate_extraction");
    }

    let quality_metrics = QualityMetrics {
        documents_analyzed: documents.len(),
        documents_skipped,
        fixed_blocks_found: classification.fixed.len(),
        variable_blocks_found: classification.variable.len(),
        sequences_found: sequences.len(),
        anchors_detected: anchors.len(),
        boilerplate_threshold: cfg.boilerplate_threshold,
        classification_mode: cfg.classification_mode,
        warnings,
    };

    let template = TemplateSpec {
        version: TEMPLATE_SPEC_VERSION.to_string(),
        family_id: family.id.clone(),
        family_name: family.name.clone(),
        anchors,
        skeleton,
        style_roles,
        header,
        footer,
        render_rules,
        sequences,
        quality_metrics,
    };

    Ok(MiningOutput {
        template,
        classification,
    })
}
