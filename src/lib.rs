//! Workspace umbrella crate for docskel, the document template miner.
//!
//! This crate stitches the stage crates together so callers can go from a
//! set of report files to a [`TemplateSpec`] with a single call:
//!
//! 1. ingest every document (optionally on a worker pool) and reduce the
//!    results into file-name order,
//! 2. refuse corpora with fewer than two valid documents,
//! 3. fingerprint every paragraph,
//! 4. run the cross-document mining stages single-threaded.
//!
//! Per-document failures never abort a run; they are carried in
//! [`MiningRun::skipped`] and counted in the template's quality metrics.

pub mod artifacts;
pub mod config;

pub use canonical::{
    CanonicalError, CanonicalizeConfig, NormalizationLevel, NormalizedText, normalize,
    normalize_basic,
};
pub use fingerprint::{
    CaseSignal, Fingerprint, FingerprintConfig, FingerprintError, FingerprintedDocument,
    fingerprint_document,
};
pub use ingest::{
    DocumentProfile, IngestBatch, IngestConfig, InputFormat, ParagraphRecord, ParseError,
    SkippedDocument, discover_documents, ingest_path,
};
pub use miner::{
    AnchorVocabulary, Classification, ClassificationMode, ExtractionWarning,
    MIN_CORPUS_DOCUMENTS, MinerConfig, MinerError, MiningStage, QualityMetrics, Sequence,
    SkeletonNode, TemplateFamily, TemplateSpec,
};

pub use crate::artifacts::{ArtifactPaths, ProfileArtifact, write_artifacts};
pub use crate::config::{ConfigLoadError, MiningConfig};

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

/// Corpus-level failures. Any of these aborts the run without a template.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum PipelineError {
    /// Fewer than [`MIN_CORPUS_DOCUMENTS`] documents survived ingest.
    #[error(
        "insufficient corpus: {valid} valid document(s), at least {required} required ({skipped} skipped)"
    )]
    InsufficientCorpus {
        valid: usize,
        required: usize,
        skipped: usize,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("no input documents: {0}")]
    NoInput(String),

    #[error("canonicalization failure: {0}")]
    Canonical(#[from] CanonicalError),

    #[error("fingerprinting failure: {0}")]
    Fingerprint(#[from] FingerprintError),

    #[error("mining failure: {0}")]
    Miner(#[from] MinerError),

    #[error("failed to write {path}: {message}")]
    Output { path: String, message: String },
}

impl From<ConfigLoadError> for PipelineError {
    fn from(value: ConfigLoadError) -> Self {
        PipelineError::Config(value.to_string())
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct MiningRun {
    pub template: TemplateSpec,
    pub classification: Classification,
    /// Valid documents in the order they were mined.
    pub documents: Vec<FingerprintedDocument>,
    pub skipped: Vec<SkippedDocument>,
}

/// Metrics observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_ingest(&self, latency: Duration, result: Result<(), ParseError>);
    fn record_fingerprint(&self, latency: Duration, result: Result<(), FingerprintError>);
    fn record_stage(&self, stage: MiningStage, latency: Duration);
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

struct MetricsSpan {
    recorder: Arc<dyn PipelineMetrics>,
    start: Instant,
}

impl MetricsSpan {
    fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    fn record_ingest(self, result: Result<(), ParseError>) {
        self.recorder.record_ingest(self.start.elapsed(), result);
    }

    fn record_fingerprint(self, result: Result<(), FingerprintError>) {
        self.recorder.record_fingerprint(self.start.elapsed(), result);
    }
}

fn ingest_one(path: &Path, cfg: &IngestConfig) -> Result<DocumentProfile, ParseError> {
    let metrics = MetricsSpan::start();
    let result = ingest_path(path, cfg);
    if let Some(span) = metrics {
        span.record_ingest(result.as_ref().map(|_| ()).map_err(Clone::clone));
    }
    result
}

/// Ingest `paths`, in parallel when `cfg.parallel` is set, and reduce the
/// results into file-name order.
pub fn ingest_corpus(paths: &[PathBuf], cfg: &MiningConfig) -> IngestBatch {
    if cfg.parallel {
        return ingest_parallel(paths, &cfg.ingest);
    }

    IngestBatch::from_results(
        paths
            .iter()
            .map(|path| (path.clone(), ingest_one(path, &cfg.ingest))),
    )
}

#[cfg(feature = "parallel")]
fn ingest_parallel(paths: &[PathBuf], cfg: &IngestConfig) -> IngestBatch {
    use rayon::prelude::*;

    let results: Vec<_> = paths
        .par_iter()
        .map(|path| (path.clone(), ingest_one(path, cfg)))
        .collect();
    IngestBatch::from_results(results)
}

#[cfg(not(feature = "parallel"))]
fn ingest_parallel(paths: &[PathBuf], cfg: &IngestConfig) -> IngestBatch {
    warn!("parallel ingest requested but the `parallel` feature is disabled");
    ingest::ingest_batch(paths, cfg)
}

/// Mine a template from already ingested profiles.
///
/// `profiles` are sorted by file name then path before anything else
/// happens, so callers may pass them in any order.
pub fn mine_profiles(
    mut profiles: Vec<DocumentProfile>,
    skipped: Vec<SkippedDocument>,
    cfg: &MiningConfig,
) -> Result<MiningRun, PipelineError> {
    cfg.validate()?;

    if profiles.len() < MIN_CORPUS_DOCUMENTS {
        warn!(
            valid = profiles.len(),
            skipped = skipped.len(),
            required = MIN_CORPUS_DOCUMENTS,
            "insufficient_corpus"
        );
        return Err(PipelineError::InsufficientCorpus {
            valid: profiles.len(),
            required: MIN_CORPUS_DOCUMENTS,
            skipped: skipped.len(),
        });
    }
    profiles.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    let fingerprint_cfg = cfg.fingerprint_config();
    let mut documents = Vec::with_capacity(profiles.len());
    for profile in profiles {
        let metrics = MetricsSpan::start();
        let result = fingerprint_document(profile, &fingerprint_cfg);
        if let Some(span) = metrics {
            span.record_fingerprint(result.as_ref().map(|_| ()).map_err(Clone::clone));
        }
        documents.push(result?);
    }
    info!(
        documents = documents.len(),
        skipped = skipped.len(),
        fingerprints = documents.iter().map(|d| d.fingerprints().count()).sum::<usize>(),
        "fingerprint_complete"
    );

    let recorder = metrics_recorder();
    let output = miner::mine_template_observed(
        &documents,
        skipped.len(),
        &cfg.family(),
        &cfg.miner,
        &cfg.canonical,
        |stage, latency| {
            if let Some(recorder) = &recorder {
                recorder.record_stage(stage, latency);
            }
        },
    )?;

    let metrics = &output.template.quality_metrics;
    info!(
        documents = metrics.documents_analyzed,
        skipped = metrics.documents_skipped,
        fixed = metrics.fixed_blocks_found,
        variable = metrics.variable_blocks_found,
        sequences = metrics.sequences_found,
        anchors = metrics.anchors_detected,
        "mining_complete"
    );

    Ok(MiningRun {
        template: output.template,
        classification: output.classification,
        documents,
        skipped,
    })
}

/// Ingest `paths` and mine a template from the documents that parse.
pub fn mine_template(paths: &[PathBuf], cfg: &MiningConfig) -> Result<MiningRun, PipelineError> {
    cfg.validate()?;
    let batch = ingest_corpus(paths, cfg);
    mine_profiles(batch.profiles, batch.skipped, cfg)
}

/// Mine every document of `format` found directly in `dir`.
pub fn mine_directory(
    dir: &Path,
    format: InputFormat,
    cfg: &MiningConfig,
) -> Result<MiningRun, PipelineError> {
    let paths = discover_documents(dir, format)
        .map_err(|err| PipelineError::NoInput(err.to_string()))?;
    if paths.is_empty() {
        return Err(PipelineError::NoInput(format!(
            "no {} files in {}",
            match format {
                InputFormat::Docx => ".docx",
                InputFormat::SavedProfile => ".json",
            },
            dir.display()
        )));
    }
    mine_template(&paths, cfg)
}

/// Read a JSON array of document paths. Relative entries resolve against
/// the list file's directory.
pub fn read_input_list(list: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let content = std::fs::read_to_string(list)
        .map_err(|err| PipelineError::NoInput(format!("{}: {err}", list.display())))?;
    let entries: Vec<PathBuf> = serde_json::from_str(&content)
        .map_err(|err| PipelineError::NoInput(format!("{}: {err}", list.display())))?;
    let base = list.parent().unwrap_or_else(|| Path::new(""));
    Ok(entries
        .into_iter()
        .map(|entry| if entry.is_absolute() { entry } else { base.join(entry) })
        .collect())
}
