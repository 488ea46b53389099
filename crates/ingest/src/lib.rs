//! Document ingest for template mining.
//!
//! This is where source documents enter the pipeline. Each file is turned
//! into a [`DocumentProfile`]: its body paragraphs in order, with resolved
//! style names and paragraph formatting, plus header/footer blocks and a
//! style-usage histogram.
//!
//! ## What we do here
//!
//! - **Read DOCX** - body paragraphs, styles from `word/styles.xml`, and
//!   `word/header*.xml` / `word/footer*.xml` blocks
//! - **Read saved profiles** - `.json` files written by an earlier run
//! - **Isolate failures** - a corrupt file yields a [`ParseError`] for that
//!   file only; [`ingest_batch`] records it and carries on
//! - **Log everything** - one `tracing` span per document with timing
//!
//! ## Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use ingest::{ingest_batch, IngestConfig};
//!
//! let paths = vec![PathBuf::from("a.docx"), PathBuf::from("b.docx")];
//! let batch = ingest_batch(&paths, &IngestConfig::default());
//! for skipped in &batch.skipped {
//!     eprintln!("skipped {}: {}", skipped.source, skipped.reason);
//! }
//! println!("{} documents ingested", batch.profiles.len());
//! ```
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, warn, Level};

mod config;
mod docx;
mod error;
mod profile;
mod types;

pub use crate::config::{ConfigError, IngestConfig, DEFAULT_MAX_FILE_BYTES};
pub use crate::docx::heading_level_from_style;
pub use crate::error::ParseError;
pub use crate::types::{DocumentProfile, ParagraphRecord, SkippedDocument};

/// Input formats understood by [`ingest_path`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Docx,
    SavedProfile,
}

impl InputFormat {
    /// Format implied by a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "docx" => Some(InputFormat::Docx),
            "json" => Some(InputFormat::SavedProfile),
            _ => None,
        }
    }
}

/// Ingest one document.
pub fn ingest_path(path: &Path, cfg: &IngestConfig) -> Result<DocumentProfile, ParseError> {
    let start = Instant::now();
    let source = file_name(path);

    let span = tracing::span!(Level::INFO, "ingest.document", source = %source);
    let _guard = span.enter();

    match ingest_inner(path, &source, cfg) {
        Ok(profile) => {
            let elapsed_micros = start.elapsed().as_micros();
            info!(
                paragraphs = profile.paragraph_count(),
                headers = profile.headers.len(),
                footers = profile.footers.len(),
                styles = profile.styles_histogram.len(),
                elapsed_micros,
                "ingest_success"
            );
            Ok(profile)
        }
        Err(err) => {
            let elapsed_micros = start.elapsed().as_micros();
            warn!(error = %err, elapsed_micros, "ingest_failure");
            Err(err)
        }
    }
}

fn ingest_inner(
    path: &Path,
    source: &str,
    cfg: &IngestConfig,
) -> Result<DocumentProfile, ParseError> {
    let format = InputFormat::from_path(path)
        .ok_or_else(|| ParseError::UnsupportedFormat(path.display().to_string()))?;

    let metadata = fs::metadata(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => ParseError::NotFound(path.display().to_string()),
        _ => ParseError::from(err),
    })?;
    if let Some(limit) = cfg.max_file_bytes {
        if metadata.len() > limit {
            return Err(ParseError::FileTooLarge {
                size: metadata.len(),
                limit,
            });
        }
    }

    let source_path = path.display().to_string();
    match format {
        InputFormat::Docx => {
            let file = File::open(path)?;
            let content = docx::read_docx(BufReader::new(file), cfg)?;
            Ok(DocumentProfile::new(
                source,
                source_path,
                content.paragraphs,
                content.headers,
                content.footers,
            ))
        }
        InputFormat::SavedProfile => {
            let json = fs::read_to_string(path)?;
            profile::read_profile(&json, source)
        }
    }
}

/// Result of ingesting a list of documents.
#[derive(Debug, Clone, Default)]
pub struct IngestBatch {
    /// Successfully ingested documents, ordered by file name then path.
    pub profiles: Vec<DocumentProfile>,
    /// Documents that failed, ordered by source.
    pub skipped: Vec<SkippedDocument>,
}

impl IngestBatch {
    /// Reduce per-document results into a batch with a fixed ordering,
    /// independent of the order the results arrive in.
    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = (PathBuf, Result<DocumentProfile, ParseError>)>,
    {
        let mut batch = IngestBatch::default();
        for (path, result) in results {
            match result {
                Ok(profile) => batch.profiles.push(profile),
                Err(err) => batch.skipped.push(SkippedDocument {
                    source: path.display().to_string(),
                    reason: err.to_string(),
                }),
            }
        }
        batch
            .profiles
            .sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        batch.skipped.sort_by(|a, b| a.source.cmp(&b.source));
        batch
    }
}

/// Ingest every path sequentially. Failures are recorded in
/// [`IngestBatch::skipped`] and never abort the batch.
pub fn ingest_batch(paths: &[PathBuf], cfg: &IngestConfig) -> IngestBatch {
    IngestBatch::from_results(
        paths
            .iter()
            .map(|path| (path.clone(), ingest_path(path, cfg))),
    )
}

/// List the documents of `format` in `dir`, sorted by file name. Word lock
/// files (`~$name.docx`) are skipped.
pub fn discover_documents(dir: &Path, format: InputFormat) -> Result<Vec<PathBuf>, ParseError> {
    let entries = fs::read_dir(dir).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => ParseError::NotFound(dir.display().to_string()),
        _ => ParseError::from(err),
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || InputFormat::from_path(&path) != Some(format) {
            continue;
        }
        if file_name(&path).starts_with("~$") {
            continue;
        }
        paths.push(path);
    }
    paths.sort_by_key(|path| file_name(path));
    Ok(paths)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
