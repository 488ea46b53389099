//! Output directory writer.
//!
//! Layout:
//!
//! ```text
//! <out>/template_spec.json
//! <out>/classification.json
//! <out>/sequences.json
//! <out>/doc_profiles/<stem>.json
//! ```
//!
//! JSON is pretty-printed from ordered maps, so identical runs write
//! byte-identical files. Profiles can be fed back in with
//! `docskel analyze`.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use canonical::NormalizedText;
use fingerprint::{CaseSignal, Fingerprint, FingerprintedDocument};
use ingest::ParagraphRecord;
use serde::Serialize;
use tracing::info;

use crate::{MiningRun, PipelineError};

pub const TEMPLATE_SPEC_FILE: &str = "template_spec.json";
pub const CLASSIFICATION_FILE: &str = "classification.json";
pub const SEQUENCES_FILE: &str = "sequences.json";
pub const PROFILES_DIR: &str = "doc_profiles";

/// One paragraph of a saved profile: the ingest record plus what the
/// fingerprint stage derived from it.
#[derive(Debug, Serialize)]
pub struct ParagraphArtifact<'a> {
    #[serde(flatten)]
    pub record: &'a ParagraphRecord,
    pub normalized: &'a NormalizedText,
    pub fingerprint: Option<&'a Fingerprint>,
    #[serde(skip_serializing_if = "<[CaseSignal]>::is_empty")]
    pub case_signals: &'a [CaseSignal],
}

/// Saved form of a [`FingerprintedDocument`]; deserializes as a
/// [`ingest::DocumentProfile`].
#[derive(Debug, Serialize)]
pub struct ProfileArtifact<'a> {
    pub source: &'a str,
    pub source_path: &'a str,
    pub paragraphs: Vec<ParagraphArtifact<'a>>,
    pub headers: &'a [String],
    pub footers: &'a [String],
    pub styles_histogram: &'a BTreeMap<String, usize>,
}

impl<'a> ProfileArtifact<'a> {
    pub fn new(doc: &'a FingerprintedDocument) -> Self {
        Self {
            source: &doc.profile.source,
            source_path: &doc.profile.source_path,
            paragraphs: doc
                .iter()
                .map(|(record, para)| ParagraphArtifact {
                    record,
                    normalized: &para.normalized,
                    fingerprint: para.fingerprint.as_ref(),
                    case_signals: &para.case_signals,
                })
                .collect(),
            headers: &doc.profile.headers,
            footers: &doc.profile.footers,
            styles_histogram: &doc.profile.styles_histogram,
        }
    }
}

/// Files written by [`write_artifacts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub template_spec: PathBuf,
    pub classification: PathBuf,
    pub sequences: PathBuf,
    pub profiles: Vec<PathBuf>,
}

/// Write the template and its diagnostics into `out_dir`, creating it if
/// needed.
pub fn write_artifacts(run: &MiningRun, out_dir: &Path) -> Result<ArtifactPaths, PipelineError> {
    let profiles_dir = out_dir.join(PROFILES_DIR);
    fs::create_dir_all(&profiles_dir).map_err(|err| output_error(&profiles_dir, err))?;

    let template_spec = out_dir.join(TEMPLATE_SPEC_FILE);
    write_json(&template_spec, &run.template)?;
    let classification = out_dir.join(CLASSIFICATION_FILE);
    write_json(&classification, &run.classification)?;
    let sequences = out_dir.join(SEQUENCES_FILE);
    write_json(&sequences, &run.template.sequences)?;

    let mut used_stems = BTreeSet::new();
    let mut profiles = Vec::with_capacity(run.documents.len());
    for doc in &run.documents {
        let stem = unique_stem(profile_stem(&doc.profile.source), &mut used_stems);
        let path = profiles_dir.join(format!("{stem}.json"));
        write_json(&path, &ProfileArtifact::new(doc))?;
        profiles.push(path);
    }

    info!(
        out_dir = %out_dir.display(),
        profiles = profiles.len(),
        "artifacts_written"
    );

    Ok(ArtifactPaths {
        template_spec,
        classification,
        sequences,
        profiles,
    })
}

/// Serialize `value` as pretty JSON with a trailing newline.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PipelineError> {
    let mut json = serde_json::to_string_pretty(value).map_err(|err| output_error(path, err))?;
    json.push('\n');
    fs::write(path, json).map_err(|err| output_error(path, err))
}

fn output_error(path: &Path, err: impl std::fmt::Display) -> PipelineError {
    PipelineError::Output {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

fn profile_stem(source: &str) -> String {
    Path::new(source)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "document".to_string())
}

fn unique_stem(stem: String, used: &mut BTreeSet<String>) -> String {
    if used.insert(stem.clone()) {
        return stem;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{stem}_{n}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
