//! FIXED / VARIABLE partition of the corpus fingerprints.

use std::collections::{BTreeMap, BTreeSet};

use fingerprint::Fingerprint;
use serde::{Deserialize, Serialize};

use crate::config::{ClassificationMode, MinerConfig};
use crate::stats::{FingerprintEntry, FingerprintStats};

/// Why a fingerprint was classified VARIABLE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableReason {
    BelowThreshold,
    TooShort,
    CaseSpecific,
}

/// Diagnostic record for one classified fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedFingerprint {
    pub fingerprint: Fingerprint,
    pub occurrence_count: usize,
    pub occurrence_rate: f64,
    pub examples: Vec<String>,
    pub styles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<VariableReason>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub total_documents: usize,
    pub mode: ClassificationMode,
    pub threshold: f64,
    /// Documents required for FIXED.
    pub min_count: usize,
    pub fixed: BTreeMap<Fingerprint, ClassifiedFingerprint>,
    pub variable: BTreeMap<Fingerprint, ClassifiedFingerprint>,
}

impl Classification {
    pub fn is_fixed(&self, fp: &Fingerprint) -> bool {
        self.fixed.contains_key(fp)
    }

    pub fn fixed_set(&self) -> BTreeSet<&Fingerprint> {
        self.fixed.keys().collect()
    }
}

/// Classify every fingerprint in `stats`.
///
/// FIXED requires all of: support of at least `cfg.min_support(total)`
/// documents, a first example of at least `cfg.min_text_length`
/// characters, and at least one occurrence not flagged case-specific.
pub fn classify(stats: &FingerprintStats, cfg: &MinerConfig) -> Classification {
    let min_count = cfg.min_support(stats.total_documents);
    let mut fixed = BTreeMap::new();
    let mut variable = BTreeMap::new();

    for (fp, entry) in &stats.entries {
        let reason = variable_reason(entry, min_count, cfg);
        let record = ClassifiedFingerprint {
            fingerprint: fp.clone(),
            occurrence_count: entry.count,
            occurrence_rate: stats.occurrence_rate(entry.count),
            examples: entry.examples.clone(),
            styles: entry.styles.iter().cloned().collect(),
            reason,
        };
        match reason {
            None => fixed.insert(fp.clone(), record),
            Some(_) => variable.insert(fp.clone(), record),
        };
    }

    Classification {
        total_documents: stats.total_documents,
        mode: cfg.classification_mode,
        threshold: cfg.boilerplate_threshold,
        min_count,
        fixed,
        variable,
    }
}

fn variable_reason(
    entry: &FingerprintEntry,
    min_count: usize,
    cfg: &MinerConfig,
) -> Option<VariableReason> {
    if entry.count < min_count {
        return Some(VariableReason::BelowThreshold);
    }
    let example_len = entry
        .examples
        .first()
        .map_or(0, |text| text.trim().chars().count());
    if example_len < cfg.min_text_length {
        return Some(VariableReason::TooShort);
    }
    if entry.always_case_specific() {
        return Some(VariableReason::CaseSpecific);
    }
    None
}
