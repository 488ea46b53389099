//! Corpus-wide fingerprint statistics.
//!
//! Built by folding over documents in the order given. Support counts are
//! order-independent; example sampling follows document order, so callers
//! must pass documents in a fixed order for reproducible artifacts.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use fingerprint::{Fingerprint, FingerprintedDocument};
use serde::{Deserialize, Serialize};

use crate::error::MinerError;

/// Smallest corpus cross-document statistics are computed for.
pub const MIN_CORPUS_DOCUMENTS: usize = 2;

/// Aggregate for one fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FingerprintEntry {
    /// Documents containing the fingerprint (once per document).
    pub count: usize,
    /// Distinct raw texts, first-seen order, bounded.
    pub examples: Vec<String>,
    /// Every style the fingerprint was seen with.
    pub styles: BTreeSet<String>,
    /// Paragraph occurrences, repeats within a document included.
    pub occurrences: usize,
    /// Occurrences flagged case-specific.
    pub case_specific_occurrences: usize,
}

impl FingerprintEntry {
    /// Every occurrence was flagged case-specific.
    pub fn always_case_specific(&self) -> bool {
        self.occurrences > 0 && self.case_specific_occurrences == self.occurrences
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintStats {
    pub total_documents: usize,
    pub entries: BTreeMap<Fingerprint, FingerprintEntry>,
}

impl FingerprintStats {
    /// Fold `documents` into statistics. Fails below
    /// [`MIN_CORPUS_DOCUMENTS`].
    pub fn from_documents(
        documents: &[FingerprintedDocument],
        example_limit: usize,
    ) -> Result<Self, MinerError> {
        if documents.len() < MIN_CORPUS_DOCUMENTS {
            return Err(MinerError::InsufficientCorpus {
                documents: documents.len(),
                required: MIN_CORPUS_DOCUMENTS,
            });
        }

        let mut entries: BTreeMap<Fingerprint, FingerprintEntry> = BTreeMap::new();
        for doc in documents {
            let mut seen_in_doc: HashSet<&Fingerprint> = HashSet::new();
            for (record, para) in doc.iter() {
                let Some(fp) = para.fingerprint.as_ref() else {
                    continue;
                };
                let entry = entries.entry(fp.clone()).or_default();
                if seen_in_doc.insert(fp) {
                    entry.count += 1;
                }
                entry.occurrences += 1;
                if para.is_case_specific() {
                    entry.case_specific_occurrences += 1;
                }
                if entry.examples.len() < example_limit && !entry.examples.contains(&record.text) {
                    entry.examples.push(record.text.clone());
                }
                entry.styles.insert(record.style_name.clone());
            }
        }

        Ok(Self {
            total_documents: documents.len(),
            entries,
        })
    }

    pub fn get(&self, fp: &Fingerprint) -> Option<&FingerprintEntry> {
        self.entries.get(fp)
    }

    /// `count / total_documents`, always within `[0, 1]`.
    pub fn occurrence_rate(&self, count: usize) -> f64 {
        if self.total_documents == 0 {
            0.0
        } else {
            count as f64 / self.total_documents as f64
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
