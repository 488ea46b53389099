//! Recurring runs of consecutive fingerprints.
//!
//! Each document is reduced to its stream of fingerprints (spacers
//! dropped), every n-gram in the configured range whose first element is
//! FIXED is collected, and an n-gram is kept once it occurs in as many
//! documents as a FIXED fingerprint must.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};

use fingerprint::{Fingerprint, FingerprintedDocument};
use serde::{Deserialize, Serialize};

use crate::classify::Classification;
use crate::config::MinerConfig;

/// Separator used when a sequence is rendered as a single key.
pub const SEQUENCE_KEY_DELIMITER: &str = "||";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub sequence: Vec<Fingerprint>,
    /// Documents containing the run at least once.
    pub count: usize,
    pub rate: f64,
    /// Every element is FIXED, not only the first.
    pub all_fixed: bool,
    /// Truncated paragraph texts of the first occurrences, document order.
    pub examples: Vec<Vec<String>>,
}

impl Sequence {
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn key(&self) -> String {
        self.sequence
            .iter()
            .map(Fingerprint::as_str)
            .collect::<Vec<_>>()
            .join(SEQUENCE_KEY_DELIMITER)
    }
}

#[derive(Default)]
struct Tally {
    count: usize,
    examples: Vec<Vec<String>>,
}

/// Mine sequences from `documents`, longest first, then most frequent.
pub fn mine_sequences(
    documents: &[FingerprintedDocument],
    classification: &Classification,
    cfg: &MinerConfig,
) -> Vec<Sequence> {
    let mut tallies: BTreeMap<Vec<Fingerprint>, Tally> = BTreeMap::new();

    for doc in documents {
        let stream: Vec<(&Fingerprint, &str)> = doc
            .iter()
            .filter_map(|(record, para)| {
                para.fingerprint
                    .as_ref()
                    .map(|fp| (fp, record.text.as_str()))
            })
            .collect();

        let mut seen_in_doc: HashSet<Vec<&Fingerprint>> = HashSet::new();
        for n in cfg.ngram_min..=cfg.ngram_max {
            for window in stream.windows(n) {
                if !classification.is_fixed(window[0].0) {
                    continue;
                }
                let borrowed: Vec<&Fingerprint> = window.iter().map(|(fp, _)| *fp).collect();
                if !seen_in_doc.insert(borrowed) {
                    continue;
                }
                let key: Vec<Fingerprint> = window.iter().map(|(fp, _)| (*fp).clone()).collect();
                let tally = tallies.entry(key).or_default();
                tally.count += 1;
                if tally.examples.len() < cfg.sequence_example_limit {
                    tally.examples.push(
                        window
                            .iter()
                            .map(|(_, text)| truncate_chars(text, cfg.sequence_example_chars))
                            .collect(),
                    );
                }
            }
        }
    }

    let total = classification.total_documents;
    let mut sequences: Vec<Sequence> = tallies
        .into_iter()
        .filter(|(_, tally)| tally.count >= classification.min_count)
        .map(|(sequence, tally)| {
            let all_fixed = sequence.iter().all(|fp| classification.is_fixed(fp));
            Sequence {
                all_fixed,
                count: tally.count,
                rate: if total == 0 { 0.0 } else { tally.count as f64 / total as f64 },
                examples: tally.examples,
                sequence,
            }
        })
        .collect();

    // Stable sort keeps key order among equals.
    sequences.sort_by_key(|s| (Reverse(s.len()), Reverse(s.count)));
    sequences
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
