use fingerprint::{fingerprint_document, FingerprintConfig, FingerprintedDocument};
use ingest::{DocumentProfile, ParagraphRecord};

/// Fingerprinted document from `(style, text)` pairs.
pub(crate) fn doc(name: &str, paras: &[(&str, &str)]) -> FingerprintedDocument {
    let records = paras
        .iter()
        .map(|(style, text)| ParagraphRecord::new(*text, *style))
        .collect();
    profile_doc(DocumentProfile::new(name, "", records, vec![], vec![]))
}

pub(crate) fn profile_doc(profile: DocumentProfile) -> FingerprintedDocument {
    fingerprint_document(profile, &FingerprintConfig::default()).expect("fingerprint")
}
