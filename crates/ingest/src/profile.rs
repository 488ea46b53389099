//! Saved-profile input.
//!
//! A corpus can be re-mined from the `doc_profiles/*.json` diagnostics of an
//! earlier run without the source documents. Extra per-paragraph fields in
//! those files (normalized layers, fingerprints) are ignored on read.
use crate::error::ParseError;
use crate::types::DocumentProfile;

pub(crate) fn read_profile(
    json: &str,
    fallback_source: &str,
) -> Result<DocumentProfile, ParseError> {
    let saved: DocumentProfile =
        serde_json::from_str(json).map_err(|err| ParseError::Profile(err.to_string()))?;

    let source = if saved.source.trim().is_empty() {
        fallback_source.to_string()
    } else {
        saved.source
    };

    // Rebuilt so the histogram and header/footer de-duplication always match
    // the paragraphs, whatever the file claims.
    Ok(DocumentProfile::new(
        source,
        saved.source_path,
        saved.paragraphs,
        saved.headers,
        saved.footers,
    ))
}
