//! Error types produced by the ingest crate.
//!
//! A [`ParseError`] always describes a single document. Batch callers are
//! expected to record it and move on to the next document rather than abort
//! the run; see [`ingest_batch`](crate::ingest_batch).
//!
//! # Example
//!
//! ```rust
//! use ingest::ParseError;
//!
//! fn is_retryable(err: &ParseError) -> bool {
//!     matches!(err, ParseError::Io(_))
//! }
//!
//! assert!(!is_retryable(&ParseError::MissingPart("word/document.xml".into())));
//! ```
use thiserror::Error;

/// Per-document ingest failure.
///
/// Variants carry `String` detail so the enum stays `Clone + PartialEq`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// The file could not be read.
    #[error("i/o error: {0}")]
    Io(String),

    /// The path does not exist.
    #[error("document not found: {0}")]
    NotFound(String),

    /// The extension is neither `.docx` nor `.json`.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// The file is not a readable zip container.
    #[error("corrupt document archive: {0}")]
    Archive(String),

    /// A required part is missing from the container.
    #[error("document part missing: {0}")]
    MissingPart(String),

    /// A part is not well-formed XML.
    #[error("malformed xml in {part}: {message}")]
    Xml { part: String, message: String },

    /// A saved profile could not be deserialized.
    #[error("invalid saved profile: {0}")]
    Profile(String),

    /// The file exceeds the configured size limit.
    #[error("document size {size} exceeds limit of {limit} bytes")]
    FileTooLarge { size: u64, limit: u64 },
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        ParseError::Io(err.to_string())
    }
}

impl From<zip::result::ZipError> for ParseError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io) => ParseError::Io(io.to_string()),
            other => ParseError::Archive(other.to_string()),
        }
    }
}

impl ParseError {
    pub(crate) fn xml(part: &str, err: impl std::fmt::Display) -> Self {
        ParseError::Xml {
            part: part.to_string(),
            message: err.to_string(),
        }
    }
}
