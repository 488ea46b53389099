use thiserror::Error;

/// Errors returned by the mining stages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MinerError {
    #[error("invalid miner configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid anchor vocabulary: {0}")]
    InvalidVocabulary(String),

    /// Cross-document statistics need at least `required` documents.
    #[error("insufficient corpus: {documents} document(s), at least {required} required")]
    InsufficientCorpus { documents: usize, required: usize },
}
