//! Error types for the glossary pipeline.

use std::fmt;

use thiserror::Error;

/// Which of the two independent statistical passes an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterPass {
    TfIdf,
    Zipf,
}

impl fmt::Display for FilterPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterPass::TfIdf => write!(f, "tf-idf"),
            FilterPass::Zipf => write!(f, "zipf"),
        }
    }
}

#[derive(Error, Debug)]
pub enum GlossaryError {
    /// No documents in scope, or no tokens left after normalization.
    #[error("Empty corpus: {0}")]
    EmptyCorpus(String),

    #[error("Invalid document id: {0:?}")]
    InvalidDocumentId(String),

    #[error("{pass} filter failed: {reason}")]
    FilterFailed { pass: FilterPass, reason: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Definition lookup failed for {term:?}: {reason}")]
    Definition { term: String, reason: String },

    #[error("Worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type GlossaryResult<T> = Result<T, GlossaryError>;
