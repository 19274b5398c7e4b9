//! Per-document scoring records and glossary entries.

use serde::{Deserialize, Serialize};

/// TF-IDF score of one term within one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermScore {
    pub term: String,
    /// `local_count / total_tokens_in_document`.
    pub tf: f64,
    /// `ln(total_docs / (doc_freq + 1)) + 1`.
    pub idf: f64,
    pub tfidf: f64,
    #[serde(rename = "is_valid")]
    pub is_lexically_valid: bool,
}

/// Zipf statistics of one term within one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZipfRecord {
    pub term: String,
    pub local_count: u64,
    pub global_count: u64,
    /// `global_count / corpus_size`.
    pub global_zipf: f64,
    #[serde(rename = "is_valid")]
    pub is_lexically_valid: bool,
}

/// A single glossary line: one term selected for one document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlossaryEntry {
    pub document_id: String,
    pub term: String,
}
