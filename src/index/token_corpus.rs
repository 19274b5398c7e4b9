//! Token corpus: a validated, non-empty corpus scope with per-document counts.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::types::{CorpusSnapshot, Document, GlossaryError, GlossaryResult};

/// One document of the scope together with its local term counts.
#[derive(Debug, Clone)]
pub struct DocumentCounts {
    document: Arc<Document>,
    /// term → occurrences in this document, in term order.
    local_counts: BTreeMap<String, u64>,
}

impl DocumentCounts {
    fn new(document: Arc<Document>) -> Self {
        let mut local_counts = BTreeMap::new();
        for token in document.tokens() {
            *local_counts.entry(token.clone()).or_insert(0) += 1;
        }
        Self {
            document,
            local_counts,
        }
    }

    pub fn id(&self) -> &str {
        self.document.id()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Total tokens in the document, repetitions included.
    pub fn total_tokens(&self) -> u64 {
        self.document.len() as u64
    }

    /// Distinct terms with their local counts, in term order.
    pub fn local_counts(&self) -> &BTreeMap<String, u64> {
        &self.local_counts
    }

    pub fn local_count(&self, term: &str) -> u64 {
        self.local_counts.get(term).copied().unwrap_or(0)
    }
}

/// First pipeline stage: the complete set of token streams for one corpus
/// scope. Only constructible from a snapshot that has at least one token.
#[derive(Debug, Clone)]
pub struct TokenCorpus {
    documents: Vec<DocumentCounts>,
    corpus_size: u64,
}

impl TokenCorpus {
    /// Freeze a snapshot into a token corpus.
    ///
    /// Fails with [`GlossaryError::EmptyCorpus`] if the snapshot holds no
    /// documents or no tokens.
    pub fn from_snapshot(snapshot: &CorpusSnapshot) -> GlossaryResult<Self> {
        if snapshot.is_empty() {
            return Err(GlossaryError::EmptyCorpus("no documents in scope".into()));
        }
        let documents: Vec<DocumentCounts> = snapshot
            .documents()
            .iter()
            .cloned()
            .map(DocumentCounts::new)
            .collect();
        let corpus_size: u64 = documents.iter().map(|d| d.total_tokens()).sum();
        if corpus_size == 0 {
            return Err(GlossaryError::EmptyCorpus(format!(
                "{} document(s) but no tokens after normalization",
                documents.len()
            )));
        }
        Ok(Self {
            documents,
            corpus_size,
        })
    }

    pub fn documents(&self) -> &[DocumentCounts] {
        &self.documents
    }

    pub fn get(&self, id: &str) -> Option<&DocumentCounts> {
        self.documents.iter().find(|d| d.id() == id)
    }

    /// Number of documents in scope.
    pub fn doc_count(&self) -> usize {
        self.documents.len()
    }

    /// Sum of token counts across all documents.
    pub fn corpus_size(&self) -> u64 {
        self.corpus_size
    }
}
