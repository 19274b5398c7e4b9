//! Documents and immutable corpus snapshots.

use std::collections::HashMap;
use std::sync::Arc;

use super::error::{GlossaryError, GlossaryResult};

/// One tokenized document. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: String,
    tokens: Vec<String>,
}

impl Document {
    /// Create a document from an already-normalized token stream.
    ///
    /// The id names artifact files, so it must be a single path component:
    /// not blank, no `/` or `\`, no `..`, no control characters.
    pub fn new(id: impl Into<String>, tokens: Vec<String>) -> GlossaryResult<Self> {
        let id = id.into();
        if !is_valid_id(&id) {
            return Err(GlossaryError::InvalidDocumentId(id));
        }
        Ok(Self { id, tokens })
    }

    /// Document identity (file base name).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Ordered token stream.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Number of tokens, repetitions included.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.trim().is_empty()
        && id != "."
        && !id.contains("..")
        && !id.chars().any(|c| c == '/' || c == '\\' || c.is_control())
}

/// An immutable set of documents considered together for frequency statistics.
///
/// Snapshots are never mutated in place: adding a document produces a new
/// snapshot that shares the existing documents by reference.
#[derive(Debug, Clone, Default)]
pub struct CorpusSnapshot {
    documents: Vec<Arc<Document>>,
}

impl CorpusSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from documents. Later documents replace earlier ones
    /// with the same id.
    pub fn from_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut out: Vec<Arc<Document>> = Vec::new();
        for doc in documents {
            match positions.get(doc.id()) {
                Some(&pos) => {
                    log::warn!("Duplicate document {:?}; keeping the later one", doc.id());
                    out[pos] = Arc::new(doc);
                }
                None => {
                    positions.insert(doc.id().to_string(), out.len());
                    out.push(Arc::new(doc));
                }
            }
        }
        Self { documents: out }
    }

    /// Return a new snapshot holding every document of `self` plus `document`.
    ///
    /// A document with the same id is replaced, keeping its position.
    pub fn with_document(&self, document: Document) -> Self {
        let mut documents = self.documents.clone();
        match documents.iter().position(|d| d.id() == document.id()) {
            Some(pos) => {
                log::warn!(
                    "Document {:?} already in corpus scope; replacing it",
                    document.id()
                );
                documents[pos] = Arc::new(document);
            }
            None => documents.push(Arc::new(document)),
        }
        Self { documents }
    }

    /// Union of two snapshots; documents of `other` win on id collisions.
    pub fn union(&self, other: &CorpusSnapshot) -> Self {
        let mut documents = self.documents.clone();
        let positions: HashMap<&str, usize> = self
            .documents
            .iter()
            .enumerate()
            .map(|(i, d)| (d.id(), i))
            .collect();
        for doc in &other.documents {
            match positions.get(doc.id()) {
                Some(&pos) => documents[pos] = Arc::clone(doc),
                None => documents.push(Arc::clone(doc)),
            }
        }
        Self { documents }
    }

    pub fn documents(&self) -> &[Arc<Document>] {
        &self.documents
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id() == id).map(|d| d.as_ref())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Sum of token counts across all documents.
    pub fn token_count(&self) -> usize {
        self.documents.iter().map(|d| d.len()).sum()
    }
}
