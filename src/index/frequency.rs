//! Corpus frequency model: global document frequencies and term counts.

use std::collections::HashMap;

use crate::engine::lexicon::{is_lexically_valid, Lexicon};

use super::token_corpus::{DocumentCounts, TokenCorpus};

/// Global frequency tables for one corpus scope.
///
/// The model owns the [`TokenCorpus`] it was built from, so every consumer
/// reads statistics and token streams from the same scope.
pub struct FrequencyModel {
    corpus: TokenCorpus,
    /// term → number of documents containing it (lexically valid terms only).
    doc_freqs: HashMap<String, u64>,
    /// term → total occurrences across the corpus (every term).
    global_counts: HashMap<String, u64>,
    /// term → lexical validity, resolved once per distinct term.
    validity: HashMap<String, bool>,
}

impl FrequencyModel {
    /// Aggregate the tables over every document in the corpus.
    pub fn build(corpus: TokenCorpus, lexicon: &dyn Lexicon) -> Self {
        let mut doc_freqs: HashMap<String, u64> = HashMap::new();
        let mut global_counts: HashMap<String, u64> = HashMap::new();
        let mut validity: HashMap<String, bool> = HashMap::new();

        for doc in corpus.documents() {
            for (term, &count) in doc.local_counts() {
                *global_counts.entry(term.clone()).or_insert(0) += count;

                let valid = *validity
                    .entry(term.clone())
                    .or_insert_with(|| is_lexically_valid(term, lexicon));
                if valid {
                    *doc_freqs.entry(term.clone()).or_insert(0) += 1;
                }
            }
        }

        log::info!(
            "Frequency model: {} documents, {} tokens, {} distinct terms ({} valid)",
            corpus.doc_count(),
            corpus.corpus_size(),
            global_counts.len(),
            doc_freqs.len()
        );

        Self {
            corpus,
            doc_freqs,
            global_counts,
            validity,
        }
    }

    pub fn corpus(&self) -> &TokenCorpus {
        &self.corpus
    }

    pub fn documents(&self) -> &[DocumentCounts] {
        self.corpus.documents()
    }

    /// Number of documents in scope.
    pub fn total_docs(&self) -> usize {
        self.corpus.doc_count()
    }

    /// Total tokens in scope.
    pub fn corpus_size(&self) -> u64 {
        self.corpus.corpus_size()
    }

    /// Number of documents containing a valid term. Always 0 for invalid terms.
    pub fn doc_frequency(&self, term: &str) -> u64 {
        self.doc_freqs.get(term).copied().unwrap_or(0)
    }

    /// Total occurrences of a term across the corpus, valid or not.
    pub fn global_count(&self, term: &str) -> u64 {
        self.global_counts.get(term).copied().unwrap_or(0)
    }

    /// Cached lexical validity. Terms outside the corpus are invalid.
    pub fn is_valid(&self, term: &str) -> bool {
        self.validity.get(term).copied().unwrap_or(false)
    }

    /// Number of distinct terms in scope.
    pub fn term_count(&self) -> usize {
        self.global_counts.len()
    }

    /// Number of distinct lexically valid terms in scope.
    pub fn valid_term_count(&self) -> usize {
        self.doc_freqs.len()
    }
}
