//! TF-IDF scoring with a corpus-wide dynamic threshold.
//!
//! Every (document, distinct term) pair gets a [`TermScore`]. The inclusion
//! threshold is `mean + k·sd` over the tf-idf values of lexically valid
//! terms across the whole corpus, so all documents are cut at the same
//! value. A term qualifies when it clears the threshold, is lexically valid
//! and does not start with an uppercase letter.

use std::collections::BTreeSet;

use crate::config::TfIdfConfig;
use crate::index::{DocumentCounts, FrequencyModel};
use crate::types::{FilterPass, GlossaryError, GlossaryResult, TermScore};

/// Scores and qualifying terms for one document.
#[derive(Debug, Clone)]
pub struct DocumentScores {
    pub document_id: String,
    /// Every distinct term, sorted by tf-idf descending (ties by term).
    pub scores: Vec<TermScore>,
    /// Qualifying terms, deduplicated and sorted.
    pub qualifying: Vec<String>,
}

/// Output of one TF-IDF pass over a corpus scope.
#[derive(Debug, Clone)]
pub struct TfIdfOutcome {
    /// The cutoff applied to every document.
    pub threshold: f64,
    /// Number of (document, term) pairs the threshold was derived from.
    pub valid_population: usize,
    pub documents: Vec<DocumentScores>,
}

impl TfIdfOutcome {
    pub fn get(&self, document_id: &str) -> Option<&DocumentScores> {
        self.documents.iter().find(|d| d.document_id == document_id)
    }

    /// Scores of the document at `index` in model order. Falls back to a
    /// lookup by id if the positions disagree.
    pub fn document_at(&self, index: usize, document_id: &str) -> Option<&DocumentScores> {
        match self.documents.get(index) {
            Some(d) if d.document_id == document_id => Some(d),
            _ => self.get(document_id),
        }
    }
}

/// Smoothed inverse document frequency: `ln(N / (df + 1)) + 1`.
///
/// Positive for every `df <= N`, since the ratio is at least `N / (N + 1)`.
pub fn idf(total_docs: usize, doc_freq: u64) -> f64 {
    (total_docs as f64 / (doc_freq as f64 + 1.0)).ln() + 1.0
}

/// `mean + sd_multiplier × population standard deviation` of `values`, or
/// the fallback threshold when `values` is empty.
pub fn dynamic_threshold(values: &[f64], config: &TfIdfConfig) -> f64 {
    if values.is_empty() {
        return config.fallback_threshold;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    mean + config.sd_multiplier * variance.sqrt()
}

/// Proper-noun heuristic: the first char must be a lowercase letter.
pub fn starts_lowercase(term: &str) -> bool {
    term.chars().next().is_some_and(char::is_lowercase)
}

/// Qualification rule for one scored term against the run threshold.
pub fn qualifies(score: &TermScore, threshold: f64) -> bool {
    score.tfidf >= threshold && score.is_lexically_valid && starts_lowercase(&score.term)
}

/// Score every distinct term of one document, in term order.
pub fn score_document(model: &FrequencyModel, doc: &DocumentCounts) -> Vec<TermScore> {
    let total_tokens = doc.total_tokens() as f64;
    let total_docs = model.total_docs();

    doc.local_counts()
        .iter()
        .map(|(term, &count)| {
            let tf = count as f64 / total_tokens;
            let idf = idf(total_docs, model.doc_frequency(term));
            TermScore {
                term: term.clone(),
                tf,
                idf,
                tfidf: tf * idf,
                is_lexically_valid: model.is_valid(term),
            }
        })
        .collect()
}

/// Run the TF-IDF pass over the whole corpus scope.
pub fn compute(model: &FrequencyModel, config: &TfIdfConfig) -> GlossaryResult<TfIdfOutcome> {
    // First pass: score everything and collect the valid population.
    let mut scored: Vec<(String, Vec<TermScore>)> = Vec::with_capacity(model.total_docs());
    let mut valid_values: Vec<f64> = Vec::new();

    for doc in model.documents() {
        let scores = score_document(model, doc);
        for score in &scores {
            if !score.tfidf.is_finite() {
                return Err(GlossaryError::FilterFailed {
                    pass: FilterPass::TfIdf,
                    reason: format!(
                        "non-finite tf-idf for {:?} in {:?}",
                        score.term,
                        doc.id()
                    ),
                });
            }
            if score.is_lexically_valid {
                valid_values.push(score.tfidf);
            }
        }
        scored.push((doc.id().to_string(), scores));
    }

    let threshold = dynamic_threshold(&valid_values, config);
    if !threshold.is_finite() {
        return Err(GlossaryError::FilterFailed {
            pass: FilterPass::TfIdf,
            reason: format!(
                "threshold overflowed ({} × sd over {} valid terms)",
                config.sd_multiplier,
                valid_values.len()
            ),
        });
    }
    if valid_values.is_empty() {
        log::warn!(
            "No lexically valid terms in corpus; using fallback tf-idf threshold {}",
            threshold
        );
    } else {
        log::info!(
            "Automatic tf-idf threshold: {:.4} (mean + {}sd over {} valid terms)",
            threshold,
            config.sd_multiplier,
            valid_values.len()
        );
    }

    // Second pass: filter against the corpus-wide threshold.
    let documents = scored
        .into_iter()
        .map(|(document_id, mut scores)| {
            let qualifying: BTreeSet<String> = scores
                .iter()
                .filter(|s| qualifies(s, threshold))
                .map(|s| s.term.clone())
                .collect();

            if qualifying.is_empty() {
                log::warn!("No qualifying tf-idf words for {}", document_id);
            } else {
                log::debug!(
                    "{} qualifying tf-idf words for {}",
                    qualifying.len(),
                    document_id
                );
            }

            scores.sort_by(|a, b| {
                b.tfidf
                    .partial_cmp(&a.tfidf)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.term.cmp(&b.term))
            });

            DocumentScores {
                document_id,
                scores,
                qualifying: qualifying.into_iter().collect(),
            }
        })
        .collect();

    Ok(TfIdfOutcome {
        threshold,
        valid_population: valid_values.len(),
        documents,
    })
}
