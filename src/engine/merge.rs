//! Glossary merger: per-document union of the two filters' qualifying sets.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::GlossaryEntry;

/// A merged term and which filters admitted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedTerm {
    pub term: String,
    pub from_tfidf: bool,
    pub from_zipf: bool,
}

/// Final glossary of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentGlossary {
    pub document_id: String,
    /// Merged terms in glossary order.
    pub terms: Vec<MergedTerm>,
}

impl DocumentGlossary {
    /// Term strings in glossary order.
    pub fn words(&self) -> Vec<String> {
        self.terms.iter().map(|t| t.term.clone()).collect()
    }

    pub fn entries(&self) -> Vec<GlossaryEntry> {
        self.terms
            .iter()
            .map(|t| GlossaryEntry {
                document_id: self.document_id.clone(),
                term: t.term.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Glossary order: case-insensitive on the lowercase form, ties broken by
/// the original string.
pub fn glossary_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Union of both qualifying sets with provenance, in glossary order.
pub fn merge_with_provenance(tfidf: &[String], zipf: &[String]) -> Vec<MergedTerm> {
    let mut union: BTreeMap<&str, (bool, bool)> = BTreeMap::new();
    for term in tfidf {
        union.entry(term.as_str()).or_default().0 = true;
    }
    for term in zipf {
        union.entry(term.as_str()).or_default().1 = true;
    }

    let mut merged: Vec<MergedTerm> = union
        .into_iter()
        .map(|(term, (from_tfidf, from_zipf))| MergedTerm {
            term: term.to_string(),
            from_tfidf,
            from_zipf,
        })
        .collect();
    merged.sort_by(|a, b| glossary_order(&a.term, &b.term));
    merged
}

/// Union of both qualifying sets, deduplicated, in glossary order.
pub fn merge(tfidf: &[String], zipf: &[String]) -> Vec<String> {
    merge_with_provenance(tfidf, zipf)
        .into_iter()
        .map(|m| m.term)
        .collect()
}

/// Merge one document's qualifying sets.
pub fn merge_document(document_id: &str, tfidf: &[String], zipf: &[String]) -> DocumentGlossary {
    let terms = merge_with_provenance(tfidf, zipf);
    if terms.is_empty() {
        log::warn!("No qualifying words for {}", document_id);
    }
    DocumentGlossary {
        document_id: document_id.to_string(),
        terms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_union_dedup() {
        let merged = merge(&strings(&["dagat", "balay"]), &strings(&["balay", "bukid"]));
        assert_eq!(merged, strings(&["balay", "bukid", "dagat"]));
    }

    #[test]
    fn test_case_insensitive_order_with_ties() {
        let merged = merge(&strings(&["banay", "Cebu"]), &strings(&["cebu", "Balay", "abaka"]));
        assert_eq!(merged, strings(&["abaka", "Balay", "banay", "Cebu", "cebu"]));
    }

    #[test]
    fn test_provenance() {
        let merged = merge_with_provenance(&strings(&["dagat", "balay"]), &strings(&["balay"]));
        assert_eq!(
            merged,
            vec![
                MergedTerm {
                    term: "balay".into(),
                    from_tfidf: true,
                    from_zipf: true
                },
                MergedTerm {
                    term: "dagat".into(),
                    from_tfidf: true,
                    from_zipf: false
                },
            ]
        );
    }

    #[test]
    fn test_empty_inputs() {
        let glossary = merge_document("a", &[], &[]);
        assert!(glossary.is_empty());
        let only_zipf = merge_document("a", &[], &strings(&["suba"]));
        assert_eq!(only_zipf.words(), strings(&["suba"]));
        assert_eq!(
            only_zipf.entries(),
            vec![GlossaryEntry {
                document_id: "a".into(),
                term: "suba".into()
            }]
        );
    }
}
