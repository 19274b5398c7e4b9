//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashSet;

use cebuano_glossary::{CorpusSnapshot, Document};

/// Route library logs to the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// HashSet-backed lexicon.
pub fn lexicon(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Expand `(token, count)` pairs into a token stream.
pub fn tokens(counts: &[(&str, usize)]) -> Vec<String> {
    counts.iter()
        .flat_map(|(t, n)| std::iter::repeat(t.to_string()).take(*n))
        .collect()
}

pub fn doc(id: &str, counts: &[(&str, usize)]) -> Document {
    Document::new(id, tokens(counts)).unwrap()
}

/// `count` documents of `size` tokens each, all filler except for `extra`
/// tokens placed at the start of the listed documents.
pub fn padded_corpus(
    count: usize,
    size: usize,
    extra: &[(usize, &str, usize)],
) -> CorpusSnapshot {
    CorpusSnapshot::from_documents((0..count).map(|i| {
        let mut stream: Vec<String> = extra
            .iter()
            .filter(|(d, _, _)| *d == i)
            .flat_map(|(_, t, n)| std::iter::repeat(t.to_string()).take(*n))
            .collect();
        let filler = size.saturating_sub(stream.len());
        stream.extend(std::iter::repeat("xfiller".to_string()).take(filler));
        Document::new(format!("doc{:02}", i), stream).unwrap()
    }))
}
