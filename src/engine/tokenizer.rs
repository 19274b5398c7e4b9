//! Token stream builder: raw extracted text to stemmed, filtered tokens.

use std::collections::HashSet;

use rayon::prelude::*;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::config::TokenizerConfig;
use crate::types::{Document, GlossaryResult};

/// Cebuano stop words to exclude from tokenization.
const STOP_WORDS: &[&str] = &[
    "ako", "kita", "amua", "ato", "atoa", "ikaw", "imong", "imo", "akoa", "kaugalingon",
    "siya", "iya", "kaniya", "mismo", "sila", "ila", "ilahang", "ilang", "nila", "unsa", "nga",
    "kinsa", "kini", "kana", "mga", "kaniadto", "niatong", "mahimong", "nahimo", "kitang",
    "kinsang", "unsang", "kanusang", "kansang", "asang", "nganong", "ginunsang", "ang", "pero",
    "kung", "tungod", "sama", "hangtud", "hantud", "samtang", "pinaagi", "para", "mahitungod",
    "batok", "human", "itaas", "ibabaw", "ubos", "gikan", "taas", "sulod", "gawas", "ilawum",
    "napud", "unya", "diri", "didto", "asa", "ngano", "giunsa", "tanan", "kada", "dyutay",
    "pipila", "mas", "kina", "uban", "dili", "lamang", "pareho", "busa", "kay", "pud", "kaayo",
];

/// Reduces a normalized token to its stem.
pub trait Stemmer: Send + Sync {
    fn stem(&self, word: &str) -> String;
}

/// Leaves every token unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStemmer;

impl Stemmer for NoopStemmer {
    fn stem(&self, word: &str) -> String {
        word.to_string()
    }
}

/// Strips the single longest matching prefix, never leaving an empty root.
#[derive(Debug, Clone)]
pub struct PrefixStemmer {
    prefixes: Vec<String>,
}

impl PrefixStemmer {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut prefixes: Vec<String> = prefixes
            .into_iter()
            .map(|p| p.into().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        // Longest first so the first hit is the longest prefix.
        prefixes.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        prefixes.dedup();
        Self { prefixes }
    }
}

impl Stemmer for PrefixStemmer {
    fn stem(&self, word: &str) -> String {
        self.prefixes
            .iter()
            .find(|p| word.len() > p.len() && word.starts_with(p.as_str()))
            .map(|p| word[p.len()..].to_string())
            .unwrap_or_else(|| word.to_string())
    }
}

/// Deterministic tokenizer producing the per-document token streams the
/// frequency model is built from.
pub struct TokenStreamBuilder {
    stop_words: HashSet<String>,
    min_token_length: usize,
    fold_diacritics: bool,
    stemmer: Box<dyn Stemmer>,
}

impl TokenStreamBuilder {
    /// Create a builder with the default stop word list and no stemming.
    pub fn new() -> Self {
        Self::from_config(&TokenizerConfig::default())
    }

    /// Create a builder from configuration. A non-empty prefix list enables
    /// the [`PrefixStemmer`].
    pub fn from_config(config: &TokenizerConfig) -> Self {
        let stemmer: Box<dyn Stemmer> = if config.stem_prefixes.is_empty() {
            Box::new(NoopStemmer)
        } else {
            Box::new(PrefixStemmer::new(config.stem_prefixes.iter().cloned()))
        };
        let stop_words = STOP_WORDS
            .iter()
            .map(|s| s.to_string())
            .chain(config.extra_stopwords.iter().map(|s| s.to_lowercase()))
            .collect();
        Self {
            stop_words,
            min_token_length: config.min_token_length,
            fold_diacritics: config.fold_diacritics,
            stemmer,
        }
    }

    /// Replace the stemmer.
    pub fn with_stemmer(mut self, stemmer: Box<dyn Stemmer>) -> Self {
        self.stemmer = stemmer;
        self
    }

    /// Strip everything but ASCII letters and whitespace, collapse whitespace
    /// and lowercase. Accented letters are folded to their base letter first
    /// when diacritic folding is on.
    pub fn normalize(&self, text: &str) -> String {
        let folded: String = if self.fold_diacritics {
            text.nfd().filter(|c| !is_combining_mark(*c)).collect()
        } else {
            text.to_string()
        };
        folded
            .chars()
            .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// Tokenize text: normalize, drop short tokens, drop stop words, stem.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.normalize(text)
            .split(' ')
            .filter(|token| token.chars().count() >= self.min_token_length)
            .filter(|token| !self.stop_words.contains(*token))
            .map(|token| self.stemmer.stem(token))
            .collect()
    }

    /// Build one document from its id and raw extracted text.
    pub fn build_document(&self, id: &str, text: &str) -> GlossaryResult<Document> {
        Document::new(id, self.tokenize(text))
    }

    /// Build documents in parallel. Output order matches input order.
    pub fn build_documents(&self, raw: &[(String, String)]) -> GlossaryResult<Vec<Document>> {
        raw.par_iter()
            .map(|(id, text)| self.build_document(id, text))
            .collect()
    }
}

impl Default for TokenStreamBuilder {
    fn default() -> Self {
        Self::new()
    }
}
