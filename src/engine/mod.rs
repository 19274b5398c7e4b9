//! Scoring engine: token streams, lexical validity, the two filter passes,
//! the merger and the orchestrator that sequences them.

pub mod lexicon;
pub mod merge;
pub mod pipeline;
pub mod tfidf;
pub mod tokenizer;
pub mod zipf;

pub use lexicon::{is_lexically_valid, Lexicon, WordListLexicon};
pub use merge::{merge, merge_document, DocumentGlossary, MergedTerm};
pub use pipeline::{GlossaryRun, Pipeline, RunStatus, ScoreTables, Submission};
pub use tfidf::{DocumentScores, TfIdfOutcome};
pub use tokenizer::{NoopStemmer, PrefixStemmer, Stemmer, TokenStreamBuilder};
pub use zipf::{ZipfBand, ZipfDocument, ZipfOutcome};
