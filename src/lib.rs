//! Cebuano glossary extraction from a growing document corpus.
//!
//! Raw text is turned into token streams, corpus-wide frequency tables are
//! built over one immutable corpus scope, and two independent statistical
//! filters (TF-IDF with a dynamic threshold, and a Zipf frequency band)
//! select significant words per document. Their outputs are merged into one
//! ordered glossary per document.

pub mod config;
pub mod definition;
pub mod engine;
pub mod format;
pub mod index;
pub mod types;

pub use config::{DefinitionConfig, PipelineConfig, TfIdfConfig, TokenizerConfig, ZipfConfig};
pub use definition::{
    define_glossary, DefinedTerm, Definition, DefinitionProvider, GlossaryStore,
    JsonDictionaryProvider, JsonGlossaryStore,
};
pub use engine::{
    is_lexically_valid, DocumentGlossary, DocumentScores, GlossaryRun, Lexicon, MergedTerm,
    NoopStemmer, Pipeline, PrefixStemmer, RunStatus, ScoreTables, Stemmer, Submission,
    TfIdfOutcome, TokenStreamBuilder, WordListLexicon, ZipfBand, ZipfDocument, ZipfOutcome,
};
pub use format::{ArtifactWriter, RunSummary};
pub use index::{DocumentCounts, FrequencyModel, TokenCorpus};
pub use types::{
    CorpusSnapshot, Document, FilterPass, GlossaryEntry, GlossaryError, GlossaryResult,
    TermScore, ZipfRecord,
};
