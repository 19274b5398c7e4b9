//! Corpus-wide index structures. Each is built once per corpus scope and is
//! read-only afterwards.

pub mod frequency;
pub mod token_corpus;

pub use frequency::FrequencyModel;
pub use token_corpus::{DocumentCounts, TokenCorpus};
