//! Core data types: documents, corpus snapshots, score records, errors.

pub mod document;
pub mod error;
pub mod score;

pub use document::{CorpusSnapshot, Document};
pub use error::{FilterPass, GlossaryError, GlossaryResult};
pub use score::{GlossaryEntry, TermScore, ZipfRecord};
