//! File-based persistence: validated corpora in, run artifacts out.

pub mod artifacts;
pub mod corpus_io;

pub use artifacts::{ArtifactWriter, DocumentSummary, RunSummary};
pub use corpus_io::{load_snapshot, read_raw_texts, save_snapshot};
