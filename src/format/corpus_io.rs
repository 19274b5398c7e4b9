//! Reading and writing validated token corpora and raw text directories.
//!
//! A validated corpus is a directory of `<id>.txt` files with one token per
//! line. Files are read in file-name order so snapshots are deterministic.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{CorpusSnapshot, Document, GlossaryError, GlossaryResult};

/// Document id of a file: its base name without extension.
pub fn document_id(path: &Path) -> GlossaryResult<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| GlossaryError::InvalidDocumentId(path.display().to_string()))
}

/// All `*.txt` files in a directory, sorted by file name.
fn text_files(dir: &Path) -> GlossaryResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_txt = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("txt"));
        if path.is_file() && is_txt {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Parse a token file: one token per line, surrounding whitespace trimmed,
/// blank lines skipped.
pub fn parse_tokens(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load a validated corpus directory into a snapshot.
pub fn load_snapshot(dir: &Path) -> GlossaryResult<CorpusSnapshot> {
    let mut documents = Vec::new();
    for path in text_files(dir)? {
        let content = fs::read_to_string(&path)?;
        documents.push(Document::new(document_id(&path)?, parse_tokens(&content))?);
    }
    log::info!(
        "Loaded {} validated documents from {}",
        documents.len(),
        dir.display()
    );
    Ok(CorpusSnapshot::from_documents(documents))
}

/// Write a snapshot as a validated corpus directory.
pub fn save_snapshot(snapshot: &CorpusSnapshot, dir: &Path) -> GlossaryResult<()> {
    fs::create_dir_all(dir)?;
    for doc in snapshot.documents() {
        fs::write(
            dir.join(format!("{}.txt", doc.id())),
            doc.tokens().join("\n"),
        )?;
    }
    Ok(())
}

/// Read every raw text file of a directory as `(id, text)` pairs.
pub fn read_raw_texts(dir: &Path) -> GlossaryResult<Vec<(String, String)>> {
    text_files(dir)?
        .into_iter()
        .map(|path| Ok((document_id(&path)?, fs::read_to_string(&path)?)))
        .collect()
}
