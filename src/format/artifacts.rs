//! Per-document artifacts of a finished run.
//!
//! Layout under the output root:
//!
//! ```text
//! tokens/<id>.txt             raw token stream
//! tfidf-scores/<id>_tfidf.csv term,tf,idf,tfidf,is_valid (tfidf descending)
//! tfidf-words/<id>.txt        tf-idf qualifying words
//! zipf-scores/<id>_zipf.csv   term,local_count,global_count,global_zipf,is_valid
//! zipf-words/<id>.txt         zipf qualifying words
//! glossary/<id>.json          merged glossary
//! run.json                    run summary
//! ```
//!
//! Word lists are only written when non-empty. Writing a run replaces
//! everything an earlier run left under the same root.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::pipeline::{GlossaryRun, RunStatus};
use crate::engine::zipf::ZipfBand;
use crate::types::{GlossaryResult, TermScore, ZipfRecord};

const TOKENS_DIR: &str = "tokens";
const TFIDF_SCORES_DIR: &str = "tfidf-scores";
const TFIDF_WORDS_DIR: &str = "tfidf-words";
const ZIPF_SCORES_DIR: &str = "zipf-scores";
const ZIPF_WORDS_DIR: &str = "zipf-words";
const GLOSSARY_DIR: &str = "glossary";
const SUMMARY_FILE: &str = "run.json";

const ARTIFACT_DIRS: [&str; 6] = [
    TOKENS_DIR,
    TFIDF_SCORES_DIR,
    TFIDF_WORDS_DIR,
    ZIPF_SCORES_DIR,
    ZIPF_WORDS_DIR,
    GLOSSARY_DIR,
];

/// Per-document counts in the run summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub document_id: String,
    pub tokens: usize,
    pub tfidf_words: usize,
    pub zipf_words: usize,
    pub glossary_words: usize,
}

/// Serializable summary of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub status: RunStatus,
    pub corpus_size: u64,
    pub total_docs: usize,
    pub tfidf_threshold: Option<f64>,
    pub zipf_band: Option<ZipfBand>,
    pub documents: Vec<DocumentSummary>,
}

impl RunSummary {
    pub fn from_run(run: &GlossaryRun) -> Self {
        let documents = run
            .model
            .documents()
            .iter()
            .enumerate()
            .map(|(i, doc)| DocumentSummary {
                document_id: doc.id().to_string(),
                tokens: doc.document().len(),
                tfidf_words: run
                    .tfidf
                    .as_ref()
                    .and_then(|t| t.document_at(i, doc.id()))
                    .map_or(0, |d| d.qualifying.len()),
                zipf_words: run
                    .zipf
                    .as_ref()
                    .and_then(|z| z.document_at(i, doc.id()))
                    .map_or(0, |d| d.qualifying.len()),
                glossary_words: run.glossary_at(i, doc.id()).map_or(0, |g| g.len()),
            })
            .collect();

        Self {
            run_id: run.run_id,
            started_at: run.started_at,
            status: run.status.clone(),
            corpus_size: run.model.corpus_size(),
            total_docs: run.model.total_docs(),
            tfidf_threshold: run.threshold(),
            zipf_band: run.zipf.as_ref().map(|z| z.band),
            documents,
        }
    }
}

/// Writes run artifacts under one root directory.
pub struct ArtifactWriter {
    root: PathBuf,
}

impl ArtifactWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dir(&self, name: &str) -> GlossaryResult<PathBuf> {
        let dir = self.root.join(name);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Write artifacts for every document of the run plus the summary.
    ///
    /// Each run is a new generation: artifacts left by an earlier run under
    /// the same root are removed first, including those of documents that
    /// are no longer in scope.
    pub fn write_run(&self, run: &GlossaryRun) -> GlossaryResult<RunSummary> {
        self.clear()?;
        for (index, doc) in run.model.documents().iter().enumerate() {
            self.write_at(run, index, doc.id())?;
        }
        let summary = RunSummary::from_run(run);
        fs::write(
            self.root.join(SUMMARY_FILE),
            serde_json::to_string_pretty(&summary)?,
        )?;
        log::info!("Artifacts for run {} written to {}", run.run_id, self.root.display());
        Ok(summary)
    }

    /// Write the artifacts of a single document, replacing any it had.
    pub fn write_document(&self, run: &GlossaryRun, document_id: &str) -> GlossaryResult<()> {
        let index = run
            .model
            .documents()
            .iter()
            .position(|d| d.id() == document_id)
            .unwrap_or(usize::MAX);
        self.remove_document(document_id)?;
        self.write_at(run, index, document_id)
    }

    /// Remove every artifact directory and the run summary.
    fn clear(&self) -> GlossaryResult<()> {
        for name in ARTIFACT_DIRS {
            let dir = self.root.join(name);
            if dir.exists() {
                fs::remove_dir_all(&dir)?;
            }
        }
        fs::create_dir_all(&self.root)?;
        remove_if_exists(&self.root.join(SUMMARY_FILE))
    }

    /// Remove every artifact of one document.
    fn remove_document(&self, document_id: &str) -> GlossaryResult<()> {
        for path in [
            self.root.join(TOKENS_DIR).join(format!("{}.txt", document_id)),
            self.root
                .join(TFIDF_SCORES_DIR)
                .join(format!("{}_tfidf.csv", document_id)),
            self.root.join(TFIDF_WORDS_DIR).join(format!("{}.txt", document_id)),
            self.root
                .join(ZIPF_SCORES_DIR)
                .join(format!("{}_zipf.csv", document_id)),
            self.root.join(ZIPF_WORDS_DIR).join(format!("{}.txt", document_id)),
            self.root.join(GLOSSARY_DIR).join(format!("{}.json", document_id)),
        ] {
            remove_if_exists(&path)?;
        }
        Ok(())
    }

    fn write_at(&self, run: &GlossaryRun, index: usize, document_id: &str) -> GlossaryResult<()> {
        if let Some(doc) = run.model.corpus().get(document_id) {
            fs::write(
                self.dir(TOKENS_DIR)?.join(format!("{}.txt", document_id)),
                doc.document().tokens().join("\n"),
            )?;
        }

        if let Some(scores) = run.tfidf.as_ref().and_then(|t| t.document_at(index, document_id)) {
            write_tfidf_csv(
                &self.dir(TFIDF_SCORES_DIR)?.join(format!("{}_tfidf.csv", document_id)),
                &scores.scores,
            )?;
            self.write_words(TFIDF_WORDS_DIR, document_id, &scores.qualifying)?;
        }

        if let Some(zipf) = run.zipf.as_ref().and_then(|z| z.document_at(index, document_id)) {
            write_zipf_csv(
                &self.dir(ZIPF_SCORES_DIR)?.join(format!("{}_zipf.csv", document_id)),
                &zipf.records,
            )?;
            self.write_words(ZIPF_WORDS_DIR, document_id, &zipf.qualifying)?;
        }

        if let Some(glossary) = run.glossary_at(index, document_id) {
            fs::write(
                self.dir(GLOSSARY_DIR)?.join(format!("{}.json", document_id)),
                serde_json::to_string_pretty(&glossary.words())?,
            )?;
        }
        Ok(())
    }

    fn write_words(&self, dir: &str, document_id: &str, words: &[String]) -> GlossaryResult<()> {
        if words.is_empty() {
            return Ok(());
        }
        fs::write(
            self.dir(dir)?.join(format!("{}.txt", document_id)),
            words.join("\n"),
        )?;
        Ok(())
    }
}

fn remove_if_exists(path: &Path) -> GlossaryResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Write a tf-idf score table as CSV.
pub fn write_tfidf_csv(path: &Path, scores: &[TermScore]) -> GlossaryResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for score in scores {
        writer.serialize(score)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a zipf record table as CSV.
pub fn write_zipf_csv(path: &Path, records: &[ZipfRecord]) -> GlossaryResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a tf-idf score table back, e.g. to verify a threshold.
pub fn read_tfidf_csv(path: &Path) -> GlossaryResult<Vec<TermScore>> {
    let mut reader = csv::Reader::from_path(path)?;
    reader
        .deserialize::<TermScore>()
        .map(|row| row.map_err(Into::into))
        .collect()
}

/// Read a zipf record table back.
pub fn read_zipf_csv(path: &Path) -> GlossaryResult<Vec<ZipfRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    reader
        .deserialize::<ZipfRecord>()
        .map(|row| row.map_err(Into::into))
        .collect()
}

/// Read a merged glossary JSON list.
pub fn read_glossary(path: &Path) -> GlossaryResult<Vec<String>> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tfidf_csv_header_and_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a_tfidf.csv");
        let scores = vec![TermScore {
            term: "balay".into(),
            tf: 0.5,
            idf: 1.25,
            tfidf: 0.625,
            is_lexically_valid: true,
        }];
        write_tfidf_csv(&path, &scores).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("term,tf,idf,tfidf,is_valid\n"));
        assert_eq!(read_tfidf_csv(&path).unwrap(), scores);
    }

    #[test]
    fn test_zipf_csv_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a_zipf.csv");
        let records = vec![ZipfRecord {
            term: "dagat".into(),
            local_count: 2,
            global_count: 5,
            global_zipf: 0.0005,
            is_lexically_valid: false,
        }];
        write_zipf_csv(&path, &records).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("term,local_count,global_count,global_zipf,is_valid\n"));
        assert_eq!(read_zipf_csv(&path).unwrap(), records);
    }
}
