//! Phase 3 tests: persisted artifacts, reference corpus IO and the
//! downstream definition contract.

mod common;

use std::sync::Mutex;

use cebuano_glossary::format::{artifacts, corpus_io, ArtifactWriter, RunSummary};
use cebuano_glossary::{
    define_glossary, CorpusSnapshot, Definition, DefinitionProvider, FilterPass, GlossaryError,
    GlossaryResult, GlossaryStore, JsonGlossaryStore, Pipeline, PipelineConfig, RunStatus,
};

use common::{doc, init_logging, lexicon, padded_corpus};

const WORDS: &[&str] = &["balay", "dagat", "bukid", "suba", "lasang", "kahoy"];

fn snapshot() -> CorpusSnapshot {
    CorpusSnapshot::from_documents(vec![
        doc("sugilanon", &[("balay", 4), ("dagat", 2), ("kahoy", 1)]),
        doc("balita", &[("dagat", 3), ("bukid", 3), ("xyzzy", 2)]),
        doc("awit", &[("suba", 1), ("balay", 1), ("lasang", 6)]),
    ])
}

#[test]
fn test_write_run_layout() {
    init_logging();
    let out = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(PipelineConfig::default(), lexicon(WORDS)).unwrap();
    let run = pipeline.run(&snapshot()).unwrap();
    let summary = ArtifactWriter::new(out.path()).write_run(&run).unwrap();

    for id in ["sugilanon", "balita", "awit"] {
        assert!(out.path().join("tokens").join(format!("{}.txt", id)).exists());
        assert!(out
            .path()
            .join("tfidf-scores")
            .join(format!("{}_tfidf.csv", id))
            .exists());
        assert!(out
            .path()
            .join("zipf-scores")
            .join(format!("{}_zipf.csv", id))
            .exists());

        let glossary =
            artifacts::read_glossary(&out.path().join("glossary").join(format!("{}.json", id)))
                .unwrap();
        assert_eq!(glossary, run.glossary(id).unwrap().words());

        let words_path = out.path().join("tfidf-words").join(format!("{}.txt", id));
        let qualifying = &run.tfidf.as_ref().unwrap().get(id).unwrap().qualifying;
        assert_eq!(words_path.exists(), !qualifying.is_empty());
    }

    let written: RunSummary =
        serde_json::from_str(&std::fs::read_to_string(out.path().join("run.json")).unwrap())
            .unwrap();
    assert_eq!(written.run_id, summary.run_id);
    assert_eq!(written.documents, summary.documents);
    assert_eq!(written.status, RunStatus::Complete);
    assert_eq!(written.total_docs, 3);
    assert_eq!(written.corpus_size, 23);
}

#[test]
fn test_score_table_is_auditable() {
    let out = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(PipelineConfig::default(), lexicon(WORDS)).unwrap();
    let run = pipeline.run(&snapshot()).unwrap();
    ArtifactWriter::new(out.path()).write_run(&run).unwrap();

    let scores =
        artifacts::read_tfidf_csv(&out.path().join("tfidf-scores").join("balita_tfidf.csv"))
            .unwrap();
    // All terms are present, invalid ones included, sorted by tfidf descending.
    assert_eq!(scores.len(), 3);
    assert!(scores.iter().any(|s| s.term == "xyzzy" && !s.is_lexically_valid));
    assert!(scores.windows(2).all(|w| w[0].tfidf >= w[1].tfidf));

    // The persisted table reproduces the qualifying list against the threshold.
    let threshold = run.threshold().unwrap();
    let mut from_table: Vec<String> = scores
        .iter()
        .filter(|s| s.tfidf >= threshold && s.is_lexically_valid)
        .map(|s| s.term.clone())
        .collect();
    from_table.sort();
    assert_eq!(from_table, run.tfidf.as_ref().unwrap().get("balita").unwrap().qualifying);
}

// ==================== Generations ====================

fn read_summary(root: &std::path::Path) -> RunSummary {
    serde_json::from_str(&std::fs::read_to_string(root.join("run.json")).unwrap()).unwrap()
}

#[test]
fn test_rewriting_root_drops_stale_word_lists() {
    let out = tempfile::tempdir().unwrap();
    let writer = ArtifactWriter::new(out.path());
    let pipeline = Pipeline::new(PipelineConfig::default(), lexicon(WORDS)).unwrap();
    let words = |id: &str| out.path().join("tfidf-words").join(format!("{}.txt", id));

    let first = CorpusSnapshot::from_documents(vec![
        doc("a", &[("balay", 5)]),
        doc("b", &[("xyzzy", 5)]),
    ]);
    let first = pipeline.run(&first).unwrap();
    writer.write_run(&first).unwrap();
    assert_eq!(std::fs::read_to_string(words("a")).unwrap(), "balay");

    let second = CorpusSnapshot::from_documents(vec![
        doc("a", &[("xyzzy", 3)]),
        doc("b", &[("balay", 2)]),
    ]);
    let second = pipeline.run(&second).unwrap();
    assert!(second.tfidf.as_ref().unwrap().get("a").unwrap().qualifying.is_empty());

    // A single-document rewrite replaces that document's files.
    writer.write_document(&second, "a").unwrap();
    assert!(!words("a").exists());

    writer.write_run(&second).unwrap();
    assert!(!words("a").exists());
    assert_eq!(std::fs::read_to_string(words("b")).unwrap(), "balay");
    assert_eq!(read_summary(out.path()).run_id, second.run_id);
}

/// 20 documents of 500 tokens. "balay" fills doc00, so its tf-idf dwarfs
/// every other score.
fn lopsided_corpus() -> CorpusSnapshot {
    padded_corpus(20, 500, &[(0, "balay", 500), (1, "dagat", 1), (2, "suba", 5)])
}

fn overflowing_pipeline() -> Pipeline {
    let mut config = PipelineConfig::default();
    config.tfidf.sd_multiplier = f64::MAX;
    Pipeline::new(config, lexicon(WORDS)).unwrap()
}

#[test]
fn test_failed_pass_degrades_run() {
    let run = overflowing_pipeline().run(&lopsided_corpus()).unwrap();

    assert!(run.is_degraded());
    assert!(matches!(
        run.status,
        RunStatus::Degraded {
            failed: FilterPass::TfIdf,
            ..
        }
    ));
    assert!(run.tfidf.is_none());
    assert!(run.threshold().is_none());
    // The zipf pass survives and alone feeds the glossary.
    let zipf = run.zipf.as_ref().unwrap();
    assert_eq!(zipf.get("doc02").unwrap().qualifying, vec!["suba".to_string()]);
    assert_eq!(run.glossary("doc02").unwrap().words(), vec!["suba".to_string()]);
    assert!(run.glossary("doc00").unwrap().is_empty());
}

#[test]
fn test_degraded_run_artifacts() {
    let out = tempfile::tempdir().unwrap();
    let writer = ArtifactWriter::new(out.path());

    let complete = Pipeline::new(PipelineConfig::default(), lexicon(WORDS))
        .unwrap()
        .run(&snapshot())
        .unwrap();
    writer.write_run(&complete).unwrap();
    assert!(out.path().join("tfidf-scores").join("awit_tfidf.csv").exists());

    let degraded = overflowing_pipeline().run(&lopsided_corpus()).unwrap();
    writer.write_run(&degraded).unwrap();

    // Nothing from the complete run survives: no tf-idf tables at all, and
    // no files for documents outside the new scope.
    assert!(!out.path().join("tfidf-scores").exists());
    assert!(!out.path().join("tfidf-words").exists());
    assert!(!out.path().join("tokens").join("awit.txt").exists());
    assert!(out.path().join("zipf-words").join("doc02.txt").exists());

    let text = std::fs::read_to_string(out.path().join("run.json")).unwrap();
    assert!(text.contains("\"kind\": \"degraded\""));
    let summary = read_summary(out.path());
    assert_eq!(summary.status, degraded.status);
    assert!(summary.tfidf_threshold.is_none());
    assert_eq!(summary.zipf_band.unwrap().max_count, 10);
    assert_eq!(summary.total_docs, 20);
}

#[test]
fn test_reference_corpus_roundtrip_then_submit() {
    let reference_dir = tempfile::tempdir().unwrap();
    corpus_io::save_snapshot(&snapshot(), reference_dir.path()).unwrap();
    let reference = corpus_io::load_snapshot(reference_dir.path()).unwrap();
    assert_eq!(reference.len(), 3);
    assert_eq!(reference.token_count(), 23);

    let pipeline = Pipeline::new(PipelineConfig::default(), lexicon(WORDS)).unwrap();
    let submission = pipeline
        .submit(&reference, "bag-o", "Ang lasang ug ang kahoy sa bukid")
        .unwrap();
    assert_eq!(submission.run.model.total_docs(), 4);
}

/// Provider that fails for one specific term and records every call.
struct Recording {
    fail_on: String,
    calls: Mutex<Vec<String>>,
}

impl DefinitionProvider for Recording {
    fn define(&self, term: &str) -> GlossaryResult<Definition> {
        self.calls.lock().unwrap().push(term.to_string());
        if term == self.fail_on {
            return Err(GlossaryError::Definition {
                term: term.to_string(),
                reason: "service unavailable".into(),
            });
        }
        Ok(Definition {
            part_of_speech: "noun".into(),
            translation: format!("{}-en", term),
            ..Definition::default()
        })
    }
}

#[test]
fn test_definition_failures_do_not_touch_glossary() {
    let pipeline = Pipeline::new(PipelineConfig::default(), lexicon(WORDS)).unwrap();
    let run = pipeline.run(&snapshot()).unwrap();
    let glossary = run
        .glossaries
        .iter()
        .find(|g| g.len() >= 1)
        .expect("at least one non-empty glossary");
    let before = glossary.clone();
    let failing = glossary.terms[0].term.clone();

    let provider = Recording {
        fail_on: failing.clone(),
        calls: Mutex::new(Vec::new()),
    };
    let defined = define_glossary(&provider, glossary, 2);

    assert_eq!(glossary, &before);
    assert_eq!(defined.len(), glossary.len());
    assert!(defined[0].definition.is_empty());
    let calls = provider.calls.lock().unwrap();
    assert_eq!(calls.iter().filter(|c| **c == failing).count(), 2);

    let store_dir = tempfile::tempdir().unwrap();
    let store = JsonGlossaryStore::new(store_dir.path());
    store.put(run.run_id, &glossary.document_id, &defined).unwrap();
    assert_eq!(store.get(run.run_id, &glossary.document_id).unwrap(), defined);
}

#[test]
fn test_pipeline_define_uses_configured_attempts() {
    let mut config = PipelineConfig::default();
    config.definitions.max_attempts = 4;
    let pipeline = Pipeline::new(config, lexicon(WORDS)).unwrap();
    let run = pipeline.run(&snapshot()).unwrap();
    let glossary = run.glossary("awit").unwrap();
    assert!(!glossary.is_empty());

    let provider = Recording {
        fail_on: glossary.terms[0].term.clone(),
        calls: Mutex::new(Vec::new()),
    };
    let defined = pipeline.define(&provider, glossary);

    assert_eq!(defined.len(), glossary.len());
    assert!(defined[0].definition.is_empty());
    let calls = provider.calls.lock().unwrap();
    let failing = &glossary.terms[0].term;
    assert_eq!(calls.iter().filter(|c| *c == failing).count(), 4);
    // Every other term succeeds on its first call.
    assert_eq!(calls.len(), 4 + glossary.len() - 1);
}
