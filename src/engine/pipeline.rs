//! Pipeline orchestrator.
//!
//! One run over a corpus scope goes through typed stages:
//!
//! ```text
//! CorpusSnapshot -> TokenCorpus -> FrequencyModel -> ScoreTables -> Vec<DocumentGlossary>
//! ```
//!
//! The frequency model is fully built before either filter starts. The two
//! filters then run concurrently on a two-worker pool, both borrowing the
//! same model, and each returns its own outcome. A submission never updates
//! statistics incrementally: it re-runs the whole pipeline over the
//! reference snapshot plus the new document.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::definition::{define_glossary, DefinedTerm, DefinitionProvider};
use crate::index::{FrequencyModel, TokenCorpus};
use crate::types::{CorpusSnapshot, FilterPass, GlossaryError, GlossaryResult};

use super::lexicon::Lexicon;
use super::merge::{merge_document, DocumentGlossary};
use super::tfidf::{self, TfIdfOutcome};
use super::tokenizer::TokenStreamBuilder;
use super::zipf::{self, ZipfOutcome};

/// Exactly two independent filter passes exist.
const FILTER_WORKERS: usize = 2;

/// Overall outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunStatus {
    Complete,
    /// One filter failed; glossaries hold the other filter's terms only.
    Degraded { failed: FilterPass, reason: String },
}

/// Output of both filter passes over one frequency model.
#[derive(Debug)]
pub struct ScoreTables {
    pub tfidf: GlossaryResult<TfIdfOutcome>,
    pub zipf: GlossaryResult<ZipfOutcome>,
}

/// Everything one pipeline run produced.
pub struct GlossaryRun {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub status: RunStatus,
    pub model: FrequencyModel,
    pub tfidf: Option<TfIdfOutcome>,
    pub zipf: Option<ZipfOutcome>,
    pub glossaries: Vec<DocumentGlossary>,
}

impl GlossaryRun {
    pub fn glossary(&self, document_id: &str) -> Option<&DocumentGlossary> {
        self.glossaries.iter().find(|g| g.document_id == document_id)
    }

    /// Glossary of the document at `index` in model order, checked by id.
    pub fn glossary_at(&self, index: usize, document_id: &str) -> Option<&DocumentGlossary> {
        match self.glossaries.get(index) {
            Some(g) if g.document_id == document_id => Some(g),
            _ => self.glossary(document_id),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.status, RunStatus::Degraded { .. })
    }

    /// The tf-idf cutoff used for every document, if that pass succeeded.
    pub fn threshold(&self) -> Option<f64> {
        self.tfidf.as_ref().map(|t| t.threshold)
    }
}

/// Result of submitting one new document against a reference corpus.
pub struct Submission {
    pub document_id: String,
    pub run: GlossaryRun,
}

impl Submission {
    /// Merged glossary of the submitted document.
    pub fn glossary(&self) -> Option<&DocumentGlossary> {
        self.run.glossary(&self.document_id)
    }
}

/// Drives end-to-end runs. Holds no corpus state between runs.
pub struct Pipeline {
    config: PipelineConfig,
    tokenizer: TokenStreamBuilder,
    lexicon: Box<dyn Lexicon>,
    pool: rayon::ThreadPool,
}

impl Pipeline {
    /// Create a pipeline. The config is validated up front.
    pub fn new(config: PipelineConfig, lexicon: impl Lexicon + 'static) -> GlossaryResult<Self> {
        config.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(FILTER_WORKERS)
            .thread_name(|i| format!("glossary-worker-{}", i))
            .build()?;
        Ok(Self {
            tokenizer: TokenStreamBuilder::from_config(&config.tokenizer),
            config,
            lexicon: Box::new(lexicon),
            pool,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn tokenizer(&self) -> &TokenStreamBuilder {
        &self.tokenizer
    }

    /// Stage 1: build token streams for raw `(id, text)` documents.
    pub fn ingest(&self, raw: &[(String, String)]) -> GlossaryResult<CorpusSnapshot> {
        let documents = self
            .pool
            .install(|| self.tokenizer.build_documents(raw))?;
        Ok(CorpusSnapshot::from_documents(documents))
    }

    /// Stage 2: freeze the scope and aggregate its frequency tables.
    pub fn frequency_model(&self, snapshot: &CorpusSnapshot) -> GlossaryResult<FrequencyModel> {
        let corpus = TokenCorpus::from_snapshot(snapshot)?;
        Ok(FrequencyModel::build(corpus, self.lexicon.as_ref()))
    }

    /// Stage 3: run both filters concurrently over the same model.
    pub fn score(&self, model: &FrequencyModel) -> ScoreTables {
        let (tfidf, zipf) = self.pool.join(
            || guarded(FilterPass::TfIdf, || tfidf::compute(model, &self.config.tfidf)),
            || guarded(FilterPass::Zipf, || zipf::compute(model, &self.config.zipf)),
        );
        ScoreTables { tfidf, zipf }
    }

    /// Run the whole pipeline over one corpus scope.
    pub fn run(&self, snapshot: &CorpusSnapshot) -> GlossaryResult<GlossaryRun> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        log::info!(
            "Run {}: {} documents in scope",
            run_id,
            snapshot.len()
        );

        let model = self.frequency_model(snapshot)?;
        let (tfidf, zipf, status) = resolve_outcomes(self.score(&model))?;

        let glossaries = merge_all(&model, tfidf.as_ref(), zipf.as_ref());
        log::info!(
            "Run {} finished: {} glossary terms across {} documents",
            run_id,
            glossaries.iter().map(|g| g.len()).sum::<usize>(),
            glossaries.len()
        );

        Ok(GlossaryRun {
            run_id,
            started_at,
            status,
            model,
            tfidf,
            zipf,
            glossaries,
        })
    }

    /// Re-run the pipeline over `reference` plus one newly submitted document.
    pub fn submit(
        &self,
        reference: &CorpusSnapshot,
        document_id: &str,
        raw_text: &str,
    ) -> GlossaryResult<Submission> {
        let document = self.tokenizer.build_document(document_id, raw_text)?;
        log::info!(
            "Submission {}: {} tokens against {} reference documents",
            document_id,
            document.len(),
            reference.len()
        );
        let scope = reference.with_document(document);
        let run = self.run(&scope)?;
        Ok(Submission {
            document_id: document_id.to_string(),
            run,
        })
    }

    /// Look up definitions for a finished glossary, retrying each term up
    /// to the configured number of attempts. The glossary is not modified.
    pub fn define(
        &self,
        provider: &dyn DefinitionProvider,
        glossary: &DocumentGlossary,
    ) -> Vec<DefinedTerm> {
        define_glossary(provider, glossary, self.config.definitions.max_attempts)
    }
}

/// Stage 4: merge per document. A missing outcome contributes nothing.
fn merge_all(
    model: &FrequencyModel,
    tfidf: Option<&TfIdfOutcome>,
    zipf: Option<&ZipfOutcome>,
) -> Vec<DocumentGlossary> {
    model
        .documents()
        .iter()
        .enumerate()
        .map(|(i, doc)| {
            let tfidf_terms = tfidf
                .and_then(|t| t.document_at(i, doc.id()))
                .map(|d| d.qualifying.as_slice())
                .unwrap_or(&[]);
            let zipf_terms = zipf
                .and_then(|z| z.document_at(i, doc.id()))
                .map(|d| d.qualifying.as_slice())
                .unwrap_or(&[]);
            merge_document(doc.id(), tfidf_terms, zipf_terms)
        })
        .collect()
}

/// Keep whatever survived. Fails only when both passes failed.
fn resolve_outcomes(
    tables: ScoreTables,
) -> GlossaryResult<(Option<TfIdfOutcome>, Option<ZipfOutcome>, RunStatus)> {
    match (tables.tfidf, tables.zipf) {
        (Ok(t), Ok(z)) => Ok((Some(t), Some(z), RunStatus::Complete)),
        (Err(e), Ok(z)) => Ok((None, Some(z), degraded(FilterPass::TfIdf, e))),
        (Ok(t), Err(e)) => Ok((Some(t), None, degraded(FilterPass::Zipf, e))),
        (Err(te), Err(ze)) => {
            log::error!("Both filters failed: {}; {}", te, ze);
            Err(GlossaryError::FilterFailed {
                pass: FilterPass::TfIdf,
                reason: format!("{}; zipf pass also failed: {}", te, ze),
            })
        }
    }
}

fn degraded(failed: FilterPass, error: GlossaryError) -> RunStatus {
    log::warn!("Run degraded: {}", error);
    RunStatus::Degraded {
        failed,
        reason: error.to_string(),
    }
}

/// Run a filter pass, turning a panic into a `FilterFailed` error so the
/// other pass's output survives.
fn guarded<T>(pass: FilterPass, f: impl FnOnce() -> GlossaryResult<T>) -> GlossaryResult<T> {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        Err(GlossaryError::FilterFailed {
            pass,
            reason: panic_message(payload.as_ref()),
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}
