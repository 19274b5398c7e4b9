//! Downstream consumers of a finished glossary: definition lookup and the
//! glossary store.
//!
//! Both are external collaborators. Their failures stay local: a term whose
//! lookup keeps failing gets an empty definition, and a store error is
//! reported to the caller without touching the computed glossary.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::merge::DocumentGlossary;
use crate::types::{GlossaryError, GlossaryResult};

/// Dictionary-style definition of one glossary term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Definition {
    pub part_of_speech: String,
    pub pronunciation: String,
    pub definition: String,
    pub example: String,
    pub translation: String,
}

impl Definition {
    pub fn is_empty(&self) -> bool {
        self == &Definition::default()
    }
}

/// A glossary term with its definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinedTerm {
    pub word: String,
    #[serde(flatten)]
    pub definition: Definition,
}

/// Produces a definition for one term. One call per term; each call is
/// independently retryable.
pub trait DefinitionProvider: Send + Sync {
    fn define(&self, term: &str) -> GlossaryResult<Definition>;
}

/// Persists defined glossaries keyed by run id and document id.
pub trait GlossaryStore {
    fn put(&self, run_id: Uuid, document_id: &str, entries: &[DefinedTerm]) -> GlossaryResult<()>;
}

/// Define one term, retrying up to `max_attempts` times.
pub fn define_term(
    provider: &dyn DefinitionProvider,
    term: &str,
    max_attempts: u32,
) -> GlossaryResult<Definition> {
    let attempts = max_attempts.max(1);
    let mut last_error = None;
    for attempt in 1..=attempts {
        match provider.define(term) {
            Ok(definition) => return Ok(definition),
            Err(e) => {
                log::debug!("Definition attempt {}/{} for {:?} failed: {}", attempt, attempts, term, e);
                last_error = Some(e);
            }
        }
    }
    Err(GlossaryError::Definition {
        term: term.to_string(),
        reason: last_error.map_or_else(|| "no attempts made".to_string(), |e| e.to_string()),
    })
}

/// Define every term of a glossary, in glossary order. Terms whose lookups
/// all fail get an empty definition.
pub fn define_glossary(
    provider: &dyn DefinitionProvider,
    glossary: &DocumentGlossary,
    max_attempts: u32,
) -> Vec<DefinedTerm> {
    glossary
        .terms
        .iter()
        .map(|t| {
            let definition = define_term(provider, &t.term, max_attempts).unwrap_or_else(|e| {
                log::warn!("{}; using empty definition", e);
                Definition::default()
            });
            DefinedTerm {
                word: t.term.clone(),
                definition,
            }
        })
        .collect()
}

/// Provider backed by a JSON dictionary: an object mapping each term to its
/// definition fields. Lookup is exact, then lowercase.
#[derive(Debug, Clone, Default)]
pub struct JsonDictionaryProvider {
    entries: HashMap<String, Definition>,
}

impl JsonDictionaryProvider {
    pub fn from_json_str(s: &str) -> GlossaryResult<Self> {
        Ok(Self {
            entries: serde_json::from_str(s)?,
        })
    }

    pub fn load(path: &Path) -> GlossaryResult<Self> {
        let provider = Self::from_json_str(&fs::read_to_string(path)?)?;
        log::info!(
            "Loaded {} dictionary definitions from {}",
            provider.len(),
            path.display()
        );
        Ok(provider)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DefinitionProvider for JsonDictionaryProvider {
    fn define(&self, term: &str) -> GlossaryResult<Definition> {
        self.entries
            .get(term)
            .or_else(|| self.entries.get(&term.to_lowercase()))
            .cloned()
            .ok_or_else(|| GlossaryError::Definition {
                term: term.to_string(),
                reason: "not in dictionary".into(),
            })
    }
}

/// Store writing `<root>/<run_id>/<document_id>.json`.
pub struct JsonGlossaryStore {
    root: PathBuf,
}

impl JsonGlossaryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, run_id: Uuid, document_id: &str) -> PathBuf {
        self.root
            .join(run_id.to_string())
            .join(format!("{}.json", document_id))
    }

    pub fn get(&self, run_id: Uuid, document_id: &str) -> GlossaryResult<Vec<DefinedTerm>> {
        let text = fs::read_to_string(self.path_for(run_id, document_id))?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl GlossaryStore for JsonGlossaryStore {
    fn put(&self, run_id: Uuid, document_id: &str, entries: &[DefinedTerm]) -> GlossaryResult<()> {
        let path = self.path_for(run_id, document_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(entries)?)?;
        log::info!("Stored {} definitions at {}", entries.len(), path.display());
        Ok(())
    }
}
