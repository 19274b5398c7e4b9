//! Lexical validity oracle.
//!
//! The dictionary itself is an external collaborator; the pipeline only
//! needs a deterministic `is_entry` lookup. A plain word list is provided
//! for the CLI and tests.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::types::GlossaryResult;

/// Minimum length (in chars) of a lexically valid term.
pub const MIN_VALID_LENGTH: usize = 3;

/// Binary "is this a dictionary word" oracle. Must be deterministic and
/// side-effect free for the duration of a run.
pub trait Lexicon: Send + Sync {
    fn is_entry(&self, term: &str) -> bool;
}

impl Lexicon for HashSet<String> {
    fn is_entry(&self, term: &str) -> bool {
        self.contains(term)
    }
}

impl<L: Lexicon + ?Sized> Lexicon for &L {
    fn is_entry(&self, term: &str) -> bool {
        (**self).is_entry(term)
    }
}

/// Alphabetic, at least [`MIN_VALID_LENGTH`] chars, and accepted by the oracle.
pub fn is_lexically_valid(term: &str, lexicon: &dyn Lexicon) -> bool {
    term.chars().count() >= MIN_VALID_LENGTH
        && term.chars().all(char::is_alphabetic)
        && lexicon.is_entry(term)
}

/// Dictionary backed by a newline-delimited word list.
#[derive(Debug, Clone, Default)]
pub struct WordListLexicon {
    words: HashSet<String>,
}

impl WordListLexicon {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a word list. Blank lines and `#` comments are skipped.
    pub fn parse(content: &str) -> Self {
        Self::from_words(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Load a word list from disk.
    pub fn load(path: &Path) -> GlossaryResult<Self> {
        let content = fs::read_to_string(path)?;
        let lexicon = Self::parse(&content);
        log::info!(
            "Loaded lexicon {}: {} words",
            path.display(),
            lexicon.len()
        );
        Ok(lexicon)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Lexicon for WordListLexicon {
    /// Exact match first, then the lowercase form.
    fn is_entry(&self, term: &str) -> bool {
        if self.words.contains(term) {
            return true;
        }
        let lower = term.to_lowercase();
        lower != term && self.words.contains(&lower)
    }
}
