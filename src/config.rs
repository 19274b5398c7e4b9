//! Pipeline configuration, loadable from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{GlossaryError, GlossaryResult};

/// Token stream builder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Tokens shorter than this (in chars) are dropped before stemming.
    pub min_token_length: usize,
    /// Stopwords added to the built-in Cebuano list.
    pub extra_stopwords: Vec<String>,
    /// Prefixes for the longest-prefix stemmer. Empty disables stemming.
    pub stem_prefixes: Vec<String>,
    /// Fold accented letters to their base form instead of dropping them.
    ///
    /// On by default, so `bítaw` becomes `bitaw`. Set to `false` to keep the
    /// legacy cleaning, which deletes every non-ASCII letter (`bítaw` becomes
    /// `btaw`), to match reference corpora tokenized that way.
    pub fold_diacritics: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            min_token_length: 3,
            extra_stopwords: Vec::new(),
            stem_prefixes: Vec::new(),
            fold_diacritics: true,
        }
    }
}

/// TF-IDF scorer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TfIdfConfig {
    /// Threshold used when no lexically valid term exists in the corpus.
    pub fallback_threshold: f64,
    /// Threshold = mean + `sd_multiplier` × standard deviation.
    pub sd_multiplier: f64,
}

impl Default for TfIdfConfig {
    fn default() -> Self {
        Self {
            fallback_threshold: 0.01,
            sd_multiplier: 1.0,
        }
    }
}

/// Zipf-band filter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZipfConfig {
    pub min_count: u64,
    /// Upper bound on the corpus-adaptive `max_count`.
    pub max_count_cap: u64,
    pub min_zipf: f64,
    pub max_zipf: f64,
    /// Apply the TF-IDF proper-noun check to the Zipf pass as well.
    pub exclude_proper_nouns: bool,
}

impl Default for ZipfConfig {
    fn default() -> Self {
        Self {
            min_count: 4,
            max_count_cap: 30,
            min_zipf: 0.0002,
            max_zipf: 0.0008,
            exclude_proper_nouns: false,
        }
    }
}

/// Downstream definition lookup settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefinitionConfig {
    /// Attempts per term before falling back to an empty definition.
    pub max_attempts: u32,
}

impl Default for DefinitionConfig {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

/// Full pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub tokenizer: TokenizerConfig,
    pub tfidf: TfIdfConfig,
    pub zipf: ZipfConfig,
    pub definitions: DefinitionConfig,
}

impl PipelineConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> GlossaryResult<Self> {
        let config: PipelineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> GlossaryResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject settings that would make a filter admit nothing by construction
    /// or produce non-finite scores.
    pub fn validate(&self) -> GlossaryResult<()> {
        if self.tokenizer.min_token_length == 0 {
            return Err(GlossaryError::InvalidConfig(
                "tokenizer.min_token_length must be at least 1".into(),
            ));
        }
        if !self.tfidf.fallback_threshold.is_finite() || self.tfidf.fallback_threshold < 0.0 {
            return Err(GlossaryError::InvalidConfig(
                "tfidf.fallback_threshold must be a non-negative number".into(),
            ));
        }
        if !self.tfidf.sd_multiplier.is_finite() || self.tfidf.sd_multiplier < 0.0 {
            return Err(GlossaryError::InvalidConfig(
                "tfidf.sd_multiplier must be a non-negative number".into(),
            ));
        }
        if self.zipf.max_count_cap == 0 {
            return Err(GlossaryError::InvalidConfig(
                "zipf.max_count_cap must be positive".into(),
            ));
        }
        if !(self.zipf.min_zipf >= 0.0 && self.zipf.min_zipf <= self.zipf.max_zipf) {
            return Err(GlossaryError::InvalidConfig(format!(
                "zipf band [{}, {}] is empty or negative",
                self.zipf.min_zipf, self.zipf.max_zipf
            )));
        }
        if self.definitions.max_attempts == 0 {
            return Err(GlossaryError::InvalidConfig(
                "definitions.max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
