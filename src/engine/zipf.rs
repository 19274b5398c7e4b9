//! Zipf-band filter: admit terms whose global relative frequency falls in a
//! band that adapts to corpus size.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::ZipfConfig;
use crate::index::{DocumentCounts, FrequencyModel};
use crate::types::{FilterPass, GlossaryError, GlossaryResult, ZipfRecord};

use super::tfidf::starts_lowercase;

/// Admission band for one corpus scope. Depends on corpus size only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZipfBand {
    pub min_count: u64,
    /// `min(cap, floor(corpus_size^(1/4)))`.
    pub max_count: u64,
    pub min_zipf: f64,
    pub max_zipf: f64,
}

impl ZipfBand {
    pub fn for_corpus_size(corpus_size: u64, config: &ZipfConfig) -> Self {
        Self {
            min_count: config.min_count,
            max_count: fourth_root(corpus_size).min(config.max_count_cap),
            min_zipf: config.min_zipf,
            max_zipf: config.max_zipf,
        }
    }

    /// Both the count and the ratio must sit inside the band.
    pub fn admits(&self, global_count: u64, global_zipf: f64) -> bool {
        (self.min_count..=self.max_count).contains(&global_count)
            && global_zipf >= self.min_zipf
            && global_zipf <= self.max_zipf
    }
}

/// Exact `floor(n^(1/4))`.
pub fn fourth_root(n: u64) -> u64 {
    let mut r = (n as f64).powf(0.25).floor() as u64;
    while r > 0 && r.checked_pow(4).map_or(true, |p| p > n) {
        r -= 1;
    }
    while (r + 1).checked_pow(4).is_some_and(|p| p <= n) {
        r += 1;
    }
    r
}

/// Zipf records and qualifying terms for one document.
#[derive(Debug, Clone)]
pub struct ZipfDocument {
    pub document_id: String,
    /// One record per distinct term, in term order.
    pub records: Vec<ZipfRecord>,
    /// Qualifying terms, deduplicated and sorted.
    pub qualifying: Vec<String>,
}

/// Output of one Zipf pass over a corpus scope.
#[derive(Debug, Clone)]
pub struct ZipfOutcome {
    pub band: ZipfBand,
    pub corpus_size: u64,
    pub documents: Vec<ZipfDocument>,
}

impl ZipfOutcome {
    pub fn get(&self, document_id: &str) -> Option<&ZipfDocument> {
        self.documents.iter().find(|d| d.document_id == document_id)
    }

    /// Records of the document at `index` in model order, checked by id.
    pub fn document_at(&self, index: usize, document_id: &str) -> Option<&ZipfDocument> {
        match self.documents.get(index) {
            Some(d) if d.document_id == document_id => Some(d),
            _ => self.get(document_id),
        }
    }
}

/// Build the record of every distinct term of one document.
pub fn document_records(model: &FrequencyModel, doc: &DocumentCounts) -> Vec<ZipfRecord> {
    let corpus_size = model.corpus_size() as f64;
    doc.local_counts()
        .iter()
        .map(|(term, &local_count)| {
            let global_count = model.global_count(term);
            ZipfRecord {
                term: term.clone(),
                local_count,
                global_count,
                global_zipf: global_count as f64 / corpus_size,
                is_lexically_valid: model.is_valid(term),
            }
        })
        .collect()
}

/// Qualification rule for one record.
///
/// The proper-noun check is only applied when the config asks for it.
pub fn qualifies(record: &ZipfRecord, band: &ZipfBand, config: &ZipfConfig) -> bool {
    band.admits(record.global_count, record.global_zipf)
        && record.is_lexically_valid
        && record.term.chars().all(char::is_alphabetic)
        && (!config.exclude_proper_nouns || starts_lowercase(&record.term))
}

/// Run the Zipf pass over the whole corpus scope.
pub fn compute(model: &FrequencyModel, config: &ZipfConfig) -> GlossaryResult<ZipfOutcome> {
    let corpus_size = model.corpus_size();
    if corpus_size == 0 {
        return Err(GlossaryError::FilterFailed {
            pass: FilterPass::Zipf,
            reason: "corpus size is zero".into(),
        });
    }
    let band = ZipfBand::for_corpus_size(corpus_size, config);
    log::info!(
        "Zipf band: count in [{}, {}], zipf in [{}, {}] (corpus size {})",
        band.min_count,
        band.max_count,
        band.min_zipf,
        band.max_zipf,
        corpus_size
    );

    let documents = model
        .documents()
        .iter()
        .map(|doc| {
            let records = document_records(model, doc);
            let qualifying: BTreeSet<String> = records
                .iter()
                .filter(|r| qualifies(r, &band, config))
                .map(|r| r.term.clone())
                .collect();

            if qualifying.is_empty() {
                log::warn!("No qualifying zipf words for {}", doc.id());
            }

            ZipfDocument {
                document_id: doc.id().to_string(),
                records,
                qualifying: qualifying.into_iter().collect(),
            }
        })
        .collect();

    Ok(ZipfOutcome {
        band,
        corpus_size,
        documents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(term: &str, global_count: u64, corpus_size: u64, valid: bool) -> ZipfRecord {
        ZipfRecord {
            term: term.to_string(),
            local_count: 1,
            global_count,
            global_zipf: global_count as f64 / corpus_size as f64,
            is_lexically_valid: valid,
        }
    }

    #[test]
    fn test_fourth_root_exact() {
        assert_eq!(fourth_root(0), 0);
        assert_eq!(fourth_root(15), 1);
        assert_eq!(fourth_root(16), 2);
        assert_eq!(fourth_root(80), 2);
        assert_eq!(fourth_root(81), 3);
        assert_eq!(fourth_root(9_999), 9);
        assert_eq!(fourth_root(10_000), 10);
        assert_eq!(fourth_root(u64::MAX), 65_535);
    }

    #[test]
    fn test_band_cap() {
        let config = ZipfConfig::default();
        assert_eq!(ZipfBand::for_corpus_size(10_000, &config).max_count, 10);
        assert_eq!(ZipfBand::for_corpus_size(100_000_000, &config).max_count, 30);
    }

    #[test]
    fn test_band_monotone_and_capped() {
        let config = ZipfConfig::default();
        let mut prev = 0;
        for size in (0..2_000_000u64).step_by(997) {
            let max_count = ZipfBand::for_corpus_size(size, &config).max_count;
            assert!(max_count >= prev);
            assert!(max_count <= 30);
            prev = max_count;
        }
    }

    #[test]
    fn test_band_edges_inclusive() {
        let band = ZipfBand::for_corpus_size(10_000, &ZipfConfig::default());
        assert!(band.admits(4, 0.0004));
        assert!(band.admits(10, 0.0008));
        assert!(!band.admits(3, 0.0003));
        assert!(!band.admits(11, 0.0008));
        assert!(!band.admits(5, 0.0009));
        assert!(!band.admits(5, 0.0001));
    }

    #[test]
    fn test_qualifies_rules() {
        let config = ZipfConfig::default();
        let band = ZipfBand::for_corpus_size(10_000, &config);
        assert!(qualifies(&record("balay", 5, 10_000, true), &band, &config));
        assert!(!qualifies(&record("balay", 5, 10_000, false), &band, &config));
        // Proper nouns pass unless the switch is on.
        assert!(qualifies(&record("Cebu", 5, 10_000, true), &band, &config));
        let strict = ZipfConfig {
            exclude_proper_nouns: true,
            ..ZipfConfig::default()
        };
        assert!(!qualifies(&record("Cebu", 5, 10_000, true), &band, &strict));
    }
}
