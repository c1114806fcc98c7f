//! TF-IDF scoring and ranking.
//!
//! `tf = termFreq / docLength`, `idf = ln(N / df)`. Scores accumulate
//! per document across query terms; documents below the minimum score
//! are cut, the rest sort descending. The score map is ordered by doc
//! id and the sort is stable, so equal scores rank by ascending doc id.

use std::collections::BTreeMap;

use tracing::warn;

use crate::index::InvertedIndex;
use crate::postings::{self, DocId};

/// A document together with its accumulated query score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub doc_id: DocId,
    pub score: f64,
}

/// Accumulate TF-IDF scores for `query_terms` over the index.
///
/// Terms absent from the index contribute nothing, as do documents
/// without a known (non-zero) length. A posting list that fails to
/// decompress is dropped with a warning.
pub fn calculate_scores(
    index: &InvertedIndex,
    doc_lengths: &BTreeMap<DocId, u32>,
    total_docs: u64,
    query_terms: &[String],
) -> BTreeMap<DocId, f64> {
    let mut scores: BTreeMap<DocId, f64> = BTreeMap::new();

    for term in query_terms {
        let Some(data) = index.get(term) else {
            continue;
        };

        let postings = match postings::decompress(data) {
            Ok(postings) => postings,
            Err(err) => {
                warn!(term = %term, %err, "dropping undecodable posting list");
                continue;
            }
        };
        if postings.is_empty() {
            continue;
        }

        let idf = (total_docs as f64 / postings.len() as f64).ln();

        for posting in postings {
            let Some(&length) = doc_lengths.get(&posting.doc_id) else {
                continue;
            };
            if length == 0 {
                continue;
            }

            let tf = f64::from(posting.freq) / f64::from(length);
            *scores.entry(posting.doc_id).or_insert(0.0) += tf * idf;
        }
    }

    scores
}

/// Cut scores below `min_score` and sort the rest descending.
pub fn rank(scores: &BTreeMap<DocId, f64>, min_score: f64) -> Vec<ScoredDocument> {
    let mut results: Vec<ScoredDocument> = scores
        .iter()
        .filter(|&(_, &score)| score >= min_score)
        .map(|(&doc_id, &score)| ScoredDocument { doc_id, score })
        .collect();

    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results
}
