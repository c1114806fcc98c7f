//! Term-frequency statistics for Zipf's-law reporting.

use tracing::warn;

use crate::index::InvertedIndex;
use crate::postings;

/// Aggregate frequencies for one term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermStatistics {
    pub term: String,
    /// Sum of frequencies across all documents.
    pub total_frequency: u64,
    /// Number of documents the term appears in.
    pub document_frequency: usize,
}

/// Decompress every posting list once and aggregate per-term counts,
/// sorted by total frequency descending (ties by term, for stable
/// output). Undecodable posting lists are dropped with a warning.
pub fn term_statistics(index: &InvertedIndex) -> Vec<TermStatistics> {
    let mut stats: Vec<TermStatistics> = Vec::with_capacity(index.len());

    for (term, data) in index.iter() {
        let postings = match postings::decompress(data) {
            Ok(postings) => postings,
            Err(err) => {
                warn!(term, %err, "dropping undecodable posting list");
                continue;
            }
        };

        stats.push(TermStatistics {
            term: term.to_string(),
            total_frequency: postings.iter().map(|p| u64::from(p.freq)).sum(),
            document_frequency: postings.len(),
        });
    }

    stats.sort_by(|a, b| {
        b.total_frequency
            .cmp(&a.total_frequency)
            .then_with(|| a.term.cmp(&b.term))
    });
    stats
}
