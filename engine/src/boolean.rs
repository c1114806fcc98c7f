//! Boolean query parsing and set evaluation.
//!
//! Query syntax is whitespace-separated `+required -excluded optional`
//! terms. Required terms intersect, optional terms union (and are only
//! consulted when no required terms exist), excluded terms subtract.
//! Candidate sets are ordered, so results come back in ascending doc id
//! order.

use std::collections::BTreeSet;

use tracing::warn;

use crate::index::InvertedIndex;
use crate::postings::{self, DocId};
use crate::tokenizer;

/// A parsed boolean query.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BooleanQuery {
    pub required: Vec<String>,
    pub excluded: Vec<String>,
    pub optional: Vec<String>,
}

impl BooleanQuery {
    /// Parse a raw query string.
    ///
    /// Each whitespace-separated word may carry a `+` or `-` prefix.
    /// The word body goes through the tokenizer; only its first token
    /// is kept, and words that tokenize to nothing are dropped.
    pub fn parse(query: &str) -> Self {
        let mut parsed = Self::default();

        for word in query.split_whitespace() {
            let (prefix, raw) = match word.as_bytes() {
                [b'+', ..] if word.len() > 1 => (Some('+'), &word[1..]),
                [b'-', ..] if word.len() > 1 => (Some('-'), &word[1..]),
                _ => (None, word),
            };

            let mut tokens = tokenizer::tokenize(raw.as_bytes());
            if tokens.is_empty() {
                continue;
            }
            let term = tokens.swap_remove(0);

            match prefix {
                Some('+') => parsed.required.push(term),
                Some('-') => parsed.excluded.push(term),
                _ => parsed.optional.push(term),
            }
        }

        parsed
    }

    pub fn has_required(&self) -> bool {
        !self.required.is_empty()
    }

    pub fn has_optional(&self) -> bool {
        !self.optional.is_empty()
    }
}

/// Doc ids whose posting list contains `term`.
///
/// A term missing from the index yields the empty set, as does a
/// posting list that fails to decompress (the list is dropped with a
/// warning).
pub fn docs_for_term(index: &InvertedIndex, term: &str) -> BTreeSet<DocId> {
    let Some(data) = index.get(term) else {
        return BTreeSet::new();
    };

    match postings::decompress(data) {
        Ok(postings) => postings.into_iter().map(|p| p.doc_id).collect(),
        Err(err) => {
            warn!(term, %err, "dropping undecodable posting list");
            BTreeSet::new()
        }
    }
}

/// Set-algebra part of boolean evaluation: intersection of required
/// terms (or union of optional terms when none are required), minus the
/// union of excluded terms. The caller layers the document
/// re-verification pass on top for required terms.
pub fn evaluate(index: &InvertedIndex, query: &BooleanQuery) -> BTreeSet<DocId> {
    let mut candidates = BTreeSet::new();
    let mut has_candidates = false;

    if query.has_required() {
        for term in &query.required {
            let term_docs = docs_for_term(index, term);
            if term_docs.is_empty() {
                return BTreeSet::new();
            }

            if !has_candidates {
                candidates = term_docs;
                has_candidates = true;
            } else {
                candidates = candidates.intersection(&term_docs).copied().collect();
            }

            if candidates.is_empty() {
                return BTreeSet::new();
            }
        }
    } else if query.has_optional() {
        for term in &query.optional {
            candidates.extend(docs_for_term(index, term));
        }
        has_candidates = true;
    }

    if !has_candidates {
        return BTreeSet::new();
    }

    if !query.excluded.is_empty() {
        let mut excluded_docs = BTreeSet::new();
        for term in &query.excluded {
            excluded_docs.extend(docs_for_term(index, term));
        }
        candidates = candidates.difference(&excluded_docs).copied().collect();
    }

    candidates
}
