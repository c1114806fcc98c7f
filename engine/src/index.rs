use std::collections::{BTreeMap, HashMap};

use crate::postings::DocId;
use crate::tokenizer;

/// In-memory inverted index: lowercased term to compressed posting-list
/// bytes. Key order is not observable; lookups and insertions go through
/// the standard hash map.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    terms: HashMap<String, Vec<u8>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, term: String, compressed: Vec<u8>) {
        self.terms.insert(term, compressed);
    }

    pub fn get(&self, term: &str) -> Option<&[u8]> {
        self.terms.get(term).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.terms.iter().map(|(term, data)| (term.as_str(), data.as_slice()))
    }
}

/// Per-document output of the indexing scan.
#[derive(Debug)]
pub struct DocumentStats {
    pub doc_id: DocId,
    pub filename: String,
    /// Total token count including repeats.
    pub word_count: u32,
    pub term_frequencies: BTreeMap<String, u32>,
}

/// Tokenize one document and count its term frequencies.
///
/// When a lemma dictionary is supplied, each token is replaced by its
/// dictionary image before counting; tokens without an entry pass
/// through.
pub fn scan_document(
    doc_id: DocId,
    filename: String,
    content: &[u8],
    lemmas: Option<&HashMap<String, String>>,
) -> DocumentStats {
    let tokens = tokenizer::tokenize(content);
    let word_count = tokens.len() as u32;

    let mut term_frequencies: BTreeMap<String, u32> = BTreeMap::new();
    for token in tokens {
        let term = match lemmas.and_then(|map| map.get(&token)) {
            Some(lemma) => lemma.clone(),
            None => token,
        };
        *term_frequencies.entry(term).or_insert(0) += 1;
    }

    DocumentStats {
        doc_id,
        filename,
        word_count,
        term_frequencies,
    }
}
