//! Search engine orchestration: configuration, index build / save /
//! load, and the two query front ends.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::boolean::{self, BooleanQuery};
use crate::index::{self, InvertedIndex};
use crate::persist;
use crate::postings::{self, DocId, Posting};
use crate::tfidf::{self, ScoredDocument};
use crate::tokenizer;
use crate::zipf::{self, TermStatistics};

/// Engine configuration: where everything lives plus tuning knobs.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub dict_path: PathBuf,
    pub inv_index_path: PathBuf,
    pub doc_names_path: PathBuf,
    pub doc_lengths_path: PathBuf,
    pub doc_urls_path: PathBuf,

    /// Documents scoring below this are cut from TF-IDF results.
    pub min_tfidf_score: f64,
    /// Number of ranked results to show.
    pub top_k_results: usize,
    /// Number of terms in the Zipf report.
    pub zipf_top_terms: usize,
    /// Substitute tokens with their lemma dictionary image at index and
    /// query time. Off by default: the dictionary is loaded either way
    /// but only consulted when this is set.
    pub apply_lemmas: bool,
}

impl Config {
    /// Derive every path from a single configuration root directory.
    pub fn from_root<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self::with_paths(
            root.join("dataset_txt"),
            root.join("resources").join("lemmas.txt"),
            root,
        )
    }

    /// Explicit corpus directory and dictionary path, with index files
    /// under `index_dir`.
    pub fn with_paths<P: AsRef<Path>>(data_dir: PathBuf, dict_path: PathBuf, index_dir: P) -> Self {
        let index_dir = index_dir.as_ref();
        Self {
            data_dir,
            dict_path,
            inv_index_path: index_dir.join("inverted_index.bin"),
            doc_names_path: index_dir.join("doc_names.txt"),
            doc_lengths_path: index_dir.join("doc_lengths.txt"),
            doc_urls_path: index_dir.join("urls.txt"),
            min_tfidf_score: 0.05,
            top_k_results: 10,
            zipf_top_terms: 15,
            apply_lemmas: false,
        }
    }
}

/// The engine itself: owns the configuration, the lemma dictionary and
/// the loaded index. Built once, then queried; nothing here is shared
/// across threads.
pub struct SearchEngine {
    config: Config,
    lemmas: HashMap<String, String>,
    index: InvertedIndex,
    doc_names: BTreeMap<DocId, String>,
    doc_lengths: BTreeMap<DocId, u32>,
    doc_urls: BTreeMap<DocId, String>,
    total_docs: u64,
}

impl SearchEngine {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            lemmas: HashMap::new(),
            index: InvertedIndex::new(),
            doc_names: BTreeMap::new(),
            doc_lengths: BTreeMap::new(),
            doc_urls: BTreeMap::new(),
            total_docs: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the lemma dictionary (required, must be non-empty) and the
    /// optional url sidecar. The engine refuses to run without a
    /// dictionary.
    pub fn initialize(&mut self) -> Result<()> {
        self.lemmas = persist::load_lemmas(&self.config.dict_path)
            .context("failed to load lemma dictionary")?;
        if self.lemmas.is_empty() {
            bail!(
                "lemma dictionary {} is empty",
                self.config.dict_path.display()
            );
        }
        info!(lemmas = self.lemmas.len(), "dictionary loaded");

        match persist::load_doc_urls(&self.config.doc_urls_path) {
            Ok(urls) if !urls.is_empty() => self.doc_urls = urls,
            Ok(_) => warn!(
                path = %self.config.doc_urls_path.display(),
                "no document urls loaded"
            ),
            Err(err) => warn!(%err, "failed to load document urls"),
        }

        Ok(())
    }

    /// True once an index is in memory, either built or loaded.
    pub fn has_index(&self) -> bool {
        !self.index.is_empty()
    }

    pub fn total_docs(&self) -> u64 {
        self.total_docs
    }

    pub fn unique_terms(&self) -> usize {
        self.index.len()
    }

    /// Rebuild the index from the corpus directory.
    ///
    /// `.txt` files at the top level of the data directory are indexed
    /// in ascending filename order, receiving doc ids from 1. All
    /// in-memory index state is replaced.
    pub fn index_documents(&mut self) -> Result<()> {
        let data_dir = self.config.data_dir.clone();
        info!(dir = %data_dir.display(), "scanning corpus directory");

        if !data_dir.is_dir() {
            bail!("data directory does not exist: {}", data_dir.display());
        }

        self.index = InvertedIndex::new();
        self.doc_names = BTreeMap::new();
        self.doc_lengths = BTreeMap::new();
        self.total_docs = 0;

        let mut files: Vec<PathBuf> = WalkDir::new(&data_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("txt"))
            .collect();
        files.sort();

        let lemmas = self.config.apply_lemmas.then_some(&self.lemmas);
        let mut accumulator: BTreeMap<String, Vec<Posting>> = BTreeMap::new();
        let mut doc_id: DocId = 0;

        for path in &files {
            doc_id += 1;
            if doc_id % 100 == 0 {
                debug!(processed = doc_id, "indexing progress");
            }

            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let content = match fs::read(path) {
                Ok(bytes) => bytes,
                Err(err) => {
                    warn!(path = %path.display(), %err, "cannot read file; indexing as empty");
                    Vec::new()
                }
            };

            let stats = index::scan_document(doc_id, filename, &content, lemmas);
            self.doc_names.insert(doc_id, stats.filename);
            self.doc_lengths.insert(doc_id, stats.word_count);
            for (term, freq) in stats.term_frequencies {
                accumulator
                    .entry(term)
                    .or_default()
                    .push(Posting::new(doc_id, freq));
            }
        }

        self.total_docs = u64::from(doc_id);
        info!(documents = self.total_docs, "building inverted index");

        let mut compressed_terms = 0usize;
        for (term, mut list) in accumulator {
            list.sort_by_key(|posting| posting.doc_id);
            let compressed = postings::compress(&list)
                .with_context(|| format!("invalid posting list for term '{term}'"))?;
            self.index.insert(term, compressed);

            compressed_terms += 1;
            if compressed_terms % 1000 == 0 {
                debug!(compressed_terms, "compression progress");
            }
        }

        info!(
            documents = self.total_docs,
            unique_terms = self.index.len(),
            "indexing completed"
        );
        Ok(())
    }

    /// Write the binary index plus the length and name sidecars.
    ///
    /// A failure on the inverted index itself is an error; sidecar
    /// failures are warned and the rest are still attempted.
    pub fn save_index(&self) -> Result<()> {
        persist::save_inverted_index(&self.config.inv_index_path, &self.index)?;
        info!(path = %self.config.inv_index_path.display(), "inverted index saved");

        match persist::save_doc_lengths(&self.config.doc_lengths_path, &self.doc_lengths) {
            Ok(()) => info!(path = %self.config.doc_lengths_path.display(), "document lengths saved"),
            Err(err) => warn!(%err, "cannot save document lengths"),
        }

        match persist::save_doc_names(&self.config.doc_names_path, &self.doc_names) {
            Ok(()) => info!(path = %self.config.doc_names_path.display(), "document names saved"),
            Err(err) => warn!(%err, "cannot save document names"),
        }

        Ok(())
    }

    /// Load the binary index and its sidecars. The lengths sidecar is
    /// mandatory; missing names are only warned.
    pub fn load_index(&mut self) -> Result<()> {
        self.index = persist::load_inverted_index(&self.config.inv_index_path)?;
        info!(terms = self.index.len(), "inverted index loaded");

        self.doc_lengths = persist::load_doc_lengths(&self.config.doc_lengths_path)?;

        match persist::load_doc_names(&self.config.doc_names_path) {
            Ok(names) => self.doc_names = names,
            Err(err) => warn!(%err, "cannot load document names"),
        }

        self.total_docs = self.doc_lengths.len() as u64;
        info!(documents = self.total_docs, "index loaded");
        Ok(())
    }

    /// Evaluate a boolean query and return matching doc ids ascending.
    ///
    /// When the query has required terms, every surviving candidate is
    /// re-verified by reading its source document and checking each
    /// required term as a substring of the lowercased text; documents
    /// that cannot be read are dropped.
    pub fn boolean_search(&self, query_str: &str) -> Vec<DocId> {
        let mut query = BooleanQuery::parse(query_str);
        self.apply_lemmas_to(&mut query.required);
        self.apply_lemmas_to(&mut query.excluded);
        self.apply_lemmas_to(&mut query.optional);

        let candidates = boolean::evaluate(&self.index, &query);

        if query.has_required() {
            candidates
                .into_iter()
                .filter(|&doc_id| self.verify_required_terms(doc_id, &query.required))
                .collect()
        } else {
            candidates.into_iter().collect()
        }
    }

    /// Score and rank documents for a free-text query. Results carry
    /// every document above the configured cutoff, best first; callers
    /// display the leading `top_k_results`.
    pub fn tfidf_search(&self, query_str: &str) -> Vec<ScoredDocument> {
        let mut terms = tokenizer::tokenize(query_str.as_bytes());
        self.apply_lemmas_to(&mut terms);

        let scores =
            tfidf::calculate_scores(&self.index, &self.doc_lengths, self.total_docs, &terms);
        tfidf::rank(&scores, self.config.min_tfidf_score)
    }

    /// Per-term frequency statistics, most frequent first.
    pub fn term_statistics(&self) -> Vec<TermStatistics> {
        zipf::term_statistics(&self.index)
    }

    /// Display string for a document: url, else filename, else a
    /// `[doc_N]` placeholder.
    pub fn document_url(&self, doc_id: DocId) -> String {
        if let Some(url) = self.doc_urls.get(&doc_id) {
            return url.clone();
        }
        if let Some(name) = self.doc_names.get(&doc_id) {
            return name.clone();
        }
        format!("[doc_{doc_id}]")
    }

    fn document_path(&self, doc_id: DocId) -> PathBuf {
        match self.doc_names.get(&doc_id) {
            Some(name) => self.config.data_dir.join(name),
            None => self.config.data_dir.join(format!("{doc_id}.txt")),
        }
    }

    fn verify_required_terms(&self, doc_id: DocId, terms: &[String]) -> bool {
        let path = self.document_path(doc_id);
        let content = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };
        if content.is_empty() {
            return false;
        }

        let lowered = tokenizer::to_lower_case(&content);
        terms
            .iter()
            .all(|term| contains_subslice(&lowered, term.as_bytes()))
    }

    fn apply_lemmas_to(&self, terms: &mut [String]) {
        if !self.config.apply_lemmas {
            return;
        }
        for term in terms {
            if let Some(lemma) = self.lemmas.get(term) {
                *term = lemma.clone();
            }
        }
    }
}

fn contains_subslice(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|window| window == needle)
}
