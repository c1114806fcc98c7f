//! Full-text search engine core: UTF-8 tokenization, VByte-compressed
//! posting lists, a binary inverted-index format, boolean retrieval and
//! TF-IDF ranking over a local corpus of text files.

pub mod boolean;
pub mod engine;
pub mod error;
pub mod index;
pub mod persist;
pub mod postings;
pub mod tfidf;
pub mod tokenizer;
pub mod utf8;
pub mod vbyte;
pub mod zipf;

pub use engine::{Config, SearchEngine};
pub use error::CodecError;
pub use index::InvertedIndex;
pub use postings::{DocId, Posting};
pub use tfidf::ScoredDocument;
pub use zipf::TermStatistics;
