//! Delta-encoded posting lists over the VByte codec.
//!
//! A posting list holds `(doc_id, freq)` pairs sorted by doc id. On the
//! wire each pair becomes `VByte(doc_id - previous)` followed by
//! `VByte(freq)`, so dense lists cost little more than their
//! frequencies.

use crate::error::CodecError;
use crate::vbyte;

pub type DocId = u32;

/// One `(doc_id, frequency)` entry of a posting list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: DocId,
    pub freq: u32,
}

impl Posting {
    pub fn new(doc_id: DocId, freq: u32) -> Self {
        Self { doc_id, freq }
    }
}

/// Compress a posting list sorted by ascending doc id.
///
/// Fails with `UnsortedPostings` if a doc id goes backwards and with
/// `ZeroFrequency` on a frequency of zero. An empty list compresses to
/// an empty buffer.
pub fn compress(postings: &[Posting]) -> Result<Vec<u8>, CodecError> {
    if postings.is_empty() {
        return Ok(Vec::new());
    }

    let mut compressed = Vec::with_capacity(postings.len() * 3);
    let mut last_doc_id: DocId = 0;

    for posting in postings {
        if posting.doc_id < last_doc_id {
            return Err(CodecError::UnsortedPostings);
        }
        if posting.freq == 0 {
            return Err(CodecError::ZeroFrequency);
        }

        vbyte::encode(posting.doc_id - last_doc_id, &mut compressed);
        vbyte::encode(posting.freq, &mut compressed);
        last_doc_id = posting.doc_id;
    }

    Ok(compressed)
}

/// Decompress a buffer produced by [`compress`].
pub fn decompress(data: &[u8]) -> Result<Vec<Posting>, CodecError> {
    let mut postings = Vec::new();
    let mut offset = 0;
    let mut last_doc_id: DocId = 0;

    while offset < data.len() {
        let delta = vbyte::decode(data, &mut offset)?;
        let freq = vbyte::decode(data, &mut offset)?;
        last_doc_id = last_doc_id.wrapping_add(delta);
        postings.push(Posting::new(last_doc_id, freq));
    }

    Ok(postings)
}

/// Cheap integrity scan without materializing the list.
///
/// Rejects buffers with decode errors, zero frequencies, or doc ids
/// outside the plausible range `[0, 10^9]`.
pub fn validate(data: &[u8]) -> bool {
    const MAX_DOC_ID: u64 = 1_000_000_000;

    let mut offset = 0;
    let mut last_doc_id: u64 = 0;

    while offset < data.len() {
        let delta = match vbyte::decode(data, &mut offset) {
            Ok(v) => v,
            Err(_) => return false,
        };
        let freq = match vbyte::decode(data, &mut offset) {
            Ok(v) => v,
            Err(_) => return false,
        };

        if freq == 0 {
            return false;
        }

        last_doc_id += u64::from(delta);
        if last_doc_id > MAX_DOC_ID {
            return false;
        }
    }

    true
}

/// Predicted compressed size in bytes, without encoding.
pub fn estimate_size(postings: &[Posting]) -> usize {
    let mut total = 0;
    let mut last_doc_id: DocId = 0;

    for posting in postings {
        total += vbyte::size(posting.doc_id.wrapping_sub(last_doc_id));
        total += vbyte::size(posting.freq);
        last_doc_id = posting.doc_id;
    }

    total
}
