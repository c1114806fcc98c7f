//! On-disk index format.
//!
//! The inverted index is a headerless concatenation of frames, each
//! `u32-LE term length, term bytes, u32-LE payload length, payload`.
//! Document lengths, names and urls are whitespace text sidecars, one
//! `id value` line per document. The lemma dictionary is a stream of
//! whitespace-separated `key value` word pairs.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use crate::index::InvertedIndex;
use crate::postings::DocId;
use crate::tokenizer;

pub fn save_inverted_index(path: &Path, index: &InvertedIndex) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create inverted index file {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    for (term, data) in index.iter() {
        writer.write_all(&(term.len() as u32).to_le_bytes())?;
        writer.write_all(term.as_bytes())?;
        writer.write_all(&(data.len() as u32).to_le_bytes())?;
        writer.write_all(data)?;
    }

    writer.flush()?;
    Ok(())
}

pub fn load_inverted_index(path: &Path) -> Result<InvertedIndex> {
    let file = File::open(path)
        .with_context(|| format!("cannot open inverted index file {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut index = InvertedIndex::new();

    loop {
        match read_frame(&mut reader) {
            Ok(Some((term, payload))) => index.insert(term, payload),
            Ok(None) => break,
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                warn!(path = %path.display(), "truncated frame at end of inverted index; keeping {} terms", index.len());
                break;
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("error reading inverted index {}", path.display()));
            }
        }
    }

    Ok(index)
}

/// Read one frame; `Ok(None)` means clean end of file at a frame
/// boundary, `UnexpectedEof` means the file ends mid-frame.
fn read_frame<R: Read>(reader: &mut R) -> io::Result<Option<(String, Vec<u8>)>> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(err) => return Err(err),
    }

    let term_len = u32::from_le_bytes(len_buf) as usize;
    let mut term_bytes = vec![0u8; term_len];
    reader.read_exact(&mut term_bytes)?;

    reader.read_exact(&mut len_buf)?;
    let payload_len = u32::from_le_bytes(len_buf) as usize;
    let mut payload = vec![0u8; payload_len];
    reader.read_exact(&mut payload)?;

    let term = String::from_utf8_lossy(&term_bytes).into_owned();
    Ok(Some((term, payload)))
}

pub fn save_doc_lengths(path: &Path, lengths: &BTreeMap<DocId, u32>) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for (id, length) in lengths {
        writeln!(writer, "{id} {length}")?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_doc_lengths(path: &Path) -> Result<BTreeMap<DocId, u32>> {
    let file = File::open(path)
        .with_context(|| format!("cannot open document lengths file {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut lengths = BTreeMap::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        match (
            fields.next().and_then(|s| s.parse::<DocId>().ok()),
            fields.next().and_then(|s| s.parse::<u32>().ok()),
        ) {
            (Some(id), Some(length)) => {
                lengths.insert(id, length);
            }
            _ => warn!(path = %path.display(), line = %line, "skipping unparseable length line"),
        }
    }

    Ok(lengths)
}

pub fn save_doc_names(path: &Path, names: &BTreeMap<DocId, String>) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for (id, name) in names {
        writeln!(writer, "{id} {name}")?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_doc_names(path: &Path) -> Result<BTreeMap<DocId, String>> {
    load_id_string_file(path, "name")
}

pub fn load_doc_urls(path: &Path) -> Result<BTreeMap<DocId, String>> {
    load_id_string_file(path, "url")
}

/// Sidecar of `id value` lines where the value may contain spaces and
/// runs to end of line after a leading-whitespace trim. Empty lines are
/// skipped; unparseable lines are warned and skipped.
fn load_id_string_file(path: &Path, what: &str) -> Result<BTreeMap<DocId, String>> {
    let file =
        File::open(path).with_context(|| format!("cannot open {what} file {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut map = BTreeMap::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let trimmed = line.trim_start();
        let parsed = trimmed
            .split_once(char::is_whitespace)
            .and_then(|(id, rest)| Some((id.parse::<DocId>().ok()?, rest.trim_start())));
        match parsed {
            Some((id, value)) if !value.is_empty() => {
                map.insert(id, value.to_string());
            }
            _ => warn!(path = %path.display(), line = %line, "skipping unparseable {what} line"),
        }
    }

    Ok(map)
}

/// Load the lemma dictionary: a whitespace-separated stream of
/// `key value` word pairs, both lowercased on the way in. A trailing
/// key without a value is ignored.
pub fn load_lemmas(path: &Path) -> Result<HashMap<String, String>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("cannot open lemma dictionary {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);

    let mut lemmas = HashMap::new();
    let mut words = text.split_whitespace();
    while let (Some(key), Some(value)) = (words.next(), words.next()) {
        lemmas.insert(lower(key), lower(value));
    }

    Ok(lemmas)
}

fn lower(word: &str) -> String {
    String::from_utf8_lossy(&tokenizer::to_lower_case(word.as_bytes())).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::postings::{self, Posting};
    use std::fs;

    #[test]
    fn inverted_index_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inverted_index.bin");

        let mut index = InvertedIndex::new();
        let cat = postings::compress(&[Posting::new(1, 2), Posting::new(4, 1)]).unwrap();
        let empty: Vec<u8> = Vec::new();
        index.insert("cat".to_string(), cat.clone());
        index.insert("пёс".to_string(), empty);

        save_inverted_index(&path, &index).unwrap();
        let loaded = load_inverted_index(&path).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("cat"), Some(cat.as_slice()));
        assert_eq!(loaded.get("пёс"), Some(&[] as &[u8]));
    }

    #[test]
    fn truncated_trailing_frame_keeps_earlier_terms() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inverted_index.bin");

        let mut index = InvertedIndex::new();
        index.insert("cat".to_string(), vec![0x81, 0x81]);
        save_inverted_index(&path, &index).unwrap();

        // append a frame header that promises more bytes than exist
        let mut bytes = fs::read(&path).unwrap();
        bytes.extend_from_slice(&10u32.to_le_bytes());
        bytes.extend_from_slice(b"dog");
        fs::write(&path, &bytes).unwrap();

        let loaded = load_inverted_index(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.get("cat").is_some());
    }

    #[test]
    fn missing_index_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_inverted_index(&dir.path().join("nope.bin")).is_err());
    }

    #[test]
    fn lengths_round_trip_and_skip_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc_lengths.txt");

        let mut lengths = BTreeMap::new();
        lengths.insert(1, 2);
        lengths.insert(2, 3);
        save_doc_lengths(&path, &lengths).unwrap();
        assert_eq!(load_doc_lengths(&path).unwrap(), lengths);

        fs::write(&path, "1 2\nbogus line\n2 3\n\n3 zzz\n").unwrap();
        assert_eq!(load_doc_lengths(&path).unwrap(), lengths);
    }

    #[test]
    fn names_keep_spaces_after_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc_names.txt");
        fs::write(&path, "1 plain.txt\n2   spaced out name.txt\n\nnot a line\n").unwrap();

        let names = load_doc_names(&path).unwrap();
        assert_eq!(names.get(&1).map(String::as_str), Some("plain.txt"));
        assert_eq!(names.get(&2).map(String::as_str), Some("spaced out name.txt"));
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn lemmas_lowercase_both_sides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lemmas.txt");
        fs::write(&path, "Cats CAT\nСОБАКИ Собака\nodd").unwrap();

        let lemmas = load_lemmas(&path).unwrap();
        assert_eq!(lemmas.get("cats").map(String::as_str), Some("cat"));
        assert_eq!(lemmas.get("собаки").map(String::as_str), Some("собака"));
        assert_eq!(lemmas.len(), 2);
    }
}
