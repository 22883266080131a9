//! Corpus Store - the immutable in-memory verse collection
//!
//! Verse order at load time is the permanent index used to align
//! embeddings and TF-IDF documents.

use flate2::read::GzDecoder;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::core::error::{RagError, RagResult};
use crate::core::reference::{normalize_book, parse_reference};
use crate::core::verse::Verse;

/// Wrapper produced by the precompute scripts: `{ "verses": [...], ... }`
#[derive(Deserialize)]
struct PrecomputedFile {
    verses: Vec<Verse>,
}

pub struct CorpusStore {
    verses: Vec<Verse>,
    by_reference: HashMap<String, usize>,
    source: Option<PathBuf>,
}

impl CorpusStore {
    /// Load the corpus from a JSON file (`.gz` means gzip-compressed).
    ///
    /// The file may hold a plain array of verses or a `{ "verses": [...] }`
    /// object. Any failure is fatal: a partial corpus would break index
    /// alignment.
    pub fn load(path: &Path) -> RagResult<Self> {
        if !path.exists() {
            return Err(RagError::CorpusMissing(path.to_path_buf()));
        }

        let content = read_text(path).map_err(|source| RagError::CorpusRead {
            path: path.to_path_buf(),
            source,
        })?;

        let verses = parse_verses(&content).map_err(|source| RagError::CorpusParse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut store = Self::from_verses(verses)?;
        store.source = Some(path.to_path_buf());

        tracing::info!(
            path = %path.display(),
            verses = store.len(),
            books = store.book_count(),
            "corpus loaded"
        );
        Ok(store)
    }

    /// Build a store from records already in memory, validating every verse.
    pub fn from_verses(verses: Vec<Verse>) -> RagResult<Self> {
        if verses.is_empty() {
            return Err(RagError::EmptyCorpus);
        }

        let mut by_reference = HashMap::with_capacity(verses.len());
        for (index, verse) in verses.iter().enumerate() {
            verse
                .check()
                .map_err(|reason| RagError::InvalidVerse { index, reason })?;

            if by_reference
                .insert(verse.reference.to_lowercase(), index)
                .is_some()
            {
                return Err(RagError::DuplicateReference {
                    index,
                    reference: verse.reference.clone(),
                });
            }
        }

        Ok(Self {
            verses,
            by_reference,
            source: None,
        })
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    /// All verses in index order
    pub fn verses(&self) -> &[Verse] {
        &self.verses
    }

    pub fn get(&self, index: usize) -> Option<&Verse> {
        self.verses.get(index)
    }

    /// File the corpus was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn book_count(&self) -> usize {
        self.verses
            .iter()
            .map(|v| v.book.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Index of a verse by reference (case-insensitive exact match)
    pub fn position(&self, reference: &str) -> Option<usize> {
        self.by_reference.get(&reference.trim().to_lowercase()).copied()
    }

    /// Verse by canonical reference, case-insensitive
    pub fn get_by_reference(&self, reference: &str) -> Option<&Verse> {
        self.position(reference).map(|i| &self.verses[i])
    }

    /// Verses for the given references, in input order. Unknown references are skipped.
    pub fn get_many_by_references<S: AsRef<str>>(&self, references: &[S]) -> Vec<&Verse> {
        references
            .iter()
            .filter_map(|r| self.get_by_reference(r.as_ref()))
            .collect()
    }

    /// Every verse of a chapter, in verse order. Book abbreviations are accepted.
    pub fn get_chapter(&self, book: &str, chapter: u32) -> Vec<&Verse> {
        let book = normalize_book(book).unwrap_or(book);
        let mut verses: Vec<&Verse> = self
            .verses
            .iter()
            .filter(|v| v.chapter == chapter && v.book.eq_ignore_ascii_case(book))
            .collect();
        verses.sort_by_key(|v| v.verse);
        verses
    }

    /// Verses named by a reference string such as `Rom 6:23` or `1 Cor 13:4-7`.
    /// Unparseable input yields an empty list.
    ///
    /// Work is bounded by the chapter size, not by the requested span.
    pub fn get_range(&self, text: &str) -> Vec<&Verse> {
        let Some(parsed) = parse_reference(text) else {
            return Vec::new();
        };

        let span = parsed.start_verse..=parsed.last_verse();
        self.get_chapter(parsed.book, parsed.chapter)
            .into_iter()
            .filter(|v| span.contains(&v.verse))
            .collect()
    }
}

fn read_text(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    let is_gzip = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);

    if is_gzip {
        let mut content = String::new();
        GzDecoder::new(bytes.as_slice()).read_to_string(&mut content)?;
        Ok(content)
    } else {
        String::from_utf8(bytes)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

fn parse_verses(content: &str) -> serde_json::Result<Vec<Verse>> {
    if content.trim_start().starts_with('[') {
        serde_json::from_str(content)
    } else {
        serde_json::from_str::<PrecomputedFile>(content).map(|file| file.verses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::fixtures::{sample_store, sample_verses, write_sample_corpus};
    use anyhow::Result;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_load_plain_json() -> Result<()> {
        let dir = TempDir::new()?;
        let path = write_sample_corpus(dir.path())?;

        let store = CorpusStore::load(&path)?;
        assert_eq!(store.len(), sample_verses().len());
        assert_eq!(store.source(), Some(path.as_path()));
        Ok(())
    }

    #[test]
    fn test_load_gzip_wrapper() -> Result<()> {
        let dir = TempDir::new()?;
        let wrapper = serde_json::json!({
            "verses": sample_verses(),
            "metadata": { "totalVerses": sample_verses().len() }
        });
        let path = dir.path().join("bible-precomputed.json.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(wrapper.to_string().as_bytes())?;
        std::fs::write(&path, encoder.finish()?)?;

        let store = CorpusStore::load(&path)?;
        assert_eq!(store.len(), sample_verses().len());
        Ok(())
    }

    #[test]
    fn test_load_missing_is_fatal() {
        let err = CorpusStore::load(Path::new("/nonexistent/bible.json")).err();
        assert!(matches!(err, Some(RagError::CorpusMissing(_))));
    }

    #[test]
    fn test_load_malformed_is_fatal() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("bible.json");
        std::fs::write(&path, r#"[{"book": "John", "chapter": 3}]"#)?;
        assert!(matches!(
            CorpusStore::load(&path),
            Err(RagError::CorpusParse { .. })
        ));

        std::fs::write(&path, "[]")?;
        assert!(matches!(CorpusStore::load(&path), Err(RagError::EmptyCorpus)));
        Ok(())
    }

    #[test]
    fn test_rejects_inconsistent_records() {
        let mut verses = sample_verses();
        verses[1].reference = "Romans 9:99".to_string();
        assert!(matches!(
            CorpusStore::from_verses(verses),
            Err(RagError::InvalidVerse { index: 1, .. })
        ));

        let mut verses = sample_verses();
        let dup = verses[0].clone();
        verses.push(dup);
        assert!(matches!(
            CorpusStore::from_verses(verses),
            Err(RagError::DuplicateReference { .. })
        ));
    }

    #[test]
    fn test_reference_round_trip() {
        let store = sample_store();
        for verse in store.verses() {
            assert_eq!(
                verse.reference,
                format!("{} {}:{}", verse.book, verse.chapter, verse.verse)
            );
            assert_eq!(store.get_by_reference(&verse.reference), Some(verse));
        }
    }

    #[test]
    fn test_get_by_reference_case_insensitive() {
        let store = sample_store();
        let verse = store.get_by_reference("romans 3:23").unwrap();
        assert_eq!(verse.reference, "Romans 3:23");
        assert!(store.get_by_reference("ROMANS 3:23").is_some());
        assert!(store.get_by_reference("Romans 3:99").is_none());
        assert!(store.get_by_reference("").is_none());
    }

    #[test]
    fn test_get_many_preserves_order_and_skips_unknown() {
        let store = sample_store();
        let verses =
            store.get_many_by_references(&["Romans 3:23", "NoSuchBook 1:1", "Romans 6:23"]);
        let refs: Vec<&str> = verses.iter().map(|v| v.reference.as_str()).collect();
        assert_eq!(refs, vec!["Romans 3:23", "Romans 6:23"]);

        let verses = store.get_many_by_references(&["Romans 6:23", "Romans 3:23"]);
        assert_eq!(verses[0].reference, "Romans 6:23");
        assert!(store.get_many_by_references::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_get_chapter_and_range() {
        let store = sample_store();

        let chapter = store.get_chapter("Matt", 6);
        let numbers: Vec<u32> = chapter.iter().map(|v| v.verse).collect();
        assert_eq!(numbers, vec![19, 20, 21, 24]);

        let range = store.get_range("Matthew 6:19-21");
        assert_eq!(range.len(), 3);
        assert_eq!(range[0].reference, "Matthew 6:19");

        let single = store.get_range("Rom 3:23");
        assert_eq!(single.len(), 1);

        assert!(store.get_range("not a reference").is_empty());
        assert!(store.get_chapter("Nowhere", 1).is_empty());
    }

    #[test]
    fn test_range_with_huge_end_verse() {
        let store = sample_store();
        let started = std::time::Instant::now();

        let range = store.get_range("Romans 3:23-4294967295");
        let refs: Vec<&str> = range.iter().map(|v| v.reference.as_str()).collect();
        assert_eq!(refs, vec!["Romans 3:23"]);

        let tail = store.get_range("Matthew 6:20-4000000000");
        let numbers: Vec<u32> = tail.iter().map(|v| v.verse).collect();
        assert_eq!(numbers, vec![20, 21, 24]);

        assert!(started.elapsed() < std::time::Duration::from_secs(1));
    }

    #[test]
    fn test_book_count() {
        let store = sample_store();
        assert!(store.book_count() >= 8);
    }
}
