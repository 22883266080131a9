//! Retrieval engine - the service object callers hold
//!
//! Construction loads the corpus (fatal on failure). The TF-IDF index and
//! the embedding table are built once, on `initialize()` or lazily on the
//! first search, behind a `OnceLock` so concurrent first callers never
//! build twice.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Instant;

use super::embedder::{Embedder, HashEmbedder};
use super::hybrid::{HybridRanker, SearchMode, SearchResult};
use super::tfidf::TfIdfIndex;
use super::topic::expand_topic;
use crate::core::config::{Config, SearchConfig};
use crate::core::error::RagResult;
use crate::core::verse::Verse;
use crate::corpus::artifact::{read_artifact, write_artifact, ArtifactError, EmbeddingTable};
use crate::corpus::store::CorpusStore;

/// Per-call overrides for `BibleRag::search`
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub semantic_weight: Option<f32>,
    pub expanded_terms: Vec<String>,
}

/// Where the verse embeddings came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingSource {
    Artifact,
    Recomputed,
}

/// Engine statistics
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub verses: usize,
    pub books: usize,
    pub ready: bool,
    pub embedder: String,
    pub dimension: usize,
    pub embedding_source: Option<EmbeddingSource>,
    pub vocabulary_size: Option<usize>,
    pub corpus_path: Option<PathBuf>,
}

struct Indexes {
    lexical: TfIdfIndex,
    embeddings: EmbeddingTable,
    source: EmbeddingSource,
}

/// Hybrid retrieval engine over the verse corpus
pub struct BibleRag {
    store: CorpusStore,
    config: SearchConfig,
    embedder: Box<dyn Embedder>,
    artifact_path: Option<PathBuf>,
    indexes: OnceLock<Indexes>,
}

impl BibleRag {
    /// Load the corpus named by `config`, resolved against `root`.
    pub fn load(config: &Config, root: &Path) -> RagResult<Self> {
        let paths = config.resolve_paths(root);
        let store = CorpusStore::load(&paths.verses)?;

        let mut engine = Self::from_store(store, config.search.clone());
        engine.artifact_path = paths.embeddings;
        Ok(engine)
    }

    /// Engine over an already-loaded corpus, with embeddings computed on init
    pub fn from_store(store: CorpusStore, config: SearchConfig) -> Self {
        Self {
            store,
            config,
            embedder: Box::new(HashEmbedder::new()),
            artifact_path: None,
            indexes: OnceLock::new(),
        }
    }

    /// Read embeddings from a precomputed artifact when it matches the corpus
    pub fn with_artifact(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifact_path = Some(path.into());
        self
    }

    /// Build the indexes now. Later calls are no-ops.
    pub fn initialize(&self) {
        self.indexes();
    }

    pub fn is_ready(&self) -> bool {
        self.indexes.get().is_some()
    }

    pub fn store(&self) -> &CorpusStore {
        &self.store
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    fn indexes(&self) -> &Indexes {
        self.indexes.get_or_init(|| self.build_indexes())
    }

    fn build_indexes(&self) -> Indexes {
        let start = Instant::now();
        let verses = self.store.verses();

        let (lexical, (embeddings, source)) = rayon::join(
            || TfIdfIndex::build(verses.iter().map(|v| v.text.as_str())),
            || self.load_embeddings(),
        );

        tracing::info!(
            documents = lexical.doc_count(),
            vocabulary = lexical.vocabulary_size(),
            embeddings = ?source,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "indexes built"
        );

        Indexes {
            lexical,
            embeddings,
            source,
        }
    }

    fn load_embeddings(&self) -> (EmbeddingTable, EmbeddingSource) {
        let verses = self.store.verses();

        if let Some(path) = &self.artifact_path {
            match read_artifact(path, self.embedder.as_ref(), verses) {
                Ok(table) => return (table, EmbeddingSource::Artifact),
                Err(ArtifactError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "no embedding artifact, recomputing");
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        "ignoring embedding artifact, recomputing: {}",
                        e
                    );
                }
            }
        }

        (
            EmbeddingTable::compute(self.embedder.as_ref(), verses),
            EmbeddingSource::Recomputed,
        )
    }

    fn ranker(&self) -> HybridRanker<'_> {
        let indexes = self.indexes();
        HybridRanker::new(
            self.store.verses(),
            &indexes.lexical,
            &indexes.embeddings,
            self.embedder.as_ref(),
            &self.config,
        )
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Hybrid search. Returns at most `top_k` results, never an error.
    pub fn search(&self, query: &str, top_k: usize, options: &SearchOptions) -> Vec<SearchResult> {
        self.ranker().search(
            query,
            top_k,
            options.semantic_weight,
            &options.expanded_terms,
        )
    }

    pub fn search_mode(&self, query: &str, top_k: usize, mode: SearchMode) -> Vec<SearchResult> {
        self.ranker().search_mode(query, top_k, mode)
    }

    /// Hybrid search over the curated expansion of `topic`
    pub fn search_by_topic(&self, topic: &str, top_k: usize) -> Vec<SearchResult> {
        let query = expand_topic(topic);
        tracing::debug!(topic, query, "topic search");
        self.search(query, top_k, &SearchOptions::default())
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn get_verse_by_reference(&self, reference: &str) -> Option<&Verse> {
        self.store.get_by_reference(reference)
    }

    pub fn get_verses_by_references<S: AsRef<str>>(&self, references: &[S]) -> Vec<&Verse> {
        self.store.get_many_by_references(references)
    }

    pub fn get_chapter(&self, book: &str, chapter: u32) -> Vec<&Verse> {
        self.store.get_chapter(book, chapter)
    }

    pub fn get_range(&self, reference: &str) -> Vec<&Verse> {
        self.store.get_range(reference)
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    pub fn status(&self) -> EngineStatus {
        let indexes = self.indexes.get();
        EngineStatus {
            verses: self.store.len(),
            books: self.store.book_count(),
            ready: indexes.is_some(),
            embedder: self.embedder.name().to_string(),
            dimension: self.embedder.dimension(),
            embedding_source: indexes.map(|i| i.source),
            vocabulary_size: indexes.map(|i| i.lexical.vocabulary_size()),
            corpus_path: self.store.source().map(Path::to_path_buf),
        }
    }

    /// Persist the verse embeddings so later runs can skip recomputing them
    pub fn write_artifact(&self, path: &Path) -> Result<(), ArtifactError> {
        let indexes = self.indexes();
        write_artifact(
            path,
            &indexes.embeddings,
            self.embedder.as_ref(),
            self.store.verses(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::fixtures::{sample_store, write_sample_corpus};
    use anyhow::Result;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn engine() -> BibleRag {
        BibleRag::from_store(sample_store(), SearchConfig::default())
    }

    fn references(results: &[SearchResult]) -> Vec<String> {
        results.iter().map(|r| r.verse.reference.clone()).collect()
    }

    #[test]
    fn test_lazy_initialization() {
        let rag = engine();
        assert!(!rag.is_ready());
        assert!(!rag.status().ready);

        // lookups do not need the indexes
        assert!(rag.get_verse_by_reference("John 3:16").is_some());
        assert!(!rag.is_ready());

        let results = rag.search("sin", 5, &SearchOptions::default());
        assert!(!results.is_empty());
        assert!(rag.is_ready());

        let status = rag.status();
        assert_eq!(status.embedding_source, Some(EmbeddingSource::Recomputed));
        assert!(status.vocabulary_size.unwrap_or(0) > 0);
    }

    #[test]
    fn test_sin_scenario() {
        let rag = engine();
        rag.initialize();
        let results = rag.search("sin", 5, &SearchOptions::default());
        assert!(results.len() <= 5);
        assert!(references(&results).contains(&"Romans 3:23".to_string()));
    }

    #[test]
    fn test_topic_matches_expanded_query() {
        let rag = engine();
        let by_topic = rag.search_by_topic("money", 5);
        let direct = rag.search(
            "money wealth riches treasure mammon silver gold",
            5,
            &SearchOptions::default(),
        );
        assert!(!by_topic.is_empty());
        assert_eq!(references(&by_topic), references(&direct));
        for (a, b) in by_topic.iter().zip(&direct) {
            assert!((a.score - b.score).abs() < 1e-6);
        }

        let unknown = rag.search_by_topic("shepherd", 5);
        assert_eq!(unknown, rag.search("shepherd", 5, &SearchOptions::default()));
    }

    #[test]
    fn test_get_verses_by_references_scenario() {
        let rag = engine();
        let verses =
            rag.get_verses_by_references(&["Romans 3:23", "NoSuchBook 1:1", "Romans 6:23"]);
        let refs: Vec<&str> = verses.iter().map(|v| v.reference.as_str()).collect();
        assert_eq!(refs, vec!["Romans 3:23", "Romans 6:23"]);
    }

    #[test]
    fn test_repeated_searches_identical() {
        let rag = engine();
        let options = SearchOptions {
            semantic_weight: Some(0.6),
            expanded_terms: vec!["faith".to_string(), "believe".to_string()],
        };
        let first = rag.search("believe in him", 5, &options);
        assert_eq!(rag.search("believe in him", 5, &options), first);
    }

    #[test]
    fn test_concurrent_first_search() {
        let rag = Arc::new(engine());
        let expected = BibleRag::from_store(sample_store(), SearchConfig::default()).search(
            "love",
            5,
            &SearchOptions::default(),
        );

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let rag = Arc::clone(&rag);
                    scope.spawn(move || rag.search("love", 5, &SearchOptions::default()))
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn test_load_from_config() -> Result<()> {
        let dir = TempDir::new()?;
        write_sample_corpus(dir.path())?;

        let rag = BibleRag::load(&Config::default(), dir.path())?;
        assert_eq!(rag.store().len(), sample_store().len());
        assert!(rag.status().corpus_path.is_some());

        // artifact path is configured but absent: recompute silently
        rag.initialize();
        assert_eq!(
            rag.status().embedding_source,
            Some(EmbeddingSource::Recomputed)
        );
        Ok(())
    }

    #[test]
    fn test_load_without_corpus_fails() -> Result<()> {
        let dir = TempDir::new()?;
        assert!(BibleRag::load(&Config::default(), dir.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_artifact_round_trip() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("embeddings.bin");

        let writer = engine();
        writer.write_artifact(&path)?;

        let reader = engine().with_artifact(&path);
        reader.initialize();
        assert_eq!(
            reader.status().embedding_source,
            Some(EmbeddingSource::Artifact)
        );
        assert_eq!(
            reader.search("treasure", 5, &SearchOptions::default()),
            writer.search("treasure", 5, &SearchOptions::default())
        );
        Ok(())
    }

    #[test]
    fn test_corrupt_artifact_falls_back() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("embeddings.bin");
        std::fs::write(&path, b"not an artifact")?;

        let rag = engine().with_artifact(&path);
        let results = rag.search("sin", 5, &SearchOptions::default());
        assert!(!results.is_empty());
        assert_eq!(
            rag.status().embedding_source,
            Some(EmbeddingSource::Recomputed)
        );
        Ok(())
    }

    #[test]
    fn test_chapter_and_range() {
        let rag = engine();
        assert_eq!(rag.get_chapter("Romans", 6).len(), 1);
        assert_eq!(rag.get_range("Matt 6:19-21").len(), 3);
        assert!(rag.get_verse_by_reference("nowhere 1:1").is_none());
    }
}
