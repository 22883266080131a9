//! Retrieval: tokenization, pseudo-embeddings, TF-IDF, hybrid ranking
//!
//! The index build happens once per `BibleRag`; every search afterwards is
//! read-only over the same corpus.

pub mod embedder;
pub mod engine;
pub mod events;
pub mod hybrid;
pub mod tfidf;
pub mod tokenizer;
pub mod topic;

pub use embedder::{Embedder, HashEmbedder, EMBEDDING_DIM};
pub use engine::{BibleRag, EmbeddingSource, EngineStatus, SearchOptions};
pub use events::{
    BibleSearchTool, EventSink, JsonLinesSink, NullSink, SearchEvent, SearchPayload, VerseHit,
};
pub use hybrid::{HybridRanker, SearchMode, SearchResult, SearchSource};
pub use tfidf::TfIdfIndex;
pub use topic::expand_topic;
