//! Verse corpus and its precomputed embeddings

pub mod artifact;
pub mod store;

#[cfg(test)]
pub(crate) mod fixtures;

pub use artifact::{ArtifactError, EmbeddingTable};
pub use store::CorpusStore;
