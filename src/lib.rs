//! Hybrid scripture retrieval
//!
//! Keyword (TF-IDF) and hash pseudo-embedding search over a fixed verse
//! corpus, merged into one ranked list.

pub mod core;
pub mod corpus;
#[cfg(feature = "mcp")]
pub mod mcp;
pub mod search;

pub use crate::core::{Config, RagError, Verse};
pub use crate::search::{BibleRag, SearchMode, SearchOptions, SearchResult, SearchSource};
