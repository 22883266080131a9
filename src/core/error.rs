//! Load-time errors
//!
//! Anything in here means the engine cannot become ready. Per-query
//! operations never fail; they return fewer or zero results instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RagError {
    #[error("corpus file not found: {}", .0.display())]
    CorpusMissing(PathBuf),

    #[error("failed to read corpus {}: {source}", path.display())]
    CorpusRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse corpus {}: {source}", path.display())]
    CorpusParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("corpus contains no verses")]
    EmptyCorpus,

    #[error("invalid verse at position {index}: {reason}")]
    InvalidVerse { index: usize, reason: String },

    #[error("duplicate reference '{reference}' at position {index}")]
    DuplicateReference { index: usize, reference: String },
}

pub type RagResult<T> = std::result::Result<T, RagError>;
