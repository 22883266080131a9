//! Core data model: verses, references, configuration and errors

pub mod config;
pub mod error;
pub mod reference;
pub mod verse;

pub use config::{Config, ResolvedPaths, SearchConfig};
pub use error::{RagError, RagResult};
pub use reference::{detect_references, normalize_book, parse_reference, ParsedReference};
pub use verse::{Verse, BOOKS};
