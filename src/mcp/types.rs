//! JSON output types for MCP tools

use serde::Serialize;

use crate::search::{SearchResult, VerseHit};

/// Search hit for JSON output
#[derive(Debug, Serialize)]
pub struct SearchResultJson {
    pub reference: String,
    pub text: String,
    pub score: f32,
    pub source: &'static str,
}

impl From<&SearchResult> for SearchResultJson {
    fn from(result: &SearchResult) -> Self {
        Self {
            reference: result.verse.reference.clone(),
            text: result.verse.text.clone(),
            score: result.score,
            source: result.source.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchOutputJson {
    pub query: String,
    pub count: usize,
    pub results: Vec<SearchResultJson>,
}

#[derive(Debug, Serialize)]
pub struct VersesOutputJson {
    pub count: usize,
    pub verses: Vec<VerseHit>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}
