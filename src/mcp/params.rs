//! Parameter structures for MCP tools

use schemars::JsonSchema;
use serde::Deserialize;

/// Parameters for bible_search tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// The user's question or topic (e.g., "what does the bible say about worry?")
    #[schemars(description = "Question or topic to search for in the Bible")]
    pub query: String,
    #[schemars(description = "Maximum number of verses (default: 20, max: 100)")]
    #[serde(default)]
    pub limit: Option<usize>,
    #[schemars(description = "Weight of the semantic pass, 0.0-1.0 (default: 0.6)")]
    #[serde(default)]
    pub semantic_weight: Option<f32>,
    /// Synonyms or related words searched as extra keywords
    #[schemars(description = "Extra keywords that broaden recall (e.g., ['anxious', 'careful'])")]
    #[serde(default)]
    pub expanded_terms: Vec<String>,
    #[schemars(description = "Search mode: 'hybrid' (default), 'semantic', 'keyword'")]
    #[serde(default)]
    pub search_mode: Option<String>,
}

/// Parameters for bible_topic tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TopicParams {
    #[schemars(
        description = "Topic keyword: sin, salvation, faith, grace, love, forgiveness, eternal life, death, jesus, repentance, money, prayer, heaven, obedience (other text is searched as-is)"
    )]
    pub topic: String,
    #[schemars(description = "Maximum number of verses (default: 5, max: 100)")]
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Parameters for bible_verse tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct VerseParams {
    /// Reference or range, abbreviations allowed (e.g., "Rom 6:23", "1 Cor 13:4-7")
    #[schemars(description = "Verse reference or range, e.g. 'John 3:16' or '1 Cor 13:4-7'")]
    pub reference: String,
}

/// Parameters for bible_verses tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct VersesParams {
    #[schemars(description = "Canonical references, e.g. ['Romans 3:23', 'Romans 6:23']")]
    pub references: Vec<String>,
}

/// Largest result count a tool call may request
pub const MAX_LIMIT: usize = 100;

/// Clamp a requested limit to 1..=MAX_LIMIT
pub fn clamp_limit(requested: Option<usize>, default: usize) -> usize {
    requested.unwrap_or(default).clamp(1, MAX_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None, 5), 5);
        assert_eq!(clamp_limit(Some(0), 5), 1);
        assert_eq!(clamp_limit(Some(7), 5), 7);
        assert_eq!(clamp_limit(Some(10_000), 5), MAX_LIMIT);
        assert_eq!(clamp_limit(None, 500), MAX_LIMIT);
    }

    #[test]
    fn test_search_params_defaults() {
        let params: SearchParams = serde_json::from_str(r#"{"query": "grace"}"#).unwrap();
        assert_eq!(params.query, "grace");
        assert!(params.limit.is_none());
        assert!(params.semantic_weight.is_none());
        assert!(params.expanded_terms.is_empty());
    }
}
