//! Scripture MCP Server implementation

use anyhow::{Context, Result};
use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerInfo},
    tool, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedSender};

use super::params::{clamp_limit, SearchParams, TopicParams, VerseParams, VersesParams};
use super::types::{SearchOutputJson, SearchResultJson, VersesOutputJson};
use crate::core::config::Config;
use crate::core::reference::detect_references;
use crate::core::verse::Verse;
use crate::search::{
    BibleRag, BibleSearchTool, SearchEvent, SearchMode, SearchOptions, SearchResult, VerseHit,
};

/// Scripture MCP Service
#[derive(Clone)]
pub struct BibleService {
    rag: Arc<BibleRag>,
    events: UnboundedSender<SearchEvent>,
    tool_router: ToolRouter<Self>,
}

impl BibleService {
    pub fn new(rag: Arc<BibleRag>, events: UnboundedSender<SearchEvent>) -> Self {
        Self {
            rag,
            events,
            tool_router: Self::tool_router(),
        }
    }

    /// Verses named by `text`: an exact reference/range first, otherwise
    /// every reference found inside the text.
    fn resolve_verses(&self, text: &str) -> Vec<&Verse> {
        let range = self.rag.get_range(text);
        if !range.is_empty() {
            return range;
        }

        detect_references(text)
            .iter()
            .flat_map(|parsed| self.rag.get_range(&parsed.text))
            .collect()
    }
}

/// Run a `bible_search` call through the search tool, emitting its event.
fn run_search(
    rag: &BibleRag,
    events: &UnboundedSender<SearchEvent>,
    params: &SearchParams,
) -> Vec<SearchResult> {
    let limit = clamp_limit(params.limit, rag.config().tool_top_k);
    let mode = params
        .search_mode
        .as_deref()
        .map(SearchMode::from_str)
        .unwrap_or_default();
    let options = SearchOptions {
        semantic_weight: params.semantic_weight,
        expanded_terms: params.expanded_terms.clone(),
    };

    BibleSearchTool::new(rag, events).search(&params.query, limit, mode, &options)
}

/// Run CPU-bound retrieval off the async workers.
async fn blocking<T, F>(task: F) -> Result<T, McpError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| McpError::internal_error(format!("Search task failed: {}", e), None))
}

fn search_output(query: &str, results: &[SearchResult]) -> SearchOutputJson {
    SearchOutputJson {
        query: query.to_string(),
        count: results.len(),
        results: results.iter().map(SearchResultJson::from).collect(),
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let output = serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(format!("JSON serialization failed: {}", e), None)
    })?;
    Ok(CallToolResult::success(vec![Content::text(output)]))
}

#[tool_router]
impl BibleService {
    #[tool(
        description = "Search the Bible for verses related to a question or topic. Combines keyword (TF-IDF) and semantic similarity over every verse. Pass the user's question as the query; optionally add related words as expanded_terms."
    )]
    async fn bible_search(
        &self,
        params: Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let rag = Arc::clone(&self.rag);
        let events = self.events.clone();
        let params = params.0;
        let output = blocking(move || {
            let results = run_search(&rag, &events, &params);
            search_output(&params.query, &results)
        })
        .await?;
        json_result(&output)
    }

    #[tool(
        description = "Search verses for a curated topic (sin, salvation, faith, grace, love, forgiveness, eternal life, death, jesus, repentance, money, prayer, heaven, obedience)."
    )]
    async fn bible_topic(&self, params: Parameters<TopicParams>) -> Result<CallToolResult, McpError> {
        let rag = Arc::clone(&self.rag);
        let params = params.0;
        let output = blocking(move || {
            let limit = clamp_limit(params.limit, rag.config().default_top_k);
            let results = rag.search_by_topic(&params.topic, limit);
            search_output(&params.topic, &results)
        })
        .await?;
        json_result(&output)
    }

    #[tool(
        description = "Get a verse or verse range by reference (e.g., 'John 3:16', 'Rom 6:23', '1 Cor 13:4-7'). References embedded in text are also resolved."
    )]
    async fn bible_verse(&self, params: Parameters<VerseParams>) -> Result<CallToolResult, McpError> {
        let verses = self.resolve_verses(&params.0.reference);
        if verses.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(format!(
                "Verse not found: {}",
                params.0.reference
            ))]));
        }

        json_result(&VersesOutputJson {
            count: verses.len(),
            verses: verses.into_iter().map(VerseHit::from).collect(),
            missing: Vec::new(),
        })
    }

    #[tool(
        description = "Get several verses by canonical reference, in the given order. Unknown references are listed under 'missing'."
    )]
    async fn bible_verses(
        &self,
        params: Parameters<VersesParams>,
    ) -> Result<CallToolResult, McpError> {
        let verses = self.rag.get_verses_by_references(&params.0.references);
        let missing = params
            .0
            .references
            .iter()
            .filter(|r| self.rag.get_verse_by_reference(r).is_none())
            .cloned()
            .collect();

        json_result(&VersesOutputJson {
            count: verses.len(),
            verses: verses.into_iter().map(VerseHit::from).collect(),
            missing,
        })
    }

    #[tool(description = "Get retrieval engine status: verse and book counts, index readiness.")]
    async fn bible_status(&self) -> Result<CallToolResult, McpError> {
        json_result(&self.rag.status())
    }
}

#[rmcp::tool_handler]
impl ServerHandler for BibleService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Scripture retrieval MCP Server. Provides hybrid verse search, topic search and verse lookup by reference.".to_string()
            ),
            ..Default::default()
        }
    }
}

/// Run the MCP server
pub async fn run_mcp_server(config: Config, root: &Path) -> Result<()> {
    use tokio::io::{stdin, stdout};

    let rag = BibleRag::load(&config, root)
        .with_context(|| format!("Failed to load corpus from {}", root.display()))?;
    let rag = Arc::new(rag);

    let init = Arc::clone(&rag);
    tokio::task::spawn_blocking(move || init.initialize())
        .await
        .context("Index build task failed")?;

    let (events, mut receiver) = mpsc::unbounded_channel::<SearchEvent>();
    tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            tracing::info!(
                kind = %event.kind,
                query = %event.query,
                count = event.count,
                "search event"
            );
        }
    });

    let service = BibleService::new(rag, events);
    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SearchConfig;
    use crate::corpus::fixtures::sample_store;
    use crate::search::SearchSource;

    fn service() -> (BibleService, mpsc::UnboundedReceiver<SearchEvent>) {
        let store = sample_store();
        let rag = Arc::new(BibleRag::from_store(store, SearchConfig::default()));
        let (tx, rx) = mpsc::unbounded_channel();
        (BibleService::new(rag, tx), rx)
    }

    fn params(query: &str) -> SearchParams {
        serde_json::from_value(serde_json::json!({ "query": query })).unwrap()
    }

    #[test]
    fn test_search_emits_event() {
        let (service, mut rx) = service();
        let results = run_search(&service.rag, &service.events, &params("love of money"));
        assert!(!results.is_empty());

        let event = rx.try_recv().unwrap();
        assert_eq!(event.query, "love of money");
        assert_eq!(event.count, results.len());
    }

    #[test]
    fn test_search_limit_and_mode() {
        let (service, _rx) = service();
        let mut p = params("god");
        p.limit = Some(0);
        assert!(run_search(&service.rag, &service.events, &p).len() <= 1);

        p.limit = Some(3);
        p.search_mode = Some("keyword".to_string());
        let results = run_search(&service.rag, &service.events, &p);
        assert!(results.len() <= 3);
        assert!(results.iter().all(|r| r.source == SearchSource::Keyword));
    }

    #[tokio::test]
    async fn test_search_tools_run_off_the_runtime() -> anyhow::Result<()> {
        let (service, mut rx) = service();

        let searched = service.bible_search(Parameters(params("shepherd"))).await?;
        assert_ne!(searched.is_error, Some(true));
        assert_eq!(rx.try_recv()?.query, "shepherd");

        let topic: TopicParams = serde_json::from_value(serde_json::json!({ "topic": "money" }))?;
        let topical = service.bible_topic(Parameters(topic)).await?;
        assert_ne!(topical.is_error, Some(true));
        Ok(())
    }

    #[test]
    fn test_resolve_verses() {
        let (service, _rx) = service();
        assert_eq!(service.resolve_verses("Matt 6:19-21").len(), 3);

        let cited = service.resolve_verses("See Romans 3:23 and Romans 6:23 for this.");
        let refs: Vec<&str> = cited.iter().map(|v| v.reference.as_str()).collect();
        assert_eq!(refs, vec!["Romans 3:23", "Romans 6:23"]);

        assert!(service.resolve_verses("nothing here").is_empty());
    }

    #[test]
    fn test_search_output_shape() {
        let (service, _rx) = service();
        let results = run_search(&service.rag, &service.events, &params("shepherd"));
        let output = serde_json::to_value(search_output("shepherd", &results)).unwrap();
        assert_eq!(output["count"], results.len());
        assert_eq!(output["results"][0]["reference"], "Psalms 23:1");
        assert_eq!(output["results"][0]["source"], "hybrid");
    }
}
