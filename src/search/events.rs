//! Typed search-result events and the port they are emitted through
//!
//! A consumer (chat stream, MCP client log, CLI) subscribes by providing an
//! `EventSink`. The event schema is fixed: `{type, query, verses, count}`.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Mutex;

use super::engine::{BibleRag, SearchOptions};
use super::hybrid::{SearchMode, SearchResult};
use crate::core::verse::Verse;

pub const SEARCH_EVENT_KIND: &str = "bible-search-result";

/// Verse as carried in events and tool payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerseHit {
    pub reference: String,
    pub text: String,
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
}

impl From<&Verse> for VerseHit {
    fn from(verse: &Verse) -> Self {
        Self {
            reference: verse.reference.clone(),
            text: verse.text.clone(),
            book: verse.book.clone(),
            chapter: verse.chapter,
            verse: verse.verse,
        }
    }
}

/// Result payload of one tool search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPayload {
    pub verses: Vec<VerseHit>,
    pub count: usize,
}

impl SearchPayload {
    pub fn from_results(results: &[SearchResult]) -> Self {
        let verses: Vec<VerseHit> = results.iter().map(|r| VerseHit::from(&r.verse)).collect();
        Self {
            count: verses.len(),
            verses,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub query: String,
    pub verses: Vec<VerseHit>,
    pub count: usize,
}

impl SearchEvent {
    pub fn new(query: &str, payload: &SearchPayload) -> Self {
        Self {
            kind: SEARCH_EVENT_KIND.to_string(),
            query: query.to_string(),
            verses: payload.verses.clone(),
            count: payload.count,
        }
    }
}

/// Output port for search events. Emitting never fails the search.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &SearchEvent);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &SearchEvent) {}
}

/// Writes one JSON object per line
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> EventSink for JsonLinesSink<W> {
    fn emit(&self, event: &SearchEvent) {
        let Ok(mut writer) = self.writer.lock() else {
            tracing::warn!("event writer poisoned, dropping event");
            return;
        };
        let written = serde_json::to_writer(&mut *writer, event)
            .map_err(std::io::Error::from)
            .and_then(|_| writer.write_all(b"\n"))
            .and_then(|_| writer.flush());
        if let Err(e) = written {
            tracing::warn!("failed to write search event: {}", e);
        }
    }
}

#[cfg(feature = "mcp")]
impl EventSink for tokio::sync::mpsc::UnboundedSender<SearchEvent> {
    fn emit(&self, event: &SearchEvent) {
        if self.send(event.clone()).is_err() {
            tracing::debug!("search event receiver closed");
        }
    }
}

/// The agent-facing search tool: every search it runs is emitted as a
/// `SearchEvent` through its sink.
pub struct BibleSearchTool<'a> {
    rag: &'a BibleRag,
    sink: &'a dyn EventSink,
}

impl<'a> BibleSearchTool<'a> {
    pub const ID: &'static str = "search-bible";

    pub fn new(rag: &'a BibleRag, sink: &'a dyn EventSink) -> Self {
        Self { rag, sink }
    }

    /// Hybrid search with the tool defaults
    pub fn run(&self, query: &str) -> SearchPayload {
        let config = self.rag.config();
        let options = SearchOptions {
            semantic_weight: Some(config.semantic_weight),
            expanded_terms: Vec::new(),
        };
        let results = self.search(query, config.tool_top_k, SearchMode::Hybrid, &options);
        SearchPayload::from_results(&results)
    }

    /// Search in `mode` and emit the results. `options` only apply to hybrid mode.
    pub fn search(
        &self,
        query: &str,
        limit: usize,
        mode: SearchMode,
        options: &SearchOptions,
    ) -> Vec<SearchResult> {
        let results = match mode {
            SearchMode::Hybrid => self.rag.search(query, limit, options),
            mode => self.rag.search_mode(query, limit, mode),
        };

        self.sink
            .emit(&SearchEvent::new(query, &SearchPayload::from_results(&results)));
        results
    }
}
