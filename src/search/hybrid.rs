//! Hybrid Ranker - merges semantic, keyword and expanded-term passes
//!
//! Supports three search modes:
//! - Hybrid: weighted sum of all passes, deduplicated by verse (default)
//! - Semantic: pseudo-embedding cosine similarity only
//! - Keyword: TF-IDF only

use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

use super::embedder::{cosine_similarity, Embedder};
use super::tfidf::{ScoredDoc, TfIdfIndex};
use crate::core::config::SearchConfig;
use crate::core::verse::Verse;
use crate::corpus::artifact::EmbeddingTable;

// ============================================================================
// Search Mode
// ============================================================================

/// Search mode selection
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum SearchMode {
    #[default]
    Hybrid,
    Semantic,
    Keyword,
}

impl SearchMode {
    /// Parse search mode from string
    ///
    /// # Examples
    /// ```
    /// use romans_road_rag::search::SearchMode;
    /// assert_eq!(SearchMode::from_str("semantic"), SearchMode::Semantic);
    /// assert_eq!(SearchMode::from_str("keyword"), SearchMode::Keyword);
    /// assert_eq!(SearchMode::from_str("tfidf"), SearchMode::Keyword);
    /// assert_eq!(SearchMode::from_str("unknown"), SearchMode::Hybrid); // default
    /// ```
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "semantic" => SearchMode::Semantic,
            "keyword" | "tfidf" | "lexical" => SearchMode::Keyword,
            _ => SearchMode::Hybrid,
        }
    }
}

/// Which pass produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSource {
    Semantic,
    Keyword,
    Hybrid,
}

impl SearchSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchSource::Semantic => "semantic",
            SearchSource::Keyword => "keyword",
            SearchSource::Hybrid => "hybrid",
        }
    }
}

/// Ranked verse with its score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub verse: Verse,
    pub score: f32,
    pub source: SearchSource,
}

// ============================================================================
// Score accumulation
// ============================================================================

/// Insertion-ordered score map keyed by corpus position.
///
/// Corpus positions and references are one-to-one, so this is the
/// per-reference dedup map. Sorting is stable, so equal scores keep the
/// order in which verses were first seen.
#[derive(Debug, Default)]
struct ScoreAccumulator {
    entries: Vec<ScoredDoc>,
    slots: HashMap<usize, usize>,
}

impl ScoreAccumulator {
    fn add(&mut self, index: usize, score: f32) {
        match self.slots.get(&index) {
            Some(&slot) => self.entries[slot].score += score,
            None => {
                self.slots.insert(index, self.entries.len());
                self.entries.push(ScoredDoc { index, score });
            }
        }
    }

    fn into_ranked(self, limit: usize) -> Vec<ScoredDoc> {
        let mut entries = self.entries;
        sort_descending(&mut entries);
        entries.truncate(limit);
        entries
    }
}

fn sort_descending(docs: &mut [ScoredDoc]) {
    docs.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

// ============================================================================
// Hybrid Ranker
// ============================================================================

/// Per-query ranker over the already-built indexes
pub struct HybridRanker<'a> {
    verses: &'a [Verse],
    lexical: &'a TfIdfIndex,
    embeddings: &'a EmbeddingTable,
    embedder: &'a dyn Embedder,
    config: &'a SearchConfig,
}

impl<'a> HybridRanker<'a> {
    pub fn new(
        verses: &'a [Verse],
        lexical: &'a TfIdfIndex,
        embeddings: &'a EmbeddingTable,
        embedder: &'a dyn Embedder,
        config: &'a SearchConfig,
    ) -> Self {
        Self {
            verses,
            lexical,
            embeddings,
            embedder,
            config,
        }
    }

    /// Weighted merge of all passes. Never fails; degenerate input yields
    /// fewer or zero results.
    ///
    /// `semantic_weight` defaults to the configured weight and is clamped
    /// to `[0, 1]`. Each pass fetches `top_k * fetch_multiplier` candidates.
    pub fn search(
        &self,
        query: &str,
        top_k: usize,
        semantic_weight: Option<f32>,
        expanded_terms: &[String],
    ) -> Vec<SearchResult> {
        if top_k == 0 {
            return Vec::new();
        }

        let weight = self.resolve_weight(semantic_weight);
        let fetch = top_k.saturating_mul(self.config.fetch_multiplier.max(1));

        let (semantic, (keyword, expanded)) = rayon::join(
            || self.semantic_pass(query, fetch),
            || {
                rayon::join(
                    || self.keyword_pass(query, fetch),
                    || self.expanded_pass(expanded_terms, fetch),
                )
            },
        );

        tracing::debug!(
            query,
            top_k,
            weight,
            semantic = semantic.len(),
            keyword = keyword.len(),
            expanded = expanded.len(),
            "hybrid passes complete"
        );

        let lexical_weight = (1.0 - weight) * self.config.keyword_share;
        let mut merged = ScoreAccumulator::default();
        for doc in &semantic {
            merged.add(doc.index, doc.score * weight);
        }
        for doc in &keyword {
            merged.add(doc.index, doc.score * lexical_weight);
        }
        for doc in &expanded {
            merged.add(doc.index, doc.score * lexical_weight);
        }

        self.to_results(merged.into_ranked(top_k), SearchSource::Hybrid)
    }

    /// A single pass, tagged with its own source
    pub fn search_mode(&self, query: &str, top_k: usize, mode: SearchMode) -> Vec<SearchResult> {
        match mode {
            SearchMode::Hybrid => self.search(query, top_k, None, &[]),
            SearchMode::Semantic => {
                self.to_results(self.semantic_pass(query, top_k), SearchSource::Semantic)
            }
            SearchMode::Keyword => {
                self.to_results(self.keyword_pass(query, top_k), SearchSource::Keyword)
            }
        }
    }

    /// Cosine similarity against every verse, thresholded
    pub fn semantic_pass(&self, query: &str, limit: usize) -> Vec<ScoredDoc> {
        if limit == 0 {
            return Vec::new();
        }

        let query_embedding = self.embedder.embed(query);
        let threshold = self.config.semantic_threshold;

        let mut hits: Vec<ScoredDoc> = self
            .embeddings
            .rows()
            .enumerate()
            .filter_map(|(index, row)| {
                let score = cosine_similarity(&query_embedding, row);
                (score >= threshold && score > 0.0).then_some(ScoredDoc { index, score })
            })
            .collect();

        sort_descending(&mut hits);
        hits.truncate(limit);
        hits
    }

    pub fn keyword_pass(&self, query: &str, limit: usize) -> Vec<ScoredDoc> {
        self.lexical
            .search(query, limit, None, self.config.keyword_candidate_limit)
    }

    /// Keyword search per term; a verse matched by several terms gets the sum.
    pub fn expanded_pass(&self, terms: &[String], limit: usize) -> Vec<ScoredDoc> {
        if terms.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut combined = ScoreAccumulator::default();
        for term in terms {
            for doc in self.keyword_pass(term, self.config.expanded_per_term) {
                combined.add(doc.index, doc.score);
            }
        }
        combined.into_ranked(limit)
    }

    fn resolve_weight(&self, requested: Option<f32>) -> f32 {
        let weight = requested
            .filter(|w| w.is_finite())
            .unwrap_or(self.config.semantic_weight);
        let clamped = weight.clamp(0.0, 1.0);
        if clamped != weight {
            tracing::debug!(requested = weight, clamped, "semantic weight clamped");
        }
        clamped
    }

    fn to_results(&self, docs: Vec<ScoredDoc>, source: SearchSource) -> Vec<SearchResult> {
        docs.into_iter()
            .filter_map(|doc| {
                self.verses.get(doc.index).map(|verse| SearchResult {
                    verse: verse.clone(),
                    score: doc.score,
                    source,
                })
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
