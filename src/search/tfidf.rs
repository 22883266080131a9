//! TF-IDF lexical index
//!
//! One document per verse. Term frequency is the raw count of an analyzed
//! term in the document; inverse document frequency is
//! `1 + ln(N / (1 + df))`. A query's relevance to a document is the sum of
//! `tf * idf` over the query's terms, duplicates included.

use std::collections::{HashMap, HashSet};

use super::tokenizer::LexicalAnalyzer;

#[derive(Debug, Clone, Copy)]
struct Posting {
    doc: u32,
    tf: u32,
}

/// Scored document position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredDoc {
    pub index: usize,
    pub score: f32,
}

/// Inverted TF-IDF index over the corpus
#[derive(Debug)]
pub struct TfIdfIndex {
    analyzer: LexicalAnalyzer,
    postings: HashMap<String, Vec<Posting>>,
    doc_count: usize,
}

impl TfIdfIndex {
    /// Build from documents; position in the iterator is the document index.
    pub fn build<'a, I>(documents: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut analyzer = LexicalAnalyzer::new();
        let mut postings: HashMap<String, Vec<Posting>> = HashMap::new();
        let mut doc_count = 0;

        for (doc, text) in documents.into_iter().enumerate() {
            let mut counts: HashMap<String, u32> = HashMap::new();
            for term in analyzer.terms(text) {
                *counts.entry(term).or_insert(0) += 1;
            }
            for (term, tf) in counts {
                postings.entry(term).or_default().push(Posting {
                    doc: doc as u32,
                    tf,
                });
            }
            doc_count += 1;
        }

        Self {
            analyzer,
            postings,
            doc_count,
        }
    }

    pub fn doc_count(&self) -> usize {
        self.doc_count
    }

    /// Number of distinct analyzed terms
    pub fn vocabulary_size(&self) -> usize {
        self.postings.len()
    }

    /// Inverse document frequency of an analyzed term
    pub fn idf(&self, term: &str) -> f32 {
        let df = self.postings.get(term).map_or(0, Vec::len);
        1.0 + (self.doc_count as f32 / (1.0 + df as f32)).ln()
    }

    /// Score documents against `query` and return the `limit` best.
    ///
    /// When `candidates` is given, only the first `candidate_limit` of those
    /// indices are scored. Only strictly positive scores are returned,
    /// sorted descending with ties broken by document position.
    pub fn search(
        &self,
        query: &str,
        limit: usize,
        candidates: Option<&[usize]>,
        candidate_limit: usize,
    ) -> Vec<ScoredDoc> {
        if limit == 0 || self.doc_count == 0 {
            return Vec::new();
        }

        let terms = self.analyzer.clone().terms(query);
        if terms.is_empty() {
            return Vec::new();
        }

        let allowed: Option<HashSet<usize>> = candidates.map(|c| {
            c.iter()
                .copied()
                .take(candidate_limit)
                .filter(|&i| i < self.doc_count)
                .collect()
        });

        let mut multiplicity: HashMap<&str, u32> = HashMap::new();
        for term in &terms {
            *multiplicity.entry(term.as_str()).or_insert(0) += 1;
        }

        let mut scores: HashMap<usize, f32> = HashMap::new();
        for (term, count) in multiplicity {
            let Some(postings) = self.postings.get(term) else {
                continue;
            };
            let idf = self.idf(term);
            for posting in postings {
                let doc = posting.doc as usize;
                if let Some(ref allowed) = allowed {
                    if !allowed.contains(&doc) {
                        continue;
                    }
                }
                *scores.entry(doc).or_insert(0.0) += count as f32 * posting.tf as f32 * idf;
            }
        }

        let mut results: Vec<ScoredDoc> = scores
            .into_iter()
            .filter(|&(_, score)| score > 0.0)
            .map(|(index, score)| ScoredDoc { index, score })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.index.cmp(&b.index))
        });
        results.truncate(limit);
        results
    }
}
