//! Tokenizers
//!
//! Two token streams are used by the engine:
//! - `word_tokens`: plain lowercase word tokens, fed to the pseudo-embedding
//!   encoder. No stemming, so hashes stay stable across releases.
//! - `LexicalAnalyzer`: tantivy analyzer chain (lowercase, stop words, English
//!   stemming) for the TF-IDF index, so `sin` matches `sinned` and `sins`.

use tantivy::tokenizer::{
    Language, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer, StopWordFilter,
    TextAnalyzer, TokenStream,
};

/// Common English function words dropped from the lexical index.
const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "been", "but", "by", "can", "could", "did", "do", "does", "for", "from", "had", "has",
    "have", "he", "her", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "me",
    "my", "no", "not", "of", "on", "or", "our", "she", "so", "than", "that", "the", "their",
    "them", "then", "there", "these", "they", "this", "those", "to", "unto", "up", "upon", "us",
    "was", "we", "were", "what", "when", "which", "who", "will", "with", "would", "ye", "you",
    "your",
];

/// Lowercase word tokens split on anything that is not a letter, digit or `_`.
pub fn word_tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|s| !s.is_empty())
        .map(|s| s.to_lowercase())
        .collect()
}

/// Analyzer chain for keyword scoring
#[derive(Clone)]
pub struct LexicalAnalyzer {
    analyzer: TextAnalyzer,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        let analyzer = TextAnalyzer::builder(SimpleTokenizer::default())
            .filter(RemoveLongFilter::limit(40))
            .filter(LowerCaser)
            .filter(StopWordFilter::remove(
                STOP_WORDS.iter().map(|w| (*w).to_string()),
            ))
            .filter(Stemmer::new(Language::English))
            .build();

        Self { analyzer }
    }

    /// Analyzed terms of `text`, in order, duplicates kept.
    pub fn terms(&mut self, text: &str) -> Vec<String> {
        let mut stream = self.analyzer.token_stream(text);
        let mut terms = Vec::new();
        while stream.advance() {
            terms.push(stream.token().text.clone());
        }
        terms
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LexicalAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("LexicalAnalyzer")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_tokens() {
        assert_eq!(
            word_tokens("For all have sinned, and come short!"),
            vec!["for", "all", "have", "sinned", "and", "come", "short"]
        );
        assert!(word_tokens("  ...  ").is_empty());
        assert_eq!(word_tokens("LORD's"), vec!["lord", "s"]);
    }

    #[test]
    fn test_lexical_terms_are_stemmed() {
        let mut analyzer = LexicalAnalyzer::new();
        assert_eq!(analyzer.terms("sinned"), vec!["sin"]);
        assert_eq!(analyzer.terms("Sins"), vec!["sin"]);
        assert_eq!(analyzer.terms("sin"), vec!["sin"]);
    }

    #[test]
    fn test_lexical_terms_drop_stop_words() {
        let mut analyzer = LexicalAnalyzer::new();
        let terms = analyzer.terms("For the wages of sin is death");
        assert_eq!(terms, vec!["wage", "sin", "death"]);
        assert!(analyzer.terms("").is_empty());
        assert!(analyzer.terms("the and of").is_empty());
    }
}
