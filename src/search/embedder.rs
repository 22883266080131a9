//! Embedder trait and the hash-based pseudo-embedding
//!
//! `HashEmbedder` maps text to a 384-dimension bag of hashed words:
//! every token adds 1.0 (3.0 for an important word) to bucket
//! `|hash(token)| % 384`, then the vector is L2-normalized. It is a
//! deterministic stand-in for a learned model and is used both for the
//! per-verse index and for queries.

use lazy_static::lazy_static;
use std::collections::HashSet;

use super::tokenizer::word_tokens;

/// Embedding dimension of the pseudo-embedding
pub const EMBEDDING_DIM: usize = 384;

const BASE_WEIGHT: f32 = 1.0;
const IMPORTANT_BONUS: f32 = 2.0;

/// Domain terms weighted three times a plain token.
/// Inflected forms are listed explicitly because tokens are not stemmed.
pub const IMPORTANT_WORDS: &[&str] = &[
    // salvation
    "sin", "sins", "sinned", "sinner", "sinners", "death", "life", "eternal", "saved",
    "salvation", "believe", "believed", "believeth", "faith", "jesus", "christ", "lord", "god",
    "love", "loved", "grace", "mercy", "forgive", "forgiven", "forgiveness", "righteous",
    "righteousness", "justified", "confess", "repent", "repentance", "born", "again", "spirit",
    "holy", "gospel", "redemption", "cross", "blood",
    // stewardship
    "money", "wealth", "riches", "treasure", "poor", "rich", "give", "giving", "tithe",
    "mammon",
    // eternity
    "heaven", "hell", "judgment",
    // devotion
    "prayer", "pray", "worship", "obey", "obedience", "truth", "word",
    // comfort
    "fear", "afraid", "anxiety", "anxious", "worry", "peace", "joy", "hope", "trust",
    // strength and wisdom
    "strength", "strong", "power", "wisdom", "wise", "understanding", "knowledge",
];

lazy_static! {
    static ref IMPORTANT: HashSet<&'static str> = IMPORTANT_WORDS.iter().copied().collect();
}

/// Embedding model abstraction
pub trait Embedder: Send + Sync {
    /// Embedding for a single text. Degenerate input yields the zero vector.
    fn embed(&self, text: &str) -> Vec<f32>;

    /// Embeddings for multiple texts
    fn embed_batch(&self, texts: &[&str]) -> Vec<Vec<f32>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Embedding dimension
    fn dimension(&self) -> usize;

    /// Model name/identifier, recorded in precomputed artifacts
    fn name(&self) -> &str;
}

/// 32-bit polynomial rolling hash over UTF-16 code units (`h = h * 31 + c`),
/// wrapped to i32 and returned as its absolute value.
pub fn token_hash(token: &str) -> u32 {
    let hash = token
        .encode_utf16()
        .fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(c as i32));
    hash.unsigned_abs()
}

/// Hash-bucket pseudo-embedding
#[derive(Debug, Clone, Default)]
pub struct HashEmbedder;

impl HashEmbedder {
    pub fn new() -> Self {
        Self
    }

    fn token_weight(token: &str) -> f32 {
        if IMPORTANT.contains(token) {
            BASE_WEIGHT + IMPORTANT_BONUS
        } else {
            BASE_WEIGHT
        }
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; EMBEDDING_DIM];

        for token in word_tokens(text) {
            let bucket = token_hash(&token) as usize % EMBEDDING_DIM;
            embedding[bucket] += Self::token_weight(&token);
        }

        normalize(&mut embedding);
        embedding
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }

    fn name(&self) -> &str {
        "hash-384"
    }
}

/// L2-normalize in place. The zero vector is left untouched.
pub fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

/// Cosine similarity; 0.0 for mismatched lengths or zero vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a > 0.0 && norm_b > 0.0 {
        dot / (norm_a * norm_b)
    } else {
        0.0
    }
}
