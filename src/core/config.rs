//! Configuration
//!
//! Loaded from `romans-road.json` in the data root. Every field is optional;
//! a missing or broken file falls back to defaults with a warning.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "romans-road.json";
pub const CONFIG_VERSION: u32 = 1;

/// Environment variable naming the data root
pub const HOME_ENV: &str = "ROMANS_ROAD_HOME";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

/// Corpus and artifact locations, relative to the data root unless absolute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_verses_path")]
    pub verses: String,

    #[serde(default = "default_embeddings_path")]
    pub embeddings: Option<String>,
}

fn default_verses_path() -> String {
    "data/bible-verses.json".to_string()
}

fn default_embeddings_path() -> Option<String> {
    Some("data/bible-embeddings.bin".to_string())
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            verses: default_verses_path(),
            embeddings: default_embeddings_path(),
        }
    }
}

/// Retrieval tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Share of the semantic pass in the merged score
    #[serde(default = "default_semantic_weight")]
    pub semantic_weight: f32,

    /// Minimum cosine similarity kept by the semantic pass
    #[serde(default = "default_semantic_threshold")]
    pub semantic_threshold: f32,

    /// Factor applied to keyword and expanded contributions after `1 - semantic_weight`
    #[serde(default = "default_keyword_share")]
    pub keyword_share: f32,

    /// Each pass fetches `top_k * fetch_multiplier` candidates
    #[serde(default = "default_fetch_multiplier")]
    pub fetch_multiplier: usize,

    #[serde(default = "default_expanded_per_term")]
    pub expanded_per_term: usize,

    /// Upper bound on candidate indices scored by a restricted keyword search
    #[serde(default = "default_keyword_candidate_limit")]
    pub keyword_candidate_limit: usize,

    #[serde(default = "default_top_k")]
    pub default_top_k: usize,

    /// Result count used by the agent-facing search tool
    #[serde(default = "default_tool_top_k")]
    pub tool_top_k: usize,
}

fn default_semantic_weight() -> f32 {
    0.6
}

fn default_semantic_threshold() -> f32 {
    0.3
}

fn default_keyword_share() -> f32 {
    0.5
}

fn default_fetch_multiplier() -> usize {
    2
}

fn default_expanded_per_term() -> usize {
    10
}

fn default_keyword_candidate_limit() -> usize {
    1000
}

fn default_top_k() -> usize {
    5
}

fn default_tool_top_k() -> usize {
    20
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            semantic_weight: default_semantic_weight(),
            semantic_threshold: default_semantic_threshold(),
            keyword_share: default_keyword_share(),
            fetch_multiplier: default_fetch_multiplier(),
            expanded_per_term: default_expanded_per_term(),
            keyword_candidate_limit: default_keyword_candidate_limit(),
            default_top_k: default_top_k(),
            tool_top_k: default_tool_top_k(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            data: DataConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Config {
    /// Load config from the data root, falling back to defaults
    pub fn load(root: &Path) -> Self {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from_file(&path) {
            Ok(config) => {
                if config.version > CONFIG_VERSION {
                    tracing::warn!(
                        version = config.version,
                        supported = CONFIG_VERSION,
                        "config version is newer than supported"
                    );
                }
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        fs::create_dir_all(root)?;
        let content = serde_json::to_string_pretty(self)?;
        fs::write(root.join(CONFIG_FILE), content)?;
        Ok(())
    }

    /// Resolve data paths against the root
    pub fn resolve_paths(&self, root: &Path) -> ResolvedPaths {
        ResolvedPaths {
            root: root.to_path_buf(),
            verses: resolve(root, &self.data.verses),
            embeddings: self.data.embeddings.as_deref().map(|p| resolve(root, p)),
        }
    }
}

fn resolve(root: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Absolute data paths
#[derive(Debug, Clone)]
pub struct ResolvedPaths {
    pub root: PathBuf,
    pub verses: PathBuf,
    pub embeddings: Option<PathBuf>,
}

/// Data root from `ROMANS_ROAD_HOME`, else the current directory
pub fn data_root() -> PathBuf {
    if let Ok(path) = std::env::var(HOME_ENV) {
        let root = PathBuf::from(&path);
        if root.is_dir() {
            return root;
        }
        tracing::warn!(
            "{} is set to '{}' but it is not a directory. Falling back to current directory.",
            HOME_ENV,
            path
        );
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
