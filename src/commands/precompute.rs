//! Precompute command - write the embedding artifact

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use std::time::Instant;

use super::open_engine;

pub fn run(output: Option<PathBuf>) -> Result<()> {
    let (rag, config, root) = open_engine()?;

    let path = output
        .or_else(|| config.resolve_paths(&root).embeddings)
        .context("No output path: pass --output or set data.embeddings in the config")?;

    let start = Instant::now();
    rag.write_artifact(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    let status = rag.status();
    println!(
        "{} {} embeddings ({} dims) → {} in {}ms",
        "✓".green(),
        status.verses,
        status.dimension,
        path.display().to_string().cyan(),
        start.elapsed().as_millis()
    );
    Ok(())
}
