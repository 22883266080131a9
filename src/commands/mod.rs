//! CLI subcommands

pub mod chapter;
pub mod precompute;
pub mod search;
pub mod status;
pub mod topic;
pub mod verse;

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use romans_road_rag::core::config::{data_root, Config};
use romans_road_rag::{BibleRag, SearchResult, Verse};

/// Load config and corpus from the data root
pub fn open_engine() -> Result<(BibleRag, Config, PathBuf)> {
    let root = data_root();
    let config = Config::load(&root);
    let rag = BibleRag::load(&config, &root)
        .with_context(|| format!("Failed to load corpus (data root: {})", root.display()))?;
    Ok((rag, config, root))
}

pub fn print_results(label: &str, results: &[SearchResult]) {
    if results.is_empty() {
        println!("{} No verses found for: {}", "→".dimmed(), label.cyan());
        return;
    }

    println!(
        "{} {} verses for: {}",
        "→".dimmed(),
        results.len(),
        label.cyan()
    );
    println!();

    for (i, result) in results.iter().enumerate() {
        let score_str = format!("{:.3}", result.score);
        let score_colored = if result.score > 1.0 {
            score_str.green()
        } else if result.score > 0.5 {
            score_str.yellow()
        } else {
            score_str.dimmed()
        };

        println!(
            "{}. [{}] {} {}",
            (i + 1).to_string().bold(),
            score_colored,
            result.verse.reference.cyan(),
            format!("({})", result.source.as_str()).dimmed()
        );
        println!("   {}", result.verse.text);
        println!();
    }
}

pub fn print_verses(verses: &[&Verse]) {
    for verse in verses {
        println!("{} {}", verse.reference.cyan().bold(), verse.text);
    }
}

pub fn results_json(results: &[SearchResult]) -> Vec<serde_json::Value> {
    results
        .iter()
        .map(|r| {
            serde_json::json!({
                "reference": r.verse.reference,
                "text": r.verse.text,
                "score": r.score,
                "source": r.source.as_str(),
            })
        })
        .collect()
}
