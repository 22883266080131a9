//! Verse command - look up references

use anyhow::Result;
use colored::Colorize;

use romans_road_rag::core::reference::detect_references;
use romans_road_rag::search::VerseHit;
use romans_road_rag::Verse;

use super::{open_engine, print_verses};

/// Each argument may be a reference, a range, or text citing references
pub fn run(references: &[String], json: bool) -> Result<()> {
    let (rag, _config, _root) = open_engine()?;

    let mut found: Vec<&Verse> = Vec::new();
    let mut missing: Vec<&str> = Vec::new();
    for reference in references {
        let mut verses = rag.get_range(reference);
        if verses.is_empty() {
            verses = detect_references(reference)
                .iter()
                .flat_map(|parsed| rag.get_range(&parsed.text))
                .collect();
        }
        if verses.is_empty() {
            missing.push(reference);
        }
        found.extend(verses);
    }

    if json {
        let output = serde_json::json!({
            "verses": found.iter().map(|v| VerseHit::from(*v)).collect::<Vec<_>>(),
            "missing": missing,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_verses(&found);
    for reference in missing {
        println!("{} Verse not found: {}", "✗".red(), reference);
    }
    Ok(())
}
