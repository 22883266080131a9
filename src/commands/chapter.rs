use anyhow::Result;
use colored::Colorize;

use romans_road_rag::search::VerseHit;

use super::{open_engine, print_verses};

pub fn run(book: &str, chapter: u32, json: bool) -> Result<()> {
    let (rag, _config, _root) = open_engine()?;
    let verses = rag.get_chapter(book, chapter);

    if json {
        let hits: Vec<VerseHit> = verses.iter().map(|v| VerseHit::from(*v)).collect();
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    if verses.is_empty() {
        println!("{} Chapter not found: {} {}", "→".dimmed(), book.cyan(), chapter);
        return Ok(());
    }
    print_verses(&verses);
    Ok(())
}
