use anyhow::Result;
use colored::*;

use super::open_engine;

pub fn run(json: bool) -> Result<()> {
    let (rag, _config, root) = open_engine()?;
    rag.initialize();
    let status = rag.status();

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Retrieval Engine Status".bold());
    println!("{}", "=".repeat(50));
    println!();
    println!("Data root:   {}", root.display());
    if let Some(path) = &status.corpus_path {
        println!("Corpus:      {}", path.display());
    }
    println!("Verses:      {}", status.verses);
    println!("Books:       {}", status.books);
    println!("Embedder:    {} ({} dims)", status.embedder, status.dimension);

    let source = match status.embedding_source {
        Some(source) => format!("{:?}", source).to_lowercase(),
        None => "not built".to_string(),
    };
    println!("Embeddings:  {}", source);
    if let Some(vocabulary) = status.vocabulary_size {
        println!("Vocabulary:  {} terms", vocabulary);
    }

    let ready = if status.ready {
        "ready".green()
    } else {
        "not ready".red()
    };
    println!("Index:       {}", ready);
    println!();
    println!("{}", "=".repeat(50));
    Ok(())
}
