//! Topic command - search a curated topic

use anyhow::Result;
use colored::Colorize;

use romans_road_rag::search::topic::{expand_topic, TOPICS};

use super::{open_engine, print_results, results_json};

pub fn run(topic: Option<&str>, limit: Option<usize>, json: bool) -> Result<()> {
    let Some(topic) = topic else {
        return list_topics(json);
    };

    let (rag, _config, _root) = open_engine()?;
    let limit = limit.unwrap_or(rag.config().default_top_k);
    let results = rag.search_by_topic(topic, limit);

    if json {
        let output = serde_json::json!({
            "topic": topic,
            "query": expand_topic(topic),
            "results": results_json(&results),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_results(topic, &results);
    }

    Ok(())
}

fn list_topics(json: bool) -> Result<()> {
    if json {
        let topics: Vec<_> = TOPICS
            .iter()
            .map(|(name, query)| serde_json::json!({ "topic": name, "query": query }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&topics)?);
        return Ok(());
    }

    println!("{}", "Topics".bold());
    println!("{}", "-".repeat(30));
    for (name, query) in TOPICS {
        println!("   {:<14} {}", name.cyan(), query.dimmed());
    }
    Ok(())
}
