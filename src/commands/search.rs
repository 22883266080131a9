//! Search command - hybrid or single-pass verse search

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;

use romans_road_rag::search::{
    BibleSearchTool, EventSink, JsonLinesSink, NullSink, SearchMode, SearchOptions,
};

use super::{open_engine, print_results, results_json};

pub struct SearchArgs<'a> {
    pub query: &'a str,
    pub limit: Option<usize>,
    pub weight: Option<f32>,
    pub expand: Vec<String>,
    pub mode: Option<&'a str>,
    pub events: Option<&'a Path>,
    pub json: bool,
}

pub fn run(args: SearchArgs<'_>) -> Result<()> {
    let (rag, _config, _root) = open_engine()?;
    let limit = args.limit.unwrap_or(rag.config().default_top_k);
    let mode = args.mode.map(SearchMode::from_str).unwrap_or_default();

    // "--expand a,b --expand c" → [a, b, c]
    let expanded_terms: Vec<String> = args
        .expand
        .iter()
        .flat_map(|s| s.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    let sink: Box<dyn EventSink> = match args.events {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open event log {}", path.display()))?;
            Box::new(JsonLinesSink::new(file))
        }
        None => Box::new(NullSink),
    };

    let options = SearchOptions {
        semantic_weight: args.weight,
        expanded_terms,
    };
    let tool = BibleSearchTool::new(&rag, sink.as_ref());
    let results = tool.search(args.query, limit, mode, &options);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results_json(&results))?);
    } else {
        print_results(args.query, &results);
    }

    Ok(())
}
