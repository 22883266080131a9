mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::search::SearchArgs;

#[derive(Parser)]
#[command(name = "romans-road")]
#[command(about = "Hybrid keyword + semantic Bible verse retrieval, with an MCP server", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(short, long, global = true, help = "Debug logging on stderr")]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    // ===== MCP Server (also default) =====
    /// Start MCP server on stdio
    #[cfg(feature = "mcp")]
    Mcp {
        #[arg(long, help = "Show MCP client configuration instructions")]
        install: bool,
    },

    // ===== Search =====
    /// Hybrid verse search
    Search {
        query: String,
        #[arg(long, short, help = "Limit results (default: 5)")]
        limit: Option<usize>,
        #[arg(long, short, help = "Semantic weight 0.0-1.0 (default: 0.6)")]
        weight: Option<f32>,
        #[arg(long, short, help = "Expanded terms, comma-separated or repeated")]
        expand: Vec<String>,
        #[arg(long, short, help = "Search mode: hybrid, semantic, keyword")]
        mode: Option<String>,
        #[arg(long, help = "Append a search event (JSON line) to this file")]
        events: Option<PathBuf>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Search a curated topic (no topic: list topics)
    Topic {
        topic: Option<String>,
        #[arg(long, short, help = "Limit results (default: 5)")]
        limit: Option<usize>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },

    // ===== Lookup =====
    /// Look up verses by reference ("John 3:16", "1 Cor 13:4-7")
    Verse {
        #[arg(required = true)]
        references: Vec<String>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Print a whole chapter
    Chapter {
        book: String,
        chapter: u32,
        #[arg(long, help = "JSON output")]
        json: bool,
    },

    // ===== Maintenance =====
    /// Write the precomputed embedding artifact
    Precompute {
        #[arg(long, short, help = "Output path (default: data.embeddings from config)")]
        output: Option<PathBuf>,
    },
    /// Show corpus and index status
    Status {
        #[arg(long, help = "JSON output")]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        // Default: run MCP server
        None => {
            #[cfg(feature = "mcp")]
            {
                run_mcp_server()
            }
            #[cfg(not(feature = "mcp"))]
            {
                eprintln!("MCP feature not enabled. Build with --features mcp");
                std::process::exit(1);
            }
        }

        #[cfg(feature = "mcp")]
        Some(Commands::Mcp { install }) => {
            if install {
                print_mcp_install_instructions();
                Ok(())
            } else {
                run_mcp_server()
            }
        }

        Some(Commands::Search {
            query,
            limit,
            weight,
            expand,
            mode,
            events,
            json,
        }) => commands::search::run(SearchArgs {
            query: &query,
            limit,
            weight,
            expand,
            mode: mode.as_deref(),
            events: events.as_deref(),
            json,
        }),
        Some(Commands::Topic { topic, limit, json }) => {
            commands::topic::run(topic.as_deref(), limit, json)
        }
        Some(Commands::Verse { references, json }) => commands::verse::run(&references, json),
        Some(Commands::Chapter {
            book,
            chapter,
            json,
        }) => commands::chapter::run(&book, chapter, json),
        Some(Commands::Precompute { output }) => commands::precompute::run(output),
        Some(Commands::Status { json }) => commands::status::run(json),
    }
}

/// Logs go to stderr: stdout carries command output and the MCP transport.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "info" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "mcp")]
fn run_mcp_server() -> anyhow::Result<()> {
    use romans_road_rag::core::config::{data_root, Config};

    let root = data_root();
    let config = Config::load(&root);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(romans_road_rag::mcp::run_mcp_server(config, &root))
}

#[cfg(feature = "mcp")]
fn print_mcp_install_instructions() {
    use colored::Colorize;
    use romans_road_rag::core::config::{data_root, HOME_ENV};

    let root = data_root().to_string_lossy().to_string();

    println!("{}", "romans-road MCP Server Installation Guide".bold().cyan());
    println!();
    println!("{}", "Data root priority:".bold());
    println!("  1. {} environment variable (recommended)", HOME_ENV.yellow());
    println!("  2. Current working directory (fallback)");
    println!();
    println!(
        "{}",
        "For Claude Desktop (~/.config/claude/claude_desktop_config.json):".dimmed()
    );
    println!(
        r#"{{
  "mcpServers": {{
    "romans-road": {{
      "command": "romans-road",
      "args": ["mcp"],
      "env": {{
        "{}": "{}"
      }}
    }}
  }}
}}"#,
        HOME_ENV, root
    );
    println!();
    println!("{}", "Available tools:".bold());
    println!("  • {} - Hybrid verse search", "bible_search".green());
    println!("  • {} - Curated topic search", "bible_topic".green());
    println!("  • {} - Verse or range by reference", "bible_verse".green());
    println!("  • {} - Several verses by reference", "bible_verses".green());
    println!("  • {} - Engine status", "bible_status".green());
}
