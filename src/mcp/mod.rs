//! MCP Server for scripture retrieval
//!
//! Exposes hybrid search, topic search and verse lookup to an LLM host
//! over stdio.

mod params;
mod server;
mod types;

pub use server::{run_mcp_server, BibleService};
