//! Tally MCP Server
//!
//! Exposes the tally expense ledger over the Model Context Protocol so LLM
//! clients can record, query, and analyze expenses conversationally.

pub mod mcp;

pub use mcp::{start_mcp_server, TallyMcpServer};
