//! MCP Server for document search
//!
//! Provides AI-native access to the document store and semantic retrieval.

mod server;

pub use server::run_mcp_server;
