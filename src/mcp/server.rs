//! Document search MCP Server implementation

use anyhow::Result;
use rmcp::{
    model::{CallToolResult, Content, ServerInfo},
    tool, tool_router,
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::{Config, DataPaths};
use crate::search::embedding::HashEmbedder;
use crate::search::engine::SearchEngine;
use crate::store::{DocId, DocumentStore, SqliteStore};

/// Parameters for doc_search tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Natural language search query (e.g., "vector index rebuild")
    #[schemars(description = "Natural language search query")]
    pub query: String,
    /// Maximum number of results to return (default: 5)
    #[schemars(description = "Maximum number of results (default: 5)")]
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    5
}

/// Parameters for doc_add tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddParams {
    /// Document text to embed and store
    #[schemars(description = "Document text to embed and store")]
    pub text: String,
    /// Optional source label (e.g. a file path)
    #[schemars(description = "Optional source label")]
    #[serde(default)]
    pub source: Option<String>,
}

/// Parameters for doc_get tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetParams {
    /// Document id to retrieve
    #[schemars(description = "Document id to retrieve")]
    pub id: DocId,
}

/// Search hit for JSON output
#[derive(Debug, Serialize)]
struct SearchHitJson {
    id: DocId,
    text: String,
    source: Option<String>,
    score: f32,
}

/// Document info for JSON output
#[derive(Debug, Serialize)]
struct DocumentJson {
    id: DocId,
    text: String,
    source: Option<String>,
    added_at: i64,
}

/// Document search MCP Service
#[derive(Clone)]
pub struct DocService {
    root: PathBuf,
    tool_router: ToolRouter<Self>,
}

impl DocService {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            tool_router: Self::tool_router(),
        }
    }

    // rusqlite connections are not Sync, so every tool call opens a fresh
    // engine instead of holding one in the service
    fn open_engine(&self) -> Result<SearchEngine<SqliteStore>, McpError> {
        let paths = DataPaths::from_root(self.root.clone());
        let config = Config::load(&paths.config)
            .map_err(|e| McpError::internal_error(format!("Failed to load config: {}", e), None))?;

        std::fs::create_dir_all(&paths.data_dir).map_err(|e| {
            McpError::internal_error(format!("Failed to create data directory: {}", e), None)
        })?;
        let store = SqliteStore::open(&paths.db)
            .map_err(|e| McpError::internal_error(format!("Failed to open store: {}", e), None))?;

        Ok(SearchEngine::with_embedder(
            store,
            Box::new(HashEmbedder::new(config.dimension)),
        ))
    }
}

#[tool_router]
impl DocService {
    /// Search documents using semantic similarity
    #[tool(description = "Search stored documents using semantic similarity. Returns the documents closest to the query with similarity scores, best first.")]
    async fn doc_search(
        &self,
        params: Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut engine = self.open_engine()?;
        // Clamp limit: default 5, max 100 (DoS prevention)
        let limit = params.0.limit.max(1).min(100);
        let limit = if limit == 1 && params.0.limit == 0 { 5 } else { limit };

        engine.build_index().map_err(|e| {
            McpError::internal_error(format!("Index build failed: {}", e), None)
        })?;
        let results = engine
            .search(&params.0.query, limit)
            .map_err(|e| McpError::internal_error(format!("Search failed: {}", e), None))?;

        let json_results: Vec<SearchHitJson> = results
            .into_iter()
            .map(|hit| SearchHitJson {
                id: hit.id,
                text: hit.text,
                source: hit.source,
                score: hit.score,
            })
            .collect();

        let output = serde_json::to_string_pretty(&json_results).map_err(|e| {
            McpError::internal_error(format!("JSON serialization failed: {}", e), None)
        })?;

        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    /// Add a document to the store
    #[tool(description = "Embed a text document and append it to the search store.")]
    async fn doc_add(&self, params: Parameters<AddParams>) -> Result<CallToolResult, McpError> {
        let mut engine = self.open_engine()?;

        let doc = engine
            .add_document_with_source(&params.0.text, params.0.source.as_deref())
            .map_err(|e| McpError::internal_error(format!("Add failed: {}", e), None))?;

        let info = DocumentJson {
            id: doc.id,
            text: doc.text,
            source: doc.source,
            added_at: doc.added_at,
        };

        let output = serde_json::to_string_pretty(&info).map_err(|e| {
            McpError::internal_error(format!("JSON serialization failed: {}", e), None)
        })?;

        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    /// Get a stored document by id
    #[tool(description = "Get the full text and metadata of a stored document by id.")]
    async fn doc_get(&self, params: Parameters<GetParams>) -> Result<CallToolResult, McpError> {
        let engine = self.open_engine()?;

        let found = engine
            .store()
            .document(params.0.id)
            .map_err(|e| McpError::internal_error(format!("Lookup failed: {}", e), None))?;

        match found {
            Some(doc) => {
                let info = DocumentJson {
                    id: doc.id,
                    text: doc.text,
                    source: doc.source,
                    added_at: doc.added_at,
                };

                let output = serde_json::to_string_pretty(&info).map_err(|e| {
                    McpError::internal_error(format!("JSON serialization failed: {}", e), None)
                })?;

                Ok(CallToolResult::success(vec![Content::text(output)]))
            }
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                "Document not found: {}",
                params.0.id
            ))])),
        }
    }

    /// Get store status summary
    #[tool(description = "Get document store status: document and embedding counts, embedding dimension, and last index build time.")]
    async fn doc_status(&self) -> Result<CallToolResult, McpError> {
        let engine = self.open_engine()?;

        let stats = engine
            .store()
            .get_stats()
            .map_err(|e| McpError::internal_error(format!("Stats failed: {}", e), None))?;

        let output = serde_json::json!({
            "documents": stats.document_count,
            "embeddings": stats.embedding_count,
            "dimension": engine.embedder().dimension(),
            "embedder": engine.embedder().name(),
            "last_built": stats.last_built,
        });

        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&output).unwrap_or_default(),
        )]))
    }
}

impl ServerHandler for DocService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Document search MCP server. Stores text documents and retrieves them by semantic similarity.".to_string(),
            ),
            ..Default::default()
        }
    }
}

/// Run the MCP server
pub async fn run_mcp_server(root: PathBuf) -> Result<()> {
    use tokio::io::{stdin, stdout};

    let service = DocService::new(root);
    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
