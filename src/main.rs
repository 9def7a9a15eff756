mod commands;
mod config;
mod error;
#[cfg(feature = "mcp")]
mod mcp;
mod search;
mod store;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "semsearch")]
#[command(about = "Semantic document search with deterministic embeddings", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed and store one document
    Add {
        text: String,
        #[arg(long, help = "Source label (e.g. a file path)")]
        source: Option<String>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Bulk-add documents from files under a directory
    Import {
        path: PathBuf,
        #[arg(long, help = "Glob pattern for files to import")]
        glob: Option<String>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Show stored documents, newest first
    List {
        #[arg(long, short, help = "Limit results")]
        limit: Option<usize>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Search stored documents by meaning
    Search {
        query: String,
        #[arg(long, short, help = "Limit results")]
        limit: Option<usize>,
        #[arg(long, help = "Keyword matching instead of embeddings")]
        keyword: bool,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Re-embed all documents and rebuild the index
    Index {
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Show document counts and index metadata
    Status {
        #[arg(long, help = "JSON output")]
        json: bool,
    },

    // ===== MCP Server =====
    /// Start MCP server for Claude integration
    #[cfg(feature = "mcp")]
    Mcp {
        #[arg(long, help = "Show Claude configuration instructions")]
        install: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Add { text, source, json } => commands::add::run(&text, source, json),
        Commands::Import { path, glob, json } => commands::import::run(&path, glob, json),
        Commands::List { limit, json } => commands::list::run(limit, json),
        Commands::Search {
            query,
            limit,
            keyword,
            json,
        } => commands::search::run(&query, limit, keyword, json),
        Commands::Index { json } => commands::index::run(json),
        Commands::Status { json } => commands::status::run(json),

        // MCP Server
        #[cfg(feature = "mcp")]
        Commands::Mcp { install } => {
            if install {
                print_mcp_install_instructions();
                Ok(())
            } else {
                run_mcp_server()
            }
        }
    }
}

#[cfg(feature = "mcp")]
fn run_mcp_server() -> anyhow::Result<()> {
    let root = std::env::current_dir()?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(mcp::run_mcp_server(root))
}

#[cfg(feature = "mcp")]
fn print_mcp_install_instructions() {
    use colored::Colorize;

    let root = std::env::current_dir()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| "/path/to/your/documents".to_string());

    let binary_path = std::env::current_exe()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| "semsearch".to_string());

    println!("{}", "MCP Server Installation Guide".bold().cyan());
    println!();
    println!("Add the following to your Claude configuration:");
    println!();
    println!(
        "{}",
        "For Claude Desktop (~/.config/claude/claude_desktop_config.json):".dimmed()
    );
    println!(
        r#"{{
  "mcpServers": {{
    "semsearch": {{
      "command": "{}",
      "args": ["mcp"],
      "cwd": "{}"
    }}
  }}
}}"#,
        binary_path, root
    );
    println!();
    println!("{}", "For Claude Code (~/.claude/settings.json):".dimmed());
    println!(
        r#"{{
  "mcpServers": {{
    "semsearch": {{
      "command": "{}",
      "args": ["mcp"],
      "cwd": "{}"
    }}
  }}
}}"#,
        binary_path, root
    );
    println!();
    println!("{}", "Available tools:".bold());
    println!(
        "  • {} - Semantic search over stored documents",
        "doc_search".green()
    );
    println!("  • {} - Add a document to the store", "doc_add".green());
    println!("  • {} - Get a stored document by id", "doc_get".green());
    println!(
        "  • {} - Document counts and index metadata",
        "doc_status".green()
    );
}
