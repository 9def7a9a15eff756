//! Index command - re-embed all documents and refresh index metadata

use anyhow::Result;
use colored::Colorize;

use super::open_engine;

pub fn run(json: bool) -> Result<()> {
    let (mut engine, _config, paths) = open_engine()?;

    if !json {
        println!("{} Rebuilding embeddings...", "→".dimmed());
    }

    let stats = engine.reindex_all()?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "reembedded": stats.reembedded,
                "failed": stats.failed,
                "duration_ms": stats.duration_ms,
            })
        );
    } else {
        println!();
        println!(
            "{} Re-embedded {} documents in {:.2}s",
            "✓".green().bold(),
            stats.reembedded.to_string().cyan(),
            stats.duration_ms as f64 / 1000.0
        );
        if stats.failed > 0 {
            println!("  {} {} documents failed", "✗".red(), stats.failed);
        }
        println!("  {} Index saved to: {}", "→".dimmed(), paths.db.display());
    }

    Ok(())
}
