//! Status command - document counts and index metadata

use anyhow::Result;
use colored::Colorize;

use super::open_engine;

pub fn run(json: bool) -> Result<()> {
    let (engine, config, paths) = open_engine()?;

    let stats = engine.store().get_stats()?;
    let db_size = std::fs::metadata(&paths.db).map(|m| m.len()).unwrap_or(0);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "documents": stats.document_count,
                "embeddings": stats.embedding_count,
                "dimension": config.dimension,
                "embedder": engine.embedder().name(),
                "last_built": stats.last_built,
                "db_path": paths.db.display().to_string(),
                "db_size_bytes": db_size,
            })
        );
    } else {
        println!("{}", "Index Status".bold());
        println!();
        println!(
            "  {} {} documents",
            "→".dimmed(),
            stats.document_count.to_string().cyan()
        );
        println!(
            "  {} {} embeddings ({} dims, {})",
            "→".dimmed(),
            stats.embedding_count.to_string().cyan(),
            config.dimension,
            engine.embedder().name()
        );
        println!("  {} Size: {:.2} KB", "→".dimmed(), db_size as f64 / 1024.0);
        if let Some(ts) = stats.last_built {
            let dt = chrono::DateTime::from_timestamp(ts, 0)
                .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "unknown".to_string());
            println!("  {} Last built: {}", "→".dimmed(), dt);
        }
        println!("  {} Database: {}", "→".dimmed(), paths.db.display());
    }

    Ok(())
}
