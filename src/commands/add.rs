//! Add command - embed and store one document

use anyhow::Result;
use colored::Colorize;

use crate::store::DocumentStore;

use super::open_engine;

pub fn run(text: &str, source: Option<String>, json: bool) -> Result<()> {
    let (mut engine, _config, paths) = open_engine()?;

    let doc = engine.add_document_with_source(text, source.as_deref())?;
    let stored = engine.store().count()?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "id": doc.id,
                "text": doc.text,
                "source": doc.source,
                "added_at": doc.added_at,
                "stored": stored,
            })
        );
    } else {
        println!(
            "{} Added document {} ({} stored)",
            "✓".green().bold(),
            doc.id.to_string().cyan(),
            stored
        );
        println!("  {} Database: {}", "→".dimmed(), paths.db.display());
    }

    Ok(())
}
