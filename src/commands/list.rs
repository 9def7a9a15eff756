//! List command - show stored documents, newest first

use anyhow::Result;
use colored::Colorize;

use crate::store::DocumentStore;

use super::{open_engine, preview};

const PREVIEW_WIDTH: usize = 60;

pub fn run(limit: Option<usize>, json: bool) -> Result<()> {
    let (engine, _config, _paths) = open_engine()?;

    let mut docs = engine.store().documents()?;
    let total = docs.len();
    docs.reverse();
    docs.truncate(limit.unwrap_or(20));

    if json {
        let json_docs: Vec<_> = docs
            .iter()
            .map(|d| {
                serde_json::json!({
                    "id": d.id,
                    "text": d.text,
                    "source": d.source,
                    "added_at": d.added_at,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json_docs)?);
    } else {
        if docs.is_empty() {
            println!(
                "{} No documents stored. Run {} first.",
                "!".yellow().bold(),
                "semsearch add".cyan()
            );
            return Ok(());
        }

        println!(
            "{} {} of {} documents (newest first)",
            "→".dimmed(),
            docs.len(),
            total
        );
        println!();

        for doc in &docs {
            let added = chrono::DateTime::from_timestamp(doc.added_at, 0)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "unknown".to_string());

            println!(
                "{:>4}. {}  {}",
                doc.id.to_string().bold(),
                preview(&doc.text, PREVIEW_WIDTH),
                added.dimmed()
            );
            if let Some(ref source) = doc.source {
                println!("      {}", source.dimmed());
            }
        }
    }

    Ok(())
}
