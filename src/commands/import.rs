//! Import command - bulk-add documents from files under a directory

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use glob::Pattern;
use walkdir::WalkDir;

use super::open_engine;

pub fn run(path: &Path, pattern: Option<String>, json: bool) -> Result<()> {
    let (mut engine, config, _paths) = open_engine()?;

    let pattern_str = pattern.unwrap_or(config.import_glob);
    let pattern = Pattern::new(&pattern_str)
        .with_context(|| format!("Invalid glob pattern: {}", pattern_str))?;

    if !json {
        println!(
            "{} Importing {} from {}",
            "→".dimmed(),
            pattern_str.cyan(),
            path.display()
        );
    }

    let mut imported = 0;
    let mut skipped = 0;
    let mut failed = 0;

    for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }

        // Relative path doubles as the document source; a bare file argument
        // has an empty prefix-stripped path, so fall back to its name
        let rel = match entry.path().strip_prefix(path) {
            Ok(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new(entry.file_name()),
        };

        if !pattern.matches_path(rel) {
            continue;
        }

        let text = match std::fs::read_to_string(entry.path()) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Failed to read {}: {}", rel.display(), e);
                failed += 1;
                continue;
            }
        };

        if text.trim().is_empty() {
            skipped += 1;
            continue;
        }

        match engine.add_document_with_source(&text, Some(&rel.to_string_lossy())) {
            Ok(_) => imported += 1,
            Err(e) => {
                eprintln!("Failed to import {}: {}", rel.display(), e);
                failed += 1;
            }
        }
    }

    if json {
        println!(
            "{}",
            serde_json::json!({
                "imported": imported,
                "skipped": skipped,
                "failed": failed,
            })
        );
    } else {
        println!();
        println!(
            "{} Imported {} documents",
            "✓".green().bold(),
            imported.to_string().cyan()
        );
        if skipped > 0 {
            println!("  {} {} files skipped (empty)", "→".dimmed(), skipped);
        }
        if failed > 0 {
            println!("  {} {} files failed", "✗".red(), failed);
        }
    }

    Ok(())
}
