//! Search command - semantic retrieval over stored documents

use anyhow::{Context, Result};
use colored::Colorize;

use crate::search::engine::{keyword_search, SearchHit};

use super::{open_engine, preview};

const PREVIEW_WIDTH: usize = 100;

pub fn run(query: &str, limit: Option<usize>, keyword: bool, json: bool) -> Result<()> {
    let (mut engine, config, _paths) = open_engine()?;
    let limit = limit.unwrap_or(config.default_limit);

    let results = if keyword {
        keyword_search(engine.store(), query, limit)?
    } else {
        engine
            .build_index()
            .context("Failed to build index (run `semsearch index` after a dimension change)")?;
        engine.search(query, limit)?
    };

    if json {
        print_json(&results, keyword)?;
    } else {
        print_results(&results, query, keyword);
    }

    Ok(())
}

fn print_json(results: &[SearchHit], keyword: bool) -> Result<()> {
    let json_results: Vec<_> = results
        .iter()
        .map(|hit| {
            serde_json::json!({
                "id": hit.id,
                "text": hit.text,
                "source": hit.source,
                "score": hit.score,
                "mode": if keyword { "keyword" } else { "semantic" },
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&json_results)?);
    Ok(())
}

fn print_results(results: &[SearchHit], query: &str, keyword: bool) {
    if keyword {
        println!("{} Keyword search (no embeddings)", "!".yellow());
        println!();
    }

    if results.is_empty() {
        println!("{} No results found for: {}", "→".dimmed(), query.cyan());
        return;
    }

    println!(
        "{} {} results for: {}",
        "→".dimmed(),
        results.len(),
        query.cyan()
    );
    println!();

    for (i, hit) in results.iter().enumerate() {
        let score_str = if keyword {
            format!("{:.0}%", hit.score * 100.0)
        } else {
            format!("{:.2}", hit.score)
        };
        let score_colored = if keyword {
            score_str.dimmed()
        } else if hit.score > 0.8 {
            score_str.green()
        } else if hit.score > 0.6 {
            score_str.yellow()
        } else {
            score_str.dimmed()
        };

        println!(
            "{}. [{}] {}",
            (i + 1).to_string().bold(),
            score_colored,
            preview(&hit.text, PREVIEW_WIDTH).cyan()
        );

        if let Some(ref source) = hit.source {
            println!("   {}", source.dimmed());
        }
        println!();
    }
}
