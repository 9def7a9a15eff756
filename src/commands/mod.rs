//! CLI commands

pub mod add;
pub mod import;
pub mod index;
pub mod list;
pub mod search;
pub mod status;

use anyhow::Result;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::{Config, DataPaths};
use crate::search::embedding::HashEmbedder;
use crate::search::engine::SearchEngine;
use crate::store::SqliteStore;

/// Open the engine over the working directory's database, creating the
/// data directory on first use.
fn open_engine() -> Result<(SearchEngine<SqliteStore>, Config, DataPaths)> {
    let paths = DataPaths::new();
    let config = Config::load(&paths.config)?;

    std::fs::create_dir_all(&paths.data_dir)?;
    let store = SqliteStore::open(&paths.db)?;
    let engine = SearchEngine::with_embedder(store, Box::new(HashEmbedder::new(config.dimension)));

    Ok((engine, config, paths))
}

/// First line of text, clipped to a terminal display width (wide chars count
/// as two columns).
fn preview(text: &str, max_width: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    if UnicodeWidthStr::width(line) <= max_width {
        return line.to_string();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in line.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > max_width.saturating_sub(3) {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push_str("...");
    out
}
