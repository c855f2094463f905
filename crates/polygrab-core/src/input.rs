//! Item list: newline-delimited identifiers, file order is processing order.

use anyhow::{Context, Result};
use std::path::Path;

/// Parses identifiers from text; surrounding whitespace trimmed, blank lines ignored.
pub fn parse_items(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

pub fn read_items(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read item list: {}", path.display()))?;
    let items = parse_items(&text);
    tracing::debug!(path = %path.display(), count = items.len(), "loaded item list");
    Ok(items)
}
