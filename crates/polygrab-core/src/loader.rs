//! Downstream reader over previously saved data. Decodes and aggregates; no analysis.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::codec::decode_value;
use crate::journal::INDEX_FILENAME;
use crate::naming::POINTER_SUFFIX;

/// Field holding the records of one search-listing page.
const LISTING_FIELD: &str = "polymer_data";

/// `b64_<n>.txt` listing pages in `dir`, sorted by `n`.
pub fn listing_page_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pages: Vec<(u64, PathBuf)> = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("read dir: {}", dir.display()))? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let number = name
            .strip_prefix("b64_")
            .and_then(|rest| rest.strip_suffix(".txt"))
            .and_then(|n| n.parse::<u64>().ok());
        if let Some(n) = number {
            pages.push((n, path));
        }
    }
    pages.sort_by_key(|(n, _)| *n);
    Ok(pages.into_iter().map(|(_, p)| p).collect())
}

/// Decodes every listing page and collects each page's `polymer_data` value.
pub fn load_listing_pages(dir: &Path) -> Result<Vec<Value>> {
    listing_page_paths(dir)?
        .iter()
        .map(|path| {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read listing page: {}", path.display()))?;
            let mut page = decode_value(text.trim())
                .with_context(|| format!("decode listing page: {}", path.display()))?;
            page.get_mut(LISTING_FIELD)
                .map(Value::take)
                .with_context(|| format!("{} has no `{}`", path.display(), LISTING_FIELD))
        })
        .collect()
}

/// True for files in an output directory that hold a saved record.
pub fn is_record_file(name: &str) -> bool {
    name.ends_with(".json") && !name.ends_with(POINTER_SUFFIX) && name != INDEX_FILENAME
}

/// Reads every saved record in an output directory, sorted by filename.
pub fn load_records(dir: &Path) -> Result<Vec<Value>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("read dir: {}", dir.display()))? {
        let path = entry?.path();
        if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(is_record_file)
        {
            paths.push(path);
        }
    }
    paths.sort();
    paths
        .iter()
        .map(|path| {
            let bytes =
                std::fs::read(path).with_context(|| format!("read record: {}", path.display()))?;
            serde_json::from_slice(&bytes)
                .with_context(|| format!("parse record: {}", path.display()))
        })
        .collect()
}
