//! `polygrab load` – aggregate listing pages or saved records into one JSON array.

use anyhow::Result;
use polygrab_core::loader::{listing_page_paths, load_listing_pages, load_records};
use serde_json::Value;
use std::path::Path;

pub fn run_load(dir: &Path) -> Result<()> {
    let values = collect(dir)?;
    tracing::info!(dir = %dir.display(), count = values.len(), "loaded");
    println!("{}", serde_json::to_string_pretty(&Value::Array(values))?);
    Ok(())
}

/// Listing pages when `dir` has any, otherwise saved records.
fn collect(dir: &Path) -> Result<Vec<Value>> {
    if listing_page_paths(dir)?.is_empty() {
        load_records(dir)
    } else {
        load_listing_pages(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_listing_pages() {
        let dir = tempfile::tempdir().unwrap();
        // base64 of {"polymer_data":[1,2]}
        std::fs::write(dir.path().join("b64_1.txt"), "eyJwb2x5bWVyX2RhdGEiOlsxLDJdfQ==").unwrap();
        std::fs::write(dir.path().join("P1.json"), r#"{"polymer_id":"P1"}"#).unwrap();
        let values = collect(dir.path()).unwrap();
        assert_eq!(values, vec![serde_json::json!([1, 2])]);
    }

    #[test]
    fn falls_back_to_records() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("P1.json"), r#"{"polymer_id":"P1"}"#).unwrap();
        std::fs::write(dir.path().join("u.pointer.json"), r#"{"pid_uuid":"u"}"#).unwrap();
        let values = collect(dir.path()).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0]["polymer_id"], "P1");
    }
}
