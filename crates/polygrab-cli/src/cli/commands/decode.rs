//! `polygrab decode` – print one transport-encoded payload as JSON.

use anyhow::{Context, Result};
use polygrab_core::codec::decode_value;
use serde_json::Value;
use std::path::Path;

/// Field of an API reply that carries the encoded record.
const PAYLOAD_FIELD: &str = "json";

pub fn run_decode(path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read payload file: {}", path.display()))?;
    let value = decode_text(&text).with_context(|| format!("decode {}", path.display()))?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// Accepts either the base64 text itself or a whole API reply wrapping it.
pub(crate) fn decode_text(text: &str) -> Result<Value> {
    let trimmed = text.trim();
    if trimmed.starts_with('{') {
        let envelope: Value = serde_json::from_str(trimmed).context("parse API reply")?;
        let encoded = envelope
            .get(PAYLOAD_FIELD)
            .and_then(Value::as_str)
            .with_context(|| format!("API reply has no string `{}` field", PAYLOAD_FIELD))?;
        return Ok(decode_value(encoded)?);
    }
    Ok(decode_value(trimmed)?)
}
