//! Payload codec: base64-wrapped JSON envelopes into structured records.
//!
//! The API hands each record back as standard base64 over UTF-8 JSON. Decoding
//! failures are request-level errors, never fatal to the run.

mod record;

pub use record::Record;

use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

/// Why a transport-encoded payload (or the envelope carrying it) could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response body is not valid JSON: {0}")]
    Envelope(#[source] serde_json::Error),
    #[error("response has no `{0}` payload field")]
    MissingPayload(&'static str),
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("payload is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("payload decodes to JSON {0}, expected an object")]
    NotAnObject(&'static str),
}

/// Decodes a base64 string to the JSON value it wraps, without requiring an object.
pub fn decode_value(encoded: &str) -> Result<serde_json::Value, DecodeError> {
    // Tolerate line-wrapped or padded-with-whitespace text files.
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = general_purpose::STANDARD.decode(compact.as_bytes())?;
    let text = String::from_utf8(bytes)?;
    serde_json::from_str(&text).map_err(DecodeError::Json)
}

/// Decodes a transport-encoded payload into a record.
pub fn decode_payload(encoded: &str) -> Result<Record, DecodeError> {
    match decode_value(encoded)? {
        serde_json::Value::Object(map) => Ok(Record::from(map)),
        other => Err(DecodeError::NotAnObject(json_kind(&other))),
    }
}

pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
