//! Classify API responses: healthy payload, or blocked (challenged / rejected).
//!
//! A token that has silently expired looks exactly like any other block; there is no
//! separate expiry signal.

use std::fmt;

use serde_json::Value;

use super::ApiResponse;
use crate::codec::{json_kind, DecodeError};

/// How much of a blocked body is shown to the operator.
pub const BODY_HEAD_CHARS: usize = 400;

/// Envelope field that carries the base64 payload.
const PAYLOAD_FIELD: &str = "json";

/// Diagnostic for a response that was rejected or challenged rather than served.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockedResponse {
    /// Non-200 status or non-JSON content type (login page, captcha wall, WAF).
    Http {
        status: u32,
        content_type: String,
        body_head: String,
    },
    /// Well-formed API reply whose `result` flag is false.
    Rejected { message: Option<Value> },
}

impl fmt::Display for BlockedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockedResponse::Http {
                status,
                content_type,
                body_head,
            } => write!(
                f,
                "HTTP {}, content-type={:?}, body head: {:?}",
                status, content_type, body_head
            ),
            BlockedResponse::Rejected { message: Some(Value::String(m)) } => {
                write!(f, "API returned result=false: {}", m)
            }
            BlockedResponse::Rejected { message: Some(m) } => {
                write!(f, "API returned result=false: {}", m)
            }
            BlockedResponse::Rejected { message: None } => {
                write!(f, "API returned result=false (no message)")
            }
        }
    }
}

/// Outcome of classifying a response that was read successfully.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    /// `result` was true; carries the still-encoded payload.
    Healthy(String),
    Blocked(BlockedResponse),
}

/// True if status/content type say the request was not served as API data.
pub fn looks_blocked(status: u32, content_type: &str) -> bool {
    status != 200 || !content_type.to_ascii_lowercase().contains("json")
}

/// Classifies a response. A body that claims JSON but does not parse, or a served
/// reply without payload, is a decode failure rather than a block.
pub fn classify(response: &ApiResponse) -> Result<Classified, DecodeError> {
    let content_type = response.content_type.as_deref().unwrap_or("");
    if looks_blocked(response.status, content_type) {
        return Ok(Classified::Blocked(BlockedResponse::Http {
            status: response.status,
            content_type: content_type.to_string(),
            body_head: body_head(&response.body),
        }));
    }

    let top: Value = serde_json::from_slice(&response.body).map_err(DecodeError::Envelope)?;
    let top = match top {
        Value::Object(map) => map,
        other => return Err(DecodeError::NotAnObject(json_kind(&other))),
    };

    if !top.get("result").and_then(Value::as_bool).unwrap_or(false) {
        return Ok(Classified::Blocked(BlockedResponse::Rejected {
            message: top.get("message").cloned(),
        }));
    }

    match top.get(PAYLOAD_FIELD).and_then(Value::as_str) {
        Some(payload) => Ok(Classified::Healthy(payload.to_string())),
        None => Err(DecodeError::MissingPayload(PAYLOAD_FIELD)),
    }
}

fn body_head(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .chars()
        .take(BODY_HEAD_CHARS)
        .collect()
}
