//! Remote API plumbing: one authenticated form POST per item.
//!
//! The driver only depends on the [`Transport`] trait; [`CurlTransport`] is the
//! libcurl-backed implementation used by the CLI.

mod classify;
mod error;
mod http;
mod parse;

pub use classify::{classify, looks_blocked, BlockedResponse, Classified, BODY_HEAD_CHARS};
pub use error::TransportError;
pub use http::CurlTransport;

/// A fully built request: URL, headers in send order, and form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
}

impl ApiRequest {
    /// `application/x-www-form-urlencoded` body for `form`.
    pub fn encoded_form(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.form.iter())
            .finish()
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// What came back: status, content type and raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u32,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Issues one request. Network-level faults are `TransportError`; any HTTP response,
/// whatever its status, is `Ok`.
pub trait Transport {
    fn post_form(&mut self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}
