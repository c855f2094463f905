//! libcurl-backed transport.

use std::str;
use std::time::Duration;

use curl::easy::{Easy, List};

use super::parse::parse_content_type;
use super::{ApiRequest, ApiResponse, Transport, TransportError};
use crate::config::ApiConfig;

/// Blocking transport: one fresh curl handle per request, no redirects followed.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    connect_timeout: Duration,
    timeout: Duration,
}

impl CurlTransport {
    pub fn new(connect_timeout: Duration, timeout: Duration) -> Self {
        Self {
            connect_timeout,
            timeout,
        }
    }

    pub fn from_config(api: &ApiConfig) -> Self {
        Self::new(
            Duration::from_secs(api.connect_timeout_secs),
            Duration::from_secs(api.timeout_secs),
        )
    }
}

impl Transport for CurlTransport {
    fn post_form(&mut self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = Easy::new();
        easy.url(&request.url)?;
        easy.post(true)?;
        easy.post_fields_copy(request.encoded_form().as_bytes())?;
        easy.follow_location(false)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;

        let mut list = List::new();
        for (k, v) in &request.headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
        // A bare `Expect:` stops curl from waiting on `100 Continue`.
        list.append("Expect:")?;
        easy.http_headers(list)?;

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    header_lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        Ok(ApiResponse {
            status,
            content_type: parse_content_type(&header_lines),
            body,
        })
    }
}
