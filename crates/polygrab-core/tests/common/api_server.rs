//! Minimal HTTP/1.1 server that imitates the record API for integration tests.
//!
//! Accepts form POSTs carrying `pid_uuid` and a `captchaId` header. A request with the
//! expected token gets `{"result": true, "json": <base64 record>}`; a wrong token gets
//! `result: false`; the identifier `blocked` gets a 403 HTML page. Every request is
//! recorded so tests can count network traffic.

use base64::{engine::general_purpose, Engine as _};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub token: Option<String>,
    pub item: Option<String>,
}

pub struct ApiServer {
    pub url: String,
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
    pub token: Arc<Mutex<String>>,
}

impl ApiServer {
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Rotates the accepted token, as if the server-side session moved on.
    pub fn set_token(&self, token: &str) {
        *self.token.lock().unwrap() = token.to_string();
    }
}

/// Starts a server in a background thread accepting `token`. Runs until the process exits.
pub fn start(token: &str) -> ApiServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let token = Arc::new(Mutex::new(token.to_string()));
    {
        let requests = Arc::clone(&requests);
        let token = Arc::clone(&token);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let requests = Arc::clone(&requests);
                let token = Arc::clone(&token);
                thread::spawn(move || handle(stream, &requests, &token));
            }
        });
    }
    ApiServer {
        url: format!("http://127.0.0.1:{}/PoLyInfo/api/6627766", port),
        requests,
        token,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    requests: &Mutex<Vec<RecordedRequest>>,
    token: &Mutex<String>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let Some((head, body)) = read_request(&mut stream) else {
        return;
    };
    let (method, headers) = parse_head(&head);
    let header = |name: &str| {
        headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    };
    let item = url::form_urlencoded::parse(&body)
        .find(|(k, _)| k == "pid_uuid")
        .map(|(_, v)| v.into_owned());
    let sent_token = header("captchaId");
    requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        token: sent_token.clone(),
        item: item.clone(),
    });

    let expected = token.lock().unwrap().clone();
    let (status, content_type, body) = if item.as_deref() == Some("blocked") {
        (
            "403 Forbidden",
            "text/html",
            "<html><body>Access denied</body></html>".to_string(),
        )
    } else if sent_token.as_deref() != Some(expected.as_str()) {
        (
            "200 OK",
            "application/json",
            r#"{"result": false, "message": "captcha required"}"#.to_string(),
        )
    } else {
        let item = item.unwrap_or_default();
        let record = serde_json::json!({
            "polymer_id": format!("P-{}", item),
            "polymer_uuid": item,
            "monomers": ["CH2=CH2"],
        });
        let b64 = general_purpose::STANDARD.encode(record.to_string());
        (
            "200 OK",
            "application/json; charset=UTF-8",
            serde_json::json!({"result": true, "json": b64}).to_string(),
        )
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        content_type,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

/// Reads the header block and a Content-Length body.
fn read_request(stream: &mut std::net::TcpStream) -> Option<(String, Vec<u8>)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let content_length = parse_head(&head)
        .1
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < head_end + content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = buf[head_end..].to_vec();
    Some((head, body))
}

fn parse_head(head: &str) -> (String, Vec<(String, String)>) {
    let mut lines = head.lines();
    let method = lines
        .next()
        .and_then(|l| l.split_whitespace().next())
        .unwrap_or("")
        .to_string();
    let headers = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();
    (method, headers)
}
