//! End-to-end fetch against a local HTTP server: real curl transport, HAR-backed
//! token capture, real files on disk.

mod common;

use std::collections::VecDeque;
use std::path::Path;

use anyhow::Result;
use polygrab_core::api::CurlTransport;
use polygrab_core::config::ApiConfig;
use polygrab_core::driver::{FetchDriver, Halt};
use polygrab_core::har::HarRequestSource;
use polygrab_core::journal::INDEX_FILENAME;
use polygrab_core::ledger::CompletionLedger;
use polygrab_core::operator::{Command, ConsoleOperator, Operator, StepPrompt};
use polygrab_core::token::{RequestMatcher, TokenBridge};

fn api_for(url: &str) -> ApiConfig {
    ApiConfig {
        url: url.to_string(),
        connect_timeout_secs: 5,
        timeout_secs: 10,
        ..ApiConfig::default()
    }
}

fn write_har(path: &Path, url: &str, entries: &[(&str, &str)]) {
    let entries: Vec<serde_json::Value> = entries
        .iter()
        .map(|(ts, token)| {
            serde_json::json!({
                "startedDateTime": ts,
                "request": {
                    "method": "POST",
                    "url": url,
                    "headers": [
                        { "name": "captchaId", "value": token },
                        { "name": "Content-Type", "value": "application/x-www-form-urlencoded" }
                    ]
                }
            })
        })
        .collect();
    let har = serde_json::json!({ "log": { "version": "1.2", "entries": entries } });
    std::fs::write(path, har.to_string()).unwrap();
}

fn driver(
    api: &ApiConfig,
    out: &Path,
    har: &Path,
    items: &[&str],
) -> FetchDriver<CurlTransport, HarRequestSource> {
    let bridge = TokenBridge::new(
        HarRequestSource::new(har),
        RequestMatcher::from_config(api, false),
    );
    FetchDriver::new(
        api.clone(),
        out,
        items.iter().map(|s| s.to_string()).collect(),
        CurlTransport::from_config(api),
        bridge,
    )
    .unwrap()
}

fn console(input: &str) -> ConsoleOperator<&[u8], Vec<u8>> {
    ConsoleOperator::new(input.as_bytes(), Vec::new())
}

#[test]
fn saves_items_and_second_run_is_offline() {
    let server = common::api_server::start("tok-1");
    let api = api_for(&server.url);
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let har = dir.path().join("session.har");
    write_har(&har, &server.url, &[("2024-01-01T00:00:00Z", "tok-1")]);

    let mut d = driver(&api, &out, &har, &["u-1", "u-2"]);
    let mut op = console("\n\n");
    let summary = d.run(&mut op).unwrap();
    assert_eq!(summary.saved, 2);
    assert_eq!(summary.halt, Halt::Completed);
    assert_eq!(server.request_count(), 2);

    let record: serde_json::Value =
        serde_json::from_slice(&std::fs::read(out.join("P-u-1.json")).unwrap()).unwrap();
    assert_eq!(record["polymer_uuid"], "u-1");
    let ledger = CompletionLedger::new(&out);
    assert!(ledger.exists("u-1") && ledger.exists("u-2"));
    let index = std::fs::read_to_string(out.join(INDEX_FILENAME)).unwrap();
    assert_eq!(index.lines().count(), 2);

    let requests = server.requests.lock().unwrap().clone();
    assert!(requests.iter().all(|r| r.method == "POST"));
    assert_eq!(requests[0].token.as_deref(), Some("tok-1"));
    assert_eq!(requests[1].item.as_deref(), Some("u-2"));

    let output = String::from_utf8(op.into_output()).unwrap();
    assert!(output.contains("Saved P-u-1.json"));

    // Nothing pending: no prompts consumed, no traffic.
    let mut d = driver(&api, &out, &har, &["u-1", "u-2"]);
    let summary = d.run(&mut console("")).unwrap();
    assert_eq!(summary.already_done, 2);
    assert_eq!(server.request_count(), 2);
}

#[test]
fn blocked_response_writes_nothing() {
    let server = common::api_server::start("tok-1");
    let api = api_for(&server.url);
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let har = dir.path().join("session.har");
    write_har(&har, &server.url, &[("2024-01-01T00:00:00Z", "tok-1")]);

    let mut d = driver(&api, &out, &har, &["blocked", "u-2"]);
    let mut op = console("\nq\n");
    let summary = d.run(&mut op).unwrap();
    assert_eq!(summary.blocked, 1);
    assert_eq!(summary.halt, Halt::Quit);
    assert_eq!(d.position(), 0);
    assert!(!CompletionLedger::new(&out).exists("blocked"));
    assert!(!out.join(INDEX_FILENAME).exists());

    let output = String::from_utf8(op.into_output()).unwrap();
    assert!(output.contains("STOP (possible captcha/block)"));
    assert!(output.contains("403"));
}

/// Refreshes the HAR export on every confirm, as an operator re-triggering the request would.
struct ReExportingOperator<'a> {
    commands: VecDeque<Command>,
    har: &'a Path,
    url: String,
    fresh_token: String,
    notices: Vec<String>,
}

impl Operator for ReExportingOperator<'_> {
    fn command(&mut self, _prompt: &StepPrompt<'_>) -> Result<Command> {
        Ok(self.commands.pop_front().unwrap_or(Command::Quit))
    }

    fn confirm(&mut self, _message: &str) -> Result<()> {
        write_har(
            self.har,
            &self.url,
            &[
                ("2024-01-01T00:00:00Z", "tok-1"),
                ("2024-01-01T00:05:00Z", &self.fresh_token),
            ],
        );
        Ok(())
    }

    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

#[test]
fn relearn_after_stale_token_resumes() {
    let server = common::api_server::start("tok-1");
    let api = api_for(&server.url);
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let har = dir.path().join("session.har");
    write_har(&har, &server.url, &[("2024-01-01T00:00:00Z", "tok-1")]);

    let mut d = driver(&api, &out, &har, &["u-1", "u-2"]);
    let mut op = ReExportingOperator {
        commands: VecDeque::from([Command::Fetch]),
        har: &har,
        url: server.url.clone(),
        fresh_token: "tok-2".to_string(),
        notices: Vec::new(),
    };
    d.step(&mut op).unwrap();
    assert_eq!(d.position(), 1);

    server.set_token("tok-2");
    op.commands = VecDeque::from([Command::Fetch, Command::Relearn, Command::Fetch]);
    let summary = d.run(&mut op).unwrap();
    assert_eq!(summary.blocked, 1);
    assert_eq!(summary.saved, 1);
    assert_eq!(summary.halt, Halt::Completed);
    assert_eq!(d.bridge().current().map(|t| t.value.as_str()), Some("tok-2"));
    assert!(CompletionLedger::new(&out).exists("u-2"));

    let tokens: Vec<Option<String>> = server
        .requests
        .lock()
        .unwrap()
        .iter()
        .map(|r| r.token.clone())
        .collect();
    assert_eq!(
        tokens,
        vec![
            Some("tok-1".to_string()),
            Some("tok-1".to_string()),
            Some("tok-2".to_string())
        ]
    );
    assert!(op.notices.iter().any(|n| n.starts_with("Updated captchaId")));
}
