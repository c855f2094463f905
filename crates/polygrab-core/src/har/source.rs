//! Request source backed by a HAR file the operator exports from the browser.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::parse::{HarEntry, HarLog};
use crate::token::{ObservedRequest, RequestSource};

/// Re-reads the HAR file on every drain and yields only entries not yielded before,
/// so a fresh export after triggering one request in the browser surfaces exactly the
/// new traffic.
#[derive(Debug)]
pub struct HarRequestSource {
    path: PathBuf,
    seen: HashSet<String>,
}

impl HarRequestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            seen: HashSet::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RequestSource for HarRequestSource {
    fn drain(&mut self) -> Result<Vec<ObservedRequest>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no HAR export yet");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("read HAR file: {}", self.path.display()))
            }
        };
        let har: HarLog = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse HAR JSON: {}", self.path.display()))?;

        let mut fresh = Vec::new();
        for (i, entry) in har.log.entries.iter().enumerate() {
            if self.seen.insert(fingerprint(i, entry)) {
                fresh.push(observed(entry));
            }
        }
        tracing::debug!(
            path = %self.path.display(),
            total = har.log.entries.len(),
            fresh = fresh.len(),
            "drained HAR export"
        );
        Ok(fresh)
    }
}

fn fingerprint(index: usize, entry: &HarEntry) -> String {
    match &entry.started_date_time {
        Some(ts) => format!("{}|{}|{}", ts, entry.request.method, entry.request.url),
        None => format!("#{}|{}|{}", index, entry.request.method, entry.request.url),
    }
}

fn observed(entry: &HarEntry) -> ObservedRequest {
    ObservedRequest {
        method: entry.request.method.clone(),
        url: entry.request.url.clone(),
        headers: entry
            .request
            .headers
            .iter()
            .map(|h| (h.name.clone(), h.value.clone()))
            .collect(),
    }
}
