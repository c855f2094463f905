//! Append-only JSONL index of saved records, for auditing. Never read by the driver.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::codec::Record;
use crate::storage::WriteError;

/// Default index filename inside the output directory.
pub const INDEX_FILENAME: &str = "index.jsonl";

/// One line of `index.jsonl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// UTC completion time, second precision (`2026-01-02T03:04:05Z`).
    pub ts: String,
    pub pid_uuid: String,
    pub polymer_id: Option<Value>,
    pub polymer_uuid: Option<Value>,
    pub filename: String,
}

impl IndexEntry {
    pub fn new(at: DateTime<Utc>, item_id: &str, record: &Record, filename: &str) -> Self {
        Self {
            ts: at.to_rfc3339_opts(SecondsFormat::Secs, true),
            pid_uuid: item_id.to_string(),
            polymer_id: record.polymer_id_value().cloned(),
            polymer_uuid: record.polymer_uuid().cloned(),
            filename: filename.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndexLog {
    path: PathBuf,
}

impl IndexLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(INDEX_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one newline-terminated entry.
    pub fn append(&self, entry: &IndexEntry) -> Result<(), WriteError> {
        let mut line = serde_json::to_string(entry).map_err(|source| WriteError::Serialize {
            path: self.path.clone(),
            source,
        })?;
        line.push('\n');
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| WriteError::io("open", &self.path, e))?;
        f.write_all(line.as_bytes())
            .map_err(|e| WriteError::io("append", &self.path, e))
    }
}
