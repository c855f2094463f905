//! Tab-separated error log, truncated at the start of every run.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const ERRORS_FILENAME: &str = "errors.tsv";

#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    /// Opens the log for a new run, discarding the previous run's lines.
    pub fn start_run(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        std::fs::write(&path, b"").with_context(|| format!("reset error log: {}", path.display()))?;
        Ok(Self { path })
    }

    pub fn start_run_in(dir: &Path) -> Result<Self> {
        Self::start_run(dir.join(ERRORS_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `<item>\t<description>`; the description is flattened to one line.
    pub fn append(&self, item_id: &str, description: &str) -> Result<()> {
        let line = format!("{}\t{}\n", flatten(item_id), flatten(description));
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open error log: {}", self.path.display()))?;
        f.write_all(line.as_bytes())
            .with_context(|| format!("append error log: {}", self.path.display()))?;
        Ok(())
    }
}

fn flatten(s: &str) -> String {
    s.chars()
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_run_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ERRORS_FILENAME);
        std::fs::write(&path, "old\tline\n").unwrap();
        let log = ErrorLog::start_run(&path).unwrap();
        assert_eq!(std::fs::read_to_string(log.path()).unwrap(), "");
    }

    #[test]
    fn append_keeps_one_line_per_error() {
        let dir = tempfile::tempdir().unwrap();
        let log = ErrorLog::start_run_in(dir.path()).unwrap();
        log.append("u-1", "payload is not valid JSON:\nline 1\tcolumn 2")
            .unwrap();
        let text = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(text, "u-1\tpayload is not valid JSON: line 1 column 2\n");
    }
}
