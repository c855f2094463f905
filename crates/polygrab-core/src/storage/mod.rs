//! Durable writes: serialize to a sibling temp file, sync, then atomically rename.
//!
//! An observer of the final path sees either the previous file or the complete new
//! content, never a truncated one. A crash between staging and rename leaves only a
//! stale `.tmp` sibling, which the next write to the same path truncates.

mod writer;

pub use writer::StagedFile;

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".tmp";

/// I/O or serialization failure while persisting a record or pointer.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("serialize {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WriteError {
    pub(crate) fn io(op: &'static str, path: &Path, source: std::io::Error) -> Self {
        WriteError::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Path for the temp file: appends `.tmp` to the final path (e.g. `P1.json` → `P1.json.tmp`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Writes `value` as pretty JSON to `path` via stage + rename.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), WriteError> {
    let json = serde_json::to_vec_pretty(value).map_err(|source| WriteError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    let mut staged = StagedFile::create(&temp_path(path))?;
    staged.write_all(&json)?;
    staged.sync()?;
    staged.finalize(path)
}
