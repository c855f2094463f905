//! Completion ledger: one pointer file per finished item.
//!
//! A pointer counts only for the item named in its body. It is written atomically and
//! only after the record itself is durably on disk, so a pointer always refers to a
//! complete output file. Identifiers that sanitize to the same stem get separate
//! pointer slots.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::naming::pointer_filename;
use crate::storage::{write_json_atomic, WriteError};

/// Body of `<safe-id>.pointer.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionPointer {
    pub pid_uuid: String,
    /// Output filename (relative to the output directory) holding the record.
    pub filename: String,
}

/// Where an item's pointer lives, or would be written.
enum Slot {
    Committed(PathBuf, CompletionPointer),
    Free(PathBuf),
}

#[derive(Debug, Clone)]
pub struct CompletionLedger {
    dir: PathBuf,
}

impl CompletionLedger {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// True if the item has been durably saved by an earlier step or run.
    pub fn exists(&self, item_id: &str) -> bool {
        matches!(self.locate(item_id), Slot::Committed(..))
    }

    /// Commits the item. After this returns the item is skipped forever.
    pub fn record(&self, item_id: &str, filename: &str) -> Result<PathBuf, WriteError> {
        let (Slot::Free(path) | Slot::Committed(path, _)) = self.locate(item_id);
        let pointer = CompletionPointer {
            pid_uuid: item_id.to_string(),
            filename: filename.to_string(),
        };
        write_json_atomic(&path, &pointer)?;
        tracing::debug!(item = item_id, filename, path = %path.display(), "completion pointer written");
        Ok(path)
    }

    /// The item's pointer, if it has been committed.
    pub fn read(&self, item_id: &str) -> Option<CompletionPointer> {
        match self.locate(item_id) {
            Slot::Committed(_, pointer) => Some(pointer),
            Slot::Free(_) => None,
        }
    }

    /// Position (0-based) of the first item without a pointer, or `None` if all are done.
    pub fn first_pending(&self, items: &[String]) -> Option<usize> {
        items.iter().position(|id| !self.exists(id))
    }

    /// Number of items that already have a pointer.
    pub fn count_done(&self, items: &[String]) -> usize {
        items.iter().filter(|id| self.exists(id)).count()
    }

    /// Walks the item's pointer slots until one names this item or one is free.
    /// Slots held by other items, or unreadable, are passed over.
    fn locate(&self, item_id: &str) -> Slot {
        let mut slot = 1;
        loop {
            let path = self.dir.join(pointer_filename(item_id, slot));
            match read_pointer(&path) {
                Ok(None) => return Slot::Free(path),
                Ok(Some(pointer)) if pointer.pid_uuid == item_id => {
                    return Slot::Committed(path, pointer)
                }
                Ok(Some(pointer)) => {
                    tracing::debug!(
                        item = item_id,
                        holder = %pointer.pid_uuid,
                        path = %path.display(),
                        "pointer slot held by another item"
                    );
                }
                Err(e) => {
                    tracing::warn!(item = item_id, "ignoring pointer slot: {:#}", e);
                }
            }
            slot += 1;
        }
    }
}

fn read_pointer(path: &Path) -> Result<Option<CompletionPointer>> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("read pointer: {}", path.display())),
    };
    let pointer = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse pointer: {}", path.display()))?;
    Ok(Some(pointer))
}
