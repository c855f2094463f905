//! Staged temp file that only becomes visible under its final name on `finalize`.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::WriteError;

/// Temp file being filled before an atomic rename onto its final path.
pub struct StagedFile {
    file: File,
    temp_path: PathBuf,
}

impl StagedFile {
    /// Create a new temp file at `temp_path` (e.g. `destination.tmp`).
    /// Overwrites if the path already exists.
    pub fn create(temp_path: &Path) -> Result<Self, WriteError> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp_path)
            .map_err(|e| WriteError::io("create", temp_path, e))?;
        Ok(StagedFile {
            file,
            temp_path: temp_path.to_path_buf(),
        })
    }

    pub fn write_all(&mut self, data: &[u8]) -> Result<(), WriteError> {
        self.file
            .write_all(data)
            .map_err(|e| WriteError::io("write", &self.temp_path, e))
    }

    /// Sync file data to disk. Call before `finalize` for durability.
    pub fn sync(&self) -> Result<(), WriteError> {
        self.file
            .sync_all()
            .map_err(|e| WriteError::io("sync", &self.temp_path, e))
    }

    /// Atomically rename the temp file to the final path. Consumes the writer and closes the file.
    /// Fails if `final_path` is on a different filesystem.
    pub fn finalize(self, final_path: &Path) -> Result<(), WriteError> {
        let temp_path = self.temp_path;
        drop(self.file);

        std::fs::rename(&temp_path, final_path).map_err(|e| WriteError::io("rename", final_path, e))
    }
}
