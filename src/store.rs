//! Generated file store
//!
//! Output workbooks are written to a directory as `<file_id>.xlsx`. The
//! id is derived from a SHA-256 over the content and the current time.
//! Files older than the retention period are swept on open and on save.

use crate::error::{MapperError, Result};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const FILE_ID_LEN: usize = 32;
const OUTPUT_EXTENSION: &str = "xlsx";
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    retention: Duration,
}

impl FileStore {
    /// Open (and create if needed) the output directory
    pub fn open(root: &Path) -> Result<Self> {
        std::fs::create_dir_all(root)?;
        let store = Self {
            root: root.to_path_buf(),
            retention: DEFAULT_RETENTION,
        };
        store.sweep_logged();
        Ok(store)
    }

    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self.sweep_logged();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store `bytes` and return the new file id
    pub fn save(&self, bytes: &[u8]) -> Result<String> {
        self.sweep_logged();

        let stamp = SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|e| MapperError::Config(format!("system clock error: {}", e)))?
            .as_nanos();

        let mut hasher = Sha256::new();
        hasher.update(bytes);
        hasher.update(stamp.to_le_bytes());
        let file_id = hex::encode(hasher.finalize())[..FILE_ID_LEN].to_string();

        std::fs::write(self.file_path(&file_id), bytes)?;
        tracing::debug!(file_id = %file_id, size = bytes.len(), "stored output file");
        Ok(file_id)
    }

    /// Path of a stored file, `None` for malformed or unknown ids
    pub fn path_for(&self, file_id: &str) -> Option<PathBuf> {
        if !is_valid_file_id(file_id) {
            return None;
        }
        let path = self.file_path(file_id);
        path.is_file().then_some(path)
    }

    /// Name offered to the browser for a download
    pub fn download_name(file_id: &str) -> String {
        format!("snomed_matches_{}.{}", file_id, OUTPUT_EXTENSION)
    }

    /// Delete stored files older than the retention period
    ///
    /// Only `<file_id>.xlsx` entries are touched. Returns how many were removed.
    pub fn sweep(&self) -> Result<usize> {
        let now = SystemTime::now();
        let mut removed = 0;

        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            let is_output = path.extension().and_then(|e| e.to_str()) == Some(OUTPUT_EXTENSION)
                && path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .is_some_and(is_valid_file_id);
            if !is_output {
                continue;
            }

            let modified = std::fs::metadata(&path)?.modified()?;
            let age = now.duration_since(modified).unwrap_or_default();
            if age > self.retention {
                std::fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn sweep_logged(&self) {
        match self.sweep() {
            Ok(0) => {}
            Ok(removed) => tracing::info!(removed, "expired output files deleted"),
            Err(e) => tracing::warn!(error = %e, "output sweep failed"),
        }
    }

    fn file_path(&self, file_id: &str) -> PathBuf {
        self.root.join(format!("{}.{}", file_id, OUTPUT_EXTENSION))
    }
}

pub fn is_valid_file_id(file_id: &str) -> bool {
    file_id.len() == FILE_ID_LEN && file_id.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
}
