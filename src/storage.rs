pub mod codec;
mod error;

pub use error::StorageError;

use std::fs;
use std::path::{Path, PathBuf};

/// File name of the chest document inside the data directory.
pub const CHESTS_FILE: &str = "chests.json";

/// The on-disk chest document.
#[derive(Debug, Clone)]
pub struct ChestFile {
    path: PathBuf,
}

impl ChestFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(CHESTS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file with an empty list when it does not exist yet. Returns whether it
    /// had to be created.
    pub fn ensure_exists(&self) -> Result<bool, StorageError> {
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| self.write_err(source))?;
        }
        fs::write(&self.path, "[]").map_err(|source| self.write_err(source))?;
        tracing::info!(path = %self.path.display(), "created empty chest file");
        Ok(true)
    }

    pub fn read(&self) -> Result<String, StorageError> {
        fs::read_to_string(&self.path).map_err(|source| StorageError::Read {
            path: self.path.clone(),
            source,
        })
    }

    /// Replaces the document. The new content goes to a sibling file first so a failed
    /// write never leaves a truncated document behind.
    pub fn write(&self, content: &str) -> Result<(), StorageError> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|source| self.write_err(source))?;
        if let Err(source) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(self.write_err(source));
        }
        Ok(())
    }

    fn write_err(&self, source: std::io::Error) -> StorageError {
        StorageError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_writes_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let file = ChestFile::in_dir(&dir.path().join("nested"));
        assert!(file.ensure_exists().unwrap());
        assert_eq!(file.read().unwrap(), "[]");
        assert!(!file.ensure_exists().unwrap());
    }

    #[test]
    fn write_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let file = ChestFile::in_dir(dir.path());
        file.ensure_exists().unwrap();
        file.write("[1]").unwrap();
        assert_eq!(file.read().unwrap(), "[1]");
        assert!(!dir.path().join("chests.json.tmp").exists());
    }

    #[test]
    fn failed_replace_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(CHESTS_FILE)).unwrap();
        let file = ChestFile::in_dir(dir.path());
        assert!(matches!(file.write("[]"), Err(StorageError::Write { .. })));
        assert!(!dir.path().join("chests.json.tmp").exists());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = ChestFile::in_dir(dir.path());
        assert!(matches!(file.read(), Err(StorageError::Read { .. })));
    }
}
