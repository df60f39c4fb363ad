use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::provider::KeyValueStore;

/// Key-value store keeping one file per key inside a directory.
///
/// Writes land in a temporary file next to the target and are renamed
///  into place, so a crash mid-write never leaves a torn value behind.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

#[derive(thiserror::Error, Debug)]
pub enum FileKeyValueStoreError {
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("file store i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to persist value: {0}")]
    Persist(#[from] tempfile::PersistError),
}

impl FileKeyValueStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, FileKeyValueStoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, FileKeyValueStoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(FileKeyValueStoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileKeyValueStore {
    type Error = FileKeyValueStoreError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path)?;
        tracing::debug!("persisted {} bytes to {:?}", value.len(), path);
        Ok(())
    }
}
