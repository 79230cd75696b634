//! Durable key-value store — one JSON document per key in a directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use super::traits::{KeyValueStore, validate_key};
use crate::error::StorageError;

/// Directory-backed store that survives process restarts.
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Open (or create) a store rooted at `base_path`.
    pub async fn open(base_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).await?;
        info!(path = %base_path.display(), "Durable store opened");
        Ok(Self { base_path })
    }

    /// Directory holding the store's files.
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.base_path.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.key_path(key)?;
        // Write-then-rename so a crash never leaves a half-written value.
        let tmp = self.base_path.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value).await?;
        fs::rename(&tmp, &path).await?;
        debug!(key = key, bytes = value.len(), "Durable value written");
        Ok(())
    }
}
