use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use super::SettingsStorage;
use crate::error::StorageError;

/// Stores each key as its own file under `data_dir`.
///
/// Values are written as JSON text. A file that does not parse as JSON is
/// read back as a plain string, so hand-edited files still work.
#[derive(Debug, Clone)]
pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn key_path(&self, name: &str) -> Result<PathBuf, StorageError> {
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\'])
        {
            return Err(StorageError::InvalidKey(name.to_string()));
        }
        Ok(self.data_dir.join(name))
    }
}

impl SettingsStorage for FileStorage {
    async fn get(&self, name: &str) -> Result<Option<Value>, StorageError> {
        let path = self.key_path(name)?;
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let value = match serde_json::from_str::<Value>(&contents) {
            Ok(value) => value,
            Err(e) => {
                debug!(key = name, error = %e, "Stored value is not JSON, reading as string");
                Value::String(contents)
            }
        };
        Ok(Some(value))
    }

    async fn set(&self, name: &str, value: &str) -> Result<(), StorageError> {
        let path = self.key_path(name)?;
        tokio::fs::create_dir_all(&self.data_dir).await?;
        let contents = serde_json::to_string(value)?;
        tokio::fs::write(&path, contents).await?;
        Ok(())
    }

    async fn has(&self, name: &str) -> Result<bool, StorageError> {
        let path = self.key_path(name)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }

    async fn remove(&self, name: &str) -> Result<(), StorageError> {
        let path = self.key_path(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
