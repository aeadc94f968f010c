//! Pluggable settings storage for the persisted credential.
//!
//! This module provides:
//! - `SettingsStorage`: the key/value capability the `Auth` manager consumes
//! - `MemoryStorage`: process-local store, used for isolated scopes and tests
//! - `FileStorage`: one JSON file per key under a data directory
//! - `KeyringStorage`: OS keychain entries under a service name
//! - `get_storage`: picks a backend for an `AuthOptions` scope

pub mod file;
pub mod keychain;
pub mod memory;

use std::future::Future;

use serde_json::Value;
use tracing::debug;

use crate::config::{default_data_dir, AuthOptions, DataDirectory};
use crate::error::StorageError;

pub use file::FileStorage;
pub use keychain::KeyringStorage;
pub use memory::MemoryStorage;

/// Key/value storage addressed by an opaque name.
///
/// Implementations must be `Send + Sync` so one backend can be shared by
/// several `Auth` instances.
pub trait SettingsStorage: Send + Sync {
    /// Read the value stored under `name`, `Ok(None)` when absent.
    fn get(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Value>, StorageError>> + Send;

    /// Store `value` under `name`, replacing any previous value.
    fn set(
        &self,
        name: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    fn has(&self, name: &str) -> impl Future<Output = Result<bool, StorageError>> + Send;

    /// Delete `name`. Succeeds when nothing was stored.
    fn remove(&self, name: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// The concrete backends, for callers that pick one at runtime.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    File(FileStorage),
    Memory(MemoryStorage),
    Keyring(KeyringStorage),
}

impl SettingsStorage for StorageBackend {
    async fn get(&self, name: &str) -> Result<Option<Value>, StorageError> {
        match self {
            StorageBackend::File(s) => s.get(name).await,
            StorageBackend::Memory(s) => s.get(name).await,
            StorageBackend::Keyring(s) => s.get(name).await,
        }
    }

    async fn set(&self, name: &str, value: &str) -> Result<(), StorageError> {
        match self {
            StorageBackend::File(s) => s.set(name, value).await,
            StorageBackend::Memory(s) => s.set(name, value).await,
            StorageBackend::Keyring(s) => s.set(name, value).await,
        }
    }

    async fn has(&self, name: &str) -> Result<bool, StorageError> {
        match self {
            StorageBackend::File(s) => s.has(name).await,
            StorageBackend::Memory(s) => s.has(name).await,
            StorageBackend::Keyring(s) => s.has(name).await,
        }
    }

    async fn remove(&self, name: &str) -> Result<(), StorageError> {
        match self {
            StorageBackend::File(s) => s.remove(name).await,
            StorageBackend::Memory(s) => s.remove(name).await,
            StorageBackend::Keyring(s) => s.remove(name).await,
        }
    }
}

/// Select the backend for the configured scope.
///
/// `Isolated` always yields a fresh in-memory scope shared with nobody. A
/// `keychain_service` moves any other scope into the OS keychain.
pub fn get_storage(options: &AuthOptions) -> Result<StorageBackend, StorageError> {
    match (&options.data_directory, &options.keychain_service) {
        (DataDirectory::Isolated, _) => {
            debug!("Using isolated in-memory storage");
            Ok(StorageBackend::Memory(MemoryStorage::new()))
        }
        (_, Some(service)) => {
            debug!(service = %service, "Using keychain storage");
            Ok(StorageBackend::Keyring(KeyringStorage::new(service.clone())))
        }
        (DataDirectory::Path(path), None) => {
            debug!(path = %path.display(), "Using file storage");
            Ok(StorageBackend::File(FileStorage::new(path.clone())))
        }
        (DataDirectory::Default, None) => {
            let path = default_data_dir().ok_or(StorageError::NoDataDirectory)?;
            debug!(path = %path.display(), "Using default file storage");
            Ok(StorageBackend::File(FileStorage::new(path)))
        }
    }
}
