use keyring::Entry;
use serde_json::Value;

use super::SettingsStorage;
use crate::error::StorageError;

/// Default keychain service name for stored credentials
pub const DEFAULT_SERVICE_NAME: &str = "tokenkeep";

/// Keeps each key as a password entry in the OS keychain.
///
/// Keychain calls block, so they run on tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct KeyringStorage {
    service: String,
}

impl Default for KeyringStorage {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_NAME)
    }
}

impl KeyringStorage {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Run `f` against the entry for `name` off the async runtime
    async fn with_entry<T, F>(&self, name: &str, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(Entry) -> Result<T, keyring::Error> + Send + 'static,
    {
        let service = self.service.clone();
        let name = name.to_string();
        let result = tokio::task::spawn_blocking(move || {
            let entry = Entry::new(&service, &name)?;
            f(entry)
        })
        .await?;
        Ok(result?)
    }
}

impl SettingsStorage for KeyringStorage {
    async fn get(&self, name: &str) -> Result<Option<Value>, StorageError> {
        self.with_entry(name, |entry| match entry.get_password() {
            Ok(password) => Ok(Some(Value::String(password))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e),
        })
        .await
    }

    async fn set(&self, name: &str, value: &str) -> Result<(), StorageError> {
        let value = value.to_string();
        self.with_entry(name, move |entry| entry.set_password(&value))
            .await
    }

    async fn has(&self, name: &str) -> Result<bool, StorageError> {
        self.with_entry(name, |entry| match entry.get_password() {
            Ok(_) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(e),
        })
        .await
    }

    async fn remove(&self, name: &str) -> Result<(), StorageError> {
        self.with_entry(name, |entry| match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e),
        })
        .await
    }
}
