//! In-memory [`SettingsStorage`] backend backed by `Arc<Mutex<HashMap>>`.
//!
//! Nothing is persisted. Clones share the same map, so every `Auth` built
//! from one `MemoryStorage` sees the same values.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use super::SettingsStorage;
use crate::error::StorageError;

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<HashMap<String, Value>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Value>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed an arbitrary JSON value without `await`.
    /// Lets tests plant non-string values where a credential is expected.
    pub fn insert_value(&self, name: impl Into<String>, value: Value) {
        self.lock().insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl SettingsStorage for MemoryStorage {
    async fn get(&self, name: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.lock().get(name).cloned())
    }

    async fn set(&self, name: &str, value: &str) -> Result<(), StorageError> {
        self.lock()
            .insert(name.to_string(), Value::String(value.to_string()));
        Ok(())
    }

    async fn has(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.lock().contains_key(name))
    }

    async fn remove(&self, name: &str) -> Result<(), StorageError> {
        self.lock().remove(name);
        Ok(())
    }
}
