use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::provider::KeyValueStore;

/// In-memory key-value store.
///
/// Clones share the same map, so handing a clone to a fresh
///  [`CredentialStore`](crate::credentials::CredentialStore) behaves like
///  reopening the same durable storage after a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryKeyValueStoreError {
    #[error("memory store error: {0}")]
    Internal(String),
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    type Error = MemoryKeyValueStoreError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let inner = self.inner.read().map_err(|e| {
            MemoryKeyValueStoreError::Internal(format!("failed to acquire read lock: {}", e))
        })?;
        Ok(inner.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        let mut inner = self.inner.write().map_err(|e| {
            MemoryKeyValueStoreError::Internal(format!("failed to acquire write lock: {}", e))
        })?;
        inner.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
