//! Session-scoped key-value store. Lives exactly as long as the process.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::traits::{KeyValueStore, validate_key};
use crate::error::StorageError;

/// Volatile in-memory store.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get() {
        let store = MemoryStore::new();
        assert!(store.get("lastQuote").await.unwrap().is_none());

        store.set("lastQuote", "{}").await.unwrap();
        assert_eq!(store.get("lastQuote").await.unwrap().as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn separate_instances_do_not_share() {
        let a = MemoryStore::new();
        let b = MemoryStore::new();
        a.set("k", "v").await.unwrap();
        assert!(b.get("k").await.unwrap().is_none());
    }
}
