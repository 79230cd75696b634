//! `KeyValueStore` trait — async string key/value interface shared by the
//! durable and session-scoped backends.

use async_trait::async_trait;

use crate::error::StorageError;

/// Backend-agnostic key/value storage with string values.
///
/// Values are opaque strings (usually JSON); parsing is left to callers so a
/// corrupt value can be told apart from a missing one.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Keys are used as file names by the durable backend, so both backends
/// accept the same restricted alphabet.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
