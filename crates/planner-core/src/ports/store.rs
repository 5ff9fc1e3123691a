//! Key-value store port - durable local storage for serialized values.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Synchronous string key-value store.
///
/// Every write is applied immediately; there is no batching. Concurrent
/// writers to the same backing storage race and the last write wins.
pub trait KeyValueStore: Send + Sync {
    /// Raw value stored under `key`, `None` if absent.
    fn read_raw(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn write_raw(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Typed JSON access on top of any [`KeyValueStore`].
pub trait KeyValueStoreExt: KeyValueStore {
    /// Decode the value under `key`. `Ok(None)` if the key is absent.
    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.read_raw(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StoreError::Serialization(e.to_string())),
            None => Ok(None),
        }
    }

    /// Decode the value under `key`, falling back to `default` when it is
    /// missing, unreadable or corrupt. Failures are logged, never returned.
    fn read_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.read_json(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Error reading stored value, using default");
                default
            }
        }
    }

    /// Encode `value` as JSON and store it under `key`.
    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw =
            serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.write_raw(key, &raw)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}

/// Store operation errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Backend error: {0}")]
    Backend(String),
}
