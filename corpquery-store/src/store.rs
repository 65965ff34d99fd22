//! The key-value store seam.

use async_trait::async_trait;

use crate::error::StoreError;

/// A flat, append-only key-value store of serialized records.
///
/// Backends only promise eventual read-after-write visibility: a key
/// returned by [`list`](RecordStore::list) may still read as `None`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Stores `value` under `key`.
    async fn put(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Lists every key. Order is unspecified.
    async fn list(&self) -> Result<Vec<String>, StoreError>;

    /// Reads the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
}
