//! # PersistedStore Capability
//!
//! String-keyed, string-valued durable storage. The session layer only
//! ever uses it for the three session keys from `storefront-core`.
//!
//! ## Contract
//! - `get` returns `Ok(None)` for a missing key; `Err` means the store
//!   itself could not be read.
//! - `set` overwrites.
//! - `remove` of a missing key is not an error.
//! - `set_many` / `remove_many` default to one call per key. Stores that can
//!   do better override them to apply all keys or none.

use async_trait::async_trait;

use crate::error::StoreResult;

/// Durable key-value storage surviving process restarts.
#[async_trait]
pub trait PersistedStore: Send + Sync {
    /// Reads the value stored under `key`.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value` under `key`.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removes `key`.
    async fn remove(&self, key: &str) -> StoreResult<()>;

    /// Stores several entries.
    async fn set_many(&self, entries: &[(&str, &str)]) -> StoreResult<()> {
        for (key, value) in entries {
            self.set(key, value).await?;
        }
        Ok(())
    }

    /// Removes several keys.
    async fn remove_many(&self, keys: &[&str]) -> StoreResult<()> {
        for key in keys {
            self.remove(key).await?;
        }
        Ok(())
    }
}
