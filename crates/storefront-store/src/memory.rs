//! # In-Memory Store
//!
//! `HashMap`-backed [`PersistedStore`] for tests and hosts that do not need
//! sessions to survive a restart.
//!
//! The store can be switched to "unavailable", after which every operation
//! fails with [`StoreError::Unavailable`]. Tests use this to drive the
//! session layer's storage-failure paths.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::store::PersistedStore;

/// In-memory key-value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with `entries`.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        MemoryStore {
            entries: RwLock::new(map),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent operation fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.entries
            .read()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".to_string()));
        }
        Ok(())
    }
}

fn poisoned() -> StoreError {
    StoreError::Internal("memory store lock poisoned".to_string())
}

#[async_trait]
impl PersistedStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.check_available()?;
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.check_available()?;
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.check_available()?;
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.remove(key);
        Ok(())
    }

    async fn set_many(&self, entries: &[(&str, &str)]) -> StoreResult<()> {
        self.check_available()?;
        let mut map = self.entries.write().map_err(|_| poisoned())?;
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    async fn remove_many(&self, keys: &[&str]) -> StoreResult<()> {
        self.check_available()?;
        let mut map = self.entries.write().map_err(|_| poisoned())?;
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_set_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("username").await.unwrap(), None);

        store.set("username", "alice").await.unwrap();
        assert_eq!(store.get("username").await.unwrap().as_deref(), Some("alice"));

        store.remove("username").await.unwrap();
        assert_eq!(store.get("username").await.unwrap(), None);

        // Removing a missing key is fine
        store.remove("username").await.unwrap();
    }

    #[tokio::test]
    async fn test_many() {
        let store = MemoryStore::with_entries([("other", "kept")]);
        store
            .set_many(&[("username", "alice"), ("role", "Cashier")])
            .await
            .unwrap();
        assert_eq!(store.snapshot().len(), 3);

        store.remove_many(&["username", "role"]).await.unwrap();
        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("other").map(String::as_str), Some("kept"));
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_operation() {
        let store = MemoryStore::with_entries([("username", "alice")]);
        store.set_unavailable(true);

        assert!(matches!(
            store.get("username").await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.set("role", "Cashier").await.is_err());
        assert!(store.remove_many(&["username"]).await.is_err());

        store.set_unavailable(false);
        assert_eq!(store.get("username").await.unwrap().as_deref(), Some("alice"));
    }
}
