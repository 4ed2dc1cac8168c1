//! Values mirrored into a `KeyValueStore`.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::storage::KeyValueStore;

/// An in-memory value kept in sync with one store key.
///
/// Reads never fail: an absent or unreadable entry falls back to the
/// caller's default. Writes update memory first and only log persistence
/// failures.
pub struct Persisted<T> {
    store: Arc<dyn KeyValueStore>,
    key: String,
    value: T,
}

impl<T> Persisted<T>
where
    T: Serialize + DeserializeOwned,
{
    pub async fn load(store: Arc<dyn KeyValueStore>, key: impl Into<String>, default: T) -> Self {
        let key = key.into();

        let value = match store.get_raw(&key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    log::warn!("Ignoring unreadable value for '{}': {}", key, e);
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                log::warn!("Failed to read '{}': {}", key, e);
                default
            }
        };

        Self { store, key, value }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub async fn set(&mut self, value: T) {
        self.value = value;
        self.persist().await;
    }

    /// Mutate in place, then write.
    pub async fn update<F>(&mut self, f: F)
    where
        F: FnOnce(&mut T),
    {
        f(&mut self.value);
        self.persist().await;
    }

    async fn persist(&self) {
        let json = match serde_json::to_string(&self.value) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to serialize '{}': {}", self.key, e);
                return;
            }
        };

        if let Err(e) = self.store.set_raw(&self.key, &json).await {
            log::error!("Failed to persist '{}': {}", self.key, e);
        }
    }
}
