use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::persisted::Persisted;
use crate::storage::KeyValueStore;

/// Persisted list, newest first, never longer than its cap.
pub struct HistoryList<T> {
    inner: Persisted<Vec<T>>,
    cap: usize,
}

impl<T> HistoryList<T>
where
    T: Serialize + DeserializeOwned,
{
    pub async fn load(store: Arc<dyn KeyValueStore>, key: impl Into<String>, cap: usize) -> Self {
        let mut inner = Persisted::load(store, key, Vec::new()).await;
        if inner.get().len() > cap {
            log::debug!("Trimming '{}' to {} entries", inner.key(), cap);
            inner.update(|items| items.truncate(cap)).await;
        }
        Self { inner, cap }
    }

    pub async fn push(&mut self, item: T) {
        let cap = self.cap;
        self.inner
            .update(|items| {
                items.insert(0, item);
                items.truncate(cap);
            })
            .await;
    }

    pub async fn clear(&mut self) {
        self.inner.set(Vec::new()).await;
    }

    pub fn items(&self) -> &[T] {
        self.inner.get()
    }

    pub fn len(&self) -> usize {
        self.inner.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.get().is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }
}
