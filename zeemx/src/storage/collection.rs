//! Whole-collection persistence
//!
//! A feature store keeps its records in memory and rewrites the entire
//! collection to its key after every successful mutation.

use super::kv_store::StorageKey;
use super::slot::{SharedStore, Slot};
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

/// In-memory collection mirrored to one storage key
pub struct Collection<T> {
    slot: Slot<Vec<T>>,
    seed: fn() -> Vec<T>,
    items: Mutex<Vec<T>>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Clone + Send,
{
    /// Load from storage; `seed` supplies the contents when the key has
    /// never been written
    pub fn open(store: SharedStore, key: StorageKey, seed: fn() -> Vec<T>) -> Result<Self> {
        let slot = Slot::new(store, key);
        let items = slot.load()?.unwrap_or_else(seed);

        tracing::debug!("Loaded {} records from {}", items.len(), key);

        Ok(Self {
            slot,
            seed,
            items: Mutex::new(items),
        })
    }

    /// Copy of every record, in stored order
    pub async fn snapshot(&self) -> Vec<T> {
        self.items.lock().await.clone()
    }

    /// First record matching the predicate
    pub async fn find<P>(&self, predicate: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        self.items
            .lock()
            .await
            .iter()
            .find(|item| predicate(item))
            .cloned()
    }

    /// Apply `f` to a working copy and persist it. The in-memory records
    /// change only once the save succeeds; on any error both memory and
    /// storage keep their previous contents.
    pub async fn mutate<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R>,
    {
        let mut items = self.items.lock().await;
        let mut working = items.clone();
        let outcome = f(&mut working)?;
        self.slot.save(&working)?;
        *items = working;
        Ok(outcome)
    }

    /// Re-read from storage, falling back to the seed
    pub async fn reload(&self) -> Result<()> {
        let fresh = self.slot.load()?.unwrap_or_else(self.seed);
        *self.items.lock().await = fresh;
        Ok(())
    }
}
