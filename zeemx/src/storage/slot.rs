//! Typed JSON values stored under a single key

use super::kv_store::{KeyValueStore, StorageKey};
use crate::error::{AppError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

/// Shared handle to the persistence backend
pub type SharedStore = Arc<dyn KeyValueStore>;

/// A JSON-serialized value living under one storage key
pub struct Slot<T> {
    store: SharedStore,
    key: StorageKey,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key,
            _marker: PhantomData,
        }
    }
}

impl<T> Slot<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: SharedStore, key: StorageKey) -> Self {
        Self {
            store,
            key,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> StorageKey {
        self.key
    }

    /// Read the value. Absent keys are `Ok(None)`; a blob that does not
    /// parse is `AppError::CorruptData`.
    pub fn load(&self) -> Result<Option<T>> {
        let Some(raw) = self.store.get(&self.key.name())? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| AppError::CorruptData {
                key: self.key.name(),
                source,
            })
    }

    /// Serialize and write the entire value
    pub fn save(&self, value: &T) -> Result<()> {
        let content = serde_json::to_string(value)?;
        self.store.set(&self.key.name(), &content)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(&self.key.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_absent_malformed_and_present() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let slot: Slot<Vec<u32>> = Slot::new(Arc::clone(&store), StorageKey::Calendar);

        assert!(slot.load().unwrap().is_none());

        store.set("zeemx_calendar", "[1, 2,").unwrap();
        assert!(matches!(slot.load(), Err(AppError::CorruptData { .. })));

        slot.save(&vec![3, 4]).unwrap();
        assert_eq!(slot.load().unwrap(), Some(vec![3, 4]));
        assert_eq!(store.get("zeemx_calendar").unwrap().as_deref(), Some("[3,4]"));

        slot.clear().unwrap();
        assert!(slot.load().unwrap().is_none());
    }
}
