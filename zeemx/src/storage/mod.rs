//! Storage module
//!
//! Key-value persistence backend plus the typed helpers feature stores
//! build on.

pub mod collection;
pub mod kv_store;
pub mod slot;

pub use collection::Collection;
pub use kv_store::{JsonFileStore, KeyValueStore, MemoryStore, StorageKey};
pub use slot::{SharedStore, Slot};
