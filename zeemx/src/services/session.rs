//! Session service
//!
//! Simulated authentication. Any submitted credentials succeed; the
//! password is neither checked nor stored. Do not treat the resulting
//! identity as authoritative.

use crate::error::Result;
use crate::models::User;
use crate::storage::{SharedStore, Slot, StorageKey};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Name given to users who sign in rather than sign up
const SIGN_IN_NAME: &str = "User";

/// Service for the current identity
#[derive(Clone)]
pub struct SessionService {
    slot: Slot<User>,
    current: Arc<RwLock<Option<User>>>,
}

impl SessionService {
    pub fn load(store: SharedStore) -> Result<Self> {
        let slot = Slot::new(store, StorageKey::User);
        let current = slot.load()?;

        Ok(Self {
            slot,
            current: Arc::new(RwLock::new(current)),
        })
    }

    /// Create an identity. Always succeeds.
    pub async fn sign_up(&self, name: &str, email: &str, _password: &str) -> Result<User> {
        self.establish(name, email).await
    }

    /// Sign in. Always succeeds; no lookup of earlier sign-ups happens.
    pub async fn sign_in(&self, email: &str, _password: &str) -> Result<User> {
        self.establish(SIGN_IN_NAME, email).await
    }

    /// Forget the current identity
    pub async fn log_out(&self) -> Result<()> {
        self.slot.clear()?;
        *self.current.write().await = None;
        tracing::info!("Signed out");
        Ok(())
    }

    pub async fn current_user(&self) -> Option<User> {
        self.current.read().await.clone()
    }

    /// Re-read from storage
    pub async fn reload(&self) -> Result<()> {
        *self.current.write().await = self.slot.load()?;
        Ok(())
    }

    async fn establish(&self, name: &str, email: &str) -> Result<User> {
        tracing::warn!("Simulated sign-in for {}: credentials are not verified", email);

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
        };

        self.slot.save(&user)?;
        *self.current.write().await = Some(user.clone());

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};

    #[tokio::test]
    async fn test_sign_up_persists_user() {
        let store = Arc::new(MemoryStore::new());
        let service = SessionService::load(store.clone()).unwrap();

        let user = service
            .sign_up("Amina Yusuf", "amina@example.com", "anything")
            .await
            .unwrap();

        assert_eq!(user.name, "Amina Yusuf");
        assert!(!user.id.is_empty());

        let raw = store.get("zeemx_user").unwrap().unwrap();
        assert!(!raw.contains("anything"));

        let reloaded = SessionService::load(store).unwrap();
        assert_eq!(reloaded.current_user().await, Some(user));
    }

    #[tokio::test]
    async fn test_sign_in_always_succeeds_with_fresh_id() {
        let store = Arc::new(MemoryStore::new());
        let service = SessionService::load(store).unwrap();

        let first = service.sign_in("a@example.com", "").await.unwrap();
        let second = service.sign_in("a@example.com", "wrong").await.unwrap();

        assert_eq!(first.name, "User");
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_log_out_clears_identity() {
        let store = Arc::new(MemoryStore::new());
        let service = SessionService::load(store.clone()).unwrap();

        service.sign_in("a@example.com", "pw").await.unwrap();
        service.log_out().await.unwrap();

        assert!(service.current_user().await.is_none());
        assert!(store.get("zeemx_user").unwrap().is_none());
    }
}
