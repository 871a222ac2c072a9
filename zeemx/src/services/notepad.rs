//! Notepad service
//!
//! Single free-text note stored as a raw string. Edits are buffered and
//! written after an idle delay; each edit restarts the timer, so only the
//! last content within a burst reaches storage.

use crate::config::NOTEPAD_SAVE_DELAY_MS;
use crate::error::Result;
use crate::services::settings::AppSettings;
use crate::storage::{SharedStore, StorageKey};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

struct NotepadState {
    content: String,
    pending: Option<JoinHandle<()>>,
    last_saved: Option<DateTime<Utc>>,
}

/// Service for the scratch notepad
#[derive(Clone)]
pub struct NotepadService {
    store: SharedStore,
    settings: watch::Receiver<AppSettings>,
    delay: Duration,
    state: Arc<Mutex<NotepadState>>,
}

impl NotepadService {
    pub fn load(store: SharedStore, settings: watch::Receiver<AppSettings>) -> Result<Self> {
        Self::with_delay(
            store,
            settings,
            Duration::from_millis(NOTEPAD_SAVE_DELAY_MS),
        )
    }

    pub fn with_delay(
        store: SharedStore,
        settings: watch::Receiver<AppSettings>,
        delay: Duration,
    ) -> Result<Self> {
        let content = store.get(&StorageKey::Notepad.name())?.unwrap_or_default();

        Ok(Self {
            store,
            settings,
            delay,
            state: Arc::new(Mutex::new(NotepadState {
                content,
                pending: None,
                last_saved: None,
            })),
        })
    }

    pub async fn content(&self) -> String {
        self.state.lock().await.content.clone()
    }

    /// Replace the content and (re)schedule the deferred save
    pub async fn set_content(&self, content: String) {
        let mut state = self.state.lock().await;
        state.content = content;

        if let Some(pending) = state.pending.take() {
            pending.abort();
        }

        let store = Arc::clone(&self.store);
        let shared = Arc::clone(&self.state);
        let delay = self.delay;

        state.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let mut state = shared.lock().await;
            match store.set(&StorageKey::Notepad.name(), &state.content) {
                Ok(()) => {
                    state.last_saved = Some(Utc::now());
                    tracing::debug!("Notepad auto-saved ({} chars)", state.content.len());
                }
                Err(e) => tracing::warn!("Notepad auto-save failed: {}", e),
            }
            state.pending = None;
        }));
    }

    /// Write the buffered content now and cancel the pending save
    pub async fn flush(&self) -> Result<()> {
        let mut state = self.state.lock().await;

        if let Some(pending) = state.pending.take() {
            pending.abort();
        }

        self.store.set(&StorageKey::Notepad.name(), &state.content)?;
        state.last_saved = Some(Utc::now());

        Ok(())
    }

    /// Drop the scheduled save, keeping the buffered content
    pub async fn cancel_pending(&self) {
        if let Some(pending) = self.state.lock().await.pending.take() {
            pending.abort();
            tracing::debug!("Pending notepad save cancelled");
        }
    }

    /// Empty the note (the confirmation prompt belongs to the caller)
    pub async fn clear(&self) -> Result<()> {
        self.set_content(String::new()).await;
        self.flush().await?;
        tracing::info!("Notepad cleared");
        Ok(())
    }

    pub async fn word_count(&self) -> usize {
        word_count(&self.state.lock().await.content)
    }

    /// Whether the word counter should be shown
    pub fn show_word_count(&self) -> bool {
        self.settings.borrow().show_word_count
    }

    pub async fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.last_saved
    }

    pub async fn has_pending_save(&self) -> bool {
        self.state.lock().await.pending.is_some()
    }

    /// Re-read from storage, dropping any buffered edit
    pub async fn reload(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if let Some(pending) = state.pending.take() {
            pending.abort();
        }
        state.content = self
            .store
            .get(&StorageKey::Notepad.name())?
            .unwrap_or_default();
        state.last_saved = None;
        Ok(())
    }
}

/// Whitespace-separated words; blank text has none
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};

    fn create_test_service(store: Arc<MemoryStore>) -> (NotepadService, watch::Sender<AppSettings>) {
        let (tx, rx) = watch::channel(AppSettings::default());
        let service = NotepadService::with_delay(store, rx, Duration::from_millis(1000)).unwrap();
        (service, tx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_save_keeps_last_write() {
        let store = Arc::new(MemoryStore::new());
        let (service, _tx) = create_test_service(store.clone());

        service.set_content("first".to_string()).await;
        tokio::time::sleep(Duration::from_millis(600)).await;
        service.set_content("second".to_string()).await;
        tokio::time::sleep(Duration::from_millis(600)).await;

        // Timer restarted by the second edit
        assert!(store.get("zeemx_notepad").unwrap().is_none());

        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(store.get("zeemx_notepad").unwrap().as_deref(), Some("second"));
        assert!(service.last_saved().await.is_some());
        assert!(!service.has_pending_save().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_writes_immediately() {
        let store = Arc::new(MemoryStore::new());
        let (service, _tx) = create_test_service(store.clone());

        service.set_content("draft".to_string()).await;
        service.flush().await.unwrap();

        assert_eq!(store.get("zeemx_notepad").unwrap().as_deref(), Some("draft"));
        assert!(!service.has_pending_save().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_save_never_writes() {
        let store = Arc::new(MemoryStore::new());
        let (service, _tx) = create_test_service(store.clone());

        service.set_content("scratch".to_string()).await;
        service.cancel_pending().await;
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(store.get("zeemx_notepad").unwrap().is_none());
        assert!(!service.has_pending_save().await);
        assert_eq!(service.content().await, "scratch");
    }

    #[tokio::test]
    async fn test_loads_raw_string() {
        let store = Arc::new(MemoryStore::new());
        store.set("zeemx_notepad", "not json at all").unwrap();

        let (service, _tx) = create_test_service(store);

        assert_eq!(service.content().await, "not json at all");
        assert_eq!(service.word_count().await, 4);
    }

    #[tokio::test]
    async fn test_clear_empties_storage() {
        let store = Arc::new(MemoryStore::new());
        store.set("zeemx_notepad", "keep me").unwrap();
        let (service, _tx) = create_test_service(store.clone());

        service.clear().await.unwrap();

        assert_eq!(service.content().await, "");
        assert_eq!(store.get("zeemx_notepad").unwrap().as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_word_count_visibility_follows_settings() {
        let store = Arc::new(MemoryStore::new());
        let (service, tx) = create_test_service(store);

        assert!(service.show_word_count());

        tx.send_modify(|settings| settings.show_word_count = false);
        assert!(!service.show_word_count());
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   \n\t "), 0);
        assert_eq!(word_count("  one two\nthree  "), 3);
    }
}
