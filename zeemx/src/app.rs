//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are initialized here and made available through AppState.

use crate::config::AppConfig;
use crate::error::Result;
use crate::services::{
    AssistantService, CalendarService, DocsService, GalleryService, GeminiClient, LockerService,
    NotepadService, SanctuaryService, SessionService, SettingsService, SheetService,
    SlidesService,
};
use crate::storage::{JsonFileStore, MemoryStore, SharedStore};
use crate::views::{self, ViewAccess, ViewType};
use std::sync::Arc;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: SharedStore,
    pub settings: SettingsService,
    pub session: SessionService,
    pub notepad: NotepadService,
    pub docs: DocsService,
    pub calendar: CalendarService,
    pub locker: LockerService,
    pub gallery: GalleryService,
    pub slides: SlidesService,
    pub sheet: SheetService,
    pub sanctuary: SanctuaryService,
    pub assistant: AssistantService<GeminiClient>,
}

impl AppState {
    /// Open the file-backed store under `config.data_dir` and load every
    /// service from it
    pub fn open(config: AppConfig) -> Result<Self> {
        tracing::info!("Data directory: {:?}", config.data_dir);

        let store = JsonFileStore::new(config.data_dir.clone());
        store.initialize()?;

        Self::with_store(config, Arc::new(store))
    }

    /// Ephemeral state; nothing outlives the process
    pub fn in_memory(config: AppConfig) -> Result<Self> {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    pub fn with_store(config: AppConfig, store: SharedStore) -> Result<Self> {
        let settings = SettingsService::load(Arc::clone(&store))?;

        let state = Self {
            session: SessionService::load(Arc::clone(&store))?,
            notepad: NotepadService::load(Arc::clone(&store), settings.subscribe())?,
            docs: DocsService::load(Arc::clone(&store), settings.subscribe())?,
            calendar: CalendarService::load(Arc::clone(&store))?,
            locker: LockerService::load(Arc::clone(&store))?,
            gallery: GalleryService::load(Arc::clone(&store))?,
            slides: SlidesService::load(Arc::clone(&store))?,
            sheet: SheetService::load(Arc::clone(&store))?,
            sanctuary: SanctuaryService::new(settings.subscribe()),
            assistant: AssistantService::new(GeminiClient::new(&config)?),
            settings,
            store,
            config,
        };

        if state.config.api_key.is_none() {
            tracing::warn!("No API key configured; the assistant will reply with its fallback");
        }

        tracing::info!("Application initialized successfully");

        Ok(state)
    }

    /// View shown at startup, from `defaultView`, subject to sign-in gating
    pub async fn startup_view(&self) -> ViewAccess {
        self.navigate(self.settings.get().default_view).await
    }

    /// Resolve a navigation request against the current session
    pub async fn navigate(&self, view: ViewType) -> ViewAccess {
        let user = self.session.current_user().await;
        views::resolve(view, user.as_ref())
    }

    /// Erase every stored key and reload all services: settings return to
    /// defaults and seeded collections are seeded again
    pub async fn factory_reset(&self) -> Result<()> {
        tracing::warn!("Factory reset requested");

        // A deferred notepad save must not land after the wipe
        self.notepad.cancel_pending().await;
        self.store.clear()?;

        self.settings.reload().await?;
        self.session.reload().await?;
        self.notepad.reload().await?;
        self.docs.reload().await?;
        self.calendar.reload().await?;
        self.locker.reload().await?;
        self.gallery.reload().await?;
        self.slides.reload().await?;
        self.sheet.reload().await?;
        self.sanctuary.reset();
        self.assistant.clear().await;

        tracing::info!("Factory reset complete");

        Ok(())
    }
}
