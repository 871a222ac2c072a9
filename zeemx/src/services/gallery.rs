//! Gallery service
//!
//! Images and clips with an optional reflection and album tag.

use crate::config::ALL_ALBUMS;
use crate::error::{AppError, Result};
use crate::models::{GalleryItem, MediaType};
use crate::services::uploads::{self, Upload};
use crate::storage::{Collection, SharedStore, StorageKey};
use chrono::{Duration, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

pub const DELETE_PROMPT: &str = "Delete this memory?";

fn seed_gallery() -> Vec<GalleryItem> {
    let now = Utc::now();
    vec![
        GalleryItem {
            id: "1".to_string(),
            url: "https://images.unsplash.com/photo-1506744038136-46273834b3fb".to_string(),
            media_type: MediaType::Image,
            reflection: Some("A moment of peace in the valley.".to_string()),
            album: None,
            created_at: now,
        },
        GalleryItem {
            id: "2".to_string(),
            url: "https://images.unsplash.com/photo-1441974231531-c6227db76b6e".to_string(),
            media_type: MediaType::Image,
            reflection: Some("Sunlight filtering through the canopy.".to_string()),
            album: None,
            created_at: now - Duration::days(1),
        },
    ]
}

/// Service for gallery items
#[derive(Clone)]
pub struct GalleryService {
    items: Arc<Collection<GalleryItem>>,
}

impl GalleryService {
    pub fn load(store: SharedStore) -> Result<Self> {
        let items = Collection::open(store, StorageKey::Gallery, seed_gallery)?;
        Ok(Self {
            items: Arc::new(items),
        })
    }

    pub async fn list(&self) -> Vec<GalleryItem> {
        self.items.snapshot().await
    }

    /// Items in one album; `"All"` returns everything
    pub async fn filter(&self, album: &str) -> Vec<GalleryItem> {
        let items = self.items.snapshot().await;
        if album == ALL_ALBUMS {
            return items;
        }
        items
            .into_iter()
            .filter(|item| item.album.as_deref() == Some(album))
            .collect()
    }

    /// Store one image or clip at the top of the gallery
    pub async fn upload(&self, upload: Upload) -> Result<GalleryItem> {
        let item = GalleryItem {
            id: Uuid::new_v4().to_string(),
            url: upload.data_url(),
            media_type: MediaType::from_mime(&upload.mime_type),
            reflection: None,
            album: None,
            created_at: Utc::now(),
        };

        tracing::info!("Adding {:?} to gallery: {}", item.media_type, upload.name);

        let stored = item.clone();
        self.items
            .mutate(move |items| {
                items.insert(0, item);
                Ok(())
            })
            .await?;

        Ok(stored)
    }

    /// Read files concurrently and add each one as its read completes
    pub async fn import_paths(&self, paths: Vec<PathBuf>) -> Result<Vec<GalleryItem>> {
        let mut reads = uploads::read_all(paths);
        let mut stored = Vec::new();

        while let Some(joined) = reads.join_next().await {
            let (path, result) = joined
                .map_err(|e| AppError::Generic(format!("File read task failed: {}", e)))?;
            match result {
                Ok(upload) => stored.push(self.upload(upload).await?),
                Err(e) => tracing::warn!("Skipping {:?}: {}", path, e),
            }
        }

        Ok(stored)
    }

    pub async fn update_reflection(&self, id: &str, reflection: String) -> Result<GalleryItem> {
        self.modify(id, |item| item.reflection = Some(reflection))
            .await
    }

    /// Tag with an album, or clear the tag with `None`
    pub async fn set_album(&self, id: &str, album: Option<String>) -> Result<GalleryItem> {
        self.modify(id, |item| item.album = album).await
    }

    /// Remove an item once `confirm` accepts the prompt.
    /// Returns whether anything was removed.
    pub async fn delete<F>(&self, id: &str, confirm: F) -> Result<bool>
    where
        F: FnOnce(&str) -> bool,
    {
        if self.items.find(|item| item.id == id).await.is_none() {
            return Err(AppError::NotFound(format!("gallery item {}", id)));
        }

        if !confirm(DELETE_PROMPT) {
            return Ok(false);
        }

        self.items
            .mutate(|items| {
                items.retain(|item| item.id != id);
                Ok(())
            })
            .await?;

        tracing::info!("Gallery item deleted: {}", id);

        Ok(true)
    }

    pub async fn reload(&self) -> Result<()> {
        self.items.reload().await
    }

    async fn modify<F>(&self, id: &str, f: F) -> Result<GalleryItem>
    where
        F: FnOnce(&mut GalleryItem),
    {
        self.items
            .mutate(|items| {
                let item = items
                    .iter_mut()
                    .find(|item| item.id == id)
                    .ok_or_else(|| AppError::NotFound(format!("gallery item {}", id)))?;
                f(item);
                Ok(item.clone())
            })
            .await
    }
}
