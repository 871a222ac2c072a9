//! Locker service
//!
//! Private file storage. Content is kept inline with each record;
//! removal is destructive and needs explicit confirmation.

use crate::error::{AppError, Result};
use crate::models::FileItem;
use crate::services::uploads::{self, Upload};
use crate::storage::{Collection, SharedStore, StorageKey};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

pub const DELETE_PROMPT: &str = "Permanently remove this file from your locker?";

/// Service for locker files
#[derive(Clone)]
pub struct LockerService {
    files: Arc<Collection<FileItem>>,
}

impl LockerService {
    pub fn load(store: SharedStore) -> Result<Self> {
        let files = Collection::open(store, StorageKey::Locker, Vec::new)?;
        Ok(Self {
            files: Arc::new(files),
        })
    }

    /// Newest first
    pub async fn list(&self) -> Vec<FileItem> {
        self.files.snapshot().await
    }

    /// Store one file at the top of the list
    pub async fn upload(&self, upload: Upload) -> Result<FileItem> {
        tracing::info!(
            "Storing file: {} ({}, {} bytes)",
            upload.name,
            upload.mime_type,
            upload.bytes.len()
        );

        let item = FileItem {
            id: Uuid::new_v4().to_string(),
            name: uploads::sanitize_filename(&upload.name),
            size: upload.bytes.len() as u64,
            url: upload.data_url(),
            mime_type: upload.mime_type,
            created_at: Utc::now(),
        };

        let stored = item.clone();
        self.files
            .mutate(move |files| {
                files.insert(0, item);
                Ok(())
            })
            .await?;

        Ok(stored)
    }

    /// Read files from disk concurrently; each one is stored as soon as
    /// its read finishes. Unreadable paths are logged and skipped.
    pub async fn import_paths(&self, paths: Vec<PathBuf>) -> Result<Vec<FileItem>> {
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

    /// Remove a file once `confirm` accepts the prompt.
    /// Returns whether anything was removed.
    pub async fn delete<F>(&self, id: &str, confirm: F) -> Result<bool>
    where
        F: FnOnce(&str) -> bool,
    {
        if self.files.find(|file| file.id == id).await.is_none() {
            return Err(AppError::NotFound(format!("file {}", id)));
        }

        if !confirm(DELETE_PROMPT) {
            tracing::debug!("Deletion of file {} declined", id);
            return Ok(false);
        }

        self.files
            .mutate(|files| {
                files.retain(|file| file.id != id);
                Ok(())
            })
            .await?;

        tracing::info!("File removed from locker: {}", id);

        Ok(true)
    }

    /// Case-insensitive name filter
    pub async fn search(&self, query: &str) -> Vec<FileItem> {
        let query_lower = query.to_lowercase();
        self.files
            .snapshot()
            .await
            .into_iter()
            .filter(|file| file.name.to_lowercase().contains(&query_lower))
            .collect()
    }

    pub async fn total_size(&self) -> u64 {
        self.files
            .snapshot()
            .await
            .iter()
            .map(|file| file.size)
            .sum()
    }

    pub async fn reload(&self) -> Result<()> {
        self.files.reload().await
    }
}
