//! Locker and gallery commands
//!
//! Uploads arrive either as base64 payloads or as paths on disk. Deletes
//! only go ahead when the caller passes `confirmed: true`, i.e. the user
//! accepted the delete prompt.

use crate::app::AppState;
use crate::config::{ALL_ALBUMS, GALLERY_ALBUMS};
use crate::error::{AppError, Result};
use crate::models::{FileItem, GalleryItem};
use crate::services::uploads::{self, Upload};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use std::path::PathBuf;

fn decode_upload(name: String, mime_type: String, data: &str) -> Result<Upload> {
    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|e| AppError::InvalidArgument(format!("upload data is not base64: {}", e)))?;

    Ok(Upload {
        name,
        mime_type,
        bytes,
    })
}

// ===== Locker =====

pub async fn list_files(state: &AppState) -> Vec<FileItem> {
    state.locker.list().await
}

pub async fn upload_file(
    state: &AppState,
    name: String,
    mime_type: String,
    data: String,
) -> Result<FileItem> {
    let upload = decode_upload(name, mime_type, &data)?;
    state.locker.upload(upload).await
}

pub async fn import_files(state: &AppState, paths: Vec<PathBuf>) -> Result<Vec<FileItem>> {
    state.locker.import_paths(paths).await
}

/// Returns whether the file was removed
pub async fn delete_file(state: &AppState, id: String, confirmed: bool) -> Result<bool> {
    state.locker.delete(&id, |_| confirmed).await
}

pub async fn search_files(state: &AppState, query: String) -> Vec<FileItem> {
    state.locker.search(&query).await
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockerUsage {
    pub files: usize,
    pub total_size: u64,
    pub formatted: String,
}

pub async fn locker_usage(state: &AppState) -> LockerUsage {
    let total_size = state.locker.total_size().await;
    LockerUsage {
        files: state.locker.list().await.len(),
        total_size,
        formatted: uploads::format_size(total_size),
    }
}

// ===== Gallery =====

/// Items in an album, or every item when no album is given
pub async fn list_gallery(state: &AppState, album: Option<String>) -> Vec<GalleryItem> {
    let album = album.unwrap_or_else(|| ALL_ALBUMS.to_string());
    state.gallery.filter(&album).await
}

pub fn list_albums() -> &'static [&'static str] {
    GALLERY_ALBUMS
}

pub async fn upload_media(
    state: &AppState,
    name: String,
    mime_type: String,
    data: String,
) -> Result<GalleryItem> {
    let upload = decode_upload(name, mime_type, &data)?;
    state.gallery.upload(upload).await
}

pub async fn import_media(state: &AppState, paths: Vec<PathBuf>) -> Result<Vec<GalleryItem>> {
    state.gallery.import_paths(paths).await
}

pub async fn update_reflection(
    state: &AppState,
    id: String,
    reflection: String,
) -> Result<GalleryItem> {
    state.gallery.update_reflection(&id, reflection).await
}

pub async fn set_album(state: &AppState, id: String, album: Option<String>) -> Result<GalleryItem> {
    state.gallery.set_album(&id, album).await
}

/// Returns whether the item was removed
pub async fn delete_media(state: &AppState, id: String, confirmed: bool) -> Result<bool> {
    state.gallery.delete(&id, |_| confirmed).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_upload() {
        let upload =
            decode_upload("a.txt".to_string(), "text/plain".to_string(), "aGk=").unwrap();
        assert_eq!(upload.bytes, b"hi");

        assert!(matches!(
            decode_upload("a".to_string(), "text/plain".to_string(), "not base64!"),
            Err(AppError::InvalidArgument(_))
        ));
    }
}
