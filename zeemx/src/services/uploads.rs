//! Upload helpers shared by the locker and the gallery
//!
//! Files are read asynchronously, one task per file, and their content is
//! kept inline as a base64 `data:` URL.

use crate::error::{AppError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;

/// File content handed to a store
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Inline `data:` URL for the content
    pub fn data_url(&self) -> String {
        data_url(&self.mime_type, &self.bytes)
    }
}

pub fn data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Best-effort mime type from the file extension
pub fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "json" => "application/json",
        _ => "application/octet-stream",
    }
}

/// Read one file from disk
pub async fn read_upload(path: PathBuf) -> Result<Upload> {
    let bytes = tokio::fs::read(&path).await?;
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(sanitize_filename)
        .ok_or_else(|| AppError::InvalidArgument(format!("not a file path: {:?}", path)))?;

    Ok(Upload {
        name,
        mime_type: guess_mime(&path).to_string(),
        bytes,
    })
}

/// Start one read per path. Results arrive in completion order.
pub fn read_all(paths: Vec<PathBuf>) -> JoinSet<(PathBuf, Result<Upload>)> {
    let mut reads = JoinSet::new();
    for path in paths {
        reads.spawn(async move {
            let result = read_upload(path.clone()).await;
            (path, result)
        });
    }
    reads
}

/// Strip path separators and null bytes, limit length
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| *c != '/' && *c != '\\' && *c != '\0')
        .take(255)
        .collect()
}

/// Human-readable size, e.g. "1.5 KB"
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}
