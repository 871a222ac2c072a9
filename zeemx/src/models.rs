//! Persisted entities
//!
//! Rust structs for every record a feature store owns.
//! Field names serialize in camelCase and timestamps as epoch
//! milliseconds, matching the stored JSON layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Signed-in identity (simulated, see `SessionService`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// A saved version of a document's content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocSnapshot {
    pub content: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Rich-text document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doc {
    pub id: String,
    pub title: String,
    /// HTML markup produced by the editor
    pub content: String,
    /// Newest first, capped at `DOC_HISTORY_LIMIT`
    #[serde(default)]
    pub history: Vec<DocSnapshot>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    #[default]
    Intent,
    Reflection,
    Task,
}

/// Planner entry pinned to a calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    /// RFC 3339 timestamp of local midnight; only the local date is significant
    pub date: DateTime<Utc>,
    pub title: String,
    #[serde(rename = "type", default)]
    pub event_type: EventType,
}

/// File kept in the locker, content stored inline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileItem {
    pub id: String,
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    /// `data:<mime>;base64,<payload>`
    pub url: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Image,
    Video,
}

impl MediaType {
    /// Anything whose mime type starts with `video` is a video
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("video") {
            MediaType::Video
        } else {
            MediaType::Image
        }
    }
}

/// Picture or clip in the gallery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub id: String,
    /// Remote URL or inline `data:` URL
    pub url: String,
    #[serde(rename = "type", default)]
    pub media_type: MediaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlidePage {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Ordered presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideDeck {
    pub id: String,
    pub title: String,
    pub pages: Vec<SlidePage>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_wire_format() {
        let json = r#"{"id":"1","title":"T","content":"<p>x</p>","history":[{"content":"old","timestamp":1700000000000}],"updatedAt":1700000000500}"#;
        let doc: Doc = serde_json::from_str(json).unwrap();

        assert_eq!(doc.history.len(), 1);
        assert_eq!(doc.updated_at.timestamp_millis(), 1_700_000_000_500);
        assert_eq!(serde_json::to_string(&doc).unwrap(), json);
    }

    #[test]
    fn test_gallery_item_optional_fields() {
        let json = r#"{"id":"g","url":"https://example.com/a.jpg","type":"video","createdAt":0}"#;
        let item: GalleryItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.media_type, MediaType::Video);
        assert!(item.reflection.is_none());
        assert!(item.album.is_none());
        assert!(!serde_json::to_string(&item).unwrap().contains("reflection"));
    }

    #[test]
    fn test_media_type_from_mime() {
        assert_eq!(MediaType::from_mime("video/mp4"), MediaType::Video);
        assert_eq!(MediaType::from_mime("image/png"), MediaType::Image);
        assert_eq!(MediaType::from_mime(""), MediaType::Image);
    }

    #[test]
    fn test_calendar_event_type_field() {
        let json = r#"{"id":"e","date":"2024-03-05T00:00:00Z","title":"Walk","type":"task"}"#;
        let event: CalendarEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, EventType::Task);
    }
}
