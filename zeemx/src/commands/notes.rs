//! Notepad and document commands

use crate::app::AppState;
use crate::error::Result;
use crate::models::Doc;
use chrono::{DateTime, Utc};
use serde::Serialize;

// ===== Notepad =====

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotepadView {
    pub content: String,
    pub word_count: usize,
    pub show_word_count: bool,
    pub last_saved: Option<DateTime<Utc>>,
}

pub async fn get_notepad(state: &AppState) -> NotepadView {
    NotepadView {
        content: state.notepad.content().await,
        word_count: state.notepad.word_count().await,
        show_word_count: state.notepad.show_word_count(),
        last_saved: state.notepad.last_saved().await,
    }
}

/// Buffer new content; it is written after the idle delay
pub async fn set_notepad(state: &AppState, content: String) {
    state.notepad.set_content(content).await;
}

/// Write buffered content now
pub async fn save_notepad(state: &AppState) -> Result<()> {
    state.notepad.flush().await
}

pub async fn clear_notepad(state: &AppState) -> Result<()> {
    state.notepad.clear().await
}

// ===== Docs =====

pub async fn list_docs(state: &AppState) -> Vec<Doc> {
    state.docs.list().await
}

pub async fn get_doc(state: &AppState, id: String) -> Result<Doc> {
    state.docs.get(&id).await
}

/// Create an untitled document at the top of the list
pub async fn create_doc(state: &AppState) -> Result<Doc> {
    state.docs.create().await
}

pub async fn update_doc_content(state: &AppState, id: String, content: String) -> Result<Doc> {
    state.docs.update_content(&id, content).await
}

pub async fn rename_doc(state: &AppState, id: String, title: String) -> Result<Doc> {
    state.docs.rename(&id, title).await
}

/// Snapshot the current content into the document's history
pub async fn save_doc_version(state: &AppState, id: String) -> Result<Doc> {
    state.docs.save_version(&id).await
}

pub async fn delete_doc(state: &AppState, id: String) -> Result<()> {
    state.docs.delete(&id).await
}

pub async fn search_docs(state: &AppState, query: String) -> Vec<Doc> {
    state.docs.search(&query).await
}

pub async fn doc_word_count(state: &AppState, id: String) -> Result<usize> {
    state.docs.word_count(&id).await
}
