//! Docs service
//!
//! Rich-text documents with a small manual version history.

use crate::config::{DOC_HISTORY_LIMIT, NEW_DOC_CONTENT, NEW_DOC_TITLE};
use crate::error::{AppError, Result};
use crate::models::{Doc, DocSnapshot};
use crate::services::settings::AppSettings;
use crate::storage::{Collection, SharedStore, StorageKey};
use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

lazy_static! {
    static ref MARKUP_TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
}

fn seed_docs() -> Vec<Doc> {
    vec![Doc {
        id: "1".to_string(),
        title: "The Art of Stillness".to_string(),
        content: "<h1>The Art of Stillness</h1><p>Silence is not the absence of sound, but the presence of self.</p>".to_string(),
        history: Vec::new(),
        updated_at: Utc::now(),
    }]
}

/// Service for managing documents
#[derive(Clone)]
pub struct DocsService {
    docs: Arc<Collection<Doc>>,
    settings: watch::Receiver<AppSettings>,
}

impl DocsService {
    pub fn load(store: SharedStore, settings: watch::Receiver<AppSettings>) -> Result<Self> {
        let docs = Collection::open(store, StorageKey::Docs, seed_docs)?;
        Ok(Self {
            docs: Arc::new(docs),
            settings,
        })
    }

    /// All documents, newest created first
    pub async fn list(&self) -> Vec<Doc> {
        self.docs.snapshot().await
    }

    pub async fn get(&self, id: &str) -> Result<Doc> {
        self.docs
            .find(|doc| doc.id == id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("document {}", id)))
    }

    /// Create a starter document at the top of the list
    pub async fn create(&self) -> Result<Doc> {
        let doc = Doc {
            id: Uuid::new_v4().to_string(),
            title: NEW_DOC_TITLE.to_string(),
            content: NEW_DOC_CONTENT.to_string(),
            history: Vec::new(),
            updated_at: Utc::now(),
        };

        let created = doc.clone();
        self.docs
            .mutate(move |docs| {
                docs.insert(0, doc);
                Ok(())
            })
            .await?;

        tracing::info!("Document created: {}", created.id);

        Ok(created)
    }

    /// Replace the content of a document
    pub async fn update_content(&self, id: &str, content: String) -> Result<Doc> {
        let doc = self
            .modify(id, |doc| {
                doc.content = content;
                doc.updated_at = Utc::now();
            })
            .await?;

        tracing::debug!("Document updated: {}", id);

        Ok(doc)
    }

    pub async fn rename(&self, id: &str, title: String) -> Result<Doc> {
        self.modify(id, |doc| {
            doc.title = title;
            doc.updated_at = Utc::now();
        })
        .await
    }

    /// Snapshot the current content into history (newest first, capped)
    pub async fn save_version(&self, id: &str) -> Result<Doc> {
        let doc = self
            .modify(id, |doc| {
                doc.history.insert(
                    0,
                    DocSnapshot {
                        content: doc.content.clone(),
                        timestamp: Utc::now(),
                    },
                );
                doc.history.truncate(DOC_HISTORY_LIMIT);
            })
            .await?;

        tracing::info!("Version saved for document {} ({} kept)", id, doc.history.len());

        Ok(doc)
    }

    /// Delete a document. No confirmation is required.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.docs
            .mutate(|docs| {
                let before = docs.len();
                docs.retain(|doc| doc.id != id);
                if docs.len() == before {
                    return Err(AppError::NotFound(format!("document {}", id)));
                }
                Ok(())
            })
            .await?;

        tracing::info!("Document deleted");

        Ok(())
    }

    /// Titles in list order
    pub async fn titles(&self) -> Vec<String> {
        self.docs
            .snapshot()
            .await
            .into_iter()
            .map(|doc| doc.title)
            .collect()
    }

    /// Word count of the rendered text (markup removed)
    pub async fn word_count(&self, id: &str) -> Result<usize> {
        let doc = self.get(id).await?;
        Ok(plain_text(&doc.content).split_whitespace().count())
    }

    pub fn show_word_count(&self) -> bool {
        self.settings.borrow().show_word_count
    }

    /// Case-insensitive match on title or content
    pub async fn search(&self, query: &str) -> Vec<Doc> {
        let query_lower = query.to_lowercase();

        self.docs
            .snapshot()
            .await
            .into_iter()
            .filter(|doc| {
                doc.title.to_lowercase().contains(&query_lower)
                    || plain_text(&doc.content).to_lowercase().contains(&query_lower)
            })
            .collect()
    }

    pub async fn reload(&self) -> Result<()> {
        self.docs.reload().await
    }

    async fn modify<F>(&self, id: &str, f: F) -> Result<Doc>
    where
        F: FnOnce(&mut Doc),
    {
        self.docs
            .mutate(|docs| {
                let doc = docs
                    .iter_mut()
                    .find(|doc| doc.id == id)
                    .ok_or_else(|| AppError::NotFound(format!("document {}", id)))?;
                f(doc);
                Ok(doc.clone())
            })
            .await
    }
}

/// Strip markup tags, leaving a space where each tag was
fn plain_text(markup: &str) -> String {
    MARKUP_TAG.replace_all(markup, " ").into_owned()
}
