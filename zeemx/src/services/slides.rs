//! Slides service
//!
//! Decks of ordered pages. Pages are appended, edited, moved by one
//! position at a time, or removed.

use crate::error::{AppError, Result};
use crate::models::{SlideDeck, SlidePage};
use crate::storage::{Collection, SharedStore, StorageKey};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Editable page field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageField {
    Title,
    Content,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

fn seed_decks() -> Vec<SlideDeck> {
    vec![SlideDeck {
        id: "1".to_string(),
        title: "Philosophy of zeemX".to_string(),
        pages: vec![
            SlidePage {
                id: "p1".to_string(),
                title: "The Quiet Space".to_string(),
                content: "A sanctuary for the digital soul.".to_string(),
                image: Some("https://picsum.photos/seed/slide1/800/450".to_string()),
            },
            SlidePage {
                id: "p2".to_string(),
                title: "Minimalism".to_string(),
                content: "Focus on what truly matters. Remove the rest.".to_string(),
                image: None,
            },
        ],
        updated_at: Utc::now(),
    }]
}

fn new_page(title: &str, content: &str) -> SlidePage {
    SlidePage {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        content: content.to_string(),
        image: None,
    }
}

/// Service for slide decks
#[derive(Clone)]
pub struct SlidesService {
    decks: Arc<Collection<SlideDeck>>,
}

impl SlidesService {
    pub fn load(store: SharedStore) -> Result<Self> {
        let decks = Collection::open(store, StorageKey::Slides, seed_decks)?;
        Ok(Self {
            decks: Arc::new(decks),
        })
    }

    pub async fn list(&self) -> Vec<SlideDeck> {
        self.decks.snapshot().await
    }

    pub async fn get(&self, deck_id: &str) -> Result<SlideDeck> {
        self.decks
            .find(|deck| deck.id == deck_id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("deck {}", deck_id)))
    }

    /// New deck with a single welcome page. A blank title creates nothing.
    pub async fn create_deck(&self, title: &str) -> Result<Option<SlideDeck>> {
        if title.trim().is_empty() {
            return Ok(None);
        }

        let deck = SlideDeck {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            pages: vec![new_page("Welcome", "Presentation starts here.")],
            updated_at: Utc::now(),
        };

        let created = deck.clone();
        self.decks
            .mutate(move |decks| {
                decks.insert(0, deck);
                Ok(())
            })
            .await?;

        tracing::info!("Deck created: {}", created.title);

        Ok(Some(created))
    }

    /// Append a page to the end of the deck
    pub async fn add_page(&self, deck_id: &str) -> Result<SlideDeck> {
        self.modify(deck_id, |deck| {
            deck.pages.push(new_page("New Slide", "Add details here..."));
            Ok(())
        })
        .await
    }

    pub async fn update_page(
        &self,
        deck_id: &str,
        index: usize,
        field: PageField,
        value: String,
    ) -> Result<SlideDeck> {
        self.modify(deck_id, |deck| {
            let page = deck
                .pages
                .get_mut(index)
                .ok_or_else(|| AppError::NotFound(format!("page {} in deck {}", index, deck_id)))?;
            match field {
                PageField::Title => page.title = value,
                PageField::Content => page.content = value,
                PageField::Image => {
                    page.image = if value.trim().is_empty() { None } else { Some(value) }
                }
            }
            Ok(())
        })
        .await
    }

    /// Swap a page with its neighbour. Returns the page's new index; a
    /// move past either end leaves the deck unchanged.
    pub async fn move_page(
        &self,
        deck_id: &str,
        index: usize,
        direction: MoveDirection,
    ) -> Result<usize> {
        let deck = self.get(deck_id).await?;
        if index >= deck.pages.len() {
            return Err(AppError::NotFound(format!("page {} in deck {}", index, deck_id)));
        }

        let target = match direction {
            MoveDirection::Up => index.checked_sub(1),
            MoveDirection::Down => Some(index + 1).filter(|t| *t < deck.pages.len()),
        };
        let Some(target) = target else {
            return Ok(index);
        };

        self.modify(deck_id, |deck| {
            deck.pages.swap(index, target);
            Ok(())
        })
        .await?;

        Ok(target)
    }

    pub async fn remove_page(&self, deck_id: &str, index: usize) -> Result<SlideDeck> {
        self.modify(deck_id, |deck| {
            if index >= deck.pages.len() {
                return Err(AppError::NotFound(format!("page {} in deck {}", index, deck_id)));
            }
            deck.pages.remove(index);
            Ok(())
        })
        .await
    }

    pub async fn reload(&self) -> Result<()> {
        self.decks.reload().await
    }

    async fn modify<F>(&self, deck_id: &str, f: F) -> Result<SlideDeck>
    where
        F: FnOnce(&mut SlideDeck) -> Result<()>,
    {
        self.decks
            .mutate(|decks| {
                let deck = decks
                    .iter_mut()
                    .find(|deck| deck.id == deck_id)
                    .ok_or_else(|| AppError::NotFound(format!("deck {}", deck_id)))?;
                f(deck)?;
                deck.updated_at = Utc::now();
                Ok(deck.clone())
            })
            .await
    }
}
