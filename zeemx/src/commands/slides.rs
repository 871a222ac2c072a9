//! Slide deck and spreadsheet commands

use crate::app::AppState;
use crate::error::{AppError, Result};
use crate::models::SlideDeck;
use crate::services::slides::{MoveDirection, PageField};
use crate::sheet::CellRef;
use serde::Serialize;
use std::path::PathBuf;

// ===== Slides =====

pub async fn list_decks(state: &AppState) -> Vec<SlideDeck> {
    state.slides.list().await
}

/// Create a deck; a blank title creates nothing and returns `None`
pub async fn create_deck(state: &AppState, title: String) -> Result<Option<SlideDeck>> {
    state.slides.create_deck(&title).await
}

pub async fn add_slide(state: &AppState, deck_id: String) -> Result<SlideDeck> {
    state.slides.add_page(&deck_id).await
}

pub async fn update_slide(
    state: &AppState,
    deck_id: String,
    index: usize,
    field: PageField,
    value: String,
) -> Result<SlideDeck> {
    state.slides.update_page(&deck_id, index, field, value).await
}

/// Returns the slide's index after the move
pub async fn move_slide(
    state: &AppState,
    deck_id: String,
    index: usize,
    direction: MoveDirection,
) -> Result<usize> {
    state.slides.move_page(&deck_id, index, direction).await
}

pub async fn remove_slide(state: &AppState, deck_id: String, index: usize) -> Result<SlideDeck> {
    state.slides.remove_page(&deck_id, index).await
}

// ===== Sheet =====

#[derive(Debug, Serialize)]
pub struct SheetView {
    pub raw: Vec<Vec<String>>,
    pub display: Vec<Vec<String>>,
}

/// Raw cells plus their display values
pub async fn get_sheet(state: &AppState) -> SheetView {
    let grid = state.sheet.grid().await;
    SheetView {
        display: grid.display_all(),
        raw: grid.into(),
    }
}

/// Overwrite a cell by address (e.g. `"B7"`); returns its display value
pub async fn set_cell(state: &AppState, cell: String, value: String) -> Result<String> {
    let cell = CellRef::parse(&cell)
        .ok_or_else(|| AppError::InvalidArgument(format!("not a cell address: {}", cell)))?;
    state.sheet.set_cell(cell, value).await
}

pub async fn reset_sheet(state: &AppState) -> Result<()> {
    state.sheet.reset().await
}

pub async fn export_csv(state: &AppState, path: PathBuf) -> Result<()> {
    state.sheet.export_csv(&path).await
}
