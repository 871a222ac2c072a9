//! Spreadsheet service
//!
//! Owns the persisted grid. Every cell edit re-persists the whole matrix.

use crate::error::Result;
use crate::sheet::{CellRef, Grid};
use crate::storage::{SharedStore, Slot, StorageKey};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Service for the spreadsheet grid
#[derive(Clone)]
pub struct SheetService {
    slot: Slot<Grid>,
    grid: Arc<Mutex<Grid>>,
}

impl SheetService {
    pub fn load(store: SharedStore) -> Result<Self> {
        let slot = Slot::new(store, StorageKey::Sheet);
        let grid = slot.load()?.unwrap_or_default();

        Ok(Self {
            slot,
            grid: Arc::new(Mutex::new(grid)),
        })
    }

    pub async fn grid(&self) -> Grid {
        self.grid.lock().await.clone()
    }

    /// Overwrite one cell and return its new display value
    pub async fn set_cell(&self, cell: CellRef, value: String) -> Result<String> {
        let mut grid = self.grid.lock().await;

        let mut next = grid.clone();
        next.set(cell.row, cell.col, value)?;
        self.slot.save(&next)?;
        *grid = next;

        tracing::debug!("Cell {} updated", cell);

        Ok(grid.display(cell.row, cell.col).unwrap_or_default())
    }

    pub async fn display(&self, cell: CellRef) -> Option<String> {
        self.grid.lock().await.display(cell.row, cell.col)
    }

    /// Every display value, row-major
    pub async fn display_all(&self) -> Vec<Vec<String>> {
        self.grid.lock().await.display_all()
    }

    /// Clear the whole grid
    pub async fn reset(&self) -> Result<()> {
        let mut grid = self.grid.lock().await;
        let empty = Grid::default();
        self.slot.save(&empty)?;
        *grid = empty;

        tracing::info!("Spreadsheet reset");

        Ok(())
    }

    pub async fn to_csv(&self) -> String {
        self.grid.lock().await.to_csv()
    }

    /// Write the raw cells as CSV to `path`
    pub async fn export_csv(&self, path: &Path) -> Result<()> {
        let csv = self.to_csv().await;
        tokio::fs::write(path, csv).await?;

        tracing::info!("Spreadsheet exported to {:?}", path);

        Ok(())
    }

    pub async fn reload(&self) -> Result<()> {
        let loaded = self.slot.load()?.unwrap_or_default();
        *self.grid.lock().await = loaded;
        Ok(())
    }
}
