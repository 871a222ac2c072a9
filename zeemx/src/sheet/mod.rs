//! Spreadsheet grid
//!
//! A fixed 20×10 matrix of raw cell strings. Cells hold literal text or a
//! formula starting with `=`; display values are computed on read by
//! [`formula::evaluate`] and never cached.

pub mod formula;

use crate::config::{SHEET_COLS, SHEET_ROWS};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column letter for a 0-based column index
pub fn column_letter(col: usize) -> Option<char> {
    if col < SHEET_COLS {
        Some((b'A' + col as u8) as char)
    } else {
        None
    }
}

/// A cell address such as `B7`, stored 0-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> Option<Self> {
        if row < SHEET_ROWS && col < SHEET_COLS {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Parse a single-letter column plus a 1-based row, e.g. `"b7"`.
    /// Addresses outside the grid are rejected.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        let mut chars = name.chars();
        let letter = chars.next()?.to_ascii_uppercase();
        if !letter.is_ascii_uppercase() {
            return None;
        }

        let row: usize = chars.as_str().parse().ok()?;
        let col = (letter as u8 - b'A') as usize;
        Self::new(row.checked_sub(1)?, col)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = column_letter(self.col).unwrap_or('?');
        write!(f, "{}{}", letter, self.row + 1)
    }
}

/// The sheet's raw cell strings, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Vec<String>>", into = "Vec<Vec<String>>")]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            rows: vec![vec![String::new(); SHEET_COLS]; SHEET_ROWS],
        }
    }
}

impl From<Vec<Vec<String>>> for Grid {
    /// Stored grids of any shape are padded or cut to 20×10
    fn from(mut rows: Vec<Vec<String>>) -> Self {
        rows.resize_with(SHEET_ROWS, Vec::new);
        for row in rows.iter_mut() {
            row.resize_with(SHEET_COLS, String::new);
        }
        Self { rows }
    }
}

impl From<Grid> for Vec<Vec<String>> {
    fn from(grid: Grid) -> Self {
        grid.rows
    }
}

impl Grid {
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Raw content of a cell
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    pub fn set(&mut self, row: usize, col: usize, value: String) -> Result<()> {
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|cells| cells.get_mut(col))
            .ok_or_else(|| {
                AppError::InvalidArgument(format!("cell ({}, {}) is outside the sheet", row, col))
            })?;
        *cell = value;
        Ok(())
    }

    /// Display value of a cell: formulas evaluated, text unchanged
    pub fn display(&self, row: usize, col: usize) -> Option<String> {
        self.get(row, col).map(|raw| formula::evaluate(raw, self))
    }

    pub fn display_all(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|cells| cells.iter().map(|raw| formula::evaluate(raw, self)).collect())
            .collect()
    }

    /// Clear every cell
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Raw cells as CSV: rows joined by `\n`, cells by `,`
    pub fn to_csv(&self) -> String {
        self.rows
            .iter()
            .map(|cells| {
                cells
                    .iter()
                    .map(|cell| csv_field(cell))
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Quote a field when it holds a delimiter, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains(|c| matches!(c, ',' | '"' | '\r' | '\n')) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_ref_parse() {
        assert_eq!(CellRef::parse("A1"), Some(CellRef { row: 0, col: 0 }));
        assert_eq!(CellRef::parse("j20"), Some(CellRef { row: 19, col: 9 }));
        assert_eq!(CellRef::parse("K1"), None);
        assert_eq!(CellRef::parse("A0"), None);
        assert_eq!(CellRef::parse("A21"), None);
        assert_eq!(CellRef::parse("7"), None);
        assert_eq!(CellRef::parse("B7").unwrap().to_string(), "B7");
    }

    #[test]
    fn test_default_grid_is_empty() {
        let grid = Grid::default();
        assert_eq!(grid.rows().len(), SHEET_ROWS);
        assert!(grid.rows().iter().all(|row| row.len() == SHEET_COLS));
        assert_eq!(grid.get(19, 9), Some(""));
        assert_eq!(grid.get(20, 0), None);
    }

    #[test]
    fn test_set_out_of_range_is_error() {
        let mut grid = Grid::default();
        assert!(grid.set(0, 10, "x".to_string()).is_err());
        assert!(grid.set(20, 0, "x".to_string()).is_err());
        grid.set(2, 3, "x".to_string()).unwrap();
        assert_eq!(grid.get(2, 3), Some("x"));
    }

    #[test]
    fn test_stored_grid_is_normalized() {
        let grid: Grid = serde_json::from_str(r#"[["1","2"],["3"]]"#).unwrap();
        assert_eq!(grid.rows().len(), SHEET_ROWS);
        assert_eq!(grid.get(0, 1), Some("2"));
        assert_eq!(grid.get(1, 9), Some(""));

        let json = serde_json::to_string(&grid).unwrap();
        assert!(json.starts_with(r#"[["1","2","""#));
    }

    #[test]
    fn test_csv_quotes_special_fields() {
        let mut grid = Grid::default();
        grid.set(0, 0, "a,b".to_string()).unwrap();
        grid.set(0, 1, "say \"hi\"".to_string()).unwrap();
        grid.set(0, 2, "plain".to_string()).unwrap();

        let csv = grid.to_csv();
        let first = csv.lines().next().unwrap();
        assert_eq!(first, "\"a,b\",\"say \"\"hi\"\"\",plain,,,,,,,");
        assert_eq!(csv.lines().count(), SHEET_ROWS);
    }

    #[test]
    fn test_reset_clears_cells() {
        let mut grid = Grid::default();
        grid.set(4, 4, "5".to_string()).unwrap();
        grid.reset();
        assert_eq!(grid, Grid::default());
    }
}
