//! Decoded sheet grid

use super::raw::RawCell;

/// One worksheet as a rectangular grid of raw cells
///
/// Coordinates are absolute and 0-based, so row 0 is the first row of the
/// sheet even when it is empty.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    name: String,
    ncols: usize,
    rows: Vec<Vec<RawCell>>,
}

impl Sheet {
    /// Build a sheet from rows; short rows are padded with empty cells
    pub fn new(name: impl Into<String>, rows: Vec<Vec<RawCell>>) -> Self {
        let ncols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(ncols, RawCell::empty());
                row
            })
            .collect();

        Self {
            name: name.into(),
            ncols,
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Cell at (row, col), or `None` outside the grid
    pub fn cell(&self, row: usize, col: usize) -> Option<&RawCell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Cells of one column over rows `start..end`, clamped to the sheet
    pub fn column_slice(&self, col: usize, start: usize, end: usize) -> Vec<&RawCell> {
        let end = end.min(self.rows.len());
        if start >= end {
            return Vec::new();
        }
        self.rows[start..end]
            .iter()
            .filter_map(|row| row.get(col))
            .collect()
    }
}
