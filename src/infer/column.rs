//! Per-column type inference and normalization

use crate::error::{LoadError, LoadResult};
use crate::model::{column_letter, ColumnData, LowLevelTypeTag, RawValue, Sheet};

use super::boolean::normalize_booleans;
use super::dates::{normalize_dates, EpochMode};
use super::unify::dominant_tag;

/// Rows of a sheet that make up one table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    /// Rows to skip from the top of the sheet
    pub skip_lines: usize,
    /// Whether the first row after the skipped ones holds column names
    pub header: bool,
    /// Maximum number of data rows
    pub row_limit: Option<usize>,
}

impl Window {
    pub fn new(skip_lines: usize, header: bool, row_limit: Option<usize>) -> Self {
        Self {
            skip_lines,
            header,
            row_limit,
        }
    }

    /// Sheet row holding the column names, if any
    pub fn header_row(&self) -> Option<usize> {
        self.header.then_some(self.skip_lines)
    }

    /// First data row
    pub fn data_start(&self) -> usize {
        self.skip_lines + usize::from(self.header)
    }

    /// One past the last data row for a sheet with `nrows` rows
    pub fn data_end(&self, nrows: usize) -> usize {
        match self.row_limit {
            Some(limit) => nrows.min(self.data_start().saturating_add(limit)),
            None => nrows,
        }
    }
}

/// Build one typed column from a sheet
pub fn build_column(
    sheet: &Sheet,
    col: usize,
    window: &Window,
    epoch: EpochMode,
) -> LoadResult<ColumnData> {
    let start = window.data_start();
    let cells = sheet.column_slice(col, start, window.data_end(sheet.nrows()));

    let name = window
        .header_row()
        .and_then(|row| sheet.cell(row, col))
        .map(|cell| cell.value.to_text())
        .filter(|name| !name.is_empty());

    let tag = dominant_tag(cells.iter().map(|cell| cell.tag));
    let mut semantic_type = tag.semantic_type();
    let raw: Vec<&RawValue> = cells.iter().map(|cell| &cell.value).collect();

    tracing::debug!(
        sheet = sheet.name(),
        column = col,
        rows = raw.len(),
        ?tag,
        %semantic_type,
        "unified column"
    );

    let values = match tag {
        LowLevelTypeTag::Boolean | LowLevelTypeTag::Empty | LowLevelTypeTag::Blank => {
            normalize_booleans(raw)
        }
        LowLevelTypeTag::Date => {
            let dates = normalize_dates(raw, epoch).map_err(|e| LoadError::DateConversion {
                sheet: sheet.name().to_string(),
                column: col,
                row: start + e.offset + 1,
                source: e.error,
            })?;
            semantic_type = dates.semantic_type;
            dates.values
        }
        _ => raw
            .iter()
            .enumerate()
            .map(|(offset, value)| {
                semantic_type
                    .cast(value.to_cell_value())
                    .map_err(|source| LoadError::Cast {
                        column: name.clone().unwrap_or_else(|| column_letter(col)),
                        row: start + offset + 1,
                        source,
                    })
            })
            .collect::<LoadResult<Vec<_>>>()?,
    };

    Ok(ColumnData {
        name,
        semantic_type,
        values,
    })
}
