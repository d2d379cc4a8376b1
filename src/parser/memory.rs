//! Workbook held entirely in memory

use crate::error::{LoadError, LoadResult};
use crate::infer::EpochMode;
use crate::model::Sheet;

use super::{check_index, WorkbookSource};

/// A workbook built from already-decoded sheets
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<Sheet>,
    epoch: EpochMode,
}

impl MemoryWorkbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self {
            sheets,
            epoch: EpochMode::default(),
        }
    }

    /// Set the date epoch
    pub fn with_epoch(mut self, epoch: EpochMode) -> Self {
        self.epoch = epoch;
        self
    }
}

impl WorkbookSource for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name().to_string()).collect()
    }

    fn epoch_mode(&self) -> EpochMode {
        self.epoch
    }

    fn sheet_by_index(&mut self, index: usize) -> LoadResult<Sheet> {
        check_index(index, &self.sheet_names())?;
        Ok(self.sheets[index].clone())
    }

    fn sheet_by_name(&mut self, name: &str) -> LoadResult<Sheet> {
        self.sheets
            .iter()
            .find(|s| s.name() == name)
            .cloned()
            .ok_or_else(|| LoadError::SheetNotFound(name.to_string()))
    }
}
