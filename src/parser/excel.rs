//! Legacy Excel (.xls) decoder backed by calamine

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use calamine::{
    open_workbook, CellErrorType, Data, ExcelDateTime, ExcelDateTimeType, Range, Reader, Xls,
};

use crate::error::{LoadError, LoadResult};
use crate::infer::EpochMode;
use crate::model::{RawCell, Sheet};

use super::{check_index, WorkbookSource};

/// An open `.xls` workbook
pub struct XlsWorkbook<RS: Read + Seek> {
    reader: Option<Xls<RS>>,
    names: Vec<String>,
    /// Learned from the first date cell decoded
    epoch: Option<EpochMode>,
}

impl XlsWorkbook<BufReader<File>> {
    /// Open a workbook file
    pub fn open(path: impl AsRef<Path>) -> LoadResult<Self> {
        let workbook: Xls<_> = open_workbook(path.as_ref())?;
        Ok(Self::from_xls(workbook))
    }
}

impl<RS: Read + Seek> XlsWorkbook<RS> {
    /// Open a workbook from any seekable byte source
    pub fn from_reader(reader: RS) -> LoadResult<Self> {
        let workbook = Xls::new(reader)?;
        Ok(Self::from_xls(workbook))
    }

    fn from_xls(workbook: Xls<RS>) -> Self {
        let names = workbook.sheet_names();
        Self {
            reader: Some(workbook),
            names,
            epoch: None,
        }
    }

    fn decode(&mut self, name: &str) -> LoadResult<Sheet> {
        let reader = self.reader.as_mut().ok_or(LoadError::Released)?;
        let range = reader.worksheet_range(name)?;
        let (sheet, epoch) = convert_range(name, &range);

        if self.epoch.is_none() {
            if let Some(epoch) = epoch {
                tracing::debug!(?epoch, "detected workbook date epoch");
                self.epoch = Some(epoch);
            }
        }
        Ok(sheet)
    }
}

impl<RS: Read + Seek> WorkbookSource for XlsWorkbook<RS> {
    fn sheet_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn epoch_mode(&self) -> EpochMode {
        self.epoch.unwrap_or_default()
    }

    fn sheet_by_index(&mut self, index: usize) -> LoadResult<Sheet> {
        check_index(index, &self.names)?;
        let name = self.names[index].clone();
        self.decode(&name)
    }

    fn sheet_by_name(&mut self, name: &str) -> LoadResult<Sheet> {
        if !self.names.iter().any(|n| n == name) {
            return Err(LoadError::SheetNotFound(name.to_string()));
        }
        self.decode(name)
    }

    fn release(&mut self) {
        self.reader = None;
    }
}

/// Turn a calamine range into an absolute sheet grid
///
/// Also reports the date epoch if the range holds a date cell.
fn convert_range(name: &str, range: &Range<Data>) -> (Sheet, Option<EpochMode>) {
    // calamine ranges start at the first used cell; rows above and columns to
    // the left still count as sheet rows and columns
    let (nrows, ncols) = match range.end() {
        Some((row, col)) => (row as usize + 1, col as usize + 1),
        None => (0, 0),
    };

    let mut epoch = None;
    let rows = (0..nrows)
        .map(|row| {
            (0..ncols)
                .map(|col| match range.get_value((row as u32, col as u32)) {
                    Some(cell) => {
                        if let Data::DateTime(dt) = cell {
                            epoch.get_or_insert_with(|| epoch_of(dt));
                        }
                        convert_cell(cell)
                    }
                    None => RawCell::empty(),
                })
                .collect()
        })
        .collect();

    (Sheet::new(name, rows), epoch)
}

/// Recover the 1904 flag, which calamine keeps private but compares in `PartialEq`
fn epoch_of(dt: &ExcelDateTime) -> EpochMode {
    let kind = if dt.is_duration() {
        ExcelDateTimeType::TimeDelta
    } else {
        ExcelDateTimeType::DateTime
    };
    if *dt == ExcelDateTime::new(dt.as_f64(), kind, true) {
        EpochMode::Epoch1904
    } else {
        EpochMode::Epoch1900
    }
}

fn convert_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::empty(),
        Data::String(s) => RawCell::text(s),
        Data::Float(f) => RawCell::number(*f),
        Data::Int(i) => RawCell::number(*i as f64),
        Data::Bool(b) => RawCell::boolean(*b),
        Data::DateTime(dt) => RawCell::date(dt.as_f64()),
        Data::DateTimeIso(s) => RawCell::text(s),
        Data::DurationIso(s) => RawCell::text(s),
        Data::Error(e) => RawCell::error(error_code(e)),
    }
}

/// BIFF error code for a calamine error value
fn error_code(err: &CellErrorType) -> u8 {
    match err {
        CellErrorType::Null => 0x00,
        CellErrorType::Div0 => 0x07,
        CellErrorType::Value => 0x0F,
        CellErrorType::Ref => 0x17,
        CellErrorType::Name => 0x1D,
        CellErrorType::Num => 0x24,
        CellErrorType::NA => 0x2A,
        CellErrorType::GettingData => 0x2B,
    }
}
