//! Workbook loading: sheets in, typed tables out

mod assemble;

use std::io::{Read, Seek};
use std::path::Path;

use indexmap::IndexMap;

use crate::config::{LoadOptions, SheetSelector};
use crate::error::{LoadError, LoadResult};
use crate::infer::{build_column, EpochMode, Window};
use crate::model::{LoadedTables, Sheet, Table};
use crate::parser::{is_compound_file, supports_extension, WorkbookSource, XlsWorkbook};

pub use assemble::assemble_table;

/// Releases the workbook when dropped, whichever way loading ends
struct ReleaseGuard<'a, W: WorkbookSource + ?Sized> {
    source: &'a mut W,
}

impl<W: WorkbookSource + ?Sized> Drop for ReleaseGuard<'_, W> {
    fn drop(&mut self) {
        self.source.release();
    }
}

/// Load the requested sheets of a workbook
///
/// Options are checked before any sheet is decoded. The source is released
/// exactly once before returning, on success and on failure. When several
/// sheets are requested, the first failing sheet fails the whole load.
pub fn load_workbook<W: WorkbookSource + ?Sized>(
    source: &mut W,
    options: &LoadOptions,
) -> LoadResult<LoadedTables> {
    let mut guard = ReleaseGuard { source };
    options.validate()?;

    let window = options.window();
    let mut tables = IndexMap::new();
    for selector in options.sheets.selectors() {
        let sheet = resolve_sheet(&mut *guard.source, selector)?;
        let epoch = guard.source.epoch_mode();
        let table = load_sheet(&sheet, &window, epoch, options)?;
        tables.insert(sheet.name().to_string(), table);
    }

    if options.sheets.is_multiple() {
        return Ok(LoadedTables::Multiple(tables));
    }
    tables
        .pop()
        .map(|(_, table)| LoadedTables::Single(table))
        .ok_or_else(|| LoadError::InvalidArgument("no sheet was requested".to_string()))
}

/// Open an `.xls` file and load it
pub fn load_path(path: impl AsRef<Path>, options: &LoadOptions) -> LoadResult<LoadedTables> {
    options.validate()?;
    let path = path.as_ref();
    if !supports_extension(path) {
        tracing::warn!(path = %path.display(), "file does not have an .xls extension");
    }
    if path.exists() && !is_compound_file(path) {
        tracing::warn!(path = %path.display(), "file is not a compound document");
    }
    let mut workbook = XlsWorkbook::open(path)?;
    load_workbook(&mut workbook, options)
}

/// Load an `.xls` workbook from a seekable byte source
pub fn load_reader<RS: Read + Seek>(
    reader: RS,
    options: &LoadOptions,
) -> LoadResult<LoadedTables> {
    options.validate()?;
    let mut workbook = XlsWorkbook::from_reader(reader)?;
    load_workbook(&mut workbook, options)
}

fn resolve_sheet<W: WorkbookSource + ?Sized>(
    source: &mut W,
    selector: Option<&SheetSelector>,
) -> LoadResult<Sheet> {
    match selector {
        None => source.sheet_by_index(0),
        Some(SheetSelector::Index(index)) => source.sheet_by_index(*index),
        Some(SheetSelector::Name(name)) => source.sheet_by_name(name),
    }
}

/// Build every column of a sheet and assemble them into a table
pub fn load_sheet(
    sheet: &Sheet,
    window: &Window,
    epoch: EpochMode,
    options: &LoadOptions,
) -> LoadResult<Table> {
    tracing::debug!(
        sheet = sheet.name(),
        rows = sheet.nrows(),
        columns = sheet.ncols(),
        "loading sheet"
    );

    let columns = (0..sheet.ncols())
        .map(|col| build_column(sheet, col, window, epoch))
        .collect::<LoadResult<Vec<_>>>()?;

    assemble_table(columns, window.data_start(), options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellValue, RawCell, SemanticType};
    use crate::parser::MemoryWorkbook;

    fn book() -> MemoryWorkbook {
        MemoryWorkbook::new(vec![
            Sheet::new(
                "first",
                vec![
                    vec![RawCell::text("n"), RawCell::text("ok")],
                    vec![RawCell::number(1.0), RawCell::boolean(true)],
                    vec![RawCell::number(2.0), RawCell::empty()],
                ],
            ),
            Sheet::new("second", vec![vec![RawCell::text("only")]]),
        ])
    }

    #[test]
    fn test_default_loads_first_sheet() {
        let table = load_workbook(&mut book(), &LoadOptions::default())
            .unwrap()
            .into_single()
            .unwrap();
        assert_eq!(table.column_names(), vec![Some("n"), Some("ok")]);
        assert_eq!(table.columns[0].semantic_type, SemanticType::Number);
        assert_eq!(table.columns[1].semantic_type, SemanticType::Boolean);
        assert_eq!(table.rows[1].cells, vec![CellValue::Number(2.0), CellValue::Null]);
    }

    #[test]
    fn test_single_element_list_is_multiple() {
        let options = LoadOptions::new().with_sheets(vec![SheetSelector::Index(1)]);
        let tables = load_workbook(&mut book(), &options)
            .unwrap()
            .into_multiple()
            .unwrap();
        assert_eq!(tables.keys().collect::<Vec<_>>(), vec!["second"]);
        assert_eq!(tables["second"].row_count(), 0);
    }

    #[test]
    fn test_header_off_reads_every_row() {
        let options = LoadOptions::new().with_header(false).with_row_limit(2);
        let table = load_workbook(&mut book(), &options)
            .unwrap()
            .into_single()
            .unwrap();
        assert_eq!(table.column_names(), vec![None, None]);
        assert_eq!(table.columns[0].semantic_type, SemanticType::Text);
        assert_eq!(table.rows[0].cells[0], CellValue::from("n"));
        assert_eq!(table.rows[1].cells[0], CellValue::from("1.0"));
        assert_eq!(table.rows[0].source_line, 1);
    }
}
