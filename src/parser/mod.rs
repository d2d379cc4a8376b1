//! Workbook decoders feeding the inference engine

mod excel;
mod memory;

use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::infer::EpochMode;
use crate::model::Sheet;

pub use self::excel::XlsWorkbook;
pub use self::memory::MemoryWorkbook;

/// A decoded workbook the loader can pull sheets from
pub trait WorkbookSource {
    /// Sheet names in workbook order
    fn sheet_names(&self) -> Vec<String>;

    /// Date epoch used by the workbook's date serials
    fn epoch_mode(&self) -> EpochMode;

    /// Decode the sheet at a 0-based position
    fn sheet_by_index(&mut self, index: usize) -> LoadResult<Sheet>;

    /// Decode the sheet with the given name
    fn sheet_by_name(&mut self, name: &str) -> LoadResult<Sheet>;

    /// Free decoder resources; called once when loading finishes
    fn release(&mut self) {}
}

/// Check if a path looks like a legacy binary workbook
pub fn supports_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("xls"))
        .unwrap_or(false)
}

/// Detect a compound-file (OLE2) container from its magic bytes
pub fn is_compound_file(path: &Path) -> bool {
    use std::fs::File;
    use std::io::Read;

    let mut buffer = [0u8; 8];
    File::open(path)
        .and_then(|mut file| file.read_exact(&mut buffer))
        .map(|_| buffer == [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])
        .unwrap_or(false)
}

/// Resolve a sheet position against a list of names
pub(crate) fn check_index(index: usize, names: &[String]) -> LoadResult<()> {
    if index < names.len() {
        Ok(())
    } else {
        Err(LoadError::SheetIndexOutOfRange {
            index,
            count: names.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_extension() {
        assert!(supports_extension(Path::new("book.xls")));
        assert!(supports_extension(Path::new("BOOK.XLS")));
        assert!(!supports_extension(Path::new("book.xlsx")));
        assert!(!supports_extension(Path::new("book")));
    }

    #[test]
    fn test_compound_file_magic() {
        let mut ole = tempfile::NamedTempFile::new().unwrap();
        ole.write_all(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0x00])
            .unwrap();
        assert!(is_compound_file(ole.path()));

        let mut text = tempfile::NamedTempFile::new().unwrap();
        text.write_all(b"a,b,c\n").unwrap();
        assert!(!is_compound_file(text.path()));
        assert!(!is_compound_file(Path::new("/nonexistent/book.xls")));
    }
}
