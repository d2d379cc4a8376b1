//! xlstable - Typed tables from legacy Excel workbooks
//!
//! Decodes `.xls` sheets and infers one semantic type per column: booleans,
//! numbers, text and calendar values, with date serials normalized into dates,
//! times or date-times.

pub mod config;
pub mod error;
pub mod infer;
pub mod loader;
pub mod model;
pub mod output;
pub mod parser;

pub use config::{ColumnTypes, LoadOptions, SheetRequest, SheetSelector};
pub use error::{LoadError, LoadResult};
pub use loader::{load_path, load_reader, load_workbook};
pub use model::{CellValue, LoadedTables, SemanticType, Table};
