//! Data model for raw sheets and typed tables

mod cast;
mod raw;
mod schema;
mod sheet;
mod table;

pub use raw::{error_text, number_to_text, RawCell, RawValue};
pub use schema::{column_letter, Column, LowLevelTypeTag, SemanticType};
pub use sheet::Sheet;
pub use table::{CellValue, ColumnData, LoadedTables, Row, Table};
