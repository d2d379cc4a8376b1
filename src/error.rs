//! Error types for workbook loading

use thiserror::Error;

use crate::model::SemanticType;

/// Result type for load operations
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Errors that can occur while loading a workbook into tables
#[derive(Debug, Error)]
pub enum LoadError {
    /// A caller-supplied option is malformed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No sheet with the requested name
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Sheet index past the end of the workbook
    #[error("Sheet index {index} out of range (workbook has {count} sheets)")]
    SheetIndexOutOfRange { index: usize, count: usize },

    /// A date-tagged cell could not be turned into a calendar value
    #[error("Sheet '{sheet}', column {column}, row {row}: {source}")]
    DateConversion {
        sheet: String,
        column: usize,
        row: usize,
        #[source]
        source: DateConversionError,
    },

    /// A value could not be converted to the column's final type
    #[error("Column '{column}', row {row}: {source}")]
    Cast {
        column: String,
        row: usize,
        #[source]
        source: CastError,
    },

    /// Sheet access after the workbook was released
    #[error("Workbook resources already released")]
    Released,

    /// The binary decoder rejected the file
    #[error("Failed to decode workbook: {0}")]
    Xls(#[from] calamine::XlsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Options document is not valid JSON
    #[error("Invalid options document: {0}")]
    Config(#[from] serde_json::Error),
}

/// Failure to convert a date serial number
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DateConversionError {
    #[error("date serial {0} is negative")]
    Negative(f64),

    #[error("date serial {0} is not a finite number")]
    NotFinite(f64),

    #[error("date serial {0} is out of range")]
    OutOfRange(f64),

    #[error("expected a date serial, found text {0:?}")]
    NotASerial(String),
}

/// Failure to cast a value to a semantic type
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot convert {value:?} to {target}")]
pub struct CastError {
    pub value: String,
    pub target: SemanticType,
}

impl CastError {
    pub fn new(value: impl Into<String>, target: SemanticType) -> Self {
        Self {
            value: value.into(),
            target,
        }
    }
}
