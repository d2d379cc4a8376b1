//! Load options for turning a workbook into tables

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LoadError, LoadResult};
use crate::infer::Window;
use crate::model::SemanticType;

/// Reference to one sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SheetSelector {
    /// 0-based position in the workbook
    Index(usize),
    /// Sheet name
    Name(String),
}

impl std::str::FromStr for SheetSelector {
    type Err = String;

    /// Purely numeric text selects by position
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("Sheet selector must not be empty".to_string());
        }
        if s.bytes().all(|b| b.is_ascii_digit()) {
            s.parse()
                .map(SheetSelector::Index)
                .map_err(|e| format!("Invalid sheet index {}: {}", s, e))
        } else {
            Ok(SheetSelector::Name(s.to_string()))
        }
    }
}

impl std::fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetSelector::Index(i) => write!(f, "#{}", i),
            SheetSelector::Name(name) => write!(f, "{}", name),
        }
    }
}

/// Which sheets to load
///
/// The shape decides the shape of the result: `Multiple` always yields a
/// name-keyed collection, even with a single entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SheetRequest {
    /// The first sheet of the workbook
    #[default]
    First,
    Single(SheetSelector),
    Multiple(Vec<SheetSelector>),
}

impl SheetRequest {
    /// Whether the result is a name-keyed collection
    pub fn is_multiple(&self) -> bool {
        matches!(self, SheetRequest::Multiple(_))
    }

    /// Selectors in request order; `None` stands for the first sheet
    pub fn selectors(&self) -> Vec<Option<&SheetSelector>> {
        match self {
            SheetRequest::First => vec![None],
            SheetRequest::Single(selector) => vec![Some(selector)],
            SheetRequest::Multiple(selectors) => selectors.iter().map(Some).collect(),
        }
    }
}

/// Caller-supplied column types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnTypes {
    /// One type for every column
    Uniform(SemanticType),
    /// Types keyed by final column name, merged over the detected ones
    Named(IndexMap<String, SemanticType>),
}

/// Options for a workbook load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Rows to skip from the top of each sheet
    pub skip_lines: usize,
    /// Whether the first row after the skipped ones holds column names
    pub header: bool,
    /// Maximum number of data rows per sheet
    pub row_limit: Option<usize>,
    /// Sheets to load
    pub sheets: SheetRequest,
    /// Explicit column names, replacing detected headers
    pub column_names: Option<Vec<String>>,
    /// Explicit column types
    pub column_types: Option<ColumnTypes>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            skip_lines: 0,
            header: true,
            row_limit: None,
            sheets: SheetRequest::First,
            column_names: None,
            column_types: None,
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set rows to skip
    pub fn with_skip_lines(mut self, skip_lines: usize) -> Self {
        self.skip_lines = skip_lines;
        self
    }

    /// Enable or disable the header row
    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Limit the number of data rows
    pub fn with_row_limit(mut self, limit: usize) -> Self {
        self.row_limit = Some(limit);
        self
    }

    /// Load one sheet
    pub fn with_sheet(mut self, sheet: SheetSelector) -> Self {
        self.sheets = SheetRequest::Single(sheet);
        self
    }

    /// Load several sheets into a name-keyed collection
    pub fn with_sheets(mut self, sheets: Vec<SheetSelector>) -> Self {
        self.sheets = SheetRequest::Multiple(sheets);
        self
    }

    /// Replace detected column names
    pub fn with_column_names(mut self, names: Vec<String>) -> Self {
        self.column_names = Some(names);
        self
    }

    /// Override column types
    pub fn with_column_types(mut self, types: ColumnTypes) -> Self {
        self.column_types = Some(types);
        self
    }

    /// Row window applied to every sheet
    pub fn window(&self) -> Window {
        Window::new(self.skip_lines, self.header, self.row_limit)
    }

    /// Check option values that the type system cannot rule out
    pub fn validate(&self) -> LoadResult<()> {
        if self.row_limit == Some(0) {
            return Err(LoadError::InvalidArgument(
                "row_limit argument must be a positive int".to_string(),
            ));
        }
        Ok(())
    }

    /// Read options from a JSON document
    ///
    /// Recognized keys: `skip_lines`, `header`, `row_limit`, `sheet`
    /// (string, integer, array of those, or null), `column_names` and
    /// `column_types` (type name or object of name to type name).
    pub fn from_json(text: &str) -> LoadResult<Self> {
        let doc: Value = serde_json::from_str(text)?;
        let Value::Object(map) = doc else {
            return Err(LoadError::InvalidArgument(
                "options document must be a JSON object".to_string(),
            ));
        };

        let mut options = LoadOptions::default();
        for (key, value) in map {
            match key.as_str() {
                "skip_lines" => options.skip_lines = json_skip_lines(&value)?,
                "header" => {
                    options.header = value.as_bool().ok_or_else(|| {
                        LoadError::InvalidArgument("header argument must be a bool".to_string())
                    })?
                }
                "row_limit" => {
                    options.row_limit = match value {
                        Value::Null => None,
                        other => Some(other.as_u64().map(|n| n as usize).ok_or_else(|| {
                            LoadError::InvalidArgument(
                                "row_limit argument must be a positive int".to_string(),
                            )
                        })?),
                    }
                }
                "sheet" => options.sheets = json_sheets(value)?,
                "column_names" => {
                    options.column_names = serde_json::from_value(value).map_err(|e| {
                        LoadError::InvalidArgument(format!("column_names: {}", e))
                    })?
                }
                "column_types" => {
                    options.column_types = serde_json::from_value(value).map_err(|e| {
                        LoadError::InvalidArgument(format!("column_types: {}", e))
                    })?
                }
                other => {
                    return Err(LoadError::InvalidArgument(format!(
                        "unknown option: {}",
                        other
                    )))
                }
            }
        }

        options.validate()?;
        Ok(options)
    }

    /// Read options from a JSON file
    pub fn from_json_file(path: &Path) -> LoadResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// Parse a `skip_lines` value given as text
pub fn parse_skip_lines(s: &str) -> LoadResult<usize> {
    s.trim()
        .parse::<usize>()
        .map_err(|_| LoadError::InvalidArgument("skip_lines argument must be an int".to_string()))
}

fn json_skip_lines(value: &Value) -> LoadResult<usize> {
    value
        .as_u64()
        .map(|n| n as usize)
        .ok_or_else(|| LoadError::InvalidArgument("skip_lines argument must be an int".to_string()))
}

fn json_sheets(value: Value) -> LoadResult<SheetRequest> {
    let invalid = |e: serde_json::Error| LoadError::InvalidArgument(format!("sheet: {}", e));
    match value {
        Value::Null => Ok(SheetRequest::First),
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(invalid))
            .collect::<LoadResult<Vec<_>>>()
            .map(SheetRequest::Multiple),
        other => serde_json::from_value(other)
            .map(SheetRequest::Single)
            .map_err(invalid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = LoadOptions::default();
        assert_eq!(options.skip_lines, 0);
        assert!(options.header);
        assert_eq!(options.sheets, SheetRequest::First);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_skip_lines_must_be_int() {
        assert_eq!(parse_skip_lines("3").unwrap(), 3);
        assert!(matches!(parse_skip_lines("2.5"), Err(LoadError::InvalidArgument(_))));
        assert!(matches!(parse_skip_lines("-1"), Err(LoadError::InvalidArgument(_))));

        let err = LoadOptions::from_json(r#"{"skip_lines": "2"}"#).unwrap_err();
        assert!(matches!(err, LoadError::InvalidArgument(ref m) if m.contains("skip_lines")));
        assert!(LoadOptions::from_json(r#"{"skip_lines": 1.5}"#).is_err());
    }

    #[test]
    fn test_row_limit_zero_rejected() {
        let options = LoadOptions::new().with_row_limit(0);
        assert!(matches!(options.validate(), Err(LoadError::InvalidArgument(_))));
    }

    #[test]
    fn test_full_document() {
        let options = LoadOptions::from_json(
            r#"{
                "skip_lines": 2,
                "header": false,
                "row_limit": 10,
                "sheet": ["Summary", 1],
                "column_names": ["a", "b"],
                "column_types": {"b": "datetime"}
            }"#,
        )
        .unwrap();

        assert_eq!(options.skip_lines, 2);
        assert!(!options.header);
        assert_eq!(options.row_limit, Some(10));
        assert_eq!(
            options.sheets,
            SheetRequest::Multiple(vec![
                SheetSelector::Name("Summary".into()),
                SheetSelector::Index(1),
            ])
        );
        let mut expected = IndexMap::new();
        expected.insert("b".to_string(), SemanticType::DateTime);
        assert_eq!(options.column_types, Some(ColumnTypes::Named(expected)));
    }

    #[test]
    fn test_uniform_type_and_single_sheet() {
        let options =
            LoadOptions::from_json(r#"{"sheet": "Data", "column_types": "text"}"#).unwrap();
        assert_eq!(options.sheets, SheetRequest::Single(SheetSelector::Name("Data".into())));
        assert_eq!(options.column_types, Some(ColumnTypes::Uniform(SemanticType::Text)));
    }

    #[test]
    fn test_empty_sheet_list_is_multiple() {
        let options = LoadOptions::from_json(r#"{"sheet": []}"#).unwrap();
        assert_eq!(options.sheets, SheetRequest::Multiple(vec![]));
        assert!(options.sheets.is_multiple());
        assert!(options.sheets.selectors().is_empty());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(LoadOptions::from_json(r#"{"encoding": "latin-1"}"#).is_err());
        assert!(LoadOptions::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_sheet_selector_from_str() {
        assert_eq!("2".parse::<SheetSelector>(), Ok(SheetSelector::Index(2)));
        assert_eq!("Q1".parse::<SheetSelector>(), Ok(SheetSelector::Name("Q1".into())));
        assert!("".parse::<SheetSelector>().is_err());
    }
}
