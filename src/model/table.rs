//! Table, Row, and Cell data structures

use std::borrow::Cow;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use super::raw::number_to_text;
use super::schema::{Column, SemanticType};

/// A normalized cell value
#[derive(Debug, Clone)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    String(Cow<'static, str>),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    TimeDelta(Duration),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Number(a), CellValue::Number(b)) => {
                // Handle NaN comparison
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (CellValue::String(a), CellValue::String(b)) => a == b,
            (CellValue::Date(a), CellValue::Date(b)) => a == b,
            (CellValue::Time(a), CellValue::Time(b)) => a == b,
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            (CellValue::TimeDelta(a), CellValue::TimeDelta(b)) => a == b,
            _ => false,
        }
    }
}

impl CellValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Whether a non-null value is a valid member of `ty`
    pub fn conforms_to(&self, ty: SemanticType) -> bool {
        matches!(
            (self, ty),
            (CellValue::Null, _)
                | (CellValue::Bool(_), SemanticType::Boolean)
                | (CellValue::Number(_), SemanticType::Number)
                | (CellValue::String(_), SemanticType::Text)
                | (CellValue::Date(_), SemanticType::Date)
                | (CellValue::Time(_), SemanticType::Time)
                | (CellValue::DateTime(_), SemanticType::DateTime)
                | (CellValue::TimeDelta(_), SemanticType::TimeDelta)
        )
    }

    /// Convert to a display string
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed(""),
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
            CellValue::Number(n) => Cow::Owned(number_to_text(*n)),
            CellValue::String(s) => Cow::Borrowed(s.as_ref()),
            CellValue::Date(d) => Cow::Owned(d.to_string()),
            CellValue::Time(t) => Cow::Owned(t.to_string()),
            CellValue::DateTime(dt) => Cow::Owned(dt.to_string()),
            CellValue::TimeDelta(d) => Cow::Owned(d.to_string()),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Null => serializer.serialize_none(),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::String(s) => serializer.serialize_str(s),
            CellValue::Date(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            CellValue::Time(t) => serializer.serialize_str(&t.format("%H:%M:%S").to_string()),
            CellValue::DateTime(dt) => {
                serializer.serialize_str(&dt.format("%Y-%m-%dT%H:%M:%S").to_string())
            }
            CellValue::TimeDelta(d) => {
                serializer.serialize_f64(d.num_milliseconds() as f64 / 1000.0)
            }
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(Cow::Owned(s.to_string()))
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(Cow::Owned(s))
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Number(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}

impl From<NaiveTime> for CellValue {
    fn from(t: NaiveTime) -> Self {
        CellValue::Time(t)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

/// A normalized column as produced by the column builder
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnData {
    /// Detected header name, if any
    pub name: Option<String>,
    /// Type shared by every non-null value
    pub semantic_type: SemanticType,
    /// One value per data row in the window
    pub values: Vec<CellValue>,
}

/// A row in the table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    /// Cell values in column order
    pub cells: Vec<CellValue>,
    /// Original row number in the sheet (1-indexed)
    pub source_line: usize,
}

impl Row {
    pub fn new(cells: Vec<CellValue>, source_line: usize) -> Self {
        Self { cells, source_line }
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }
}

/// A table containing columns and rows
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    /// Column definitions
    pub columns: Vec<Column>,
    /// All rows in the table
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a new empty table with column definitions
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Add a row to the table
    pub fn add_row(&mut self, cells: Vec<CellValue>, source_line: usize) {
        debug_assert_eq!(cells.len(), self.columns.len());
        self.rows.push(Row::new(cells, source_line));
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.as_deref() == Some(name))
    }

    /// Column names in order; unnamed columns are `None`
    pub fn column_names(&self) -> Vec<Option<&str>> {
        self.columns.iter().map(|c| c.name.as_deref()).collect()
    }

    /// All values of one column, top to bottom
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Result of a workbook load
#[derive(Debug, Clone)]
pub enum LoadedTables {
    /// A single sheet was requested
    Single(Table),
    /// A sequence of sheets was requested, keyed by sheet name in request order
    Multiple(IndexMap<String, Table>),
}

impl LoadedTables {
    /// The table of a single-sheet load
    pub fn into_single(self) -> Option<Table> {
        match self {
            LoadedTables::Single(table) => Some(table),
            LoadedTables::Multiple(_) => None,
        }
    }

    /// The tables of a multi-sheet load
    pub fn into_multiple(self) -> Option<IndexMap<String, Table>> {
        match self {
            LoadedTables::Single(_) => None,
            LoadedTables::Multiple(tables) => Some(tables),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conforms_to() {
        assert!(CellValue::Null.conforms_to(SemanticType::Date));
        assert!(CellValue::Bool(true).conforms_to(SemanticType::Boolean));
        assert!(!CellValue::Number(1.0).conforms_to(SemanticType::Text));
        let d = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert!(CellValue::Date(d).conforms_to(SemanticType::Date));
        assert!(!CellValue::Date(d).conforms_to(SemanticType::DateTime));
    }

    #[test]
    fn test_serialize_cells() {
        let dt = NaiveDate::from_ymd_opt(2021, 3, 4)
            .unwrap()
            .and_hms_opt(5, 6, 7)
            .unwrap();
        let row = vec![
            CellValue::Null,
            CellValue::Bool(false),
            CellValue::Number(1.5),
            CellValue::from("x"),
            CellValue::DateTime(dt),
            CellValue::TimeDelta(Duration::seconds(90)),
        ];
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"[null,false,1.5,"x","2021-03-04T05:06:07",90.0]"#);
    }

    #[test]
    fn test_column_values() {
        let mut table = Table::new(vec![
            Column::new(Some("a".into()), 0, SemanticType::Number),
            Column::new(None, 1, SemanticType::Text),
        ]);
        table.add_row(vec![CellValue::Number(1.0), CellValue::from("x")], 2);
        table.add_row(vec![CellValue::Number(2.0), CellValue::Null], 3);

        let values: Vec<_> = table.column_values(0).cloned().collect();
        assert_eq!(values, vec![CellValue::Number(1.0), CellValue::Number(2.0)]);
        assert_eq!(table.column_index("a"), Some(0));
        assert_eq!(table.column_names(), vec![Some("a"), None]);
    }
}
