//! JSON output format

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use indexmap::IndexMap;
use serde::Serialize;
use termcolor::WriteColor;

use crate::model::{CellValue, LoadedTables, SemanticType, Table};

use super::TableFormatter;

/// Pretty-printed JSON output formatter
pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonColumn<'a> {
    name: Option<&'a str>,
    #[serde(rename = "type")]
    semantic_type: SemanticType,
}

#[derive(Serialize)]
struct JsonRow<'a> {
    source_line: usize,
    cells: &'a [CellValue],
}

#[derive(Serialize)]
struct JsonTable<'a> {
    columns: Vec<JsonColumn<'a>>,
    rows: Vec<JsonRow<'a>>,
}

impl<'a> From<&'a Table> for JsonTable<'a> {
    fn from(table: &'a Table) -> Self {
        Self {
            columns: table
                .columns
                .iter()
                .map(|c| JsonColumn {
                    name: c.name.as_deref(),
                    semantic_type: c.semantic_type,
                })
                .collect(),
            rows: table
                .rows
                .iter()
                .map(|r| JsonRow {
                    source_line: r.source_line,
                    cells: &r.cells,
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum JsonTables<'a> {
    Single { table: JsonTable<'a> },
    Multiple { sheets: IndexMap<&'a str, JsonTable<'a>> },
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    file: String,
    #[serde(flatten)]
    tables: JsonTables<'a>,
}

impl TableFormatter for JsonOutput {
    fn render(
        &self,
        tables: &LoadedTables,
        path: &Path,
        writer: &mut dyn WriteColor,
    ) -> Result<()> {
        let tables = match tables {
            LoadedTables::Single(table) => JsonTables::Single {
                table: JsonTable::from(table),
            },
            LoadedTables::Multiple(map) => JsonTables::Multiple {
                sheets: map
                    .iter()
                    .map(|(name, table)| (name.as_str(), JsonTable::from(table)))
                    .collect(),
            },
        };
        let output = JsonDocument {
            file: path.display().to_string(),
            tables,
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)?;

        Ok(())
    }
}
