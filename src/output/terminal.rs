//! Box-drawn terminal output

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::model::{LoadedTables, Table};

use super::TableFormatter;

/// Terminal output with a colored table title
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }

    fn write_header(&self, writer: &mut dyn WriteColor, path: &Path) -> Result<()> {
        writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(writer, " xlstable: {}", path.display())?;
        writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_table(&self, title: &str, table: &Table, writer: &mut dyn WriteColor) -> Result<()> {
        writer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        write!(writer, "{}", title)?;
        writer.reset()?;
        writeln!(
            writer,
            " ({} rows × {} columns)",
            table.row_count(),
            table.column_count()
        )?;

        if table.column_count() == 0 {
            writeln!(writer)?;
            return Ok(());
        }

        let headers: Vec<Vec<String>> = vec![
            table.columns.iter().map(|c| c.display_name()).collect(),
            table
                .columns
                .iter()
                .map(|c| c.semantic_type.to_string())
                .collect(),
        ];

        let rows: Vec<Vec<String>> = table
            .rows
            .iter()
            .map(|row| row.cells.iter().map(|c| c.display().into_owned()).collect())
            .collect();

        writeln!(writer, "{}", build_table(&headers, &rows))?;
        writeln!(writer)?;
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl TableFormatter for TerminalOutput {
    fn render(
        &self,
        tables: &LoadedTables,
        path: &Path,
        writer: &mut dyn WriteColor,
    ) -> Result<()> {
        self.write_header(writer, path)?;

        match tables {
            LoadedTables::Single(table) => self.write_table("Table", table, writer)?,
            LoadedTables::Multiple(map) => {
                for (name, table) in map {
                    self.write_table(&format!("Sheet: {}", name), table, writer)?;
                }
            }
        }

        Ok(())
    }
}

/// Build a box-drawn table from header lines and data rows
fn build_table(headers: &[Vec<String>], rows: &[Vec<String>]) -> String {
    let col_count = headers.first().map(Vec::len).unwrap_or(0);
    if col_count == 0 {
        return String::new();
    }

    let mut col_widths: Vec<usize> = vec![0; col_count];
    for row in headers.iter().chain(rows) {
        for (i, cell) in row.iter().enumerate() {
            if i < col_widths.len() {
                col_widths[i] = col_widths[i].max(cell.chars().count());
            }
        }
    }

    let mut output = String::new();
    border(&mut output, &col_widths, '┌', '┬', '┐');
    for line in headers {
        line_of(&mut output, &col_widths, line);
    }
    border(&mut output, &col_widths, '├', '┼', '┤');
    for row in rows {
        line_of(&mut output, &col_widths, row);
    }
    border(&mut output, &col_widths, '└', '┴', '┘');

    // writeln adds the final newline
    output.pop();
    output
}

fn border(output: &mut String, widths: &[usize], left: char, mid: char, right: char) {
    output.push(left);
    for (i, width) in widths.iter().enumerate() {
        output.push_str(&"─".repeat(*width + 2));
        if i < widths.len() - 1 {
            output.push(mid);
        }
    }
    output.push(right);
    output.push('\n');
}

fn line_of(output: &mut String, widths: &[usize], cells: &[String]) {
    output.push('│');
    for (i, width) in widths.iter().enumerate() {
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        let pad = width.saturating_sub(cell.chars().count());
        output.push(' ');
        output.push_str(cell);
        output.push_str(&" ".repeat(pad));
        output.push_str(" │");
    }
    output.push('\n');
}
