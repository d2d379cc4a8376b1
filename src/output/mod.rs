//! Output formatting for loaded tables

mod json;
mod terminal;

use std::path::Path;

use anyhow::Result;
use termcolor::{ColorChoice, StandardStream, WriteColor};

use crate::model::LoadedTables;

pub use json::JsonOutput;
pub use terminal::TerminalOutput;

/// Output format for rendered tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

/// Trait for output formatters
pub trait TableFormatter {
    /// Render loaded tables to a writer
    fn render(&self, tables: &LoadedTables, path: &Path, writer: &mut dyn WriteColor)
        -> Result<()>;
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter based on format type
    pub fn create(format: OutputFormat) -> Box<dyn TableFormatter> {
        match format {
            OutputFormat::Terminal => Box::new(TerminalOutput::new()),
            OutputFormat::Json => Box::new(JsonOutput::new()),
        }
    }
}

/// Render loaded tables to stdout
pub fn render_to_stdout(tables: &LoadedTables, path: &Path, format: OutputFormat) -> Result<()> {
    let formatter = OutputFactory::create(format);
    let choice = if std::io::IsTerminal::is_terminal(&std::io::stdout()) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);
    formatter.render(tables, path, &mut stdout)
}
