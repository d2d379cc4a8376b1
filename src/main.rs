//! xlstable - Typed tables from legacy Excel workbooks

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use indexmap::IndexMap;
use tracing_subscriber::EnvFilter;

use xlstable::config::{parse_skip_lines, ColumnTypes, LoadOptions, SheetSelector};
use xlstable::load_path;
use xlstable::model::SemanticType;
use xlstable::output::{render_to_stdout, OutputFormat};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Terminal,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Terminal => OutputFormat::Terminal,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Load legacy Excel (.xls) sheets as typed tables
#[derive(Parser, Debug)]
#[command(name = "xlstable")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Workbook to load
    file: PathBuf,

    /// Sheet to load, by name or 0-based index (default: first sheet)
    #[arg(long, conflicts_with = "sheets")]
    sheet: Option<SheetSelector>,

    /// Several sheets to load (comma-separated names or indices)
    #[arg(long, value_delimiter = ',')]
    sheets: Vec<SheetSelector>,

    /// Rows to skip from the top of each sheet
    #[arg(long, value_parser = skip_lines_arg)]
    skip_lines: Option<usize>,

    /// Treat the first row as data instead of column names
    #[arg(long)]
    no_header: bool,

    /// Maximum number of data rows per sheet
    #[arg(long, value_parser = clap::value_parser!(usize))]
    row_limit: Option<usize>,

    /// Column names replacing the header row (comma-separated)
    #[arg(long, value_delimiter = ',')]
    column_names: Vec<String>,

    /// Column type override: TYPE for every column, or NAME=TYPE (repeatable)
    #[arg(long = "column-type")]
    column_type: Vec<String>,

    /// JSON file with load options; command-line flags take precedence
    #[arg(long)]
    options: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: CliOutputFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn skip_lines_arg(s: &str) -> std::result::Result<usize, String> {
    parse_skip_lines(s).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "xlstable=debug",
        _ => "xlstable=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut options = match &cli.options {
        Some(path) => LoadOptions::from_json_file(path)
            .with_context(|| format!("Failed to read options file: {}", path.display()))?,
        None => LoadOptions::default(),
    };

    if let Some(skip_lines) = cli.skip_lines {
        options = options.with_skip_lines(skip_lines);
    }
    if cli.no_header {
        options = options.with_header(false);
    }
    if let Some(limit) = cli.row_limit {
        options = options.with_row_limit(limit);
    }
    if let Some(sheet) = cli.sheet {
        options = options.with_sheet(sheet);
    } else if !cli.sheets.is_empty() {
        options = options.with_sheets(cli.sheets);
    }
    if !cli.column_names.is_empty() {
        options = options.with_column_names(cli.column_names);
    }
    if let Some(types) = parse_column_types(&cli.column_type)? {
        options = options.with_column_types(types);
    }

    let tables = load_path(&cli.file, &options)
        .with_context(|| format!("Failed to load workbook: {}", cli.file.display()))?;

    render_to_stdout(&tables, &cli.file, cli.format.into())
}

/// Parse `--column-type` values into one override
fn parse_column_types(args: &[String]) -> Result<Option<ColumnTypes>> {
    let mut uniform: Option<SemanticType> = None;
    let mut named: IndexMap<String, SemanticType> = IndexMap::new();

    for arg in args {
        match arg.split_once('=') {
            Some((name, ty)) => {
                let ty = ty.parse::<SemanticType>().map_err(anyhow::Error::msg)?;
                named.insert(name.to_string(), ty);
            }
            None => {
                if uniform.is_some() {
                    bail!("Only one column type may apply to every column");
                }
                uniform = Some(arg.parse::<SemanticType>().map_err(anyhow::Error::msg)?);
            }
        }
    }

    match (uniform, named.is_empty()) {
        (Some(_), false) => bail!("Cannot mix a uniform column type with NAME=TYPE overrides"),
        (Some(ty), true) => Ok(Some(ColumnTypes::Uniform(ty))),
        (None, false) => Ok(Some(ColumnTypes::Named(named))),
        (None, true) => Ok(None),
    }
}
