//! xlwrap CLI - read, search and edit spreadsheet cells from the shell

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use xlwrap::prelude::*;

#[derive(Parser)]
#[command(name = "xlwrap")]
#[command(
    author,
    version,
    about = "Read, search and edit XLS, XLSX and XLSM spreadsheets"
)]
struct Cli {
    /// Sheet to work on, by name
    #[arg(long, global = true, conflicts_with = "index")]
    sheet: Option<String>,

    /// Sheet to work on, by zero-based position
    #[arg(long, global = true)]
    index: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show file, active sheet and access counters
    Info {
        /// Input spreadsheet file (xls, xlsx, xlsm)
        input: PathBuf,
    },

    /// List all sheets in a workbook
    Sheets {
        /// Input spreadsheet file
        input: PathBuf,
    },

    /// Print one cell, given as `B5` or as `ROW COL`
    Read {
        /// Input spreadsheet file
        input: PathBuf,

        /// Cell reference, or one-based row and column
        #[arg(required = true, num_args = 1..)]
        cell: Vec<String>,
    },

    /// Print one row, one value per line
    Row {
        /// Input spreadsheet file
        input: PathBuf,

        /// One-based row number
        row: u32,
    },

    /// Print one column, one value per line
    Column {
        /// Input spreadsheet file
        input: PathBuf,

        /// One-based column number or column letters
        column: String,
    },

    /// Export the sheet as CSV to stdout or a file
    #[command(alias = "csv")]
    Export {
        /// Input spreadsheet file
        input: PathBuf,

        /// Output CSV file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Field delimiter (default: comma)
        #[arg(short, long, default_value = ",")]
        delimiter: char,
    },

    /// Find cells whose displayed value matches
    Search {
        /// Input spreadsheet file
        input: PathBuf,

        /// Text to look for
        text: String,

        /// Match substrings instead of whole values
        #[arg(short, long)]
        contains: bool,

        /// Which match to report, counting from 1
        #[arg(short = 'n', long, default_value = "1")]
        occurrence: usize,

        /// Report every match
        #[arg(short, long, conflicts_with = "occurrence")]
        all: bool,
    },

    /// Set one cell, given as `C3` or as `ROW COL`, and save the workbook
    Write {
        /// Input spreadsheet file (xlsx, xlsm)
        input: PathBuf,

        /// Cell reference, or one-based row and column
        #[arg(required = true, num_args = 1..=2)]
        cell: Vec<String>,

        /// New value; numbers and TRUE/FALSE are stored typed
        value: String,

        /// Store the value as text even if it looks like a number
        #[arg(short, long)]
        text: bool,

        /// Save to this file instead of overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let selector = match (cli.sheet, cli.index) {
        (Some(name), _) => Some(SheetSelector::Name(name)),
        (None, Some(index)) => Some(SheetSelector::Index(index)),
        (None, None) => None,
    };
    let options = OpenOptions { sheet: selector };

    match cli.command {
        Commands::Info { input } => show_info(&input, &options),
        Commands::Sheets { input } => list_sheets(&input, &options),
        Commands::Read { input, cell } => read_cell(&input, &options, &cell),
        Commands::Row { input, row } => print_row(&input, &options, row),
        Commands::Column { input, column } => print_column(&input, &options, &column),
        Commands::Export {
            input,
            output,
            delimiter,
        } => export_csv(&input, &options, output.as_deref(), delimiter),
        Commands::Search {
            input,
            text,
            contains,
            occurrence,
            all,
        } => search(
            &input,
            &options,
            &text,
            SearchOptions::new().contains(contains).occurrence(occurrence),
            all,
        ),
        Commands::Write {
            input,
            cell,
            value,
            text,
            output,
        } => write_cell(&input, &options, &cell, &value, text, output.as_deref()),
    }
}

fn open(input: &Path, options: &OpenOptions) -> Result<Document> {
    Document::open_with(input, options)
        .with_context(|| format!("Failed to open '{}'", input.display()))
}

fn show_info(input: &Path, options: &OpenOptions) -> Result<()> {
    let doc = open(input, options)?;

    println!("{}", doc.info());
    println!("Format: {}", doc.format());
    println!("Sheets: {}", doc.sheet_names().len());
    if let Ok(view) = doc.view() {
        println!("Rows: {}", view.row_count());
        println!("Columns: {}", view.column_count());
    }

    doc.close();
    Ok(())
}

fn list_sheets(input: &Path, options: &OpenOptions) -> Result<()> {
    let doc = open(input, options)?;
    let active = doc.sheet_name()?.to_string();

    for (i, name) in doc.sheet_names().iter().enumerate() {
        let marker = if *name == active { " (active)" } else { "" };
        println!("{}: {}{}", i, name, marker);
    }

    Ok(())
}

fn read_cell(input: &Path, options: &OpenOptions, args: &[String]) -> Result<()> {
    let target = CellTarget::from_args(args)?;
    let mut doc = open(input, options)?;

    let text = doc
        .read(target)
        .with_context(|| format!("Failed to read {}", args.join(" ")))?;
    println!("{}", text);

    Ok(())
}

fn print_row(input: &Path, options: &OpenOptions, row: u32) -> Result<()> {
    let doc = open(input, options)?;
    print_lines(&doc.row(row)?)
}

fn print_column(input: &Path, options: &OpenOptions, column: &str) -> Result<()> {
    let doc = open(input, options)?;
    let column = match column.parse::<u32>() {
        Ok(index) => ColumnRef::Index(index),
        Err(_) => ColumnRef::Label(column.to_string()),
    };
    print_lines(&doc.column(column)?)
}

fn print_lines(values: &[String]) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for value in values {
        writeln!(handle, "{}", value)?;
    }
    Ok(())
}

fn export_csv(
    input: &Path,
    options: &OpenOptions,
    output: Option<&Path>,
    delimiter: char,
) -> Result<()> {
    if !delimiter.is_ascii() {
        bail!("Delimiter must be a single ASCII character, got '{}'", delimiter);
    }

    let doc = open(input, options)?;
    let rows = doc.array()?;
    if rows.is_empty() {
        eprintln!("Warning: Sheet appears to be empty");
    }

    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("Failed to create '{}'", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(false)
        .from_writer(sink);
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    if let Some(path) = output {
        eprintln!("Wrote {} rows to '{}'", rows.len(), path.display());
    }

    Ok(())
}

fn search(
    input: &Path,
    options: &OpenOptions,
    text: &str,
    search: SearchOptions,
    all: bool,
) -> Result<()> {
    let doc = open(input, options)?;

    let hits = if all {
        doc.search_all(text, &search)?
    } else {
        doc.search(text, &search)?.into_iter().collect()
    };

    if hits.is_empty() {
        eprintln!("No match for '{}'", text);
    }
    for hit in hits {
        println!("{}\t{}\t{}", hit, hit.row, hit.col);
    }

    Ok(())
}

/// Typed value for a command-line argument
fn parse_value(raw: &str, as_text: bool) -> CellValue {
    if as_text {
        return CellValue::string(raw);
    }
    if raw.eq_ignore_ascii_case("true") {
        return CellValue::Boolean(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return CellValue::Boolean(false);
    }
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::string(raw),
    }
}

fn write_cell(
    input: &Path,
    options: &OpenOptions,
    args: &[String],
    value: &str,
    as_text: bool,
    output: Option<&Path>,
) -> Result<()> {
    let cell = CellTarget::from_args(args)?.resolve()?;
    let mut doc = open(input, options)?;

    doc.write(cell, parse_value(value, as_text))
        .with_context(|| format!("Failed to write {}", args.join(" ")))?;

    let target = output.unwrap_or(input);
    doc.save_as(target)
        .with_context(|| format!("Failed to save '{}'", target.display()))?;
    eprintln!("Wrote {} to '{}'", cell, target.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("42", false), CellValue::Number(42.0));
        assert_eq!(parse_value("-1.5", false), CellValue::Number(-1.5));
        assert_eq!(parse_value("TRUE", false), CellValue::Boolean(true));
        assert_eq!(parse_value("false", false), CellValue::Boolean(false));
        assert_eq!(parse_value("hello", false), CellValue::string("hello"));
        assert_eq!(parse_value("inf", false), CellValue::string("inf"));
        assert_eq!(parse_value("42", true), CellValue::string("42"));
    }

    #[test]
    fn test_write_takes_reference_or_coordinates() {
        let cli = Cli::try_parse_from(["xlwrap", "write", "data.xlsx", "55", "29", "found"])
            .unwrap();
        match cli.command {
            Commands::Write { cell, value, .. } => {
                assert_eq!(cell, vec!["55", "29"]);
                assert_eq!(value, "found");
                let target = CellTarget::from_args(&cell).unwrap();
                assert_eq!(target.resolve().unwrap(), CellAddress::new(55, 29).unwrap());
            }
            _ => panic!("expected the write command"),
        }

        let cli = Cli::try_parse_from(["xlwrap", "write", "data.xlsx", "AC55", "42", "--text"])
            .unwrap();
        match cli.command {
            Commands::Write {
                cell, value, text, ..
            } => {
                assert_eq!(cell, vec!["AC55"]);
                assert_eq!(value, "42");
                assert!(text);
            }
            _ => panic!("expected the write command"),
        }

        assert!(Cli::try_parse_from(["xlwrap", "write", "data.xlsx", "B5"]).is_err());
    }

    #[test]
    fn test_global_sheet_flags() {
        let cli = Cli::try_parse_from(["xlwrap", "read", "data.xlsx", "B5", "--index", "2"])
            .unwrap();
        assert_eq!(cli.index, Some(2));

        let cli =
            Cli::try_parse_from(["xlwrap", "--sheet", "other", "row", "data.xls", "3"]).unwrap();
        assert_eq!(cli.sheet.as_deref(), Some("other"));

        assert!(Cli::try_parse_from([
            "xlwrap", "--sheet", "a", "--index", "1", "sheets", "data.xls"
        ])
        .is_err());
    }
}
