use clap::{Parser, Subcommand};
use colored::Colorize;
use royalbit_xlrecords::cli::{self, OutputFormat};
use royalbit_xlrecords::error::XlResult;
use royalbit_xlrecords::types::{MissingKeyPolicy, WriteOptions, DEFAULT_SHEET_NAME};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "xlrecords")]
#[command(about = "Spreadsheets in, records out. Records in, spreadsheets out.")]
#[command(long_about = "xlrecords - Spreadsheet <-> record conversion

COMMANDS:
  read   - Excel workbooks to JSON/YAML records (first sheet of each file)
  write  - JSON array of objects to an Excel .xlsx workbook

EXAMPLES:
  xlrecords read jan.xlsx feb.xlsx -o merged.json
  xlrecords read report.xlsx --format yaml
  xlrecords write records.json out.xlsx --sheet Orders
  cat records.json | xlrecords write - out.xlsx --on-missing-key blank")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Read Excel workbooks into records.

Only the first sheet of each workbook is read. Row 1 is the header;
every later row becomes one record keyed by those headers. All values
are rendered as trimmed text. Files are merged in the order given.

SUPPORTED FORMATS:
  .xlsx .xlsm .xlsb .xls .ods

EXAMPLE:
  xlrecords read q1.xlsx q2.xlsx -o all.json")]
    /// Read Excel workbooks into JSON/YAML records
    Read {
        /// Workbook files, merged in order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Write records to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Show verbose read steps
        #[arg(short, long)]
        verbose: bool,
    },

    #[command(long_about = "Write a JSON array of objects to an Excel workbook.

The header row is taken from the FIRST object's keys, in order.
Keys that only appear in later objects are not written.

MISSING KEYS:
  fail  - abort if a later object lacks a header key (default)
  blank - leave that cell empty

EXAMPLE:
  xlrecords write orders.json orders.xlsx --sheet Orders")]
    /// Write JSON records to an Excel .xlsx workbook
    Write {
        /// JSON file with an array of objects (`-` for stdin)
        input: PathBuf,

        /// Output Excel file path (.xlsx)
        output: PathBuf,

        /// Worksheet name
        #[arg(short, long, default_value = DEFAULT_SHEET_NAME, env = "XLRECORDS_SHEET_NAME")]
        sheet: String,

        /// What to do when a record lacks a header key
        #[arg(long, value_enum, default_value_t = MissingKeyPolicy::Fail, env = "XLRECORDS_ON_MISSING_KEY")]
        on_missing_key: MissingKeyPolicy,

        /// Show verbose write steps
        #[arg(short, long)]
        verbose: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "royalbit_xlrecords=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .init();
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "❌ Error:".bold().red(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> XlResult<()> {
    match cli.command {
        Commands::Read {
            files,
            output,
            format,
            verbose,
        } => {
            init_tracing(verbose);
            cli::read(files, output, format, verbose)
        }

        Commands::Write {
            input,
            output,
            sheet,
            on_missing_key,
            verbose,
        } => {
            init_tracing(verbose);
            let options = WriteOptions::new(sheet).with_missing_key_policy(on_missing_key);
            cli::write(input, output, options, verbose)
        }
    }
}
