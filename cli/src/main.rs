//! xlcompare CLI - numeric comparison of Excel workbooks
//!
//! Compares every matching sheet, column and row of two workbooks and writes
//! the differing values to a CSV (or JSON) report.

mod console;
mod launch;

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use console::ConsolePrompt;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use xlcompare::input::{resolve_distinct_input_file, resolve_input_file};
use xlcompare::options::{DEFAULT_COLUMN_KEY, DEFAULT_HEADER_ROW};
use xlcompare::render::{rank, write_report, ReportFormat};
use xlcompare::{CompareOptions, Prompt, SheetHints};

/// Numeric comparison of two Excel workbooks
#[derive(Parser)]
#[command(
    name = "xlcompare",
    version,
    about = "Compare the numeric content of two Excel workbooks",
    long_about = "xlcompare - cell-by-cell numeric comparison of Excel workbooks.\n\n\
                  Each sheet is reduced to a keyed numeric table; values that differ \
                  between the two workbooks are written to a ranked report."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two workbooks and write the differences
    Compare {
        /// First workbook (.xlsx)
        #[arg(long = "f1")]
        first: Option<String>,

        /// Key column letters of the first workbook
        #[arg(long = "f1ck", default_value = DEFAULT_COLUMN_KEY)]
        first_column_key: String,

        /// Header row number of the first workbook
        #[arg(long = "f1rk", default_value = DEFAULT_HEADER_ROW)]
        first_header_row: String,

        /// Second workbook (.xlsx)
        #[arg(long = "f2")]
        second: Option<String>,

        /// Key column letters of the second workbook
        #[arg(long = "f2ck", default_value = DEFAULT_COLUMN_KEY)]
        second_column_key: String,

        /// Header row number of the second workbook
        #[arg(long = "f2rk", default_value = DEFAULT_HEADER_ROW)]
        second_header_row: String,

        /// Report path (default: ./COMPARE-<timestamp>.<format>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report format
        #[arg(long, default_value = "csv")]
        format: OutputFormat,

        /// Do not offer to open the report
        #[arg(long)]
        no_launch: bool,
    },

    /// Show version information
    Version,
}

/// Report format
#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Quoted comma-separated values
    Csv,
    /// Pretty-printed JSON
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => ReportFormat::Csv,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        if let Some(message) = failure_message(&e) {
            eprintln!("{}: {}", "Error".red().bold(), message);
        }
    }
}

/// The message to show for a failed run; a cancelled run ends silently.
///
/// Either way the process exits normally once the message is shown.
fn failure_message(error: &xlcompare::Error) -> Option<String> {
    if error.is_aborted() {
        None
    } else {
        Some(error.to_string())
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> xlcompare::Result<()> {
    match cli.command {
        Commands::Compare {
            first,
            first_column_key,
            first_header_row,
            second,
            second_column_key,
            second_header_row,
            output,
            format,
            no_launch,
        } => {
            let options = CompareOptions::new()
                .with_first_hints(SheetHints::new(first_column_key, first_header_row))
                .with_second_hints(SheetHints::new(second_column_key, second_header_row));
            let format = ReportFormat::from(format);
            let output = output.unwrap_or_else(|| default_output_path(format));

            compare(
                first.as_deref(),
                second.as_deref(),
                &options,
                &output,
                format,
                !no_launch,
            )?;
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn compare(
    first: Option<&str>,
    second: Option<&str>,
    options: &CompareOptions,
    output: &Path,
    format: ReportFormat,
    offer_launch: bool,
) -> xlcompare::Result<()> {
    let mut prompt = ConsolePrompt::new();
    debug!(?options, output = %output.display(), "starting comparison");

    println!("{}", "Validating first Excel file...".cyan());
    let first = resolve_input_file(first, "first", &mut prompt)?;

    println!("{}", "Validating second Excel file...".cyan());
    let second = resolve_distinct_input_file(&first, second, "second", &mut prompt)?;

    let pb = create_spinner("Extracting data...");
    prompt.set_spinner(Some(pb.clone()));

    let result = xlcompare::read_workbook(&first).and_then(|first| {
        let second = xlcompare::read_workbook(&second)?;
        pb.set_message("Comparing data...");
        xlcompare::find_discrepancies(&first, &second, options, &mut prompt)
    });

    pb.finish_and_clear();
    prompt.set_spinner(None);
    let records = result?;

    println!("{}", "Sorting data...".cyan());
    let records = rank(records);

    if !write_report(&records, output, format)? {
        println!("{} No differences found", "!".yellow().bold());
        return Ok(());
    }

    println!(
        "{} File successfully written to {}",
        "✓".green().bold(),
        output.display()
    );

    if offer_launch {
        let question = format!(
            "Success!! Found {} difference(s). Launch file now?",
            records.len()
        );
        if prompt.confirm(&question, false)? {
            launch::open_file(output)?;
        }
    }

    Ok(())
}

/// `./COMPARE-<yyyyMMddHHmmssfff>.<ext>` in the working directory.
fn default_output_path(format: ReportFormat) -> PathBuf {
    PathBuf::from(format!(
        "COMPARE-{}.{}",
        chrono::Local::now().format("%Y%m%d%H%M%S%3f"),
        format.extension()
    ))
}

fn print_version() {
    println!("{} {}", "xlcompare".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Numeric comparison of Excel workbooks");
    println!();
    println!("Supported formats: XLSX");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
