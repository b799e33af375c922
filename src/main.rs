//! Command-line front end for tabconvert
//!
//! ## Usage
//!
//! ```bash
//! # Upload-style conversion of a local file
//! tabconvert --input labels.csv --conversion "CSV to JSONL"
//!
//! # Parquet from a URL straight to a spreadsheet
//! tabconvert --conversion "Parquet to XLS" --url https://example.com/data.parquet
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tabconvert::logging::init_logging;
use tabconvert::{
    resolve_input, ConversionRequest, ConversionType, Converter, ConverterOptions, InputFile,
};

#[derive(Parser)]
#[command(name = "tabconvert")]
#[command(about = "Convert datasets between CSV, Parquet, JSONL and XLSX")]
#[command(version)]
struct Cli {
    /// Input file (CSV or Parquet)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// One of: "CSV to Parquet", "Parquet to CSV", "CSV to JSONL",
    /// "Parquet to JSONL", "Parquet to XLS"
    #[arg(short, long)]
    conversion: String,

    /// Parquet file URL, used by the Parquet to JSONL/XLS conversions when no input is given
    #[arg(short, long)]
    url: Option<String>,

    /// Root directory for converted files
    #[arg(short, long, env = "TABCONVERT_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Rows shown in the preview
    #[arg(long, env = "TABCONVERT_PREVIEW_ROWS")]
    preview_rows: Option<usize>,

    /// Timeout for the URL download, in seconds
    #[arg(long, env = "TABCONVERT_FETCH_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> ConverterOptions {
        let mut options = ConverterOptions::from_env();
        if let Some(dir) = &self.output_dir {
            options = options.output_dir(dir);
        }
        if let Some(rows) = self.preview_rows {
            options = options.preview_rows(rows);
        }
        if let Some(secs) = self.timeout_secs {
            options = options.fetch_timeout(Duration::from_secs(secs));
        }
        options
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // An unknown label is reported before the input is touched
    let conversion: ConversionType = cli.conversion.parse()?;
    let converter = Converter::new(cli.options());
    let source = resolve_input(cli.input.clone().map(InputFile::Path))
        .context("Failed to read input file")?;

    let request = ConversionRequest {
        source,
        conversion,
        remote_url: cli.url.clone(),
    };
    let result = converter.convert(&request)?;

    println!("{}", result.output_file.display());
    println!();
    println!("{}", converter.summary(&result));
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
