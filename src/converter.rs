//! Conversion engine: dispatch, preconditions, output placement and summary

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info, warn};

use crate::config::ConverterOptions;
use crate::csv::TextEncoding;
use crate::csv_reader::CsvReader;
use crate::csv_writer;
use crate::error::{ConvertError, Result};
use crate::fast_writer::write_table_sanitized;
use crate::jsonl::{write_metadata_jsonl, write_records_jsonl};
use crate::parquet::{ParquetReader, ParquetWriter};
use crate::preview::render_preview;
use crate::remote::fetch_parquet;
use crate::source::{SourceFile, FETCHED_FILE_NAME};
use crate::table::Table;

const INVALID_CONVERSION: &str = "Invalid conversion type selected.";

/// The five supported conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionType {
    CsvToParquet,
    ParquetToCsv,
    CsvToJsonl,
    ParquetToJsonl,
    ParquetToXls,
}

impl ConversionType {
    pub const ALL: [ConversionType; 5] = [
        ConversionType::CsvToParquet,
        ConversionType::ParquetToCsv,
        ConversionType::CsvToJsonl,
        ConversionType::ParquetToJsonl,
        ConversionType::ParquetToXls,
    ];

    /// User-facing label, also accepted by [`FromStr`]
    pub fn label(&self) -> &'static str {
        match self {
            ConversionType::CsvToParquet => "CSV to Parquet",
            ConversionType::ParquetToCsv => "Parquet to CSV",
            ConversionType::CsvToJsonl => "CSV to JSONL",
            ConversionType::ParquetToJsonl => "Parquet to JSONL",
            ConversionType::ParquetToXls => "Parquet to XLS",
        }
    }

    /// File name of the output inside its request directory
    pub fn output_file_name(&self) -> &'static str {
        match self {
            ConversionType::CsvToParquet => "output.parquet",
            ConversionType::ParquetToCsv => "output.csv",
            ConversionType::CsvToJsonl => "metadata.jsonl",
            ConversionType::ParquetToJsonl => "output.jsonl",
            ConversionType::ParquetToXls => "output.xlsx",
        }
    }

    /// Format label shown in the summary
    pub fn converted_format(&self) -> &'static str {
        match self {
            ConversionType::CsvToParquet => "Parquet",
            ConversionType::ParquetToCsv => "CSV",
            ConversionType::CsvToJsonl | ConversionType::ParquetToJsonl => "JSONL",
            ConversionType::ParquetToXls => "XLS",
        }
    }

    /// Whether a remote URL can stand in for the uploaded file
    pub fn accepts_url(&self) -> bool {
        matches!(
            self,
            ConversionType::ParquetToJsonl | ConversionType::ParquetToXls
        )
    }

    fn missing_input_message(&self) -> &'static str {
        match self {
            ConversionType::CsvToParquet => {
                "For CSV to Parquet conversion, please upload a CSV file."
            }
            ConversionType::ParquetToCsv => {
                "For Parquet to CSV conversion, please upload a Parquet file."
            }
            ConversionType::CsvToJsonl => "For CSV to JSONL conversion, please upload a CSV file.",
            ConversionType::ParquetToJsonl => {
                "For Parquet to JSONL conversion, please upload a file or provide a URL."
            }
            ConversionType::ParquetToXls => {
                "For Parquet to XLS conversion, please upload a file or provide a URL."
            }
        }
    }
}

impl fmt::Display for ConversionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ConversionType {
    type Err = ConvertError;

    fn from_str(label: &str) -> Result<Self> {
        ConversionType::ALL
            .into_iter()
            .find(|c| c.label() == label)
            .ok_or_else(|| ConvertError::invalid_input(INVALID_CONVERSION))
    }
}

/// One user action: an optional file, the selected conversion and an optional URL
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub source: Option<SourceFile>,
    pub conversion: ConversionType,
    pub remote_url: Option<String>,
}

impl ConversionRequest {
    pub fn new(conversion: ConversionType) -> Self {
        ConversionRequest {
            source: None,
            conversion,
            remote_url: None,
        }
    }

    /// Attach the input file (builder pattern)
    pub fn with_source(mut self, source: SourceFile) -> Self {
        self.source = Some(source);
        self
    }

    /// Attach a remote Parquet URL (builder pattern)
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.remote_url = Some(url.into());
        self
    }
}

/// Outcome of a successful conversion
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// Written file, inside a directory unique to this request
    pub output_file: PathBuf,
    /// `Parquet`, `CSV`, `JSONL` or `XLS`
    pub converted_format: &'static str,
    /// Name of the input, `from_url.parquet` for fetched payloads
    pub input_name: Option<String>,
    /// Fixed-width rendering of the first rows of the source table
    pub preview: String,
    /// Rows the preview was limited to
    pub preview_rows: usize,
    /// Data rows written (header excluded)
    pub row_count: usize,
}

impl ConversionResult {
    /// The multi-line message shown to the user.
    ///
    /// An empty `footer` is left out together with its separating blank line.
    pub fn summary(&self, footer: &str) -> String {
        let mut message = format!(
            "Input file: {}\nConverted file format: {}\n\nPreview (Top {} Rows):\n{}",
            self.input_name.as_deref().unwrap_or("N/A"),
            self.converted_format,
            self.preview_rows,
            self.preview,
        );
        if !footer.is_empty() {
            message.push_str("\n\n");
            message.push_str(footer);
        }
        message
    }
}

/// Runs conversion requests against a fixed set of options
///
/// # Examples
///
/// ```no_run
/// use tabconvert::{ConversionRequest, ConversionType, Converter, ConverterOptions, SourceFile};
///
/// let converter = Converter::new(ConverterOptions::from_env());
/// let request = ConversionRequest::new(ConversionType::CsvToParquet)
///     .with_source(SourceFile::from_path("data.csv")?);
/// let result = converter.convert(&request)?;
/// println!("{}", result.output_file.display());
/// println!("{}", converter.summary(&result));
/// # Ok::<(), tabconvert::ConvertError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConverterOptions,
}

impl Converter {
    pub fn new(options: ConverterOptions) -> Self {
        Converter { options }
    }

    pub fn options(&self) -> &ConverterOptions {
        &self.options
    }

    /// Parse the label, then convert. Unknown labels fail before any input is touched.
    pub fn convert_labeled(
        &self,
        source: Option<SourceFile>,
        label: &str,
        remote_url: Option<&str>,
    ) -> Result<ConversionResult> {
        let conversion: ConversionType = label.parse()?;
        let request = ConversionRequest {
            source,
            conversion,
            remote_url: remote_url.map(str::to_string),
        };
        self.convert(&request)
    }

    /// Run exactly one conversion routine, chosen by `request.conversion`
    pub fn convert(&self, request: &ConversionRequest) -> Result<ConversionResult> {
        let conversion = request.conversion;
        info!(
            "Converting {} ({})",
            request.source.as_ref().map(SourceFile::name).unwrap_or("no file"),
            conversion
        );

        let (table, input_name) = self.load_table(request)?;
        debug!(
            "Loaded {} rows x {} columns",
            table.num_rows(),
            table.num_columns()
        );

        let output_file = self.request_dir()?.join(conversion.output_file_name());
        let row_count = write_output(conversion, &table, &output_file)?;
        let preview_rows = self.options.preview_rows_value();
        let preview = render_preview(&table, preview_rows)?;

        info!("Wrote {} rows to {}", row_count, output_file.display());

        Ok(ConversionResult {
            output_file,
            converted_format: conversion.converted_format(),
            input_name,
            preview,
            preview_rows,
            row_count,
        })
    }

    /// Summary message with the configured footer
    pub fn summary(&self, result: &ConversionResult) -> String {
        result.summary(self.options.footer_value())
    }

    /// Check the precondition for the request and read its source table
    fn load_table(&self, request: &ConversionRequest) -> Result<(Table, Option<String>)> {
        let conversion = request.conversion;
        let source = request.source.as_ref();

        if conversion.accepts_url() {
            return self.load_parquet_or_url(request);
        }

        match conversion {
            ConversionType::CsvToParquet | ConversionType::CsvToJsonl => {
                let source = require_extension(source, "csv", conversion)?;
                let encoding = if conversion == ConversionType::CsvToJsonl {
                    TextEncoding::Latin1
                } else {
                    TextEncoding::Utf8
                };
                let table = CsvReader::from_bytes(source.bytes())
                    .encoding(encoding)
                    .read_table()?;
                Ok((table, Some(source.name().to_string())))
            }
            _ => {
                let source = require_extension(source, "parquet", conversion)?;
                let table = ParquetReader::from_bytes(source.bytes().to_vec())?.read_table()?;
                Ok((table, Some(source.name().to_string())))
            }
        }
    }

    /// Parquet from the uploaded file, or fetched from the URL when no file was given
    fn load_parquet_or_url(&self, request: &ConversionRequest) -> Result<(Table, Option<String>)> {
        let url = request.remote_url.as_deref().filter(|u| !u.is_empty());
        match (request.source.as_ref(), url) {
            (Some(source), url) => {
                if url.is_some() {
                    warn!("Both a file and a URL were given, using the file");
                }
                let table = ParquetReader::from_bytes(source.bytes().to_vec())?.read_table()?;
                Ok((table, Some(source.name().to_string())))
            }
            (None, Some(url)) => {
                let fetched = fetch_parquet(url, &self.options)?;
                let table = ParquetReader::from_bytes(fetched.into_bytes())?.read_table()?;
                Ok((table, Some(FETCHED_FILE_NAME.to_string())))
            }
            (None, None) => Err(ConvertError::invalid_input(
                request.conversion.missing_input_message(),
            )),
        }
    }

    /// Fresh directory under the output root, kept after return
    fn request_dir(&self) -> Result<PathBuf> {
        let root = self.options.output_dir_path();
        std::fs::create_dir_all(root).map_err(|e| {
            ConvertError::WriteError(format!(
                "Failed to create output directory {}: {}",
                root.display(),
                e
            ))
        })?;

        let dir = tempfile::Builder::new()
            .prefix("conversion-")
            .tempdir_in(root)?
            .keep();
        Ok(dir)
    }
}

fn require_extension<'a>(
    source: Option<&'a SourceFile>,
    extension: &str,
    conversion: ConversionType,
) -> Result<&'a SourceFile> {
    source
        .filter(|s| s.extension() == extension)
        .ok_or_else(|| ConvertError::invalid_input(conversion.missing_input_message()))
}

fn write_output(conversion: ConversionType, table: &Table, path: &Path) -> Result<usize> {
    match conversion {
        ConversionType::CsvToParquet => ParquetWriter::new().write_table(table, path),
        ConversionType::ParquetToCsv => csv_writer::write_table(table, path),
        ConversionType::CsvToJsonl => write_metadata_jsonl(table, path),
        ConversionType::ParquetToJsonl => write_records_jsonl(table, path),
        ConversionType::ParquetToXls => write_table_sanitized(table, path),
    }
}
