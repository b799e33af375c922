//! # tabconvert
//!
//! Convert tabular datasets between CSV, Parquet, JSONL and XLSX.
//!
//! | Conversion         | Output           |
//! |--------------------|------------------|
//! | `CSV to Parquet`   | `output.parquet` |
//! | `Parquet to CSV`   | `output.csv`     |
//! | `CSV to JSONL`     | `metadata.jsonl` |
//! | `Parquet to JSONL` | `output.jsonl`   |
//! | `Parquet to XLS`   | `output.xlsx`    |
//!
//! Every request writes into its own directory under the configured output
//! root, so repeated or concurrent conversions never overwrite each other.
//! The two Parquet-to-text conversions also accept a URL in place of a file.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tabconvert::{Converter, ConverterOptions, SourceFile};
//!
//! let converter = Converter::new(ConverterOptions::new().output_dir("converted"));
//! let source = SourceFile::from_path("labels.csv")?;
//! let result = converter.convert_labeled(Some(source), "CSV to JSONL", None)?;
//!
//! println!("{}", result.output_file.display());
//! println!("{}", converter.summary(&result));
//! # Ok::<(), tabconvert::ConvertError>(())
//! ```

pub mod config;
pub mod converter;
pub mod csv;
pub mod csv_reader;
pub mod csv_writer;
pub mod error;
pub mod fast_writer;
pub mod jsonl;
pub mod logging;
pub mod parquet;
pub mod preview;
pub mod remote;
pub mod sanitize;
pub mod source;
pub mod table;
pub mod types;

pub use crate::config::{ConverterOptions, DEFAULT_FOOTER};
pub use crate::converter::{ConversionRequest, ConversionResult, ConversionType, Converter};
pub use crate::error::{ConvertError, Result};
pub use crate::remote::fetch_parquet;
pub use crate::sanitize::sanitize_value;
pub use crate::source::{resolve_input, InputFile, SourceFile};
pub use crate::table::Table;
pub use crate::types::Value;
