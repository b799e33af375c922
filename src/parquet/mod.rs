//! Parquet reading and writing
//!
//! Parquet payloads are read fully into a [`Table`](crate::table::Table),
//! either from a file on disk or from bytes already in memory (an upload or
//! a fetched URL).
//!
//! # Example
//!
//! ```no_run
//! use tabconvert::parquet::{ParquetReader, ParquetWriter};
//!
//! let table = ParquetReader::open("data.parquet")?.read_table()?;
//! ParquetWriter::new().write_table(&table, "copy.parquet")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod reader;
pub mod writer;

pub use reader::ParquetReader;
pub use writer::ParquetWriter;
