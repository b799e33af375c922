//! Parquet reader producing an in-memory table

use crate::error::{ConvertError, Result};
use crate::table::Table;
use arrow::datatypes::SchemaRef;
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::path::Path;

/// Parquet reader over an in-memory payload
///
/// # Example
///
/// ```no_run
/// use tabconvert::parquet::ParquetReader;
///
/// let reader = ParquetReader::open("data.parquet")?;
/// println!("{:?} ({} rows)", reader.column_names(), reader.row_count());
/// let table = reader.read_table()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ParquetReader {
    data: Bytes,
    schema: SchemaRef,
    row_count: usize,
    batch_size: usize,
}

impl ParquetReader {
    /// Open a Parquet file for reading
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path.as_ref())
            .map_err(|e| ConvertError::ReadError(format!("Failed to open Parquet file: {}", e)))?;
        Self::from_bytes(data)
    }

    /// Read a Parquet payload already in memory.
    ///
    /// Footer and schema are parsed eagerly so malformed input fails here.
    pub fn from_bytes(data: impl Into<Bytes>) -> Result<Self> {
        let data = data.into();
        let builder = ParquetRecordBatchReaderBuilder::try_new(data.clone())
            .map_err(|e| ConvertError::ReadError(format!("Failed to open Parquet file: {}", e)))?;

        let schema = builder.schema().clone();
        let row_count = builder
            .metadata()
            .file_metadata()
            .num_rows()
            .try_into()
            .unwrap_or(0);

        Ok(Self {
            data,
            schema,
            row_count,
            batch_size: 8192,
        })
    }

    /// Rows per record batch (builder pattern)
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Get column names from the Parquet schema
    pub fn column_names(&self) -> Vec<String> {
        self.schema
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    /// Get the arrow schema of the file
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Get total number of rows recorded in the footer
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Decode every row group into a table
    pub fn read_table(self) -> Result<Table> {
        let reader = ParquetRecordBatchReaderBuilder::try_new(self.data)
            .map_err(|e| ConvertError::ReadError(format!("Failed to open Parquet file: {}", e)))?
            .with_batch_size(self.batch_size)
            .build()
            .map_err(|e| ConvertError::ReadError(format!("Failed to build reader: {}", e)))?;

        let mut batches = Vec::new();
        for batch in reader {
            batches.push(
                batch.map_err(|e| ConvertError::ReadError(format!("Failed to read batch: {}", e)))?,
            );
        }

        Ok(Table::new(self.schema, batches))
    }
}
