//! Parquet writer for in-memory tables

use crate::error::{ConvertError, Result};
use crate::table::Table;
use parquet::arrow::arrow_writer::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;

/// Writes a [`Table`] to a Parquet file, one row group per batch flush.
///
/// Only the table's own columns are written; no index column is added.
#[derive(Debug, Clone)]
pub struct ParquetWriter {
    compression: Compression,
    max_row_group_size: usize,
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ParquetWriter {
    /// Snappy-compressed writer with default row group size
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            max_row_group_size: 1024 * 1024,
        }
    }

    /// Set the column compression codec (builder pattern)
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set the maximum rows per row group (builder pattern)
    pub fn max_row_group_size(mut self, rows: usize) -> Self {
        self.max_row_group_size = rows.max(1);
        self
    }

    /// Write the table, returning the number of rows written
    pub fn write_table<P: AsRef<Path>>(&self, table: &Table, path: P) -> Result<usize> {
        let file = File::create(path.as_ref()).map_err(|e| {
            ConvertError::WriteError(format!("Failed to create Parquet file: {}", e))
        })?;

        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.max_row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, table.schema().clone(), Some(props))
            .map_err(|e| ConvertError::WriteError(e.to_string()))?;

        let mut total_rows = 0;
        for batch in table.batches() {
            writer
                .write(batch)
                .map_err(|e| ConvertError::WriteError(e.to_string()))?;
            total_rows += batch.num_rows();
        }

        writer
            .close()
            .map_err(|e| ConvertError::WriteError(e.to_string()))?;

        Ok(total_rows)
    }
}
