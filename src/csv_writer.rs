//! CSV file writing

use crate::csv::CsvEncoder;
use crate::error::{ConvertError, Result};
use crate::table::Table;
use crate::types::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// CSV file writer
///
/// Writes rows straight to a buffered file. Values are rendered with
/// [`Value::as_text`]; nulls become empty fields.
///
/// # Examples
///
/// ```no_run
/// use tabconvert::csv_writer::CsvWriter;
///
/// let mut writer = CsvWriter::new("output.csv").unwrap();
/// writer.write_row(["Name", "Age", "City"]).unwrap();
/// writer.write_row(["Alice", "30", "NYC"]).unwrap();
/// writer.save().unwrap();
/// ```
pub struct CsvWriter {
    writer: BufWriter<File>,

    // State
    row_count: u64,
    buffer: Vec<u8>,

    // Configuration
    encoder: CsvEncoder,
    line_ending: &'static [u8],
}

impl CsvWriter {
    /// Create a new CSV writer, truncating any existing file
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path.as_ref())
            .map_err(|e| ConvertError::WriteError(format!("Failed to create CSV file: {}", e)))?;

        Ok(CsvWriter {
            writer: BufWriter::new(file),
            row_count: 0,
            buffer: Vec::with_capacity(4096),
            encoder: CsvEncoder::default(),
            line_ending: b"\n",
        })
    }

    /// Set custom delimiter and quote character (builder pattern)
    pub fn dialect(mut self, delimiter: u8, quote_char: u8) -> Self {
        self.encoder = CsvEncoder::new(delimiter, quote_char);
        self
    }

    /// Write a row of strings
    pub fn write_row<I, S>(&mut self, data: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        // Reuse buffer
        self.buffer.clear();
        self.encoder.encode_row(data, &mut self.buffer);
        self.flush_row()
    }

    /// Write a row of table values
    pub fn write_values(&mut self, values: &[Value]) -> Result<()> {
        self.buffer.clear();
        self.encoder.encode_values(values, &mut self.buffer);
        self.flush_row()
    }

    fn flush_row(&mut self) -> Result<()> {
        self.buffer.extend_from_slice(self.line_ending);
        self.writer
            .write_all(&self.buffer)
            .map_err(|e| ConvertError::WriteError(format!("Failed to write to file: {}", e)))?;
        self.row_count += 1;
        Ok(())
    }

    /// Get the number of rows written (header included)
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Finalize and save the CSV file. Consumes the writer.
    pub fn save(mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| ConvertError::WriteError(format!("Failed to flush file: {}", e)))?;
        Ok(())
    }
}

/// Write a whole table as CSV with a header row and no index column.
///
/// Returns the number of data rows written.
pub fn write_table<P: AsRef<Path>>(table: &Table, path: P) -> Result<usize> {
    let mut writer = CsvWriter::new(path)?;
    writer.write_row(table.column_names())?;

    let mut rows = 0;
    for row in table.rows() {
        writer.write_values(&row?)?;
        rows += 1;
    }

    writer.save()?;
    Ok(rows)
}
