//! CSV reading into an in-memory table with type inference

use crate::csv::TextEncoding;
use crate::error::{ConvertError, Result};
use crate::table::Table;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{Field, Schema};
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

/// CSV reader that materializes a whole file as a [`Table`]
///
/// Column types are inferred from the full input (integers, floats,
/// booleans, dates and timestamps; everything else stays text). Empty fields
/// are nulls, and so are the trailing fields missing from a short row.
/// Repeated header names get a `.1`, `.2`, ... suffix.
///
/// # Examples
///
/// ```no_run
/// use tabconvert::csv::TextEncoding;
/// use tabconvert::csv_reader::CsvReader;
///
/// let table = CsvReader::open("data.csv")?
///     .encoding(TextEncoding::Latin1)
///     .read_table()?;
/// println!("{} rows", table.num_rows());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct CsvReader<'a> {
    data: Cow<'a, [u8]>,

    // Configuration
    encoding: TextEncoding,
    delimiter: u8,
    quote_char: u8,
    has_header: bool,
    batch_size: usize,
}

impl<'a> CsvReader<'a> {
    /// Read CSV from an in-memory buffer
    pub fn from_bytes(data: &'a [u8]) -> Self {
        Self::with_data(Cow::Borrowed(data))
    }

    /// Read the whole CSV file into memory
    pub fn open<P: AsRef<Path>>(path: P) -> Result<CsvReader<'static>> {
        let data = std::fs::read(path.as_ref())
            .map_err(|e| ConvertError::ReadError(format!("Failed to open CSV file: {}", e)))?;
        Ok(CsvReader::with_data(Cow::Owned(data)))
    }

    fn with_data(data: Cow<'a, [u8]>) -> Self {
        CsvReader {
            data,
            encoding: TextEncoding::Utf8,
            delimiter: b',',
            quote_char: b'"',
            has_header: true,
            batch_size: 8192,
        }
    }

    /// Set text encoding of the source (builder pattern)
    pub fn encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set custom delimiter (builder pattern)
    pub fn delimiter(mut self, delim: u8) -> Self {
        self.delimiter = delim;
        self
    }

    /// Set custom quote character (builder pattern)
    pub fn quote_char(mut self, quote: u8) -> Self {
        self.quote_char = quote;
        self
    }

    /// Whether the first row holds column names (default: true)
    pub fn has_header(mut self, has: bool) -> Self {
        self.has_header = has;
        self
    }

    /// Rows per record batch
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Parse the input into a table
    pub fn read_table(self) -> Result<Table> {
        let decoded = self.encoding.decode(&self.data)?;
        let text: &str = match self.encoding {
            TextEncoding::Utf8 => decoded.strip_prefix('\u{feff}').unwrap_or(&*decoded),
            TextEncoding::Latin1 => &*decoded,
        };

        if text.trim().is_empty() {
            return Err(ConvertError::ReadError(
                "No columns to parse from file".to_string(),
            ));
        }

        let format = Format::default()
            .with_header(self.has_header)
            .with_delimiter(self.delimiter)
            .with_quote(self.quote_char)
            .with_truncated_rows(true);
        let (schema, _) = format.infer_schema(Cursor::new(text.as_bytes()), None)?;
        let schema = Arc::new(dedupe_column_names(&schema));

        let reader = ReaderBuilder::new(schema.clone())
            .with_header(self.has_header)
            .with_delimiter(self.delimiter)
            .with_quote(self.quote_char)
            .with_truncated_rows(true)
            .with_batch_size(self.batch_size)
            .build(Cursor::new(text.as_bytes()))?;

        let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Table::new(schema, batches))
    }
}

/// Rename repeated column names: the second `x` becomes `x.1`, the third
/// `x.2`, and a generated name that collides is suffixed again
fn dedupe_column_names(schema: &Schema) -> Schema {
    let mut counts: HashMap<String, usize> = HashMap::new();

    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|field| {
            let mut name = field.name().clone();
            let mut count = counts.get(&name).copied().unwrap_or(0);
            while count > 0 {
                counts.insert(name.clone(), count + 1);
                name = format!("{}.{}", name, count);
                count = counts.get(&name).copied().unwrap_or(0);
            }
            counts.insert(name.clone(), count + 1);
            field.as_ref().clone().with_name(name)
        })
        .collect();

    Schema::new_with_metadata(fields, schema.metadata().clone())
}
