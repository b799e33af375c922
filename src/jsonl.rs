//! JSON Lines output
//!
//! Lines are laid out like Python's `json.dumps` defaults (`", "` between
//! items, `": "` after keys) so files produced here are byte-compatible with
//! existing dataset metadata tooling.

use crate::error::{ConvertError, Result};
use crate::sanitize::decode_binary;
use crate::table::Table;
use crate::types::Value;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::ser::Formatter;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Name of the column whose value is lifted to the top level of metadata lines
pub const FILE_NAME_COLUMN: &str = "file_name";

/// `serde_json` formatter with Python-style separators and optional ASCII escaping
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonFormatter {
    ensure_ascii: bool,
}

impl PythonFormatter {
    pub fn new(ensure_ascii: bool) -> Self {
        Self { ensure_ascii }
    }
}

impl Formatter for PythonFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if !self.ensure_ascii {
            return writer.write_all(fragment.as_bytes());
        }

        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if (ch as u32) < 0x7f {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Serialize any value to a JSON string with the Python-compatible layout
pub fn to_json_text<T: Serialize + ?Sized>(value: &T, ensure_ascii: bool) -> Result<String> {
    let mut buffer = Vec::with_capacity(128);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PythonFormatter::new(ensure_ascii));
    value.serialize(&mut serializer)?;
    String::from_utf8(buffer).map_err(|e| ConvertError::WriteError(e.to_string()))
}

#[derive(Serialize)]
struct MetadataLine<'a> {
    file_name: &'a Value,
    ground_truth: String,
}

/// Build one metadata line: the `file_name` column (or null) plus the whole
/// row encoded as a JSON string
pub fn metadata_line(record: &IndexMap<String, Value>) -> Result<String> {
    let line = MetadataLine {
        file_name: record.get(FILE_NAME_COLUMN).unwrap_or(&Value::Null),
        ground_truth: to_json_text(record, true)?,
    };
    to_json_text(&line, true)
}

/// Line-oriented JSON writer
pub struct JsonlWriter {
    writer: BufWriter<File>,
    line_count: usize,
}

impl JsonlWriter {
    /// Create the output file, truncating any existing one
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path.as_ref())
            .map_err(|e| ConvertError::WriteError(format!("Failed to create JSONL file: {}", e)))?;

        Ok(Self {
            writer: BufWriter::new(file),
            line_count: 0,
        })
    }

    /// Write an already serialized line
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.line_count += 1;
        Ok(())
    }

    /// Get the number of lines written
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Flush and close the file, returning the number of lines written
    pub fn save(mut self) -> Result<usize> {
        self.writer
            .flush()
            .map_err(|e| ConvertError::WriteError(format!("Failed to flush JSONL file: {}", e)))?;
        Ok(self.line_count)
    }
}

/// Write the dataset metadata form: one `{"file_name", "ground_truth"}` line per row
pub fn write_metadata_jsonl<P: AsRef<Path>>(table: &Table, path: P) -> Result<usize> {
    let mut writer = JsonlWriter::new(path)?;
    for record in table.records() {
        writer.write_line(&metadata_line(&record?)?)?;
    }
    writer.save()
}

/// Write one JSON object per row with binary values decoded to text
pub fn write_records_jsonl<P: AsRef<Path>>(table: &Table, path: P) -> Result<usize> {
    let mut writer = JsonlWriter::new(path)?;
    for record in table.records() {
        let record = decode_binary(Value::Object(record?));
        writer.write_line(&to_json_text(&record, false)?)?;
    }
    writer.save()
}
