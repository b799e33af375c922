//! In-memory table with row-oriented access
//!
//! Readers produce a [`Table`] (arrow schema plus record batches); writers and
//! the preview consume it row by row as [`Value`]s.

use crate::error::{ConvertError, Result};
use crate::types::Value;
use arrow::array::*;
use arrow::datatypes::*;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use chrono::DateTime;
use indexmap::IndexMap;

/// A fully materialized table
#[derive(Debug, Clone)]
pub struct Table {
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
}

impl Table {
    /// Create a table from a schema and its record batches
    pub fn new(schema: SchemaRef, batches: Vec<RecordBatch>) -> Self {
        Self { schema, batches }
    }

    /// Get the schema of the table
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Get the underlying record batches
    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Get column names in schema order
    pub fn column_names(&self) -> Vec<String> {
        self.schema
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    pub fn num_columns(&self) -> usize {
        self.schema.fields().len()
    }

    /// Get total number of rows across all batches
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(|b| b.num_rows()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// First `n` rows as a new table (zero-copy slices)
    pub fn head(&self, n: usize) -> Table {
        let mut remaining = n;
        let mut batches = Vec::new();

        for batch in &self.batches {
            if remaining == 0 {
                break;
            }
            let take = remaining.min(batch.num_rows());
            batches.push(batch.slice(0, take));
            remaining -= take;
        }

        Table::new(self.schema.clone(), batches)
    }

    /// Iterate over rows as vectors of values
    pub fn rows(&self) -> TableRowIterator<'_> {
        TableRowIterator {
            batches: &self.batches,
            batch_idx: 0,
            row_idx: 0,
        }
    }

    /// Iterate over rows as ordered column → value maps
    pub fn records(&self) -> impl Iterator<Item = Result<IndexMap<String, Value>>> + '_ {
        let names = self.column_names();
        self.rows().map(move |row| {
            let row = row?;
            Ok(names.iter().cloned().zip(row).collect())
        })
    }
}

/// Iterator over table rows
pub struct TableRowIterator<'a> {
    batches: &'a [RecordBatch],
    batch_idx: usize,
    row_idx: usize,
}

impl Iterator for TableRowIterator<'_> {
    type Item = Result<Vec<Value>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let batch = self.batches.get(self.batch_idx)?;
            if self.row_idx < batch.num_rows() {
                let row = extract_row(batch, self.row_idx);
                self.row_idx += 1;
                return Some(row);
            }

            // Move on to the next batch
            self.batch_idx += 1;
            self.row_idx = 0;
        }
    }
}

fn extract_row(batch: &RecordBatch, row_idx: usize) -> Result<Vec<Value>> {
    let mut row = Vec::with_capacity(batch.num_columns());

    for column in batch.columns() {
        row.push(value_at(column.as_ref(), row_idx)?);
    }

    Ok(row)
}

fn downcast<T: 'static>(array: &dyn Array) -> Result<&T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        ConvertError::ReadError(format!(
            "Failed to downcast {:?} to {}",
            array.data_type(),
            std::any::type_name::<T>()
        ))
    })
}

fn array_values(array: &dyn Array) -> Result<Value> {
    let mut items = Vec::with_capacity(array.len());
    for idx in 0..array.len() {
        items.push(value_at(array, idx)?);
    }
    Ok(Value::Array(items))
}

/// Convert one slot of an arrow array into a [`Value`], recursing into nested types
pub fn value_at(array: &dyn Array, row_idx: usize) -> Result<Value> {
    if matches!(array.data_type(), DataType::Null) || array.is_null(row_idx) {
        return Ok(Value::Null);
    }

    let value = match array.data_type() {
        DataType::Boolean => Value::Bool(downcast::<BooleanArray>(array)?.value(row_idx)),
        DataType::Int8 => Value::Int(downcast::<Int8Array>(array)?.value(row_idx) as i64),
        DataType::Int16 => Value::Int(downcast::<Int16Array>(array)?.value(row_idx) as i64),
        DataType::Int32 => Value::Int(downcast::<Int32Array>(array)?.value(row_idx) as i64),
        DataType::Int64 => Value::Int(downcast::<Int64Array>(array)?.value(row_idx)),
        DataType::UInt8 => Value::Int(downcast::<UInt8Array>(array)?.value(row_idx) as i64),
        DataType::UInt16 => Value::Int(downcast::<UInt16Array>(array)?.value(row_idx) as i64),
        DataType::UInt32 => Value::Int(downcast::<UInt32Array>(array)?.value(row_idx) as i64),
        DataType::UInt64 => Value::UInt(downcast::<UInt64Array>(array)?.value(row_idx)),
        DataType::Float16 => Value::Float(downcast::<Float16Array>(array)?.value(row_idx).to_f64()),
        DataType::Float32 => Value::Float(downcast::<Float32Array>(array)?.value(row_idx) as f64),
        DataType::Float64 => Value::Float(downcast::<Float64Array>(array)?.value(row_idx)),
        DataType::Utf8 => Value::String(downcast::<StringArray>(array)?.value(row_idx).to_string()),
        DataType::LargeUtf8 => {
            Value::String(downcast::<LargeStringArray>(array)?.value(row_idx).to_string())
        }
        DataType::Utf8View => {
            Value::String(downcast::<StringViewArray>(array)?.value(row_idx).to_string())
        }
        DataType::Binary => Value::Bytes(downcast::<BinaryArray>(array)?.value(row_idx).to_vec()),
        DataType::LargeBinary => {
            Value::Bytes(downcast::<LargeBinaryArray>(array)?.value(row_idx).to_vec())
        }
        DataType::BinaryView => {
            Value::Bytes(downcast::<BinaryViewArray>(array)?.value(row_idx).to_vec())
        }
        DataType::FixedSizeBinary(_) => {
            Value::Bytes(downcast::<FixedSizeBinaryArray>(array)?.value(row_idx).to_vec())
        }
        DataType::Date32 => {
            let days = downcast::<Date32Array>(array)?.value(row_idx);
            date_value(days as i64 * 86_400_000)
        }
        DataType::Date64 => date_value(downcast::<Date64Array>(array)?.value(row_idx)),
        DataType::Timestamp(unit, _) => {
            let raw = match unit {
                TimeUnit::Second => downcast::<TimestampSecondArray>(array)?.value(row_idx),
                TimeUnit::Millisecond => {
                    downcast::<TimestampMillisecondArray>(array)?.value(row_idx)
                }
                TimeUnit::Microsecond => {
                    downcast::<TimestampMicrosecondArray>(array)?.value(row_idx)
                }
                TimeUnit::Nanosecond => {
                    downcast::<TimestampNanosecondArray>(array)?.value(row_idx)
                }
            };
            timestamp_value(raw, unit)
        }
        DataType::List(_) => array_values(downcast::<ListArray>(array)?.value(row_idx).as_ref())?,
        DataType::LargeList(_) => {
            array_values(downcast::<LargeListArray>(array)?.value(row_idx).as_ref())?
        }
        DataType::FixedSizeList(_, _) => {
            array_values(downcast::<FixedSizeListArray>(array)?.value(row_idx).as_ref())?
        }
        DataType::Struct(_) => {
            let arr = downcast::<StructArray>(array)?;
            let mut map = IndexMap::with_capacity(arr.num_columns());
            for (field, column) in arr.fields().iter().zip(arr.columns()) {
                map.insert(field.name().clone(), value_at(column.as_ref(), row_idx)?);
            }
            Value::Object(map)
        }
        DataType::Map(_, _) => {
            let entries = downcast::<MapArray>(array)?.value(row_idx);
            let keys = entries.column(0);
            let values = entries.column(1);
            let mut map = IndexMap::with_capacity(entries.len());
            for idx in 0..entries.len() {
                let key = value_at(keys.as_ref(), idx)?.as_text();
                map.insert(key, value_at(values.as_ref(), idx)?);
            }
            Value::Object(map)
        }
        _ => {
            // Decimals, times, durations, dictionaries, ...
            let formatter = ArrayFormatter::try_new(array, &FormatOptions::default())?;
            Value::String(formatter.value(row_idx).to_string())
        }
    };

    Ok(value)
}

fn date_value(millis: i64) -> Value {
    match DateTime::from_timestamp_millis(millis) {
        Some(dt) => Value::String(dt.date_naive().format("%Y-%m-%d").to_string()),
        None => Value::Int(millis),
    }
}

fn timestamp_value(raw: i64, unit: &TimeUnit) -> Value {
    let (secs, nanos) = match unit {
        TimeUnit::Second => (raw, 0),
        TimeUnit::Millisecond => (raw.div_euclid(1_000), raw.rem_euclid(1_000) * 1_000_000),
        TimeUnit::Microsecond => (raw.div_euclid(1_000_000), raw.rem_euclid(1_000_000) * 1_000),
        TimeUnit::Nanosecond => (raw.div_euclid(1_000_000_000), raw.rem_euclid(1_000_000_000)),
    };

    match DateTime::from_timestamp(secs, nanos as u32) {
        Some(dt) => Value::String(dt.naive_utc().format("%Y-%m-%d %H:%M:%S%.f").to_string()),
        None => Value::Int(raw),
    }
}
