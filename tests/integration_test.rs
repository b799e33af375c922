//! Integration tests for tabconvert

use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, BinaryArray, Int64Array, ListArray, StringArray};
use arrow::datatypes::{DataType, Field, Int32Type, Schema};
use arrow::record_batch::RecordBatch;
use tabconvert::csv_reader::CsvReader;
use tabconvert::parquet::{ParquetReader, ParquetWriter};
use tabconvert::sanitize::{is_illegal_control, sanitize_value};
use s_zip::StreamingZipReader;
use tabconvert::{
    ConversionRequest, ConversionType, ConvertError, Converter, ConverterOptions, SourceFile,
    Table, Value,
};
use tempfile::{tempdir, TempDir};

fn converter(dir: &TempDir) -> Converter {
    Converter::new(ConverterOptions::new().output_dir(dir.path()))
}

fn write_parquet(dir: &Path, name: &str, table: &Table) -> SourceFile {
    let path = dir.join(name);
    ParquetWriter::new().write_table(table, &path).unwrap();
    SourceFile::from_path(&path).unwrap()
}

fn binary_table() -> Table {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("blob", DataType::Binary, true),
        Field::new(
            "tags",
            DataType::List(Arc::new(Field::new("item", DataType::Int32, true))),
            true,
        ),
    ]));
    let tags = ListArray::from_iter_primitive::<Int32Type, _, _>(vec![
        Some(vec![Some(1), Some(2)]),
        None,
        Some(vec![]),
    ]);
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(vec![1, 2, 3])) as ArrayRef,
            Arc::new(BinaryArray::from(vec![
                Some("héllo".as_bytes()),
                Some(&b"bad\xff\x01"[..]),
                None,
            ])) as ArrayRef,
            Arc::new(tags) as ArrayRef,
        ],
    )
    .unwrap();
    Table::new(schema, vec![batch])
}

#[test]
fn test_csv_parquet_csv_roundtrip() {
    let dir = tempdir().unwrap();
    let converter = converter(&dir);
    let csv = "id,name,score\n1,alice,0.5\n2,bob,\n3,\"c, d\",2.0\n";

    let parquet = converter
        .convert_labeled(
            Some(SourceFile::from_bytes("in.csv", csv.as_bytes().to_vec())),
            "CSV to Parquet",
            None,
        )
        .unwrap();
    assert_eq!(parquet.row_count, 3);

    let back = converter
        .convert_labeled(
            Some(SourceFile::from_path(&parquet.output_file).unwrap()),
            "Parquet to CSV",
            None,
        )
        .unwrap();
    assert!(back.output_file.ends_with("output.csv"));
    assert_eq!(std::fs::read_to_string(&back.output_file).unwrap(), csv);
}

#[test]
fn test_parquet_has_no_index_column() {
    let dir = tempdir().unwrap();
    let result = converter(&dir)
        .convert_labeled(
            Some(SourceFile::from_bytes("t.csv", b"a,b\n1,2\n".to_vec())),
            "CSV to Parquet",
            None,
        )
        .unwrap();

    let reader = ParquetReader::open(&result.output_file).unwrap();
    assert_eq!(reader.column_names(), vec!["a", "b"]);
    assert_eq!(reader.row_count(), 1);
}

#[test]
fn test_csv_to_jsonl_scenario() {
    let dir = tempdir().unwrap();
    let source = SourceFile::from_bytes("labels.csv", b"file_name,label\na.png,cat\nb.png,dog\n".to_vec());
    let result = converter(&dir)
        .convert_labeled(Some(source), "CSV to JSONL", None)
        .unwrap();

    assert!(result.output_file.ends_with("metadata.jsonl"));
    assert_eq!(result.converted_format, "JSONL");
    assert_eq!(
        std::fs::read_to_string(&result.output_file).unwrap(),
        concat!(
            r#"{"file_name": "a.png", "ground_truth": "{\"file_name\": \"a.png\", \"label\": \"cat\"}"}"#,
            "\n",
            r#"{"file_name": "b.png", "ground_truth": "{\"file_name\": \"b.png\", \"label\": \"dog\"}"}"#,
            "\n",
        )
    );
}

#[test]
fn test_csv_to_jsonl_lines_and_keys() {
    let dir = tempdir().unwrap();
    // Latin-1 source without a file_name column
    let source = SourceFile::from_bytes("notes.csv", b"word,n\ncaf\xe9,1\nna\xefve,2\nplain,3\n".to_vec());
    let result = converter(&dir)
        .convert_labeled(Some(source), "CSV to JSONL", None)
        .unwrap();

    let content = std::fs::read_to_string(&result.output_file).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(result.row_count, 3);

    for line in &lines {
        assert!(line.is_ascii());
        let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
        let obj = parsed.as_object().unwrap();
        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["file_name", "ground_truth"]);
        assert!(obj["file_name"].is_null());
        assert!(obj["ground_truth"].is_string());
    }

    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    let truth: serde_json::Value =
        serde_json::from_str(first["ground_truth"].as_str().unwrap()).unwrap();
    assert_eq!(truth["word"], "café");
    assert_eq!(truth["n"], 1);
}

#[test]
fn test_parquet_to_jsonl_decodes_binary() {
    let dir = tempdir().unwrap();
    let source = write_parquet(dir.path(), "bin.parquet", &binary_table());
    let result = converter(&dir)
        .convert_labeled(Some(source), "Parquet to JSONL", None)
        .unwrap();

    assert!(result.output_file.ends_with("output.jsonl"));
    let content = std::fs::read_to_string(&result.output_file).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines,
        vec![
            r#"{"id": 1, "blob": "héllo", "tags": [1, 2]}"#,
            "{\"id\": 2, \"blob\": \"bad\u{fffd}\\u0001\", \"tags\": null}",
            r#"{"id": 3, "blob": null, "tags": []}"#,
        ]
    );

    for line in lines {
        let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(parsed["blob"].is_string() || parsed["blob"].is_null());
    }
}

#[test]
fn test_parquet_to_xls_writes_workbook() {
    let dir = tempdir().unwrap();
    let source = write_parquet(dir.path(), "bin.parquet", &binary_table());
    let result = converter(&dir)
        .convert_labeled(Some(source), "Parquet to XLS", Some("http://unused.invalid/x.parquet"))
        .unwrap();

    assert!(result.output_file.ends_with("output.xlsx"));
    assert_eq!(result.converted_format, "XLS");
    assert_eq!(result.row_count, 3);
    let bytes = std::fs::read(&result.output_file).unwrap();
    assert!(bytes.starts_with(b"PK"));

    let mut zip = StreamingZipReader::open(&result.output_file).unwrap();
    let sheet = String::from_utf8(zip.read_entry_by_name("xl/worksheets/sheet1.xml").unwrap())
        .unwrap();

    let cell = |text: &str| format!("<t xml:space=\"preserve\">{}</t>", text);
    assert!(sheet.contains(&cell("id")));
    assert!(sheet.contains(&cell("blob")));
    assert!(sheet.contains(&cell("tags")));
    assert!(sheet.contains(&cell("héllo")));
    // 0xff decodes to U+FFFD and the 0x01 control is dropped
    assert!(sheet.contains(&cell("bad\u{fffd}")));
    assert!(sheet.contains(&cell("[1, 2]")));
    assert!(!sheet.contains('\u{1}'));
}

#[test]
fn test_short_csv_rows_are_padded_with_nulls() {
    let dir = tempdir().unwrap();
    let source = SourceFile::from_bytes("short.csv", b"a,b,c\n1,2,3\n4,5\n".to_vec());
    let result = converter(&dir)
        .convert_labeled(Some(source), "CSV to Parquet", None)
        .unwrap();
    assert_eq!(result.row_count, 2);

    let table = ParquetReader::open(&result.output_file)
        .unwrap()
        .read_table()
        .unwrap();
    let rows: Vec<Vec<Value>> = table.rows().collect::<Result<_, _>>().unwrap();
    assert_eq!(rows[0], vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    assert_eq!(rows[1], vec![Value::Int(4), Value::Int(5), Value::Null]);

    let source = SourceFile::from_bytes("meta.csv", b"file_name,label\na.png,cat\nb.png\n".to_vec());
    let result = converter(&dir)
        .convert_labeled(Some(source), "CSV to JSONL", None)
        .unwrap();
    let content = std::fs::read_to_string(&result.output_file).unwrap();
    assert_eq!(
        content.lines().nth(1),
        Some(r#"{"file_name": "b.png", "ground_truth": "{\"file_name\": \"b.png\", \"label\": null}"}"#)
    );
}

#[test]
fn test_sanitizer_idempotent_and_clean() {
    let inputs = vec![
        Value::from("tab\tnew\nline\u{0}bell\u{7}"),
        Value::Bytes(b"\x00\x01ok\x0b\x0c\x0e\x1f\xff".to_vec()),
        Value::Array(vec![Value::from("a\u{1}"), Value::Bytes(b"b\x02".to_vec())]),
        Value::Int(5),
        Value::Float(f64::NAN),
        Value::Bool(true),
        Value::Null,
    ];

    for input in inputs {
        let once = sanitize_value(input.clone());
        let twice = sanitize_value(once.clone());
        match (&once, &twice) {
            (Value::Float(a), Value::Float(b)) if a.is_nan() => assert!(b.is_nan()),
            _ => assert_eq!(once, twice),
        }
        if let Value::String(s) = &once {
            assert!(!s.chars().any(is_illegal_control), "{:?}", s);
        }
    }

    assert_eq!(sanitize_value(Value::from("a\tb\nc")), Value::from("a\tb\nc"));
}

#[test]
fn test_unknown_label_is_invalid_input() {
    let dir = tempdir().unwrap();
    let source = SourceFile::from_bytes("x.csv", b"a\n1\n".to_vec());
    for label in ["CSV to XML", "csv to jsonl", ""] {
        let err = converter(&dir)
            .convert_labeled(Some(source.clone()), label, None)
            .unwrap_err();
        assert!(matches!(err, ConvertError::InvalidInput(_)));
        assert_eq!(err.to_string(), "Invalid conversion type selected.");
    }
}

#[test]
fn test_parquet_to_csv_requires_parquet_file() {
    let dir = tempdir().unwrap();
    let converter = converter(&dir);

    let missing = converter
        .convert(&ConversionRequest::new(ConversionType::ParquetToCsv))
        .unwrap_err();
    assert_eq!(
        missing.to_string(),
        "For Parquet to CSV conversion, please upload a Parquet file."
    );

    let wrong = converter
        .convert_labeled(
            Some(SourceFile::from_bytes("data.csv", b"a\n1\n".to_vec())),
            "Parquet to CSV",
            None,
        )
        .unwrap_err();
    assert!(wrong.is_invalid_input());
    assert!(wrong.to_string().contains("Parquet"));
}

#[test]
fn test_parquet_to_xls_needs_file_or_url() {
    let dir = tempdir().unwrap();
    let err = converter(&dir)
        .convert_labeled(None, "Parquet to XLS", Some(""))
        .unwrap_err();
    assert!(err.is_invalid_input());
    let message = err.to_string();
    assert!(message.contains("upload a file"));
    assert!(message.contains("provide a URL"));
}

#[test]
fn test_csv_conversions_reject_missing_file() {
    let dir = tempdir().unwrap();
    let converter = converter(&dir);
    for (label, message) in [
        ("CSV to Parquet", "For CSV to Parquet conversion, please upload a CSV file."),
        ("CSV to JSONL", "For CSV to JSONL conversion, please upload a CSV file."),
        ("Parquet to JSONL", "For Parquet to JSONL conversion, please upload a file or provide a URL."),
    ] {
        let err = converter.convert_labeled(None, label, None).unwrap_err();
        assert_eq!(err.to_string(), message);
    }
}

#[test]
fn test_repeated_requests_get_distinct_outputs() {
    let dir = tempdir().unwrap();
    let converter = converter(&dir);
    let request = ConversionRequest::new(ConversionType::CsvToParquet)
        .with_source(SourceFile::from_bytes("a.csv", b"x\n1\n".to_vec()));

    let first = converter.convert(&request).unwrap();
    let second = converter.convert(&request).unwrap();

    assert_ne!(first.output_file, second.output_file);
    assert!(first.output_file.exists());
    assert!(second.output_file.exists());
    assert_eq!(first.output_file.file_name(), second.output_file.file_name());
}

#[test]
fn test_malformed_input_propagates() {
    let dir = tempdir().unwrap();
    let err = converter(&dir)
        .convert_labeled(
            Some(SourceFile::from_bytes("broken.parquet", b"definitely not parquet".to_vec())),
            "Parquet to CSV",
            None,
        )
        .unwrap_err();
    assert!(!err.is_invalid_input());
}

#[test]
fn test_summary_message() {
    let dir = tempdir().unwrap();
    let converter = converter(&dir);
    let result = converter
        .convert_labeled(
            Some(SourceFile::from_bytes("people.csv", b"name,age\nann,31\n".to_vec())),
            "CSV to Parquet",
            None,
        )
        .unwrap();

    assert_eq!(
        converter.summary(&result),
        "Input file: people.csv\nConverted file format: Parquet\n\n\
         Preview (Top 10 Rows):\nname  age\n ann   31\n\n\
         Community: https://discord.gg/openfreeai 🚀"
    );
}

#[test]
fn test_preview_limited_to_configured_rows() {
    let dir = tempdir().unwrap();
    let converter = Converter::new(
        ConverterOptions::new()
            .output_dir(dir.path())
            .preview_rows(2)
            .footer(""),
    );
    let csv: String = std::iter::once("n\n".to_string())
        .chain((0..50).map(|i| format!("{}\n", i)))
        .collect();
    let result = converter
        .convert_labeled(
            Some(SourceFile::from_bytes("many.csv", csv.into_bytes())),
            "CSV to Parquet",
            None,
        )
        .unwrap();

    assert_eq!(result.row_count, 50);
    assert_eq!(result.preview, "n\n0\n1");
    assert!(converter.summary(&result).ends_with("Preview (Top 2 Rows):\nn\n0\n1"));
}

#[test]
fn test_table_readers_agree() {
    let dir = tempdir().unwrap();
    let table = CsvReader::from_bytes(b"k,v\na,1\nb,2\n").read_table().unwrap();
    let source = write_parquet(dir.path(), "kv.parquet", &table);

    let back = ParquetReader::from_bytes(source.into_bytes())
        .unwrap()
        .read_table()
        .unwrap();
    let rows: Vec<Vec<Value>> = back.rows().collect::<Result<_, _>>().unwrap();
    assert_eq!(
        rows,
        vec![
            vec![Value::from("a"), Value::Int(1)],
            vec![Value::from("b"), Value::Int(2)],
        ]
    );
}

#[test]
fn test_utf8_strings_column() {
    let schema = Arc::new(Schema::new(vec![Field::new("s", DataType::Utf8, true)]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![Arc::new(StringArray::from(vec![Some("x\u{1}y"), None])) as ArrayRef],
    )
    .unwrap();
    let dir = tempdir().unwrap();
    let source = write_parquet(dir.path(), "s.parquet", &Table::new(schema, vec![batch]));

    let result = converter(&dir)
        .convert_labeled(Some(source), "Parquet to CSV", None)
        .unwrap();
    // CSV output keeps control characters; only the spreadsheet path strips them
    assert_eq!(
        std::fs::read_to_string(&result.output_file).unwrap(),
        "s\nx\u{1}y\n\"\"\n"
    );
}
