//! CSV encoding with RFC 4180-like behavior

use crate::types::Value;

/// CSV encoder for writing properly formatted CSV records
///
/// Fields are quoted only when they contain the delimiter, the quote
/// character or a line break. A record made of one empty field is written
/// as `""` so it cannot be mistaken for a blank line.
pub struct CsvEncoder {
    delimiter: u8,
    quote_char: u8,
}

impl Default for CsvEncoder {
    fn default() -> Self {
        Self::new(b',', b'"')
    }
}

impl CsvEncoder {
    /// Create a new CSV encoder with custom delimiter and quote character
    pub fn new(delimiter: u8, quote_char: u8) -> Self {
        Self {
            delimiter,
            quote_char,
        }
    }

    /// Encode a record of text fields into buffer (no line ending)
    pub fn encode_row<I, S>(&self, fields: I, buffer: &mut Vec<u8>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let start = buffer.len();
        let mut count = 0;
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                buffer.push(self.delimiter);
            }
            self.encode_field(field.as_ref(), buffer);
            count += 1;
        }
        self.quote_lone_empty(start, count, buffer);
    }

    /// Encode a record of table values; nulls become empty fields
    pub fn encode_values(&self, values: &[Value], buffer: &mut Vec<u8>) {
        let start = buffer.len();
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                buffer.push(self.delimiter);
            }
            match value {
                Value::Null => {}
                Value::String(s) => self.encode_field(s, buffer),
                other => self.encode_field(&other.as_text(), buffer),
            }
        }
        self.quote_lone_empty(start, values.len(), buffer);
    }

    fn quote_lone_empty(&self, start: usize, count: usize, buffer: &mut Vec<u8>) {
        if count == 1 && buffer.len() == start {
            buffer.push(self.quote_char);
            buffer.push(self.quote_char);
        }
    }

    /// Encode single field with proper quoting/escaping
    fn encode_field(&self, field: &str, buffer: &mut Vec<u8>) {
        if !self.needs_quoting(field) {
            buffer.extend_from_slice(field.as_bytes());
            return;
        }

        buffer.push(self.quote_char);
        for byte in field.bytes() {
            if byte == self.quote_char {
                // Escape quotes by doubling: " -> ""
                buffer.push(self.quote_char);
            }
            buffer.push(byte);
        }
        buffer.push(self.quote_char);
    }

    /// Check if field requires quoting
    fn needs_quoting(&self, field: &str) -> bool {
        field
            .bytes()
            .any(|b| b == self.delimiter || b == self.quote_char || b == b'\n' || b == b'\r')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(fields: &[&str]) -> String {
        let mut buffer = Vec::new();
        CsvEncoder::default().encode_row(fields, &mut buffer);
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_simple_fields() {
        assert_eq!(encode(&["a", "b", "c"]), "a,b,c");
    }

    #[test]
    fn test_quoted_fields() {
        assert_eq!(encode(&["a,b", "c"]), r#""a,b",c"#);
    }

    #[test]
    fn test_escaped_quotes() {
        assert_eq!(encode(&[r#"Say "Hello""#, "world"]), r#""Say ""Hello""",world"#);
    }

    #[test]
    fn test_newlines() {
        assert_eq!(encode(&["Line 1\nLine 2", "normal"]), "\"Line 1\nLine 2\",normal");
        assert_eq!(encode(&["a\rb"]), "\"a\rb\"");
    }

    #[test]
    fn test_values() {
        let mut buffer = Vec::new();
        CsvEncoder::default().encode_values(
            &[
                Value::Int(1),
                Value::Null,
                Value::Float(2.0),
                Value::Bool(true),
                Value::from("x,y"),
            ],
            &mut buffer,
        );
        assert_eq!(String::from_utf8(buffer).unwrap(), r#"1,,2.0,True,"x,y""#);
    }

    #[test]
    fn test_lone_empty_field_quoted() {
        assert_eq!(encode(&[""]), r#""""#);
        assert_eq!(encode(&["", ""]), ",");

        let mut buffer = Vec::new();
        CsvEncoder::default().encode_values(&[Value::Null], &mut buffer);
        assert_eq!(buffer, b"\"\"");
    }

    #[test]
    fn test_custom_delimiter() {
        let mut buffer = Vec::new();
        CsvEncoder::new(b';', b'"').encode_row(["a", "b;c", "d"], &mut buffer);
        assert_eq!(String::from_utf8(buffer).unwrap(), r#"a;"b;c";d"#);
    }
}
