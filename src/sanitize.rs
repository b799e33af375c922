//! Cleaning of values before they reach an output format
//!
//! Spreadsheet XML rejects most ASCII control characters, so every cell bound
//! for XLSX goes through [`sanitize_value`]. JSONL output only needs binary
//! payloads turned into text, which [`decode_binary`] does recursively.

use crate::types::Value;

/// Characters removed by [`strip_control_chars`]: 0x00-0x08, 0x0B, 0x0C, 0x0E-0x1F.
/// Tab (0x09), newline (0x0A) and carriage return (0x0D) are kept.
#[inline]
pub fn is_illegal_control(ch: char) -> bool {
    matches!(ch, '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}')
}

/// Remove the control characters spreadsheet writers reject
pub fn strip_control_chars(text: &str) -> String {
    text.chars().filter(|c| !is_illegal_control(*c)).collect()
}

/// Make a value writable as a spreadsheet cell.
///
/// - bytes: decoded as UTF-8 (invalid sequences become U+FFFD), then stripped
/// - strings: stripped
/// - arrays/objects: rendered as text, then stripped
/// - anything else is returned unchanged
pub fn sanitize_value(value: Value) -> Value {
    match value {
        Value::Bytes(bytes) => Value::String(strip_control_chars(&String::from_utf8_lossy(&bytes))),
        Value::String(s) => Value::String(strip_control_chars(&s)),
        structured if structured.is_structured() => {
            Value::String(strip_control_chars(&structured.as_text()))
        }
        other => other,
    }
}

/// Replace every binary value, at any depth, with its lossy UTF-8 decoding
pub fn decode_binary(value: Value) -> Value {
    match value {
        Value::Bytes(bytes) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
        Value::Array(items) => Value::Array(items.into_iter().map(decode_binary).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, decode_binary(v)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn has_illegal(value: &Value) -> bool {
        match value {
            Value::String(s) => s.chars().any(is_illegal_control),
            _ => false,
        }
    }

    #[test]
    fn test_strip_keeps_tab_and_newline() {
        assert_eq!(strip_control_chars("a\tb\nc\rd"), "a\tb\nc\rd");
        assert_eq!(strip_control_chars("a\u{0}b\u{7}c\u{b}\u{c}d\u{1f}"), "abcd");
    }

    #[test]
    fn test_bytes_are_decoded_and_stripped() {
        let value = sanitize_value(Value::Bytes(b"ok\x01\xffend".to_vec()));
        assert_eq!(value, Value::String("ok\u{FFFD}end".to_string()));
    }

    #[test]
    fn test_structured_becomes_text() {
        let mut map = IndexMap::new();
        map.insert("k".to_string(), Value::from("v\u{2}"));
        let value = sanitize_value(Value::Object(map));
        // serde escapes the control char as \u0002 text, which contains no raw control bytes
        assert!(matches!(value, Value::String(ref s) if s.starts_with("{\"k\": ")));
        assert!(!has_illegal(&value));
    }

    #[test]
    fn test_scalars_unchanged() {
        for value in [
            Value::Null,
            Value::Bool(false),
            Value::Int(-3),
            Value::UInt(9),
            Value::Float(1.5),
        ] {
            assert_eq!(sanitize_value(value.clone()), value);
        }
    }

    #[test]
    fn test_idempotent_and_clean() {
        let inputs = vec![
            Value::from("\u{0}\u{1}x\u{e}y\u{1f}\n"),
            Value::Bytes(vec![0, 1, 2, b'a', 0x0b, 0xc3, 0x28]),
            Value::Array(vec![Value::Bytes(vec![0x05, b'z']), Value::Null]),
            Value::Float(f64::NAN),
            Value::from(""),
        ];

        for input in inputs {
            let once = sanitize_value(input);
            assert!(!has_illegal(&once));
            let twice = sanitize_value(once.clone());
            match (&once, &twice) {
                (Value::Float(a), Value::Float(b)) if a.is_nan() => assert!(b.is_nan()),
                _ => assert_eq!(once, twice),
            }
        }
    }

    #[test]
    fn test_decode_binary_recursive() {
        let mut inner = IndexMap::new();
        inner.insert("blob".to_string(), Value::Bytes(b"hi".to_vec()));
        let value = Value::Array(vec![Value::Object(inner), Value::Bytes(vec![0xff])]);

        let decoded = decode_binary(value);
        assert!(!decoded.contains_bytes());

        let mut expected_inner = IndexMap::new();
        expected_inner.insert("blob".to_string(), Value::from("hi"));
        assert_eq!(
            decoded,
            Value::Array(vec![Value::Object(expected_inner), Value::from("\u{FFFD}")])
        );
    }
}
